//! Trait composition through the public API

use std::sync::Arc;

use class_traits::demo::{self, EventLog};
use class_traits::runtime::class::ClassBuilder;
use class_traits::runtime::value::Value;
use class_traits::traits::{linearize, Declarer, IdentityStrategy};
use class_traits::util::config::ComposeConfig;
use class_traits::{derive, is_derived, trait_def, TraitRef};

#[test]
fn test_construction_order_with_generic_supertrait() {
    let order = demo::construction_order(&Declarer::default()).unwrap();
    assert_eq!(order, vec!["Foo", "Bar", "Baz", "App"]);
}

#[test]
fn test_app_membership() {
    let log = EventLog::default();
    let (app, foo, baz) = demo::app(&Declarer::default(), &log).unwrap();
    let obj = Value::from(app.instantiate(&[]).unwrap());

    assert!(is_derived(&obj, &foo));
    assert!(is_derived(&obj, &baz));

    let bar_log = Arc::clone(&log);
    let bar = TraitRef::lazy(move || demo::bar::<String>(&Declarer::default(), &bar_log));
    assert!(is_derived(&obj, bar));
}

#[test]
fn test_generic_parameter_is_visible() {
    let log = EventLog::default();
    let (app, _, _) = demo::app(&Declarer::default(), &log).unwrap();
    let parameter = app
        .static_value("parameter")
        .and_then(|v| v.as_str().map(String::from));
    assert_eq!(parameter.as_deref(), Some(std::any::type_name::<String>()));
}

#[test]
fn test_mixed_refs_in_one_call() {
    let shout = trait_def!(|base| {
        ClassBuilder::extend(base, "Shout")
            .method("say", |cx, args| {
                let inner = cx.call_super(args)?;
                Ok(Value::from(inner.as_str().unwrap_or("").to_uppercase()))
            })
            .build()
    });
    let greet = || {
        trait_def!(|base| {
            ClassBuilder::extend(base, "Greet")
                .method("say", |_cx, _args| Ok(Value::from("hello")))
                .build()
        })
    };

    let class = derive([TraitRef::from(&shout), TraitRef::lazy(greet)]).unwrap();
    let obj = class.instantiate(&[]).unwrap();
    assert_eq!(obj.call("say", &[]).unwrap(), Value::from("HELLO"));
}

#[test]
fn test_linearize_matches_chain() {
    let traits = demo::QueueTraits::declare();
    let order = linearize(traits.ordered()).unwrap();
    let class = traits.compose().unwrap();

    let chain_ids: Vec<_> = class
        .chain()
        .filter_map(|c| c.stamp().map(|s| s.id))
        .collect();
    let mut order_ids: Vec<_> = order.iter().map(|t| t.id()).collect();
    order_ids.reverse();
    assert_eq!(chain_ids, order_ids);
}

#[test]
fn test_per_declaration_identity_from_config() {
    let config = ComposeConfig::from_toml("[identity]\nstrategy = \"per-declaration\"\n").unwrap();
    let declarer = config.declarer();
    assert_eq!(declarer.strategy(), IdentityStrategy::PerDeclaration);

    let source = "|base| ClassBuilder::extend(base, \"Same\").build()";
    let a = declarer.declare(source, |base| ClassBuilder::extend(base, "Same").build());
    let b = declarer.declare(source, |base| ClassBuilder::extend(base, "Same").build());
    assert_ne!(a.id(), b.id());

    let class = derive([&a, &b]).unwrap();
    assert_eq!(class.depth(), 3);

    let obj = Value::from(class.instantiate(&[]).unwrap());
    assert!(is_derived(&obj, &a));
    assert!(is_derived(&obj, &b));
}

#[test]
fn test_construction_order_under_per_declaration_ids() {
    let declarer = ComposeConfig::from_toml("[identity]\nstrategy = \"per-declaration\"\n")
        .unwrap()
        .declarer();
    let order = demo::construction_order(&declarer).unwrap();
    assert_eq!(order, vec!["Foo", "Bar", "Baz", "App"]);

    let log = EventLog::default();
    let (app, foo, baz) = demo::app(&declarer, &log).unwrap();
    assert!(foo.id().0 >= 0x8000_0000);
    let obj = Value::from(app.instantiate(&[]).unwrap());
    assert!(is_derived(&obj, &foo));
    assert!(is_derived(&obj, &baz));
}
