//! Error handling integration tests

use class_traits::demo::QueueTraits;
use class_traits::runtime::class::ClassBuilder;
use class_traits::runtime::value::Value;
use class_traits::{declare_trait, derive, ComposeError};

#[test]
fn test_wrong_argument_kind() {
    let q = QueueTraits::declare().compose().unwrap().instantiate(&[]).unwrap();
    let result = q.call("put", &[Value::from("seven")]);
    assert!(matches!(result, Err(ComposeError::TypeMismatch { .. })));
}

#[test]
fn test_wrong_argument_count() {
    let q = QueueTraits::declare().compose().unwrap().instantiate(&[]).unwrap();
    let result = q.call("put", &[]);
    assert!(matches!(
        result,
        Err(ComposeError::Arity {
            expected: 1,
            found: 0,
            ..
        })
    ));
}

#[test]
fn test_unknown_method() {
    let q = QueueTraits::declare().compose().unwrap().instantiate(&[]).unwrap();
    let err = q.call("peek", &[]).unwrap_err();
    assert_eq!(err.to_string(), "no method 'peek' on class 'Filter'");
}

#[test]
fn test_constructor_without_super_fails_on_instantiate() {
    let broken = declare_trait("broken-ctor", |base| {
        ClassBuilder::extend(base, "Broken")
            .constructor(|_cx, _args| Ok(()))
            .build()
    });
    // deriving succeeds; the misuse only shows once the class is used
    let class = derive([&broken]).unwrap();
    assert!(matches!(
        class.instantiate(&[]),
        Err(ComposeError::SuperNotCalled { .. })
    ));
}

#[test]
fn test_malformed_transformer_fails_derivation() {
    let detached = declare_trait("detached", |_base| ClassBuilder::root("Detached").build());
    let err = derive([&detached]).unwrap_err();
    assert!(err.to_string().contains("does not extend 'ROOT'"));
}
