//! Tests for trait composition

mod props;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::runtime::class::{ClassBuilder, ClassRef};
use crate::runtime::value::Value;
use crate::traits::{declare_trait, declare_trait_with, Trait, TraitRef};

/// Shared constructor log
pub(crate) type Spy = Arc<Mutex<Vec<String>>>;

/// Trait whose constructor records `name` after the inherited constructor ran
pub(crate) fn recording(
    spy: &Spy,
    name: &'static str,
    supertraits: Option<Vec<TraitRef>>,
) -> Trait {
    let spy = Arc::clone(spy);
    // distinct source per name, so each recording trait has its own identity
    let source = format!("recording:{}", name);
    let transformer = move |base: ClassRef| {
        let spy = Arc::clone(&spy);
        ClassBuilder::extend(base, name)
            .constructor(move |cx, args| {
                cx.super_init(args)?;
                spy.lock().push(name.to_string());
                Ok(())
            })
            .build()
    };
    match supertraits {
        Some(list) => declare_trait_with(list, &source, transformer),
        None => declare_trait(&source, transformer),
    }
}

/// Trait adding a single method `name` that returns `value`
pub(crate) fn returning(
    name: &'static str,
    value: i64,
) -> Trait {
    let source = format!("returning:{}:{}", name, value);
    declare_trait(&source, move |base| {
        ClassBuilder::extend(base, format!("Return{}", value))
            .method(name, move |_cx, _args| Ok(Value::Int(value)))
            .build()
    })
}

pub(crate) fn spy() -> Spy {
    Arc::new(Mutex::new(Vec::new()))
}
