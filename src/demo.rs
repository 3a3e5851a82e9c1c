//! Demo compositions
//!
//! Two small trait families used by the command-line tool and the
//! integration tests:
//!
//! - a cooperative queue: `Filter` drops negatives, `Double` and
//!   `Increment` rewrite values on their way down, `Base` stores them
//! - a construction-order family: `Foo`, a generic `Bar`, and `Baz`
//!   requiring both, each recording when its constructor runs
//!
//! Every constructor takes the `Declarer` whose identity strategy the
//! declarations should follow.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{ComposeError, Result};
use crate::runtime::class::{ClassBuilder, ClassRef, ConstructCx};
use crate::runtime::value::Value;
use crate::traits::{derive, Declarer, Trait, TraitRef};
use crate::trait_def;

/// The four queue layers
#[derive(Debug, Clone)]
pub struct QueueTraits {
    pub filter: Trait,
    pub double: Trait,
    pub increment: Trait,
    pub base: Trait,
}

impl QueueTraits {
    /// Declare the queue layers with source-text identity
    pub fn declare() -> Self {
        Self::declare_with(&Declarer::default())
    }

    /// Declare the queue layers through `declarer`
    pub fn declare_with(declarer: &Declarer) -> Self {
        let base = trait_def!(declarer; |base| {
            ClassBuilder::extend(base, "Base")
                .field("buffer", Value::List(Vec::new()))
                .method("put", |cx, args| {
                    ComposeError::check_arity("put", 1, args.len())?;
                    let value = args[0].clone();
                    cx.this()
                        .update("buffer", |b| b.expect_list_mut().map(|l| l.push(value)))?;
                    Ok(Value::Undefined)
                })
                .method("get", |cx, _args| {
                    cx.this().update("buffer", |b| {
                        b.expect_list_mut().map(|l| {
                            if l.is_empty() {
                                Value::Undefined
                            } else {
                                l.remove(0)
                            }
                        })
                    })
                })
                .build()
        });
        let increment = trait_def!(declarer; |base| {
            ClassBuilder::extend(base, "Increment")
                .method("put", |cx, args| {
                    ComposeError::check_arity("put", 1, args.len())?;
                    let v = args[0]
                        .expect_int()?
                        .checked_add(1)
                        .ok_or_else(|| ComposeError::overflow("Increment.put"))?;
                    cx.call_super(&[Value::Int(v)])
                })
                .method("get", |cx, args| cx.call_super(args))
                .build()
        });
        let double = trait_def!(declarer; |base| {
            ClassBuilder::extend(base, "Double")
                .method("put", |cx, args| {
                    ComposeError::check_arity("put", 1, args.len())?;
                    let v = args[0]
                        .expect_int()?
                        .checked_mul(2)
                        .ok_or_else(|| ComposeError::overflow("Double.put"))?;
                    cx.call_super(&[Value::Int(v)])
                })
                .method("get", |cx, args| cx.call_super(args))
                .build()
        });
        let filter = trait_def!(declarer; |base| {
            ClassBuilder::extend(base, "Filter")
                .method("put", |cx, args| {
                    ComposeError::check_arity("put", 1, args.len())?;
                    if args[0].expect_int()? < 0 {
                        return Ok(Value::Undefined);
                    }
                    cx.call_super(args)
                })
                .method("get", |cx, args| cx.call_super(args))
                .build()
        });
        Self {
            filter,
            double,
            increment,
            base,
        }
    }

    /// Layers in composition order, outermost first
    pub fn ordered(&self) -> [&Trait; 4] {
        [&self.filter, &self.double, &self.increment, &self.base]
    }

    /// `derive(Filter, Double, Increment, Base)`
    pub fn compose(&self) -> Result<ClassRef> {
        derive(self.ordered())
    }
}

/// Feed each value through `put` and read one back with `get` after each
pub fn run_queue(
    declarer: &Declarer,
    values: &[i64],
) -> Result<Vec<Value>> {
    let queue = QueueTraits::declare_with(declarer)
        .compose()?
        .instantiate(&[])?;
    values
        .iter()
        .map(|&v| {
            queue.call("put", &[Value::Int(v)])?;
            queue.call("get", &[])
        })
        .collect()
}

/// Shared record of constructor invocations
pub type EventLog = Arc<Mutex<Vec<String>>>;

fn record(
    log: &EventLog,
    name: &'static str,
) -> impl Fn(&mut ConstructCx<'_>, &[Value]) -> Result<()> + Send + Sync + 'static {
    let log = Arc::clone(log);
    move |cx: &mut ConstructCx<'_>, args: &[Value]| -> Result<()> {
        cx.super_init(args)?;
        log.lock().push(name.to_string());
        Ok(())
    }
}

/// `Foo`: records "Foo"
pub fn foo(
    declarer: &Declarer,
    log: &EventLog,
) -> Trait {
    let log = Arc::clone(log);
    trait_def!(declarer; move |base| {
        ClassBuilder::extend(base, "Foo")
            .constructor(record(&log, "Foo"))
            .build()
    })
}

/// `Bar<T>`: generic trait, records "Bar"
pub fn bar<T: 'static>(
    declarer: &Declarer,
    log: &EventLog,
) -> Trait {
    let log = Arc::clone(log);
    trait_def!(declarer; move |base| {
        ClassBuilder::extend(base, "Bar")
            .static_value("parameter", std::any::type_name::<T>())
            .constructor(record(&log, "Bar"))
            .build()
    })
}

/// `Baz`: requires `Bar<String>` and `Foo`, records "Baz"
pub fn baz(
    declarer: &Declarer,
    log: &EventLog,
    foo: &Trait,
) -> Trait {
    let bar_declarer = *declarer;
    let bar_log = Arc::clone(log);
    let bar_ref = TraitRef::lazy(move || bar::<String>(&bar_declarer, &bar_log));
    let log = Arc::clone(log);
    trait_def!(declarer; [bar_ref, foo] => move |base| {
        ClassBuilder::extend(base, "Baz")
            .constructor(record(&log, "Baz"))
            .build()
    })
}

/// Consumer class `App` extending `derive(Baz)`, plus the traits involved
pub fn app(
    declarer: &Declarer,
    log: &EventLog,
) -> Result<(ClassRef, Trait, Trait)> {
    let foo = foo(declarer, log);
    let baz = baz(declarer, log, &foo);
    let base = derive([&baz])?;
    let app = ClassBuilder::extend(base, "App")
        .constructor(record(log, "App"))
        .build();
    Ok((app, foo, baz))
}

/// Instantiate `App` and return the constructor invocation order
pub fn construction_order(declarer: &Declarer) -> Result<Vec<String>> {
    let log = EventLog::default();
    let (app, _, _) = app(declarer, &log)?;
    app.instantiate(&[])?;
    let order = log.lock().clone();
    Ok(order)
}
