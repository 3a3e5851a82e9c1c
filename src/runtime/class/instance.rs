//! Instances, construction and method dispatch
//!
//! Dispatch is an explicit method-resolution walk: `Instance::call` finds
//! the outermost layer defining the method, and `MethodCx::call_super`
//! continues the same walk from the owning layer's parent. That is the
//! whole cooperative-chaining mechanism; no layer knows which trait sits
//! beneath it.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::trace;

use super::{Class, ClassRef};
use crate::error::{ComposeError, Result};
use crate::runtime::value::Value;

/// Instance of a class (shared handle)
#[derive(Clone)]
pub struct Instance(Arc<InstanceInner>);

struct InstanceInner {
    class: ClassRef,
    fields: RwLock<IndexMap<Arc<str>, Value>>,
}

impl Instance {
    /// Allocate an instance and run the constructor chain of `class`
    pub(crate) fn construct(
        class: ClassRef,
        args: &[Value],
    ) -> Result<Self> {
        trace!(class = class.name(), args = args.len(), "instantiate");
        let instance = Instance(Arc::new(InstanceInner {
            class,
            fields: RwLock::new(IndexMap::new()),
        }));
        let class = Arc::clone(&instance.0.class);
        run_constructor(&class, &instance, args)?;
        Ok(instance)
    }

    /// The class this instance was created from
    pub fn class(&self) -> &ClassRef {
        &self.0.class
    }

    /// Read a field; absent fields read as `Undefined`
    pub fn get(
        &self,
        name: &str,
    ) -> Value {
        self.0.fields.read().get(name).cloned().unwrap_or_default()
    }

    /// Whether the field has been set on this instance
    pub fn has_field(
        &self,
        name: &str,
    ) -> bool {
        self.0.fields.read().contains_key(name)
    }

    /// Write a field
    pub fn set(
        &self,
        name: impl Into<Arc<str>>,
        value: impl Into<Value>,
    ) {
        self.0.fields.write().insert(name.into(), value.into());
    }

    /// Mutate a field in place (absent fields start as `Undefined`)
    ///
    /// The field table stays locked while `f` runs, so `f` must not touch
    /// this instance.
    pub fn update<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Value) -> R,
    ) -> R {
        let mut fields = self.0.fields.write();
        let slot = fields.entry(Arc::from(name)).or_default();
        f(slot)
    }

    /// Invoke `method` with virtual dispatch from the instance's class
    pub fn call(
        &self,
        method: &str,
        args: &[Value],
    ) -> Result<Value> {
        let (owner, f) =
            self.class()
                .find_method(method)
                .ok_or_else(|| ComposeError::NoSuchMethod {
                    class: self.class().name().to_string(),
                    method: method.to_string(),
                })?;
        trace!(method, layer = owner.name(), "dispatch");
        let cx = MethodCx {
            this: self,
            owner,
            method,
        };
        f(&cx, args)
    }

    /// Whether two handles point at the same instance
    pub fn ptr_eq(
        &self,
        other: &Instance,
    ) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Instance {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        // field values may point back at this instance, so only names are shown
        let fields = self.0.fields.read();
        f.debug_struct("Instance")
            .field("class", &self.class().name())
            .field("fields", &fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Context handed to a method implementation
pub struct MethodCx<'a> {
    this: &'a Instance,
    owner: &'a Class,
    method: &'a str,
}

impl<'a> MethodCx<'a> {
    /// The receiver
    pub fn this(&self) -> &'a Instance {
        self.this
    }

    /// The layer whose implementation is running
    pub fn owner(&self) -> &'a Class {
        self.owner
    }

    /// Name of the running method
    pub fn method(&self) -> &'a str {
        self.method
    }

    /// Virtual call on the receiver (starts from the outermost layer)
    pub fn call(
        &self,
        method: &str,
        args: &[Value],
    ) -> Result<Value> {
        self.this.call(method, args)
    }

    /// Invoke the next-inner implementation of the running method
    pub fn call_super(
        &self,
        args: &[Value],
    ) -> Result<Value> {
        self.call_super_named(self.method, args)
    }

    /// Invoke the next-inner implementation of `method`, skipping the
    /// owning layer and everything outside it
    pub fn call_super_named(
        &self,
        method: &str,
        args: &[Value],
    ) -> Result<Value> {
        let no_super = || ComposeError::NoSuperMethod {
            class: self.owner.name().to_string(),
            method: method.to_string(),
        };
        let parent = self.owner.parent().ok_or_else(no_super)?;
        let (owner, f) = parent.find_method(method).ok_or_else(no_super)?;
        trace!(method, layer = owner.name(), "super dispatch");
        let cx = MethodCx {
            this: self.this,
            owner,
            method,
        };
        f(&cx, args)
    }
}

/// Context handed to a constructor
pub struct ConstructCx<'a> {
    this: &'a Instance,
    class: &'a Class,
    super_called: bool,
}

impl<'a> ConstructCx<'a> {
    /// The instance under construction
    ///
    /// Fields of this layer and its ancestors exist only after `super_init`.
    pub fn this(&self) -> &'a Instance {
        self.this
    }

    /// The layer whose constructor is running
    pub fn class(&self) -> &'a Class {
        self.class
    }

    /// Run the inherited constructor chain with `args`, then install this
    /// layer's field initializers
    pub fn super_init(
        &mut self,
        args: &[Value],
    ) -> Result<()> {
        if self.super_called {
            return Err(ComposeError::SuperCalledTwice {
                class: self.class.name().to_string(),
            });
        }
        self.super_called = true;
        if let Some(parent) = self.class.parent() {
            run_constructor(parent, self.this, args)?;
        }
        install_fields(self.class, self.this);
        Ok(())
    }
}

fn run_constructor(
    class: &Class,
    this: &Instance,
    args: &[Value],
) -> Result<()> {
    match class.constructor() {
        Some(ctor) => {
            let mut cx = ConstructCx {
                this,
                class,
                super_called: false,
            };
            ctor(&mut cx, args)?;
            if !cx.super_called {
                return Err(ComposeError::SuperNotCalled {
                    class: class.name().to_string(),
                });
            }
            Ok(())
        }
        None => {
            if let Some(parent) = class.parent() {
                run_constructor(parent, this, args)?;
            }
            install_fields(class, this);
            Ok(())
        }
    }
}

fn install_fields(
    class: &Class,
    this: &Instance,
) {
    let mut fields = this.0.fields.write();
    for (name, init) in class.field_inits() {
        fields.insert(Arc::clone(name), init.clone());
    }
}
