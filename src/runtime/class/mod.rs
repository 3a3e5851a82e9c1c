//! Runtime classes
//!
//! A `Class` is an immutable record of one layer in a single-inheritance
//! chain: its own fields, methods, statics and (optionally) a constructor,
//! plus a link to the class it extends. Trait transformers produce new
//! classes with `ClassBuilder::extend`, so a composed class is simply the
//! outermost link of such a chain.
//!
//! # Identity stamp
//!
//! Each class has a write-once stamp slot. The trait deriver fills it right
//! after a transformer produced the class; nothing can overwrite it later.
//! `Class::id` reads the stamp the way an inherited static would be read:
//! own stamp first, then the nearest stamped ancestor.

mod instance;

pub use instance::{ConstructCx, Instance, MethodCx};

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;

use crate::error::Result;
use crate::runtime::value::Value;
use crate::traits::{Stamp, TraitId, TraitSymbol};

/// Shared class handle
pub type ClassRef = Arc<Class>;

/// Method implementation
///
/// Receives the call context (receiver and the layer that owns this
/// implementation) and the call arguments.
pub type MethodFn = Arc<dyn Fn(&MethodCx<'_>, &[Value]) -> Result<Value> + Send + Sync>;

/// Constructor implementation
///
/// Must call `ConstructCx::super_init` exactly once.
pub type ConstructorFn = Arc<dyn Fn(&mut ConstructCx<'_>, &[Value]) -> Result<()> + Send + Sync>;

/// One layer of a class chain
pub struct Class {
    name: Arc<str>,
    parent: Option<ClassRef>,
    constructor: Option<ConstructorFn>,
    fields: IndexMap<Arc<str>, Value>,
    methods: IndexMap<Arc<str>, MethodFn>,
    statics: IndexMap<Arc<str>, Value>,
    stamp: OnceCell<Stamp>,
}

impl Class {
    /// Class name (informational only, never used for identity)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The class this one extends
    pub fn parent(&self) -> Option<&ClassRef> {
        self.parent.as_ref()
    }

    /// Iterate this class and then every ancestor, innermost last
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// Number of classes in the chain, this one included
    pub fn depth(&self) -> usize {
        self.chain().count()
    }

    /// Whether `base` is the direct parent of this class
    pub fn extends(
        &self,
        base: &ClassRef,
    ) -> bool {
        self.parent
            .as_ref()
            .map(|p| Arc::ptr_eq(p, base))
            .unwrap_or(false)
    }

    /// Whether `other` appears anywhere in this class's chain
    pub fn is_subclass_of(
        &self,
        other: &ClassRef,
    ) -> bool {
        self.chain().any(|c| std::ptr::eq(c, Arc::as_ptr(other)))
    }

    /// Names of fields declared by this class itself
    pub fn own_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_ref())
    }

    /// Names of methods declared by this class itself
    pub fn own_methods(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(|k| k.as_ref())
    }

    /// Whether this class itself declares `method`
    pub fn defines_method(
        &self,
        method: &str,
    ) -> bool {
        self.methods.contains_key(method)
    }

    /// Resolve `method`, starting at this class and walking outward-in
    pub fn find_method(
        &self,
        method: &str,
    ) -> Option<(&Class, &MethodFn)> {
        self.chain()
            .find_map(|c| c.methods.get(method).map(|f| (c, f)))
    }

    /// Static value lookup, falling back to ancestors
    pub fn static_value(
        &self,
        name: &str,
    ) -> Option<&Value> {
        self.chain().find_map(|c| c.statics.get(name))
    }

    /// Stamp carried by this class itself
    pub fn stamp(&self) -> Option<&Stamp> {
        self.stamp.get()
    }

    /// Trait identifier as seen on this class: own stamp, else the nearest
    /// stamped ancestor, else `TraitId::NONE`
    pub fn id(&self) -> TraitId {
        self.chain()
            .find_map(|c| c.stamp().map(|s| s.id))
            .unwrap_or(TraitId::NONE)
    }

    /// Whether this class itself carries the private marker for `symbol`
    pub fn has_marker(
        &self,
        symbol: TraitSymbol,
    ) -> bool {
        self.stamp().map(|s| s.symbol == symbol).unwrap_or(false)
    }

    /// Fill the stamp slot; hands back the existing stamp if already filled
    pub(crate) fn set_stamp(
        &self,
        stamp: Stamp,
    ) -> std::result::Result<(), Stamp> {
        self.stamp.set(stamp).map_err(|_| {
            // set() only fails when the slot is occupied
            self.stamp.get().copied().unwrap_or(stamp)
        })
    }

    pub(crate) fn constructor(&self) -> Option<&ConstructorFn> {
        self.constructor.as_ref()
    }

    pub(crate) fn field_inits(&self) -> impl Iterator<Item = (&Arc<str>, &Value)> {
        self.fields.iter()
    }

    /// Create an instance, running the constructor chain with `args`
    pub fn instantiate(
        self: &Arc<Self>,
        args: &[Value],
    ) -> Result<Instance> {
        Instance::construct(Arc::clone(self), args)
    }
}

impl fmt::Debug for Class {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("stamp", &self.stamp.get())
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Iterator over a class and its ancestors
pub struct Chain<'a> {
    next: Option<&'a Class>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Class;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}

/// Builder for one class layer
///
/// ```
/// use class_traits::runtime::class::ClassBuilder;
/// use class_traits::runtime::value::Value;
///
/// let base = ClassBuilder::root("Base").build();
/// let counter = ClassBuilder::extend(base, "Counter")
///     .field("count", 0i64)
///     .method("bump", |cx, _args| {
///         let next = cx.this().get("count").expect_int()? + 1;
///         cx.this().set("count", next);
///         Ok(Value::Int(next))
///     })
///     .build();
///
/// let obj = counter.instantiate(&[]).unwrap();
/// assert_eq!(obj.call("bump", &[]).unwrap(), Value::Int(1));
/// ```
pub struct ClassBuilder {
    name: Arc<str>,
    parent: Option<ClassRef>,
    constructor: Option<ConstructorFn>,
    fields: IndexMap<Arc<str>, Value>,
    methods: IndexMap<Arc<str>, MethodFn>,
    statics: IndexMap<Arc<str>, Value>,
}

impl ClassBuilder {
    /// Start a class with no parent
    pub fn root(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            constructor: None,
            fields: IndexMap::new(),
            methods: IndexMap::new(),
            statics: IndexMap::new(),
        }
    }

    /// Start a class extending `base`
    pub fn extend(
        base: ClassRef,
        name: impl Into<Arc<str>>,
    ) -> Self {
        let mut builder = Self::root(name);
        builder.parent = Some(base);
        builder
    }

    /// Declare a field with the value every new instance starts with
    pub fn field(
        mut self,
        name: impl Into<Arc<str>>,
        default: impl Into<Value>,
    ) -> Self {
        self.fields.insert(name.into(), default.into());
        self
    }

    /// Declare (or override) a method
    pub fn method<F>(
        mut self,
        name: impl Into<Arc<str>>,
        f: F,
    ) -> Self
    where
        F: Fn(&MethodCx<'_>, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Declare a constructor; it must call `ConstructCx::super_init`
    pub fn constructor<F>(
        mut self,
        f: F,
    ) -> Self
    where
        F: Fn(&mut ConstructCx<'_>, &[Value]) -> Result<()> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(f));
        self
    }

    /// Declare a static value
    pub fn static_value(
        mut self,
        name: impl Into<Arc<str>>,
        value: impl Into<Value>,
    ) -> Self {
        self.statics.insert(name.into(), value.into());
        self
    }

    /// Finish the class
    pub fn build(self) -> ClassRef {
        Arc::new(Class {
            name: self.name,
            parent: self.parent,
            constructor: self.constructor,
            fields: self.fields,
            methods: self.methods,
            statics: self.statics,
            stamp: OnceCell::new(),
        })
    }
}
