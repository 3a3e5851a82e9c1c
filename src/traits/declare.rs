//! Trait declaration
//!
//! Both declaration forms, with and without supertraits, end up as the same
//! immutable `TraitDef`, shared through the cheap `Trait` handle.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::identity::{IdentityStrategy, TraitId, TraitSymbol};
use crate::runtime::class::ClassRef;

/// Class transformer: takes the running base class and returns a new class
/// extending it
pub type Transformer = Arc<dyn Fn(ClassRef) -> ClassRef + Send + Sync>;

/// Lazy trait factory, used for generic/parameterized traits
pub type TraitFactory = Arc<dyn Fn() -> Trait + Send + Sync>;

/// Declared trait
pub struct TraitDef {
    id: TraitId,
    symbol: TraitSymbol,
    source: Arc<str>,
    transformer: Transformer,
    supertraits: Option<Vec<TraitRef>>,
}

/// Shared trait handle
#[derive(Clone)]
pub struct Trait(Arc<TraitDef>);

impl Trait {
    /// Primary identifier (dedup and membership key)
    pub fn id(&self) -> TraitId {
        self.0.id
    }

    /// Secondary, per-declaration symbol
    pub fn symbol(&self) -> TraitSymbol {
        self.0.symbol
    }

    /// Source text the identifier was derived from
    pub fn source(&self) -> &str {
        &self.0.source
    }

    /// Declared supertraits, in declaration order
    pub fn supertraits(&self) -> &[TraitRef] {
        self.0.supertraits.as_deref().unwrap_or(&[])
    }

    /// Whether the trait was declared with a supertrait list
    pub fn has_supertraits(&self) -> bool {
        self.0.supertraits.is_some()
    }

    /// Run the transformer on `base`
    pub fn apply(
        &self,
        base: ClassRef,
    ) -> ClassRef {
        (self.0.transformer)(base)
    }

    /// Whether both handles refer to the same declaration
    pub fn ptr_eq(
        &self,
        other: &Trait,
    ) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Trait {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Trait")
            .field("id", &self.0.id)
            .field("symbol", &self.0.symbol)
            .field("supertraits", &self.supertraits().len())
            .finish()
    }
}

/// Reference to a trait: either the trait itself or a factory producing it
#[derive(Clone)]
pub enum TraitRef {
    Direct(Trait),
    Lazy(TraitFactory),
}

impl TraitRef {
    /// Wrap a zero-argument factory
    pub fn lazy<F>(factory: F) -> Self
    where
        F: Fn() -> Trait + Send + Sync + 'static,
    {
        TraitRef::Lazy(Arc::new(factory))
    }

    /// The concrete trait, invoking the factory if needed
    pub fn resolve(&self) -> Trait {
        match self {
            TraitRef::Direct(t) => t.clone(),
            TraitRef::Lazy(factory) => factory(),
        }
    }
}

impl From<Trait> for TraitRef {
    fn from(t: Trait) -> Self {
        TraitRef::Direct(t)
    }
}

impl From<&Trait> for TraitRef {
    fn from(t: &Trait) -> Self {
        TraitRef::Direct(t.clone())
    }
}

impl From<&TraitRef> for TraitRef {
    fn from(r: &TraitRef) -> Self {
        r.clone()
    }
}

impl fmt::Debug for TraitRef {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            TraitRef::Direct(t) => f.debug_tuple("Direct").field(t).finish(),
            TraitRef::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Trait declaration front-end
#[derive(Debug, Clone, Copy, Default)]
pub struct Declarer {
    strategy: IdentityStrategy,
}

impl Declarer {
    /// Create a declarer with the given identity strategy
    pub fn new(strategy: IdentityStrategy) -> Self {
        Self { strategy }
    }

    /// Identity strategy in use
    pub fn strategy(&self) -> IdentityStrategy {
        self.strategy
    }

    /// Declare a trait without supertraits
    pub fn declare<F>(
        &self,
        source: &str,
        transformer: F,
    ) -> Trait
    where
        F: Fn(ClassRef) -> ClassRef + Send + Sync + 'static,
    {
        self.build(None, source, Arc::new(transformer))
    }

    /// Declare a trait that requires `supertraits` beneath it
    pub fn declare_with<F>(
        &self,
        supertraits: Vec<TraitRef>,
        source: &str,
        transformer: F,
    ) -> Trait
    where
        F: Fn(ClassRef) -> ClassRef + Send + Sync + 'static,
    {
        self.build(Some(supertraits), source, Arc::new(transformer))
    }

    fn build(
        &self,
        supertraits: Option<Vec<TraitRef>>,
        source: &str,
        transformer: Transformer,
    ) -> Trait {
        let id = self.strategy.assign(source);
        debug!(
            %id,
            supertraits = supertraits.as_ref().map(|s| s.len()).unwrap_or(0),
            "declare trait"
        );
        Trait(Arc::new(TraitDef {
            id,
            symbol: TraitSymbol::next(),
            source: Arc::from(source),
            transformer,
            supertraits,
        }))
    }
}

/// Declare a trait without supertraits, identified by `source`
pub fn declare_trait<F>(
    source: &str,
    transformer: F,
) -> Trait
where
    F: Fn(ClassRef) -> ClassRef + Send + Sync + 'static,
{
    Declarer::default().declare(source, transformer)
}

/// Declare a trait with supertraits, identified by `source`
pub fn declare_trait_with<F>(
    supertraits: Vec<TraitRef>,
    source: &str,
    transformer: F,
) -> Trait
where
    F: Fn(ClassRef) -> ClassRef + Send + Sync + 'static,
{
    Declarer::default().declare_with(supertraits, source, transformer)
}

/// Declare a trait from a transformer expression
///
/// The transformer's source text becomes the trait's identity, so two
/// textually identical declarations deduplicate against each other.
///
/// ```
/// use class_traits::{derive, is_derived, trait_def};
/// use class_traits::runtime::class::ClassBuilder;
/// use class_traits::runtime::value::Value;
///
/// let swim = trait_def!(|base| ClassBuilder::extend(base, "Swim").field("swimming", 0i64).build());
/// let dive = trait_def!([&swim] => |base| ClassBuilder::extend(base, "Dive").build());
///
/// let diver = derive([&dive]).unwrap().instantiate(&[]).unwrap();
/// assert!(is_derived(&Value::from(diver), &swim));
/// ```
///
/// A leading `declarer;` routes the declaration through that `Declarer`, so
/// its identity strategy applies:
///
/// ```
/// use class_traits::trait_def;
/// use class_traits::runtime::class::ClassBuilder;
/// use class_traits::traits::{Declarer, IdentityStrategy};
///
/// let declarer = Declarer::new(IdentityStrategy::PerDeclaration);
/// let a = trait_def!(declarer; |base| ClassBuilder::extend(base, "A").build());
/// let b = trait_def!(declarer; |base| ClassBuilder::extend(base, "A").build());
/// assert_ne!(a.id(), b.id());
/// ```
#[macro_export]
macro_rules! trait_def {
    ($declarer:expr; [$($supertrait:expr),* $(,)?] => $transformer:expr) => {
        ($declarer).declare_with(
            ::std::vec![$($crate::traits::TraitRef::from($supertrait)),*],
            ::std::stringify!($transformer),
            $transformer,
        )
    };
    ($declarer:expr; $transformer:expr) => {
        ($declarer).declare(::std::stringify!($transformer), $transformer)
    };
    ([$($supertrait:expr),* $(,)?] => $transformer:expr) => {
        $crate::traits::declare_trait_with(
            ::std::vec![$($crate::traits::TraitRef::from($supertrait)),*],
            ::std::stringify!($transformer),
            $transformer,
        )
    };
    ($transformer:expr) => {
        $crate::traits::declare_trait(::std::stringify!($transformer), $transformer)
    };
}
