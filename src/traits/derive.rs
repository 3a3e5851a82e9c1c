//! Trait linearization and derivation
//!
//! Traits are processed in reverse of the order they are listed, so the
//! first-listed trait ends up as the outermost layer: it wins name conflicts
//! and is the first implementation a caller reaches. Before a trait is
//! applied, its own supertraits are resolved the same way, which places them
//! beneath it in the chain.
//!
//! Deduplication is by identifier. A trait that is already part of the
//! chain is skipped entirely, supertraits included, so each trait's
//! constructor runs exactly once per instance.
//!
//! ```text
//! derive([Filter, Double, Increment, Base])
//!
//!   Filter      <- outermost, first to see put()/get()
//!   Double
//!   Increment
//!   Base
//!   ROOT        <- empty root class
//! ```

use std::sync::Arc;

use hashbrown::HashSet;
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::declare::{Trait, TraitRef};
use super::identity::{self, Stamp, TraitId};
use crate::error::{ComposeError, Result};
use crate::runtime::class::{ClassBuilder, ClassRef};

/// Name of the empty class every derivation starts from
pub const ROOT_CLASS_NAME: &str = "ROOT";

/// Computes the application order of a trait list
///
/// One linearizer covers one derivation; its applied-set is never shared.
///
/// Cycle detection follows declarations, not identifiers: two different
/// declarations that happen to share an identifier nest without complaint.
/// A cycle can only be closed through a lazy factory, which yields a fresh
/// declaration on every call, so a factory result re-entering a trait that
/// is still open is matched by its source text.
#[derive(Debug, Default)]
pub struct Linearizer {
    applied: HashSet<TraitId>,
    resolving: SmallVec<[Trait; 8]>,
    order: SmallVec<[Trait; 8]>,
}

impl Linearizer {
    /// Create an empty linearizer
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a trait with this identifier is already placed
    pub fn contains(
        &self,
        id: TraitId,
    ) -> bool {
        self.applied.contains(&id)
    }

    /// Place a list of traits, last-listed innermost
    pub fn visit_all<'a, I>(
        &mut self,
        traits: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = &'a TraitRef>,
        I::IntoIter: DoubleEndedIterator,
    {
        for r in traits.into_iter().rev() {
            self.visit(r)?;
        }
        Ok(())
    }

    /// Place one trait after its supertraits, unless already placed
    pub fn visit(
        &mut self,
        r: &TraitRef,
    ) -> Result<()> {
        let t = r.resolve();
        let id = t.id();
        if self.applied.contains(&id) {
            trace!(%id, "trait already composed, skipping");
            return Ok(());
        }
        if self.reenters(&t, matches!(r, TraitRef::Lazy(_))) {
            return Err(ComposeError::CyclicSupertrait { trait_id: id });
        }
        self.resolving.push(t.clone());
        self.visit_all(t.supertraits())?;
        self.resolving.pop();
        self.applied.insert(id);
        self.order.push(t);
        Ok(())
    }

    fn reenters(
        &self,
        t: &Trait,
        lazy: bool,
    ) -> bool {
        self.resolving
            .iter()
            .any(|open| open.ptr_eq(t) || (lazy && open.source() == t.source()))
    }

    /// Placed traits, innermost first
    pub fn finish(self) -> Vec<Trait> {
        self.order.into_vec()
    }
}

/// Application order for `traits`, innermost first
pub fn linearize<I>(traits: I) -> Result<Vec<Trait>>
where
    I: IntoIterator,
    I::Item: Into<TraitRef>,
{
    let refs: Vec<TraitRef> = traits.into_iter().map(Into::into).collect();
    let mut linearizer = Linearizer::new();
    linearizer.visit_all(&refs)?;
    Ok(linearizer.finish())
}

/// Fresh empty root class
pub fn root_class() -> ClassRef {
    ClassBuilder::root(ROOT_CLASS_NAME).build()
}

/// Compose `traits` into one class
///
/// An empty list yields a bare root class.
pub fn derive<I>(traits: I) -> Result<ClassRef>
where
    I: IntoIterator,
    I::Item: Into<TraitRef>,
{
    let order = linearize(traits)?;
    let mut class = root_class();
    for t in &order {
        class = apply_layer(t, class)?;
    }
    debug!(layers = order.len(), class = class.name(), "derived class");
    Ok(class)
}

/// Apply one trait on top of `base` and stamp the result
pub fn apply_layer(
    t: &Trait,
    base: ClassRef,
) -> Result<ClassRef> {
    let class = t.apply(Arc::clone(&base));
    if !class.extends(&base) {
        return Err(ComposeError::NotDerived {
            trait_id: t.id(),
            class: class.name().to_string(),
            base: base.name().to_string(),
        });
    }
    identity::stamp(
        &class,
        Stamp {
            id: t.id(),
            symbol: t.symbol(),
        },
    )?;
    debug!(id = %t.id(), layer = class.name(), over = base.name(), "applied trait");
    Ok(class)
}
