//! Trait membership
//!
//! A composed class only exposes the identifier of its outermost trait
//! layer; every earlier layer keeps its own stamp on its own class. So the
//! test has to look at every class in the chain, not just the instance's.

use tracing::trace;

use super::declare::TraitRef;
use super::identity::TraitId;
use crate::runtime::class::{Class, Instance};
use crate::runtime::value::Value;

/// Whether `value` is an instance composed (directly or transitively) from `t`
///
/// Non-object values answer `false`; this never fails.
pub fn is_derived(
    value: &Value,
    t: impl Into<TraitRef>,
) -> bool {
    match value {
        Value::Object(obj) => obj.has_trait(t),
        _ => false,
    }
}

impl Instance {
    /// Whether this instance's class chain includes trait `t`
    pub fn has_trait(
        &self,
        t: impl Into<TraitRef>,
    ) -> bool {
        self.class().has_trait(t)
    }
}

impl Class {
    /// Whether trait `t` was applied anywhere in this class chain
    pub fn has_trait(
        &self,
        t: impl Into<TraitRef>,
    ) -> bool {
        let target = t.into().resolve().id();
        self.has_trait_id(target)
    }

    /// Whether any class in the chain reads as `target`
    ///
    /// A class reads as its own stamp, or as its nearest stamped ancestor
    /// when it has none. So `target` matches if some stamp carries it, or if
    /// it is `TraitId::NONE` and an unstamped class has no stamped ancestor.
    pub fn has_trait_id(
        &self,
        target: TraitId,
    ) -> bool {
        let mut found = false;
        // unstamped classes seen since the last stamp
        let mut open_tail = false;
        for class in self.chain() {
            match class.stamp() {
                Some(s) if s.id == target => {
                    found = true;
                    break;
                }
                Some(_) => open_tail = false,
                None => open_tail = true,
            }
        }
        let found = found || (target == TraitId::NONE && open_tail);
        trace!(class = self.name(), %target, found, "membership test");
        found
    }
}
