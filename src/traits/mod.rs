//! Trait composition
//!
//! A trait is a class transformer plus the supertraits it expects beneath
//! it. Deriving from a list of traits linearizes them into one
//! single-inheritance chain, applying each trait exactly once and stamping
//! every produced class with the trait's identifier so membership can be
//! tested later.
//!
//! ```text
//! declare_trait / trait_def!  ->  Trait
//! derive([..])                ->  Linearizer -> apply_layer -> stamp  ->  ClassRef
//! is_derived(value, trait)    ->  walk class chain comparing identifiers
//! ```

pub mod declare;
pub mod derive;
pub mod identity;
pub mod membership;

pub use declare::{
    declare_trait, declare_trait_with, Declarer, Trait, TraitDef, TraitFactory, TraitRef,
    Transformer,
};
pub use derive::{apply_layer, derive, linearize, root_class, Linearizer, ROOT_CLASS_NAME};
pub use identity::{crc32, stamp, tag, IdentityStrategy, Stamp, TraitId, TraitSymbol};
pub use membership::is_derived;

#[cfg(test)]
mod tests;
