//! Composition errors
//!
//! Every failure the object model and the trait deriver can report.
//! Membership tests never produce one of these; they answer `false` instead.

use crate::runtime::value::ValueKind;
use crate::traits::TraitId;
use thiserror::Error;

/// Unified result type for the crate
pub type Result<T, E = ComposeError> = std::result::Result<T, E>;

/// Composition error
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A transformer returned a class that does not directly extend the base it was given
    #[error("transformer of trait {trait_id} returned class '{class}' which does not extend '{base}'")]
    NotDerived {
        trait_id: TraitId,
        class: String,
        base: String,
    },

    /// Stamping was attempted on a class that already carries a trait stamp
    #[error("class '{class}' is already stamped with trait {existing}")]
    AlreadyStamped { class: String, existing: TraitId },

    /// A supertrait chain leads back to a trait that is still being resolved
    #[error("cyclic supertrait dependency through trait {trait_id}")]
    CyclicSupertrait { trait_id: TraitId },

    /// Method lookup exhausted the class chain
    #[error("no method '{method}' on class '{class}'")]
    NoSuchMethod { class: String, method: String },

    /// `call_super` was used from the innermost layer defining the method
    #[error("no inner implementation of '{method}' below class '{class}'")]
    NoSuperMethod { class: String, method: String },

    /// A constructor returned without calling the inherited constructor
    #[error("constructor of '{class}' did not call the inherited constructor")]
    SuperNotCalled { class: String },

    /// A constructor called the inherited constructor more than once
    #[error("constructor of '{class}' called the inherited constructor twice")]
    SuperCalledTwice { class: String },

    /// A value had the wrong kind for the operation
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: ValueKind,
        found: ValueKind,
    },

    /// Wrong number of arguments passed to a method or constructor
    #[error("'{name}' expects {expected} argument(s), found {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Integer arithmetic inside a method left the `i64` range
    #[error("integer overflow in '{method}'")]
    Overflow { method: String },
}

impl ComposeError {
    /// Shorthand for a `TypeMismatch` built from the offending value kind
    pub fn type_mismatch(
        expected: ValueKind,
        found: ValueKind,
    ) -> Self {
        ComposeError::TypeMismatch { expected, found }
    }

    /// Shorthand for an `Overflow` raised by `method`
    pub fn overflow(method: &str) -> Self {
        ComposeError::Overflow {
            method: method.to_string(),
        }
    }

    /// Check argument count, returning `Arity` on mismatch
    pub fn check_arity(
        name: &str,
        expected: usize,
        found: usize,
    ) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(ComposeError::Arity {
                name: name.to_string(),
                expected,
                found,
            })
        }
    }
}
