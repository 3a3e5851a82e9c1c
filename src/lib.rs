//! class-traits
//!
//! Trait composition for runtime class chains. Independently authored
//! traits (functions that extend a base class with new fields and methods)
//! are linearized into one derived class. Supertrait dependencies are
//! resolved, shared traits are applied once, and overridden methods chain
//! cooperatively through `call_super`.
//!
//! # Example
//!
//! ```
//! use class_traits::{derive, is_derived, trait_def, Result};
//! use class_traits::runtime::class::ClassBuilder;
//! use class_traits::runtime::value::Value;
//!
//! fn main() -> Result<()> {
//!     let swim = trait_def!(|base| {
//!         ClassBuilder::extend(base, "Swim")
//!             .field("swimming", 0i64)
//!             .method("swim", |cx, _args| {
//!                 let n = cx.this().get("swimming").expect_int()?;
//!                 cx.this().set("swimming", n + 1);
//!                 Ok(Value::Int(n))
//!             })
//!             .build()
//!     });
//!     let walk = trait_def!(|base| ClassBuilder::extend(base, "Walk").field("walking", 0i64).build());
//!
//!     let sample = derive([&swim, &walk])?.instantiate(&[])?;
//!     assert_eq!(sample.call("swim", &[])?, Value::Int(0));
//!     assert_eq!(sample.call("swim", &[])?, Value::Int(1));
//!     assert!(is_derived(&Value::from(sample), &walk));
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/class-traits")]
#![warn(rust_2018_idioms)]

pub mod demo;
pub mod error;
pub mod runtime;
pub mod traits;

// Utility modules
pub mod util;

// Re-exports
pub use error::{ComposeError, Result};
pub use traits::{declare_trait, declare_trait_with, derive, is_derived, Trait, TraitRef};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = "class-traits";
