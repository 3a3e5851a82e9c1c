//! Core runtime value type
//!
//! This module provides the dynamic value carried by fields, statics and
//! method calls of composed classes.

pub mod runtime_value;
pub use runtime_value::*;

#[cfg(test)]
mod tests;
