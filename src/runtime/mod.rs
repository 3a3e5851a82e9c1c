//! Runtime object model
//!
//! This module contains the dynamic values, classes and instances that
//! trait transformers operate on.

pub mod class;
pub mod value;
