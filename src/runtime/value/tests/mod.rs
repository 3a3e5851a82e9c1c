//! Tests for runtime values
