//! Terminal output.

pub mod encoding;
