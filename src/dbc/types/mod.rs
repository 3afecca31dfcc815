//! Intermediate parse types: the raw accumulator and the attribute system.

pub mod ast;
pub mod attributes;
