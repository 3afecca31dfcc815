//! Domain model: the immutable database graph and its decode operations.

pub mod database;
pub mod errors;
pub mod message;
pub mod node;
pub mod object;
pub mod quark;
pub mod signal;
