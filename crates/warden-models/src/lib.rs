//! Bundled example models for the warden checker.

pub mod jug;
pub mod repl;

pub use jug::JugState;
pub use repl::{ReplState, Role, Term};
