//! Library use-case layer.
//!
//! # Responsibility
//! - Own in-memory library state and route every mutation through it.
//! - Keep callers decoupled from storage details.

pub mod library_store;
