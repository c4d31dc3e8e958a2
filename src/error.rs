//! Error taxonomy for the engine.
//!
//! Programming errors and resource exhaustion are reported through
//! [`BddError`]. Invariant breaches (a non-canonical node observed, a
//! negative reference count, a unique-table miss for an edge that should
//! exist) are *not* represented here — per the engine's error handling
//! design, those are fatal internal errors and abort via `panic!` /
//! `debug_assert!` rather than propagating as a recoverable `Result`.

use thiserror::Error;

/// Errors surfaced by the public API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BddError {
    /// An edge was passed to an operation but does not refer to a live node.
    #[error("edge does not refer to a live node")]
    InvalidEdge,

    /// `decref` was called on a node whose reference count is already zero.
    #[error("decref called on a node with a zero reference count")]
    DecrefUnderflow,

    /// [`crate::manager::BddManager::declare`] was called with a name that
    /// is already registered.
    #[error("variable `{0}` is already declared")]
    AlreadyDeclared(String),

    /// A variable name was used that the manager has never declared.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// [`crate::manager::BddManager::reorder_to`] was given a target order
    /// that is missing variables or assigns duplicate levels.
    #[error("invalid target order: {0}")]
    InvalidOrder(String),

    /// Node allocation failed. Callers may retry after an explicit
    /// [`crate::manager::BddManager::collect_garbage`] or
    /// [`crate::manager::BddManager::sift`].
    #[error("out of memory while allocating a node")]
    OutOfMemory,
}

/// Convenience alias used throughout the crate.
pub type BddResult<T> = Result<T, BddError>;
