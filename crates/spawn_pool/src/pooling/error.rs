//! Pool error taxonomy
//!
//! None of these abort gameplay. Pool operations report them at warn level
//! and then no-op or clamp.

use thiserror::Error;

/// Errors that can occur during pool management
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A pool with this tag already exists
    #[error("Tried to create pool with tag '{tag}', but a pool with that tag already exists!")]
    DuplicateTag {
        /// The offending tag
        tag: String,
    },

    /// No pool exists for the tag
    #[error("Tried to {operation} pool '{tag}', but pool does not exist! Call create_pool() first?")]
    UnknownTag {
        /// The tag that was not found
        tag: String,
        /// What the caller was trying to do
        operation: &'static str,
    },

    /// More instances were requested for removal than the pool holds
    #[error("Tried to remove {requested} objects from pool '{tag}', which only holds {size}; removing all of them")]
    OverShrink {
        /// The pool tag
        tag: String,
        /// Pool size before the shrink
        size: usize,
        /// Number of removals requested
        requested: usize,
    },

    /// A configured prefab name is not known to the host
    #[error("Tried to create pool '{tag}' with no objects; pools must hold at least one")]
    EmptyPool {
        tag: String,
    },

    #[error("Pool '{tag}' references unknown prefab '{prefab}'")]
    UnknownPrototype {
        /// The pool tag
        tag: String,
        /// The prefab name that could not be resolved
        prefab: String,
    },

    /// A pool manager is already live on this thread
    #[error("An object pool manager is already active on this thread")]
    ManagerAlreadyActive,
}
