//! Errors raised when a comparison cannot be decided.
//!
//! A comparison returns `Ok(false)` only when the two trees are proven different.
//! Every variant here means "cannot determine" and is surfaced to the caller as-is.

use thiserror::Error;

/// Result type for equivalence checks.
pub type Result<T> = std::result::Result<T, Error>;

/// Constructs the comparison engine has no rule for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A node kind outside the closed set of comparable kinds.
    #[error("Unsupported node kind: {0}")]
    UnsupportedNodeKind(String),

    /// A member-init binding that is not a plain assignment.
    #[error("Only assignment bindings are supported, got {kind} binding for member {member}")]
    UnsupportedBindingKind {
        /// Binding kind found
        kind: &'static str,
        /// Bound member name
        member: String,
    },

    /// Both sides produce anonymous types whose kind or type differ.
    #[error("Comparison of anonymous types is not supported: {x} vs {y}")]
    AnonymousTypeNotSupported {
        /// Static type on the left
        x: String,
        /// Static type on the right
        y: String,
    },
}
