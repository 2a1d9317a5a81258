//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the crate.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
///
/// Internal invariant violations (unknown attribute kind, broken response
/// ordering, dangling user type references) are bugs and panic instead of
/// returning a variant: derivation has no meaningful way to continue once
/// its own assumptions are broken.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// A transform between two structurally incompatible attribute trees.
    /// Raised when a declared wire body cannot be bridged to its domain
    /// type. Always a hard failure, never silently degraded.
    #[from(ignore)]
    #[display("Transform Error: {_0}")]
    Transform(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
