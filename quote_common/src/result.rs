//! Result alias for quote fetching, parsing and history bookkeeping.
use crate::error::ParserError;

/// Workspace-wide `Result` alias with `ParserError` as the default error.
pub type Result<T, E = ParserError> = std::result::Result<T, E>;
