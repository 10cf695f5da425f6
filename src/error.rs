use thiserror::Error;

/// Failures surfaced by the menu lifecycle.
///
/// A duplicate target is not an error (the existing handle is returned) and
/// a double close is silently absorbed; the only surfaced cases are a
/// malformed item descriptor, which fails fast during open, and an action
/// callback's own error, which propagates to the dispatch caller after the
/// session has already closed.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("unknown special item kind {0:?}")]
    UnknownSpecial(String),
    #[error("menu action failed: {0}")]
    Action(Box<dyn std::error::Error>),
}

pub type Result<T> = std::result::Result<T, MenuError>;
