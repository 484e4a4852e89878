use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DomError {
    /// The CSS query could not be parsed
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// The query was valid but matched nothing
    #[error("No element matched: {0}")]
    NoMatch(String),
}
