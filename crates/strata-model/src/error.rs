use thiserror::Error;

/// Errors produced by model operations.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// An attribute name does not exist on the class or any of its parents.
    #[error("class {class} has no attribute {attribute:?}")]
    UnknownAttribute { class: String, attribute: String },

    /// Two attributes with the same name were declared on one class chain.
    #[error("class {class} declares attribute {attribute:?} more than once")]
    DuplicateAttribute { class: String, attribute: String },

    /// The class was declared without no-argument construction.
    #[error("class {0} has no no-argument construction")]
    NotConstructible(String),
}

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
