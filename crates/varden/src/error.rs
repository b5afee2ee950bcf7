use thiserror::Error;
use varden_path::PathError;
use varden_schema::SchemaError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid path `{path}`: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: PathError,
    },
    #[error("field `{path}` expects an array, got {found}")]
    InvalidShape { path: String, found: &'static str },
    #[error("field `{path}` is not registered")]
    UnregisteredField { path: String },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl FormError {
    pub(crate) fn invalid_path(path: &str, source: PathError) -> Self {
        FormError::InvalidPath {
            path: path.to_string(),
            source,
        }
    }
}
