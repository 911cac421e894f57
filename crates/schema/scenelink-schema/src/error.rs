use thiserror::Error;

/// Problems found while loading or validating a schema registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read schema '{path}': {message}")]
    Io { path: String, message: String },
    #[error("duplicate type name '{name}'")]
    DuplicateType { name: String },
    #[error("'{name}' is not a valid type name")]
    InvalidName { name: String },
    #[error("enum '{name}' has no items")]
    EmptyEnum { name: String },
    #[error("enum '{enum_name}' declares item '{item}' twice")]
    DuplicateItem { enum_name: String, item: String },
    #[error("{owner}: unknown enum '{name}'")]
    UnknownEnum { owner: String, name: String },
    #[error("{owner}: unknown class '{name}'")]
    UnknownClass { owner: String, name: String },
    #[error("class '{name}' has a cyclic base chain")]
    BaseCycle { name: String },
    #[error("{owner}: array must have at least one element")]
    EmptyArray { owner: String },
    #[error("{owner}: range minimum exceeds maximum")]
    InvalidRange { owner: String },
    #[error("{owner}: {kind} parameters are not supported")]
    UnsupportedParam { owner: String, kind: &'static str },
    #[error("{owner}: {kind} return values are not supported")]
    UnsupportedReturn { owner: String, kind: &'static str },
    #[error("{owner}: generated name '{name}' is used twice")]
    NameCollision { owner: String, name: String },
}

/// Failures of the generator as a whole.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("invalid codegen config: {0}")]
    Config(String),
    #[error("unknown type '{0}'")]
    UnknownType(String),
}
