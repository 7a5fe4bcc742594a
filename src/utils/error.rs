use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid config value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown entity type: {name}")]
    UnknownEntity { name: String },

    #[error("Unknown profile: {name}")]
    UnknownProfile { name: String },

    #[error("Invalid exclusion path '{path}': {reason}")]
    InvalidRulePath { path: String, reason: String },

    #[error("Exclusion rules for {entity} leave an uncut cycle: {chain}")]
    CycleDetected { entity: String, chain: String },

    #[error("Recursion limit exceeded while serializing {entity} {record_id}")]
    RecursionLimitExceeded { entity: String, record_id: i64 },

    #[error("Serialization failed for {entity} {record_id}: {message}")]
    SerializationFailure {
        entity: String,
        record_id: i64,
        message: String,
    },

    #[error("{entity} {id} not found")]
    RecordNotFound { entity: String, id: i64 },
}

pub type Result<T> = std::result::Result<T, FleetError>;
