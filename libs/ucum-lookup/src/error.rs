use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Load-time failures. Resolution itself never fails; unresolved codes
/// degrade to the original input and land in the invalid-code log.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read table source '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("table source '{name}' is not valid JSON: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("table source '{name}' must be a JSON object of string pairs")]
    NotAnObject { name: String },

    #[error("table source '{name}': entry '{key}' has a non-string value")]
    NonStringValue { name: String, key: String },

    #[error("table source '{name}' contains no entries")]
    EmptyTable { name: String },
}
