use std::fmt;

#[derive(Debug)]
pub enum ModelError {
    UnknownSymbol(String),
    DuplicateSymbol(String),
    InvalidSymbol(String),
    InvalidExpression(String),
    InvalidParameter(String),
    EmptyTrials,
    Config(toml::de::Error),
    ConfigSerialize(toml::ser::Error),
    Export(serde_json::Error),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownSymbol(s) => write!(f, "unknown symbol: {s}"),
            ModelError::DuplicateSymbol(s) => write!(f, "symbol already in vocabulary: {s}"),
            ModelError::InvalidSymbol(s) => {
                write!(f, "invalid symbol name '{s}': must start with an uppercase letter")
            }
            ModelError::InvalidExpression(msg) => write!(f, "invalid expression: {msg}"),
            ModelError::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            ModelError::EmptyTrials => write!(f, "trial sequence must not be empty"),
            ModelError::Config(e) => write!(f, "config error: {e}"),
            ModelError::ConfigSerialize(e) => write!(f, "config serialization error: {e}"),
            ModelError::Export(e) => write!(f, "export error: {e}"),
        }
    }
}

impl std::error::Error for ModelError {}

impl From<toml::de::Error> for ModelError {
    fn from(e: toml::de::Error) -> Self {
        ModelError::Config(e)
    }
}

impl From<toml::ser::Error> for ModelError {
    fn from(e: toml::ser::Error) -> Self {
        ModelError::ConfigSerialize(e)
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        ModelError::Export(e)
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
