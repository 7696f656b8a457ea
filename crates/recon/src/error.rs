use std::fmt;

#[derive(Debug)]
pub enum ImportError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad class, empty base currency, etc.).
    ConfigValidation(String),
    /// The rows input had no data rows.
    EmptyInput,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::EmptyInput => write!(f, "rows input contains no data rows"),
        }
    }
}

impl std::error::Error for ImportError {}
