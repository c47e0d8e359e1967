use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (no sources, duplicate source name, etc.).
    ConfigValidation(String),
    /// Lookup index could not be built: no usable name/ID entries.
    IndexUnavailable(String),
    /// Missing required column in input data.
    MissingColumn { source: String, column: String },
    /// IO error (file read, CSV decode, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::IndexUnavailable(msg) => write!(f, "lookup index unavailable: {msg}"),
            Self::MissingColumn { source, column } => {
                write!(f, "source '{source}': missing column '{column}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
