use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty override, bad watchlist entry).
    ConfigValidation(String),
    /// No column resolved to the amount role in a revenue file.
    MissingAmountColumn { file: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingAmountColumn { file } => {
                write!(f, "no amount column found in '{file}'")
            }
        }
    }
}

impl std::error::Error for ReconError {}
