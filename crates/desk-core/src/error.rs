use thiserror::Error;

/// CallDesk errors
#[derive(Error, Debug)]
pub enum CallDeskError {
    /// Form or record validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Login rejected
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local store or settings file I/O
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// JSON encoding/decoding
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML settings could not be read
    #[error("Settings parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML settings could not be written
    #[error("Settings encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// Telephony transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CallDeskError {
    /// Create a new Validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new Authentication error
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a new NotFound error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<validator::ValidationErrors> for CallDeskError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors("", &errors, &mut fields);
        fields.sort();
        Self::Validation(fields.join("; "))
    }
}

/// Flatten nested validation errors into `path.field: message` entries
fn collect_field_errors(prefix: &str, errors: &validator::ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                let reason = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "invalid value".to_string());
                out.push(format!("{}: {}", path, reason));
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

/// Result type for CallDesk operations
pub type Result<T> = std::result::Result<T, CallDeskError>;
