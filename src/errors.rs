use thiserror::Error;

// Re-export a simple Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading configuration and schedule data.
///
/// Interactive mutations never produce these; they report through
/// `bool`/`Option`/outcome values so a failed drop can be ignored.
#[derive(Error, Debug)]
pub enum Error {
    // ---- Parsing ------------------------------------------------------------
    /// Malformed value in a config item, CLI argument or date-like field.
    #[error("Parse error: {0}")]
    Parse(String),

    // ---- Schedule ingestion -------------------------------------------------
    /// A task (or a series acting as a task) has a start/end that is not a date.
    #[error("Invalid {field} date '{value}' on {owner}.")]
    InvalidDate {
        owner: String,
        field: &'static str,
        value: String,
    },

    /// Two siblings share an id supplied by the data source.
    #[error("Duplicate {kind} id '{id}' under {scope}.")]
    DuplicateId {
        kind: &'static str,
        id: String,
        scope: String,
    },

    // ---- Config -------------------------------------------------------------
    /// Any issue initializing/reading config (file missing, invalid JSON, etc.)
    #[error("Config error: {0}")]
    Config(String),

    // ---- Plumbing / Wrappers ------------------------------------------------
    /// IO passthrough (read/write files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serde JSON passthrough (config and schedule decode/encode).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ----------------------- Convenience constructors ----------------------------

impl Error {
    pub fn invalid_date(owner: impl Into<String>, field: &'static str, value: impl Into<String>) -> Self {
        Error::InvalidDate {
            owner: owner.into(),
            field,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_date_formats_owner_and_field() {
        let err = Error::invalid_date("task '211' in series '21'", "start", "2023-13-45");
        assert_eq!(
            err.to_string(),
            "Invalid start date '2023-13-45' on task '211' in series '21'."
        );
    }

    #[test]
    fn duplicate_id_formats_scope() {
        let err = Error::DuplicateId {
            kind: "series",
            id: "21".to_string(),
            scope: "category '2'".to_string(),
        };
        assert_eq!(err.to_string(), "Duplicate series id '21' under category '2'.");
    }

    #[test]
    fn io_error_formats_message() {
        let raw = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let err = Error::from(raw);
        assert_eq!(err.to_string(), "I/O error: disk");
    }

    #[test]
    fn json_error_formats_message() {
        let raw = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let expected = format!("JSON error: {}", raw);
        let err = Error::from(raw);
        assert_eq!(err.to_string(), expected);
    }
}
