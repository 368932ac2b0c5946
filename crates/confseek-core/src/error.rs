//! Error types for confseek
//!
//! Only path selection can fail. Lookup misses are not errors; they are
//! reported as [`Lookup::NotFound`](crate::resolver::Lookup::NotFound).

use std::fmt;

/// Result type alias for confseek operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for confseek operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Full setting path that was requested (e.g., "database.host")
    pub path: Option<String>,
    /// Actionable help message
    pub help: Option<String>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// A path segment names a key that does not exist at its depth
    #[error("Setting not configured: '{segment}'")]
    SettingNotConfigured {
        /// The segment that could not be found
        segment: String,
        /// Keys present in the subtree where the lookup failed
        available: Vec<String>,
    },
}

impl Error {
    /// Create a setting-not-configured error
    pub fn setting_not_configured(
        path: impl Into<String>,
        segment: impl Into<String>,
        available: Vec<String>,
    ) -> Self {
        let segment = segment.into();
        let help = if available.is_empty() {
            format!("No keys exist where '{}' was expected", segment)
        } else {
            format!(
                "Check the spelling of '{}' or add it to the configuration",
                segment
            )
        };
        Self {
            kind: ErrorKind::SettingNotConfigured { segment, available },
            path: Some(path.into()),
            help: Some(help),
        }
    }

    /// Keys that were available where the failing segment was looked up
    pub fn available_keys(&self) -> &[String] {
        match &self.kind {
            ErrorKind::SettingNotConfigured { available, .. } => available,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(path) = &self.path {
            write!(f, "\n  Path: {}", path)?;
        }

        match &self.kind {
            ErrorKind::SettingNotConfigured { available, .. } => {
                if available.is_empty() {
                    write!(f, "\n  Available keys: (none)")?;
                } else {
                    write!(f, "\n  Available keys: {}", available.join(", "))?;
                }
            }
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_setting_not_configured_display() {
        let err = Error::setting_not_configured(
            "database.hots",
            "hots",
            vec!["host".into(), "port".into()],
        );
        let display = format!("{}", err);

        assert!(display.contains("Setting not configured: 'hots'"));
        assert!(display.contains("Path: database.hots"));
        assert!(display.contains("Available keys: host, port"));
        assert!(display.contains("Help:"));
    }

    #[test]
    fn test_setting_not_configured_no_keys() {
        let err = Error::setting_not_configured("port.number", "number", vec![]);
        let display = format!("{}", err);

        assert!(display.contains("Available keys: (none)"));
        assert!(display.contains("No keys exist where 'number' was expected"));
    }

    #[test]
    fn test_available_keys() {
        let err = Error::setting_not_configured("a.c", "c", vec!["b".into()]);

        assert_eq!(err.available_keys(), &["b".to_string()]);
        assert_eq!(err.path.as_deref(), Some("a.c"));
    }
}
