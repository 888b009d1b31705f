//! Error handling for miniwidg panels

/// Panel error types
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("The widget with name '{name}' does not exist.")]
    WidgetNotFound { name: String },

    #[error("The container with name '{name}' does not exist.")]
    ContainerNotFound { name: String },

    #[error("A widget with name '{name}' already exists.")]
    DuplicateWidget { name: String },

    #[error("Operation '{operation}' is not implemented for widget '{name}'")]
    Unsupported { name: String, operation: String },

    #[error("Menu '{name}' needs at least one choice")]
    EmptyMenu { name: String },

    #[error("Menu '{name}' has no choice '{choice}'")]
    UnknownChoice { name: String, choice: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("GUI error: {message}")]
    Gui { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: toml::de::Error,
    },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, PanelError>;

/// Helper functions for creating specific error types
impl PanelError {
    pub fn widget_not_found<S: Into<String>>(name: S) -> Self {
        Self::WidgetNotFound { name: name.into() }
    }

    pub fn container_not_found<S: Into<String>>(name: S) -> Self {
        Self::ContainerNotFound { name: name.into() }
    }

    pub fn duplicate_widget<S: Into<String>>(name: S) -> Self {
        Self::DuplicateWidget { name: name.into() }
    }

    pub fn unsupported<S: Into<String>, O: Into<String>>(name: S, operation: O) -> Self {
        Self::Unsupported {
            name: name.into(),
            operation: operation.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn gui<S: Into<String>>(message: S) -> Self {
        Self::Gui {
            message: message.into(),
        }
    }

    /// Whether this is a failed name lookup
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::WidgetNotFound { .. } | Self::ContainerNotFound { .. }
        )
    }
}

impl From<eframe::Error> for PanelError {
    fn from(err: eframe::Error) -> Self {
        Self::gui(format!("eframe failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_failure_message() {
        let err = PanelError::widget_not_found("gain");
        assert!(err.is_lookup_failure());
        assert_eq!(err.to_string(), "The widget with name 'gain' does not exist.");
    }

    #[test]
    fn test_unsupported_is_not_lookup() {
        let err = PanelError::unsupported("Go", "get_state");
        assert!(!err.is_lookup_failure());
        assert!(err.to_string().contains("get_state"));
    }
}
