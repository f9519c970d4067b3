//! Error types for the kumo framework

use thiserror::Error;

/// Main result type for framework operations
pub type Result<T> = std::result::Result<T, FrameworkError>;

/// Primary error type for registration and configuration
#[derive(Debug, Error)]
pub enum FrameworkError {
    #[error("Plugin '{0}' already registered")]
    DuplicatePlugin(String),

    #[error("Plugin '{0}' not found")]
    UnknownPlugin(String),

    #[error("Command '{0}' not found")]
    UnknownCommand(String),

    #[error("Command '{0}' must declare at least one alias")]
    MissingAlias(String),

    #[error("Command key '{0}' registered twice by the same plugin")]
    DuplicateCommand(String),

    #[error("Command '{command}' declares parent '{parent}' which matches no registered command")]
    UnresolvedParent { command: String, parent: String },

    #[error("Command '{0}' is part of a parent declaration cycle")]
    ParentCycle(String),

    #[error("Host registration failed: {0}")]
    Host(anyhow::Error),

    #[error("Plugin '{plugin}' failed to enable: {source}")]
    PluginEnable { plugin: String, source: anyhow::Error },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = FrameworkError::UnknownCommand("warp".to_string());
        assert_eq!(error.to_string(), "Command 'warp' not found");
    }

    #[test]
    fn test_unresolved_parent_display() {
        let error = FrameworkError::UnresolvedParent {
            command: "kick".to_string(),
            parent: "mod".to_string(),
        };
        assert!(error.to_string().contains("kick"));
        assert!(error.to_string().contains("mod"));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = FrameworkError::from(io_error);

        assert!(matches!(error, FrameworkError::Io(_)));
        assert!(error.to_string().contains("file not found"));
    }
}
