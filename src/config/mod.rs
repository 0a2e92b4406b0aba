//! Configuration and CLI handling

pub mod cli;
pub mod settings;

pub use cli::Cli;
pub use settings::Settings;

use crate::analysis::mime_type_for;
use crate::error::{Result, VoxError};
use tracing::warn;

/// Placeholder key shipped in sample configurations
const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Source of the values needed to start a batch
pub trait ConfigurationSource {
    /// API key for the analysis backend
    fn api_key(&self) -> Option<&str>;

    /// Model identifier for the analysis backend
    fn model_name(&self) -> &str;

    /// Supported extensions, lower-case without leading dot
    fn supported_extensions(&self) -> &[String];
}

/// Check that every required configuration item is present
///
/// Runs once before a batch starts. The error names the missing item.
pub fn validate(config: &dyn ConfigurationSource) -> Result<()> {
    match config.api_key().map(str::trim) {
        None | Some("") => {
            return Err(VoxError::config_error(
                "API key is missing. Set GEMINI_API_KEY or pass --api-key",
            ))
        }
        Some(PLACEHOLDER_API_KEY) => {
            return Err(VoxError::config_error(
                "API key is still the placeholder value. Set a real GEMINI_API_KEY",
            ))
        }
        Some(_) => {}
    }

    if config.model_name().trim().is_empty() {
        return Err(VoxError::config_error(
            "Model name is missing. Set GEMINI_MODEL_NAME or pass --model",
        ));
    }

    if config.supported_extensions().is_empty() {
        return Err(VoxError::config_error("No supported audio extensions configured"));
    }

    for ext in unmapped_extensions(config) {
        warn!(
            "No MIME type known for .{} files; every one of them will fail as unsupported",
            ext
        );
    }

    Ok(())
}

/// Configured extensions the analysis backend has no MIME type for
pub fn unmapped_extensions(config: &dyn ConfigurationSource) -> Vec<String> {
    config
        .supported_extensions()
        .iter()
        .filter(|ext| mime_type_for(ext).is_none())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_rejected() {
        let settings = Settings::default();
        let err = validate(&settings).unwrap_err();
        assert!(matches!(err, VoxError::ConfigError(_)));
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_placeholder_key_is_rejected() {
        let mut settings = Settings::default();
        settings.set_api_key(PLACEHOLDER_API_KEY);
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn test_empty_model_is_rejected() {
        let mut settings = Settings::default();
        settings.set_api_key("abc");
        settings.set_model_name("  ");
        let err = validate(&settings).unwrap_err();
        assert!(err.to_string().contains("Model name"));
    }

    #[test]
    fn test_empty_extension_set_is_rejected() {
        let mut settings = Settings::default();
        settings.set_api_key("abc");
        settings.set_supported_extensions(Vec::<String>::new());
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn test_default_extensions_are_all_mapped() {
        assert!(unmapped_extensions(&Settings::default()).is_empty());
    }

    #[test]
    fn test_unmapped_extension_is_reported_but_allowed() {
        let mut settings = Settings::default();
        settings.set_api_key("abc");
        settings.add_supported_extension(".WMA");
        settings.add_supported_extension("m4a");

        assert_eq!(unmapped_extensions(&settings), vec!["wma".to_string()]);
        assert!(validate(&settings).is_ok());
    }

    #[test]
    fn test_valid_configuration() {
        let mut settings = Settings::default();
        settings.set_api_key("abc");
        assert!(validate(&settings).is_ok());
    }
}
