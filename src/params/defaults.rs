//! Defaults file: every parameter group in one JSON document.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{FieldConfig, ModulationParameters, RenderConfig, ToneConfig};
use crate::error::Result;

/// All session parameters, loadable from a JSON defaults file.
///
/// Every group is optional in the file; missing keys fall back to
/// their `Default` values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HelixDefaults {
    pub modulation: ModulationParameters,
    pub field: FieldConfig,
    pub tone: ToneConfig,
    pub render: RenderConfig,
}

impl HelixDefaults {
    /// Load defaults from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let defaults: Self = serde_json::from_str(&text)?;
        log::info!("Loaded defaults from {}", path.display());
        Ok(defaults)
    }

    /// Parse defaults from a JSON string
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ScrollAxis;

    #[test]
    fn test_partial_document() {
        let defaults = HelixDefaults::from_json(
            r#"{
                "field": {"size": 128, "seed": 7, "echo_axis": "rows"},
                "tone": {"volume": 0.25}
            }"#,
        )
        .unwrap();

        assert_eq!(defaults.field.size, 128);
        assert_eq!(defaults.field.seed, Some(7));
        assert_eq!(defaults.field.echo_axis, ScrollAxis::Rows);
        assert_eq!(defaults.field.noise_std, 0.005);
        assert_eq!(defaults.tone.volume, 0.25);
        assert_eq!(defaults.tone.base_frequency_hz, 136.1);
        assert!(defaults.render.ripple);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = HelixDefaults::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::HelixError::Config(_)));
    }
}
