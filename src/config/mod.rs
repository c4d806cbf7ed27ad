pub mod project;

pub use project::Config;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::preview::inline::DEFAULT_DELETE_MARKER;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigData {
    pub version: String,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub persist: PersistConfig,
    #[serde(default)]
    pub proposal: ProposalConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    Inline,
    Panel,
}

impl FromStr for RendererKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "inline" => Ok(RendererKind::Inline),
            "panel" => Ok(RendererKind::Panel),
            _ => Err(ConfigError::InvalidValue {
                field: "preview.renderer".to_string(),
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererKind::Inline => f.write_str("inline"),
            RendererKind::Panel => f.write_str("panel"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub renderer: RendererKind,
    pub delete_marker: String,
    pub add_marker: String,
    pub remove_marker: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistConfig {
    pub atomic: bool,
    pub check_conflicts: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalConfig {
    pub strip_fences: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            renderer: RendererKind::Inline,
            delete_marker: DEFAULT_DELETE_MARKER.to_string(),
            add_marker: "+".to_string(),
            remove_marker: "-".to_string(),
        }
    }
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            atomic: true,
            check_conflicts: true,
        }
    }
}

impl Default for ProposalConfig {
    fn default() -> Self {
        Self { strip_fences: true }
    }
}

impl Default for ConfigData {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            preview: PreviewConfig::default(),
            persist: PersistConfig::default(),
            proposal: ProposalConfig::default(),
        }
    }
}
