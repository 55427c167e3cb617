//! Parser configuration for vizij-tracks-core.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::interp::Easing;

/// Which registry wins when a name exists in both.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderPrecedence {
    #[default]
    UpdatableFirst,
    StaticFirst,
}

/// Configuration applied while parsing point definitions.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Lookup order for named base references.
    pub provider_precedence: ProviderPrecedence,
    /// Easing for keyframes that name none.
    pub default_easing: Easing,
    /// Normalize quaternion keyframes at parse time.
    pub normalize_quaternion_keys: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider_precedence: ProviderPrecedence::UpdatableFirst,
            default_easing: Easing::Linear,
            normalize_quaternion_keys: true,
        }
    }
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Self, ParseError> {
        serde_json::from_str(s).map_err(|e| ParseError::InvalidJson(format!("config: {e}")))
    }
}
