//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the distributor.
///
/// Usually embedded in the daemon's TOML file under `[engine]`; every field has a
/// default so the section may be omitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Largest batch a single dispersal may address.
    #[serde(default = "default_max_recipients")]
    pub max_recipients: usize,
}

fn default_max_recipients() -> usize {
    256
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_recipients: default_max_recipients(),
        }
    }
}
