//! Agreement service configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the agreement services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgreementConfig {
    /// Largest accepted template body in bytes (default: 256 KiB).
    pub max_content_bytes: usize,
    /// Largest number of signatures a single document may require
    /// (default: 100).
    pub max_required_signatures: u32,
}

impl Default for AgreementConfig {
    fn default() -> Self {
        Self {
            max_content_bytes: 256 * 1024,
            max_required_signatures: 100,
        }
    }
}
