use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Side;

/// Service settings. Every field has a default, so a partial object is valid.
///
/// Models are not part of the config: the host hands weights over with
/// `OthelloApi::load_model` once they are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Side the models play for. Defaults to white (`-1`).
    pub ai_side: Side,
    /// Budget for a single scoring call. `None` disables the check.
    pub inference_timeout_ms: Option<u64>,
}

impl ServiceConfig {
    pub fn inference_timeout(&self) -> Option<Duration> {
        self.inference_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            ai_side: Side::White,
            inference_timeout_ms: None,
        }
    }
}
