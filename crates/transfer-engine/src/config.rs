//! Engine configuration, loadable from a TOML file.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use tx_rpc::{Commitment, SendOptions};

use crate::error::TransferError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rpc_url: String,
    pub commitment: Commitment,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Courtesy pause between the two existence probes, to avoid hammering
    /// rate-limited public endpoints. Zero is fine for private ones.
    pub probe_delay_ms: u64,
    pub send: SendOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            rpc_url: "https://api.mainnet-beta.solana.com".into(),
            commitment: Commitment::Confirmed,
            connect_timeout_secs: 10,
            request_timeout_secs: 15,
            probe_delay_ms: 200,
            send: SendOptions::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file; unset keys fall back to the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TransferError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()
            .map_err(|e| TransferError::Config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| TransferError::Config(e.to_string()))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_delay(&self) -> Duration {
        Duration::from_millis(self.probe_delay_ms)
    }
}
