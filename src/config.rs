use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Get the data directory for the application.
pub fn get_data_dir() -> PathBuf {
    if let Ok(s) = std::env::var("JETTON_MINTER_DATA") {
        PathBuf::from(s)
    } else if let Some(proj_dirs) = ProjectDirs::from("org", "jetton-minter", "jetton-minter") {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

/// Get the config directory for the application.
pub fn get_config_dir() -> PathBuf {
    if let Ok(s) = std::env::var("JETTON_MINTER_CONFIG") {
        PathBuf::from(s)
    } else if let Some(proj_dirs) = ProjectDirs::from("org", "jetton-minter", "jetton-minter") {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    /// Indexer HTTP API base, e.g. `https://toncenter.com/api/v3`.
    pub api_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Wallet bridge holding the signing session.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintConfig {
    /// TON attached to the mint message to pay for forwarding, in nanotons.
    pub forward_amount: u64,
    /// How long a signed message stays valid.
    pub message_ttl_secs: u64,
    /// How long to wait for the supply increase before giving up.
    pub confirm_timeout_secs: u64,
    pub poll_interval_secs: u64,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            forward_amount: 50_000_000,
            message_ttl_secs: 300,
            confirm_timeout_secs: 120,
            poll_interval_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub bridge: BridgeConfig,
    pub mint: MintConfig,
}

/// Optional overrides read from `config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub bridge_url: Option<String>,
    pub mint: Option<MintConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self::testnet()
    }
}

impl Config {
    /// Network preset, then `config.json` from the config dir, then CLI overrides.
    pub fn load(network: &str, api_url: Option<&str>) -> Result<Self> {
        Self::new(network, &get_config_dir().join("config.json"), api_url)
    }

    /// Network preset, then overrides from `config_file`, then `api_url`.
    pub fn new(network: &str, config_file: &Path, api_url: Option<&str>) -> Result<Self> {
        let mut config = Self::from_network(network);
        config.apply_file(config_file)?;
        if let Some(url) = api_url {
            config.network.api_url = url.trim_end_matches('/').to_string();
        }
        Ok(config)
    }

    /// Apply overrides from a JSON file. A missing file is not an error.
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("Invalid config file {}", path.display()))?;

        if let Some(url) = file.api_url {
            self.network.api_url = url.trim_end_matches('/').to_string();
        }
        if file.api_key.is_some() {
            self.network.api_key = file.api_key;
        }
        if let Some(url) = file.bridge_url {
            self.bridge.url = url.trim_end_matches('/').to_string();
        }
        if let Some(mint) = file.mint {
            self.mint = mint;
        }
        Ok(())
    }

    pub fn testnet() -> Self {
        Self {
            network: NetworkConfig {
                name: "testnet".to_string(),
                api_url: "https://testnet.toncenter.com/api/v3".to_string(),
                api_key: None,
            },
            bridge: BridgeConfig {
                url: "http://127.0.0.1:8787".to_string(),
            },
            mint: MintConfig::default(),
        }
    }

    pub fn mainnet() -> Self {
        Self {
            network: NetworkConfig {
                name: "mainnet".to_string(),
                api_url: "https://toncenter.com/api/v3".to_string(),
                api_key: None,
            },
            bridge: BridgeConfig {
                url: "http://127.0.0.1:8787".to_string(),
            },
            mint: MintConfig::default(),
        }
    }

    pub fn from_network(network: &str) -> Self {
        match network {
            "mainnet" => Self::mainnet(),
            _ => Self::testnet(),
        }
    }

    pub fn is_testnet(&self) -> bool {
        self.network.name != "mainnet"
    }
}
