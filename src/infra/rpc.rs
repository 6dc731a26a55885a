use color_eyre::eyre::{Result, WrapErr, eyre};
use num_bigint::BigUint;
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::Config,
    domain::{amount::DEFAULT_DECIMALS, token::Address},
};

/// Jetton master state as reported by the indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JettonMasterInfo {
    pub address: Address,
    pub total_supply: BigUint,
    pub mintable: bool,
    pub admin_address: Option<Address>,
    pub symbol: String,
    pub name: Option<String>,
    pub decimals: u8,
}

#[derive(Debug, Deserialize)]
struct JettonMastersResponse {
    jetton_masters: Vec<RawJettonMaster>,
}

#[derive(Debug, Deserialize)]
struct RawJettonMaster {
    address: String,
    total_supply: String,
    #[serde(default)]
    mintable: bool,
    admin_address: Option<String>,
    #[serde(default)]
    jetton_content: RawJettonContent,
}

#[derive(Debug, Default, Deserialize)]
struct RawJettonContent {
    symbol: Option<String>,
    name: Option<String>,
    /// TEP-64 stores decimals as a string.
    decimals: Option<String>,
}

impl TryFrom<RawJettonMaster> for JettonMasterInfo {
    type Error = color_eyre::eyre::Report;

    fn try_from(raw: RawJettonMaster) -> Result<Self> {
        let total_supply = BigUint::parse_bytes(raw.total_supply.as_bytes(), 10)
            .ok_or_else(|| eyre!("Invalid total supply: {}", raw.total_supply))?;
        let admin_address = raw
            .admin_address
            .as_deref()
            .map(str::parse::<Address>)
            .transpose()?;
        let decimals = match raw.jetton_content.decimals.as_deref() {
            Some(d) => d
                .trim()
                .parse()
                .map_err(|_| eyre!("Invalid jetton decimals: {}", d))?,
            None => DEFAULT_DECIMALS,
        };

        Ok(Self {
            address: raw.address.parse()?,
            total_supply,
            mintable: raw.mintable,
            admin_address,
            symbol: raw.jetton_content.symbol.unwrap_or_default(),
            name: raw.jetton_content.name,
            decimals,
        })
    }
}

/// Parse a `/jetton/masters` response body.
pub fn parse_jetton_masters(body: &str) -> Result<Option<JettonMasterInfo>> {
    let response: JettonMastersResponse =
        serde_json::from_str(body).wrap_err("Invalid jetton masters response")?;
    response
        .jetton_masters
        .into_iter()
        .next()
        .map(JettonMasterInfo::try_from)
        .transpose()
}

/// TON indexer HTTP client.
#[derive(Clone)]
pub struct TonClient {
    http: reqwest::Client,
    config: Config,
}

impl TonClient {
    pub fn new(config: Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch the jetton master state for `address`.
    pub async fn get_jetton_master(&self, address: &Address) -> Result<JettonMasterInfo> {
        let url = format!("{}/jetton/masters", self.config.network.api_url);
        debug!("GET {} address={}", url, address);

        let mut request = self
            .http
            .get(&url)
            .query(&[("address", address.to_string()), ("limit", "1".to_string())]);
        if let Some(key) = &self.config.network.api_key {
            request = request.header("X-API-Key", key);
        }

        let response = request.send().await?.error_for_status()?;
        let body = response.text().await?;
        parse_jetton_masters(&body)?
            .ok_or_else(|| eyre!("Jetton master {} not found", address))
    }
}
