//! Mint submission through the wallet bridge.
//!
//! The bridge signs and broadcasts the mint message for the paired wallet.
//! Confirmation is observed on the indexer: the mint counts as done once the
//! jetton's total supply has grown by the minted amount.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use color_eyre::eyre::{Result, eyre};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::MintConfig,
    domain::{
        mint::{DeployController, WalletSession},
        token::Address,
    },
    infra::rpc::TonClient,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendRequest {
    pub valid_until: u64,
    pub messages: Vec<BridgeMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeMessage {
    /// Destination: the jetton master.
    pub address: String,
    /// Attached TON in nanotons, as a decimal string.
    pub amount: String,
    pub payload: MintPayload,
}

/// Structured mint request; the bridge encodes it into the message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintPayload {
    pub op: &'static str,
    pub query_id: u64,
    /// Receiver of the new jettons.
    pub to: String,
    pub jetton_amount: String,
}

#[derive(Debug, Deserialize)]
struct BridgeReply {
    #[serde(default)]
    ok: bool,
    error: Option<BridgeError>,
}

#[derive(Debug, Deserialize)]
struct BridgeError {
    message: String,
}

pub fn build_mint_request(
    session: &WalletSession,
    jetton_master: &Address,
    amount: &BigUint,
    config: &MintConfig,
    now_secs: u64,
    query_id: u64,
) -> SendRequest {
    SendRequest {
        valid_until: now_secs + config.message_ttl_secs,
        messages: vec![BridgeMessage {
            address: jetton_master.to_string(),
            amount: config.forward_amount.to_string(),
            payload: MintPayload {
                op: "mint",
                query_id,
                to: session.address.to_string(),
                jetton_amount: amount.to_string(),
            },
        }],
    }
}

/// Map a bridge reply to success or a user-readable error.
pub fn parse_bridge_reply(status: u16, body: &str) -> Result<()> {
    match serde_json::from_str::<BridgeReply>(body) {
        Ok(BridgeReply {
            error: Some(error), ..
        }) => Err(eyre!(error.message)),
        Ok(BridgeReply { ok: true, .. }) if (200..300).contains(&status) => Ok(()),
        _ => Err(eyre!("Wallet bridge returned HTTP {}", status)),
    }
}

pub struct BridgeDeployer {
    http: reqwest::Client,
    client: TonClient,
    bridge_url: String,
    config: MintConfig,
}

impl BridgeDeployer {
    pub fn new(client: TonClient, bridge_url: &str, config: MintConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            client,
            bridge_url: bridge_url.trim_end_matches('/').to_string(),
            config,
        }
    }

    async fn send(&self, session: &WalletSession, request: &SendRequest) -> Result<()> {
        let url = format!("{}/sessions/{}/send", self.bridge_url, session.session_id);
        debug!("POST {}", url);
        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_bridge_reply(status, &body)
    }

    /// Poll the indexer until total supply reaches `target`.
    async fn wait_for_supply(&self, jetton_master: &Address, target: &BigUint) -> Result<()> {
        let poll = Duration::from_secs(self.config.poll_interval_secs.max(1));
        let timeout = Duration::from_secs(self.config.confirm_timeout_secs);

        let wait = async {
            loop {
                tokio::time::sleep(poll).await;
                match self.client.get_jetton_master(jetton_master).await {
                    Ok(info) if &info.total_supply >= target => return,
                    Ok(info) => debug!("Supply {} < {}, waiting", info.total_supply, target),
                    Err(e) => debug!("Supply poll failed: {}", e),
                }
            }
        };

        tokio::time::timeout(timeout, wait).await.map_err(|_| {
            eyre!(
                "Mint was not confirmed within {}s",
                self.config.confirm_timeout_secs
            )
        })
    }
}

#[async_trait]
impl DeployController for BridgeDeployer {
    async fn mint(
        &self,
        connection: &WalletSession,
        jetton_master: &Address,
        amount: &BigUint,
    ) -> Result<()> {
        let before = self.client.get_jetton_master(jetton_master).await?;

        let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
        let request = build_mint_request(
            connection,
            jetton_master,
            amount,
            &self.config,
            now.as_secs(),
            now.as_millis() as u64,
        );
        self.send(connection, &request).await?;
        info!("Mint message sent for {}, awaiting confirmation", jetton_master);

        let target = before.total_supply + amount;
        self.wait_for_supply(jetton_master, &target).await
    }
}
