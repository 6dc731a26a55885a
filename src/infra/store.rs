use std::sync::{Arc, PoisonError, RwLock};

use color_eyre::eyre::Result;
use tracing::{info, warn};

use crate::{
    domain::{mint::JettonStore, token::{Address, TokenContext}},
    infra::rpc::{JettonMasterInfo, TonClient},
};

/// Jetton store backed by the indexer.
///
/// Holds the last loaded [`TokenContext`]; `refresh` reloads it in the background.
#[derive(Clone)]
pub struct TonJettonStore {
    client: TonClient,
    jetton_master: Address,
    /// Connected wallet, if any.
    wallet: Option<Address>,
    /// Wallet being viewed; defaults to the connected one.
    owner: Option<Address>,
    context: Arc<RwLock<TokenContext>>,
}

impl TonJettonStore {
    pub fn new(
        client: TonClient,
        jetton_master: Address,
        wallet: Option<Address>,
        owner: Option<Address>,
    ) -> Self {
        Self {
            client,
            jetton_master,
            wallet,
            owner,
            context: Arc::new(RwLock::new(TokenContext::default())),
        }
    }

    /// Fetch jetton details and replace the context.
    pub async fn load(&self) -> Result<()> {
        let info = self.client.get_jetton_master(&self.jetton_master).await?;
        info!(
            "Loaded jetton {} ({}), supply {}",
            info.symbol, info.address, info.total_supply
        );
        let context = build_context(info, self.wallet, self.owner);
        *self.context.write().unwrap_or_else(PoisonError::into_inner) = context;
        Ok(())
    }
}

impl JettonStore for TonJettonStore {
    fn context(&self) -> TokenContext {
        self.context
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn refresh(&self) {
        let store = self.clone();
        tokio::spawn(async move {
            if let Err(e) = store.load().await {
                warn!("Jetton refresh failed: {}", e);
            }
        });
    }
}

/// Derive the viewer-specific context from indexer data.
pub fn build_context(
    info: JettonMasterInfo,
    wallet: Option<Address>,
    owner: Option<Address>,
) -> TokenContext {
    let is_admin = wallet.is_some() && info.admin_address == wallet;
    let is_my_wallet = match (wallet, owner) {
        (Some(wallet), Some(owner)) => wallet == owner,
        (Some(_), None) => true,
        (None, _) => false,
    };

    TokenContext {
        jetton_master: Some(info.address),
        is_admin,
        is_my_wallet,
        symbol: info.symbol,
        decimals: Some(info.decimals),
        name: info.name,
        total_supply: Some(info.total_supply),
        mintable: info.mintable,
        admin_address: info.admin_address,
    }
}
