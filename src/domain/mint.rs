//! Mint action controller.
//!
//! Drives a single "mint additional units" attempt:
//! - gates the action on admin + ownership flags
//! - validates the entered amount and converts it to base units
//! - runs the mint through the wallet connection while the UI is blocked
//! - reconciles the outcome into notifications and a store refresh
//!
//! An attempt is split into `begin_submit` (synchronous, `Idle -> Submitting`),
//! `MintJob::run` (the awaited collaborator call, which may be spawned) and
//! `finish_submit` (synchronous, always back to `Idle`).

use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use async_trait::async_trait;
use color_eyre::eyre::Result;
use futures::FutureExt;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{error, info, warn};

use super::{
    amount::{HumanAmount, format_grouped},
    notification::{Notification, Notifier},
    token::{Address, TokenContext},
};

/// Shown when a mint fails without a usable error message.
pub const GENERIC_FAILURE: &str = "Mint failed due to an unexpected error";

tokio::task_local! {
    static MINT_ATTEMPT: ();
}

/// Whether the caller runs inside [`MintJob::run`], whose panics are caught
/// and settled as [`MintOutcome::Aborted`].
pub fn in_mint_attempt() -> bool {
    MINT_ATTEMPT.try_with(|_| ()).is_ok()
}

/// Source of the token context. `refresh` must not block.
pub trait JettonStore: Send + Sync {
    fn context(&self) -> TokenContext;
    fn refresh(&self);
}

/// An established wallet session able to authorize transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSession {
    pub address: Address,
    pub session_id: String,
}

pub trait WalletConnection: Send + Sync {
    fn connection(&self) -> Result<WalletSession>;
}

/// Submits a mint and resolves once it is confirmed on chain.
#[async_trait]
pub trait DeployController: Send + Sync {
    async fn mint(
        &self,
        connection: &WalletSession,
        jetton_master: &Address,
        amount: &BigUint,
    ) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxState {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open,
}

/// Why `begin_submit` did not start an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Skipped {
    /// An attempt is already in flight.
    Busy,
    /// The viewer may not mint this token.
    Hidden,
    /// Jetton address or decimals not loaded yet.
    NotReady,
    InvalidAmount,
}

/// Settled result of one mint attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MintOutcome {
    Minted { amount: HumanAmount, symbol: String },
    /// The collaborator failed with a message meant for the user.
    Rejected(String),
    /// The collaborator panicked.
    Aborted(String),
}

/// One in-flight mint, detached from the controller so it can be spawned.
pub struct MintJob {
    wallet: Arc<dyn WalletConnection>,
    deployer: Arc<dyn DeployController>,
    jetton_master: Address,
    base_units: BigUint,
    amount: HumanAmount,
    symbol: String,
}

impl MintJob {
    pub fn base_units(&self) -> &BigUint {
        &self.base_units
    }

    /// Acquire the connection and await the mint. Never panics.
    pub async fn run(self) -> MintOutcome {
        let MintJob {
            wallet,
            deployer,
            jetton_master,
            base_units,
            amount,
            symbol,
        } = self;

        let attempt = async {
            let connection = wallet.connection()?;
            deployer.mint(&connection, &jetton_master, &base_units).await?;
            Ok::<_, color_eyre::eyre::Report>(())
        };

        match AssertUnwindSafe(MINT_ATTEMPT.scope((), attempt))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => MintOutcome::Minted { amount, symbol },
            Ok(Err(e)) => MintOutcome::Rejected(e.to_string()),
            Err(payload) => MintOutcome::Aborted(panic_message(payload.as_ref())),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// State machine behind the mint button, popup and loader.
pub struct MintController {
    store: Arc<dyn JettonStore>,
    wallet: Arc<dyn WalletConnection>,
    deployer: Arc<dyn DeployController>,
    notifier: Arc<dyn Notifier>,
    dialog: DialogState,
    tx_state: TxState,
    amount: Option<HumanAmount>,
    settled: u64,
}

impl MintController {
    pub fn new(
        store: Arc<dyn JettonStore>,
        wallet: Arc<dyn WalletConnection>,
        deployer: Arc<dyn DeployController>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            wallet,
            deployer,
            notifier,
            dialog: DialogState::Closed,
            tx_state: TxState::Idle,
            amount: None,
            settled: 0,
        }
    }

    /// Fresh snapshot of the token context.
    pub fn context(&self) -> TokenContext {
        self.store.context()
    }

    pub fn is_visible(&self) -> bool {
        self.store.context().can_mint()
    }

    pub fn dialog(&self) -> DialogState {
        self.dialog
    }

    pub fn tx_state(&self) -> TxState {
        self.tx_state
    }

    /// The popup is shown only while open and not superseded by the loader.
    pub fn dialog_visible(&self) -> bool {
        self.dialog == DialogState::Open && self.tx_state == TxState::Idle
    }

    pub fn loader_visible(&self) -> bool {
        self.tx_state == TxState::Submitting
    }

    pub fn amount(&self) -> Option<&HumanAmount> {
        self.amount.as_ref()
    }

    pub fn set_amount(&mut self, amount: Option<HumanAmount>) {
        self.amount = amount;
    }

    /// Number of attempts that have returned to `Idle`.
    pub fn settled_attempts(&self) -> u64 {
        self.settled
    }

    pub fn open(&mut self) {
        if self.tx_state == TxState::Submitting || !self.is_visible() {
            return;
        }
        self.dialog = DialogState::Open;
    }

    /// Cancel the popup, resetting the draft to zero.
    pub fn close(&mut self) {
        if self.tx_state == TxState::Submitting {
            return;
        }
        self.amount = Some(HumanAmount::zero());
        self.dialog = DialogState::Closed;
    }

    /// Validate the draft and move to `Submitting`.
    ///
    /// On success the caller must run the job and hand its outcome to
    /// [`MintController::finish_submit`].
    pub fn begin_submit(&mut self) -> std::result::Result<MintJob, Skipped> {
        if self.tx_state == TxState::Submitting {
            return Err(Skipped::Busy);
        }

        let ctx = self.store.context();
        if !ctx.can_mint() {
            return Err(Skipped::Hidden);
        }

        let Some(jetton_master) = ctx.jetton_master else {
            warn!("Mint requested before the jetton address was loaded");
            return Err(Skipped::NotReady);
        };

        let amount = match self.amount.as_ref() {
            Some(amount) if !amount.is_zero() && !amount.is_negative() => amount.clone(),
            _ => return Err(self.reject_amount(&ctx.symbol)),
        };

        let Some(decimals) = ctx.decimals else {
            warn!("Mint requested before jetton decimals were loaded");
            return Err(Skipped::NotReady);
        };

        let base_units = match amount.to_base_units(decimals) {
            Ok(units) if units != BigUint::ZERO => units,
            Ok(_) => return Err(self.reject_amount(&ctx.symbol)),
            Err(e) => {
                warn!("Amount conversion failed: {}", e);
                return Err(self.reject_amount(&ctx.symbol));
            }
        };

        info!(
            "Minting {} {} ({} base units) on {}",
            amount, ctx.symbol, base_units, jetton_master
        );
        self.tx_state = TxState::Submitting;

        Ok(MintJob {
            wallet: self.wallet.clone(),
            deployer: self.deployer.clone(),
            jetton_master,
            base_units,
            amount,
            symbol: ctx.symbol,
        })
    }

    fn reject_amount(&self, symbol: &str) -> Skipped {
        self.notifier.notify(Notification::warning(format!(
            "Minimum amount of {} to mint is 1",
            symbol
        )));
        Skipped::InvalidAmount
    }

    /// Settle the in-flight attempt. Always returns the controller to `Idle`.
    pub fn finish_submit(&mut self, outcome: MintOutcome) {
        if self.tx_state != TxState::Submitting {
            warn!("Ignoring mint outcome with no attempt in flight: {:?}", outcome);
            return;
        }
        self.tx_state = TxState::Idle;
        self.settled += 1;

        match outcome {
            MintOutcome::Minted { amount, symbol } => {
                info!("Minted {} {}", amount, symbol);
                self.dialog = DialogState::Closed;
                self.amount = None;
                // Not awaited: until it lands the context still shows the old supply.
                self.store.refresh();
                self.notifier.notify(Notification::success(format!(
                    "Successfully minted {} {}",
                    format_grouped(&amount),
                    symbol
                )));
            }
            MintOutcome::Rejected(message) => {
                error!("Mint failed: {}", message);
                let content = if message.trim().is_empty() {
                    GENERIC_FAILURE.to_string()
                } else {
                    message
                };
                self.notifier.notify(Notification::error(content));
            }
            MintOutcome::Aborted(message) => {
                error!("Mint aborted: {}", message);
                self.notifier.notify(Notification::error(GENERIC_FAILURE));
            }
        }
    }

    /// Run a whole attempt in place: begin, await, finish.
    pub async fn submit(&mut self) -> std::result::Result<(), Skipped> {
        let job = self.begin_submit()?;
        let outcome = job.run().await;
        self.finish_submit(outcome);
        Ok(())
    }
}
