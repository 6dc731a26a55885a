//! Integration tests for jetton-minter.
//!
//! Provides in-memory collaborators for the mint controller:
//! - a jetton store with a settable context and a refresh counter
//! - a wallet connection that can be disconnected
//! - a deploy controller with a scripted result and a call log
//! - a notifier recording everything it is given

pub mod mint_flow;
pub mod mint_validation;

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use color_eyre::eyre::{Result, eyre};
use num_bigint::BigUint;

use jetton_minter::domain::{
    amount::HumanAmount,
    mint::{DeployController, JettonStore, MintController, WalletConnection, WalletSession},
    notification::{Notification, Notifier, Severity},
    token::{Address, TokenContext},
};

pub const MASTER: Address = Address {
    workchain: 0,
    hash: [0xab; 32],
};

pub const ME: Address = Address {
    workchain: 0,
    hash: [0x01; 32],
};

/// Context of an admin viewing their own wallet of `ABC` with 9 decimals.
pub fn admin_context() -> TokenContext {
    TokenContext {
        jetton_master: Some(MASTER),
        is_admin: true,
        is_my_wallet: true,
        symbol: "ABC".to_string(),
        decimals: Some(9),
        name: Some("Alphabet".to_string()),
        total_supply: Some(BigUint::from(1_000_000_000_000u64)),
        mintable: true,
        admin_address: Some(ME),
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub context: Mutex<TokenContext>,
    pub refreshes: AtomicUsize,
}

impl FakeStore {
    pub fn with(context: TokenContext) -> Self {
        Self {
            context: Mutex::new(context),
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, context: TokenContext) {
        *self.context.lock().unwrap() = context;
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl JettonStore for FakeStore {
    fn context(&self) -> TokenContext {
        self.context.lock().unwrap().clone()
    }

    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeWallet {
    pub connected: bool,
}

impl WalletConnection for FakeWallet {
    fn connection(&self) -> Result<WalletSession> {
        if self.connected {
            Ok(WalletSession {
                address: ME,
                session_id: "test-session".to_string(),
            })
        } else {
            Err(eyre!("Wallet is not connected"))
        }
    }
}

/// What the fake deploy controller does when called.
#[derive(Debug, Clone)]
pub enum Behavior {
    Succeed,
    Fail(String),
    Panic,
}

pub struct FakeDeployer {
    pub behavior: Mutex<Behavior>,
    pub calls: Mutex<Vec<(Address, BigUint)>>,
}

impl FakeDeployer {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Address, BigUint)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeployController for FakeDeployer {
    async fn mint(
        &self,
        connection: &WalletSession,
        jetton_master: &Address,
        amount: &BigUint,
    ) -> Result<()> {
        assert_eq!(connection.session_id, "test-session");
        self.calls
            .lock()
            .unwrap()
            .push((*jetton_master, amount.clone()));
        tokio::task::yield_now().await;

        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Fail(message) => Err(eyre!(message)),
            Behavior::Panic => panic!("deployer crashed"),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn of(&self, severity: Severity) -> Vec<Notification> {
        self.all()
            .into_iter()
            .filter(|n| n.severity == severity)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// A controller wired to fakes, with handles to inspect them.
pub struct Harness {
    pub controller: MintController,
    pub store: Arc<FakeStore>,
    pub deployer: Arc<FakeDeployer>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new(context: TokenContext, behavior: Behavior) -> Self {
        Self::build(context, behavior, true)
    }

    pub fn build(context: TokenContext, behavior: Behavior, connected: bool) -> Self {
        let store = Arc::new(FakeStore::with(context));
        let deployer = Arc::new(FakeDeployer::new(behavior));
        let notifier = Arc::new(RecordingNotifier::default());
        let controller = MintController::new(
            store.clone(),
            Arc::new(FakeWallet { connected }),
            deployer.clone(),
            notifier.clone(),
        );
        Self {
            controller,
            store,
            deployer,
            notifier,
        }
    }

    /// Open the popup and type `amount`.
    pub fn enter(&mut self, amount: &str) {
        self.controller.open();
        self.controller
            .set_amount(Some(amount.parse::<HumanAmount>().unwrap()));
    }
}
