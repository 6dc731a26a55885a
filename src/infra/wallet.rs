//! Wallet connection held by the external wallet bridge.
//!
//! The session is established out of band (the bridge pairs with the user's
//! wallet); this side only carries the session id and the wallet address.

use color_eyre::eyre::{Result, eyre};

use crate::domain::{
    mint::{WalletConnection, WalletSession},
    token::Address,
};

#[derive(Debug, Clone, Default)]
pub struct BridgeWallet {
    session: Option<WalletSession>,
}

impl BridgeWallet {
    pub fn new(address: Address, session_id: impl Into<String>) -> Self {
        Self {
            session: Some(WalletSession {
                address,
                session_id: session_id.into(),
            }),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Build from optional CLI values. Both must be present to connect.
    pub fn from_args(wallet: Option<&str>, session: Option<&str>) -> Result<Self> {
        match (wallet, session) {
            (Some(wallet), Some(session)) => Ok(Self::new(wallet.parse()?, session)),
            (None, None) => Ok(Self::disconnected()),
            _ => Err(eyre!("--wallet and --session must be given together")),
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.session.as_ref().map(|s| s.address)
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }
}

impl WalletConnection for BridgeWallet {
    fn connection(&self) -> Result<WalletSession> {
        self.session
            .clone()
            .ok_or_else(|| eyre!("Wallet is not connected"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET: &str = "0:2222222222222222222222222222222222222222222222222222222222222222";

    #[test]
    fn test_from_args() {
        let wallet = BridgeWallet::from_args(Some(WALLET), Some("abc")).unwrap();
        assert!(wallet.is_connected());
        let session = wallet.connection().unwrap();
        assert_eq!(session.session_id, "abc");
        assert_eq!(session.address, WALLET.parse().unwrap());
    }

    #[test]
    fn test_disconnected() {
        let wallet = BridgeWallet::from_args(None, None).unwrap();
        assert!(wallet.address().is_none());
        assert!(wallet.connection().is_err());
    }

    #[test]
    fn test_partial_args_rejected() {
        assert!(BridgeWallet::from_args(Some(WALLET), None).is_err());
        assert!(BridgeWallet::from_args(None, Some("abc")).is_err());
    }
}
