//! Jetton identity and the token context read by the mint action.

use std::{fmt, str::FromStr};

use color_eyre::eyre::{Result, eyre};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tonlib_core::TonAddress;

/// A TON account address (workchain + 256-bit account id).
///
/// Accepts the raw form `0:<64 hex>` and the 48-character user-friendly form
/// (standard or url-safe base64, with crc16 checksum). The workchain must fit
/// the signed byte of the user-friendly form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    pub workchain: i32,
    pub hash: [u8; 32],
}

impl Address {
    pub fn new(workchain: i32, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    fn to_ton(self) -> TonAddress {
        TonAddress {
            workchain: self.workchain,
            hash_part: self.hash,
        }
    }

    /// Render the user-friendly url-safe form.
    pub fn to_friendly(&self, bounceable: bool, testnet: bool) -> String {
        self.to_ton().to_base64_url_flags(!bounceable, testnet)
    }

    /// Shortened form for narrow panels.
    pub fn short(&self) -> String {
        let raw = self.to_string();
        format!("{}...{}", &raw[..8], &raw[raw.len() - 6..])
    }
}

impl TryFrom<TonAddress> for Address {
    type Error = color_eyre::eyre::Report;

    fn try_from(address: TonAddress) -> Result<Self> {
        if i8::try_from(address.workchain).is_err() {
            return Err(eyre!("Workchain out of range: {}", address.workchain));
        }
        Ok(Self {
            workchain: address.workchain,
            hash: address.hash_part,
        })
    }
}

impl FromStr for Address {
    type Err = color_eyre::eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let address = s
            .parse::<TonAddress>()
            .map_err(|e| eyre!("Invalid address {}: {}", s, e))?;
        Self::try_from(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workchain, hex::encode(self.hash))
    }
}

impl TryFrom<String> for Address {
    type Error = color_eyre::eyre::Report;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

/// Snapshot of the jetton being administered, as seen by the connected wallet.
///
/// `jetton_master` and `decimals` are `None` until the first load completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenContext {
    pub jetton_master: Option<Address>,
    /// Connected wallet is the jetton's admin.
    pub is_admin: bool,
    /// The viewed wallet belongs to the connected wallet.
    pub is_my_wallet: bool,
    pub symbol: String,
    pub decimals: Option<u8>,
    pub name: Option<String>,
    pub total_supply: Option<BigUint>,
    pub mintable: bool,
    pub admin_address: Option<Address>,
}

impl TokenContext {
    /// The mint action is only offered to the admin viewing their own wallet.
    pub fn can_mint(&self) -> bool {
        self.is_admin && self.is_my_wallet
    }

    pub fn is_ready(&self) -> bool {
        self.jetton_master.is_some() && self.decimals.is_some()
    }
}
