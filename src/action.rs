use serde::{Deserialize, Serialize};
use strum::Display;

use jetton_minter::domain::{mint::MintOutcome, notification::Notification};

/// Actions that can be triggered by user input or internal events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Tick,
    Resize(u16, u16),
    Suspend,
    Quit,
    Error(String),

    // Jetton
    Refresh,

    // Mint
    SubmitMint,
    MintSettled(MintOutcome),

    Notify(Notification),
}
