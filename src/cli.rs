use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "jetton-minter")]
#[command(version)]
#[command(about = "A TUI for minting additional supply of a TON jetton")]
pub struct Args {
    /// Tick rate in ticks per second
    #[arg(short, long, default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate in frames per second
    #[arg(short, long, default_value_t = 30.0)]
    pub frame_rate: f64,

    /// Network to connect to (testnet, mainnet)
    #[arg(short, long, default_value = "testnet")]
    pub network: String,

    /// Custom indexer API URL (overrides network default)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Jetton master address
    #[arg(short, long)]
    pub jetton: String,

    /// Connected wallet address (paired through the wallet bridge)
    #[arg(long)]
    pub wallet: Option<String>,

    /// Wallet bridge session id
    #[arg(long)]
    pub session: Option<String>,

    /// Wallet being viewed, if not the connected one
    #[arg(long)]
    pub owner: Option<String>,

    /// Data directory path
    #[arg(long)]
    pub data_dir: Option<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
