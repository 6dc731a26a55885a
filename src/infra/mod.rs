pub mod deployer;
pub mod rpc;
pub mod store;
pub mod wallet;
