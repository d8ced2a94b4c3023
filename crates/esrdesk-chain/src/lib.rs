pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod queries;
pub mod transactions;

pub use client::{RouterClient, RouterInfo};
pub use config::get_router_endpoints;
pub use error::GatewayError;
pub use gateway::{LedgerGateway, TxReceipt, UserFarmInfo, require_account};
