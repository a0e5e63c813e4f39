pub mod allocation;
pub mod config;
pub mod contract;
mod error;
pub mod escrow;
pub mod helpers;
pub mod ledger;
pub mod msg;
pub mod query;
pub mod state;
pub mod submodule;


pub use crate::error::ContractError;
