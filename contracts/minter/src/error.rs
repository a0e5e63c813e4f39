use cosmwasm_std::{Coin, StdError};
use cw_utils::PaymentError;
use sg1::FeeError;
use thiserror::Error;
use url::ParseError;

use crate::ledger::MintChannel;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Minting closed: {reason}")]
    MintingClosed { reason: String },

    #[error("Max {channel} mints per address exceeded ({cap})")]
    CapExceeded { channel: MintChannel, cap: u32 },

    #[error("Not eligible: {reason}")]
    NotEligible { reason: String },

    #[error("Sold out")]
    SoldOut {},

    #[error("Token order is locked once minting has begun")]
    ShuffleLocked {},

    #[error("Token order was already shuffled")]
    AlreadyShuffled {},

    #[error("IncorrectPaymentAmount {0} != {1}")]
    IncorrectPaymentAmount(Coin, Coin),

    #[error("Invalid token {collection_id}:{token_id}")]
    InvalidToken { collection_id: u64, token_id: u32 },

    #[error("Execution target does not match the attached submodule")]
    InvalidTargetAddress {},

    #[error("Invalid reply ID")]
    InvalidReplyID {},

    #[error("Instantiate {contract} error")]
    InstantiateError { contract: String },

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("{0}")]
    Fee(#[from] FeeError),
}

impl ContractError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        ContractError::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub fn minting_closed(reason: impl Into<String>) -> Self {
        ContractError::MintingClosed {
            reason: reason.into(),
        }
    }

    pub fn not_eligible(reason: impl Into<String>) -> Self {
        ContractError::NotEligible {
            reason: reason.into(),
        }
    }
}

impl From<ParseError> for ContractError {
    fn from(err: ParseError) -> ContractError {
        ContractError::invalid_config(format!("base token uri: {}", err))
    }
}
