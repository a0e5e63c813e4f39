use cosmwasm_std::{
    to_binary, Addr, CosmosMsg, Empty, QuerierWrapper, StdResult, Uint128, WasmMsg,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sg_std::StargazeMsgWrapper;

use crate::error::ContractError;
use crate::ledger::MintChannel;
use crate::state::TokenRef;

const ASSIGNED_TOKENS_PAGE: u32 = 30;

// Message shapes understood by the whitelist contract.

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WhitelistExecuteMsg {
    UpdateAddressMintTracker(String),
    UpdateMaintainerAddress(Option<String>),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WhitelistQueryMsg {
    CheckWhitelist { minter_address: String },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct CheckWhitelistResponse {
    pub minter_addr: Addr,
    pub whitelist_is_closed: bool,
    pub whitelist_in_progress: bool,
    pub is_on_whitelist: bool,
    pub current_mint_count: u32,
    pub max_per_address_mint: u32,
    pub mint_price: Uint128,
}

// Message shapes understood by the airdropper contract.

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct AddressTokenMsg {
    pub address: String,
    pub token: TokenRef,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AirdropperExecuteMsg {
    MarkTokenIdClaimed(AddressTokenMsg),
    IncrementAddressClaimedPromisedMintCount(String),
    UpdateMaintainerAddress(Option<String>),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AirdropperQueryMsg {
    CheckAddressPromisedMints {
        minter_address: String,
    },
    CheckAddressPromisedTokens {
        minter_address: String,
    },
    GetAssignedTokenIds {
        start_after: Option<(u64, u32)>,
        limit: Option<u32>,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct CheckAirdropPromisedMintResponse {
    pub minter_addr: Addr,
    pub airdrop_mint_is_closed: bool,
    pub airdrop_mint_in_progress: bool,
    pub promised_mint_count: u32,
    pub claimed_mint_count: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct CheckAirdropPromisedTokensResponse {
    pub minter_addr: Addr,
    pub airdrop_mint_is_closed: bool,
    pub airdrop_mint_in_progress: bool,
    pub address_promised_token_ids: Vec<TokenRef>,
    pub address_claimed_token_ids: Vec<TokenRef>,
}

/// A collaborator's verdict on one address.
#[derive(Clone, Debug, PartialEq)]
pub struct Eligibility {
    pub open: bool,
    pub listed: bool,
    pub minted: u32,
    pub cap: u32,
    pub price: Uint128,
}

impl Eligibility {
    pub fn verify(&self, channel: MintChannel, units: u32) -> Result<(), ContractError> {
        if !self.open {
            return Err(ContractError::minting_closed(format!(
                "{} mint is not in progress",
                channel
            )));
        }
        if !self.listed {
            return Err(ContractError::not_eligible(format!(
                "address is not on the {} list",
                channel
            )));
        }
        if self.minted + units > self.cap {
            return Err(ContractError::CapExceeded {
                channel,
                cap: self.cap,
            });
        }
        Ok(())
    }
}

/// Narrow interface to an attached sub-module. The minter only asks for
/// eligibility, reports mints and passes hook payloads through.
pub trait Collaborator {
    fn addr(&self) -> &Addr;

    fn check_eligibility(&self, querier: &QuerierWrapper, minter: &Addr) -> StdResult<Eligibility>;

    fn record_mint(&self, minter: &Addr) -> StdResult<CosmosMsg<StargazeMsgWrapper>>;

    fn update_maintainer(&self, maintainer: Option<&Addr>)
        -> StdResult<CosmosMsg<StargazeMsgWrapper>>;

    /// Passes a hook payload through untouched. Only a fund-less execute on
    /// this collaborator is accepted.
    fn forward(&self, msg: CosmosMsg<Empty>) -> Result<CosmosMsg<StargazeMsgWrapper>, ContractError> {
        match msg {
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr,
                msg,
                funds,
            }) if contract_addr == self.addr().as_str() => {
                if !funds.is_empty() {
                    return Err(ContractError::Unauthorized(
                        "Submodule hooks cannot move funds".to_owned(),
                    ));
                }
                Ok(CosmosMsg::Wasm(WasmMsg::Execute {
                    contract_addr,
                    msg,
                    funds,
                }))
            }
            _ => Err(ContractError::InvalidTargetAddress {}),
        }
    }
}

fn execute_msg<T: Serialize>(addr: &Addr, msg: &T) -> StdResult<CosmosMsg<StargazeMsgWrapper>> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: addr.to_string(),
        msg: to_binary(msg)?,
        funds: vec![],
    }))
}

pub struct WhitelistModule {
    addr: Addr,
}

impl WhitelistModule {
    pub fn new(addr: Addr) -> Self {
        WhitelistModule { addr }
    }
}

impl Collaborator for WhitelistModule {
    fn addr(&self) -> &Addr {
        &self.addr
    }

    fn check_eligibility(&self, querier: &QuerierWrapper, minter: &Addr) -> StdResult<Eligibility> {
        let res: CheckWhitelistResponse = querier.query_wasm_smart(
            &self.addr,
            &WhitelistQueryMsg::CheckWhitelist {
                minter_address: minter.to_string(),
            },
        )?;
        Ok(Eligibility {
            open: !res.whitelist_is_closed && res.whitelist_in_progress,
            listed: res.is_on_whitelist,
            minted: res.current_mint_count,
            cap: res.max_per_address_mint,
            price: res.mint_price,
        })
    }

    fn record_mint(&self, minter: &Addr) -> StdResult<CosmosMsg<StargazeMsgWrapper>> {
        execute_msg(
            &self.addr,
            &WhitelistExecuteMsg::UpdateAddressMintTracker(minter.to_string()),
        )
    }

    fn update_maintainer(
        &self,
        maintainer: Option<&Addr>,
    ) -> StdResult<CosmosMsg<StargazeMsgWrapper>> {
        execute_msg(
            &self.addr,
            &WhitelistExecuteMsg::UpdateMaintainerAddress(maintainer.map(Addr::to_string)),
        )
    }
}

pub struct AirdropperModule {
    addr: Addr,
}

impl AirdropperModule {
    pub fn new(addr: Addr) -> Self {
        AirdropperModule { addr }
    }

    pub fn promised_tokens(
        &self,
        querier: &QuerierWrapper,
        minter: &Addr,
    ) -> StdResult<CheckAirdropPromisedTokensResponse> {
        querier.query_wasm_smart(
            &self.addr,
            &AirdropperQueryMsg::CheckAddressPromisedTokens {
                minter_address: minter.to_string(),
            },
        )
    }

    /// Every token the airdropper has assigned to someone, across all pages.
    pub fn assigned_tokens(&self, querier: &QuerierWrapper) -> StdResult<Vec<TokenRef>> {
        let mut tokens = vec![];
        let mut start_after = None;
        loop {
            let page: Vec<TokenRef> = querier.query_wasm_smart(
                &self.addr,
                &AirdropperQueryMsg::GetAssignedTokenIds {
                    start_after,
                    limit: Some(ASSIGNED_TOKENS_PAGE),
                },
            )?;
            let done = page.len() < ASSIGNED_TOKENS_PAGE as usize;
            start_after = page
                .last()
                .map(|token| (token.collection_id, token.token_id));
            tokens.extend(page);
            if done {
                return Ok(tokens);
            }
        }
    }

    pub fn mark_claimed(
        &self,
        minter: &Addr,
        token: &TokenRef,
    ) -> StdResult<CosmosMsg<StargazeMsgWrapper>> {
        execute_msg(
            &self.addr,
            &AirdropperExecuteMsg::MarkTokenIdClaimed(AddressTokenMsg {
                address: minter.to_string(),
                token: token.clone(),
            }),
        )
    }
}

impl Collaborator for AirdropperModule {
    fn addr(&self) -> &Addr {
        &self.addr
    }

    fn check_eligibility(&self, querier: &QuerierWrapper, minter: &Addr) -> StdResult<Eligibility> {
        let res: CheckAirdropPromisedMintResponse = querier.query_wasm_smart(
            &self.addr,
            &AirdropperQueryMsg::CheckAddressPromisedMints {
                minter_address: minter.to_string(),
            },
        )?;
        Ok(Eligibility {
            open: !res.airdrop_mint_is_closed && res.airdrop_mint_in_progress,
            listed: res.promised_mint_count > 0,
            minted: res.claimed_mint_count,
            cap: res.promised_mint_count,
            price: Uint128::zero(),
        })
    }

    fn record_mint(&self, minter: &Addr) -> StdResult<CosmosMsg<StargazeMsgWrapper>> {
        execute_msg(
            &self.addr,
            &AirdropperExecuteMsg::IncrementAddressClaimedPromisedMintCount(minter.to_string()),
        )
    }

    fn update_maintainer(
        &self,
        maintainer: Option<&Addr>,
    ) -> StdResult<CosmosMsg<StargazeMsgWrapper>> {
        execute_msg(
            &self.addr,
            &AirdropperExecuteMsg::UpdateMaintainerAddress(maintainer.map(Addr::to_string)),
        )
    }
}
