use cosmwasm_std::{Addr, Binary, CosmosMsg, Empty, Timestamp, Uint128};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::state::TokenRef;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct InstantiateMsg {
    /// defaults to the sender
    pub admin: Option<Admin>,
    pub base_fields: BaseInitMsg,
    /// one cw721 contract is instantiated per entry
    pub collection_infos: Vec<CollectionInfoMsg>,
    pub extension: SharedCollectionInfoMsg,
    /// either this or `base_fields.airdropper_address`, not both
    pub airdropper_instantiate_info: Option<ModuleInstantiateInfo>,
    /// either this or `base_fields.whitelist_address`, not both
    pub whitelist_instantiate_info: Option<ModuleInstantiateInfo>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct BaseInitMsg {
    pub maintainer_address: Option<String>,
    pub airdropper_address: Option<String>,
    pub whitelist_address: Option<String>,
    /// public mint opens here. whitelist and promised mints run before it
    pub start_time: Timestamp,
    /// hard stop for every channel. open-ended when unset
    pub end_time: Option<Timestamp>,
    pub max_per_address_mint: u32,
    pub max_per_address_bundle_mint: u32,
    pub mint_price: Uint128,
    pub bundle_mint_price: Uint128,
    pub mint_denom: String,
    pub token_code_id: u64,
    /// hold revenue in per-address balances until disbursed
    pub escrow_funds: bool,
    pub bundle_enabled: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct CollectionInfoMsg {
    pub name: String,
    pub symbol: String,
    pub base_token_uri: String,
    pub token_supply: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct SharedCollectionInfoMsg {
    /// initial sales split, at most 10000 bps. the primary address takes the rest
    pub mint_revenue_share: Vec<RoyaltyInfoMsg>,
    /// secondary sales royalties, at most 5000 bps
    pub secondary_market_royalties: Vec<RoyaltyInfoMsg>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct RoyaltyInfoMsg {
    pub address: String,
    pub bps: u32,
    pub is_primary: bool,
}

/// Admin descriptor, for this contract and for the sub-modules it instantiates.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Admin {
    /// A specific address.
    Address { address: String },
    /// The instantiating contract, or this minter when set on a sub-module.
    CoreContract {},
    /// No admin.
    None {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionTarget {
    None,
    Airdropper,
    Whitelist,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct ModuleInstantiateInfo {
    pub code_id: u64,
    pub msg: Binary,
    pub admin: Admin,
    pub label: String,
}

/// Partial config update. Unset fields are left alone. The `clear_*` flags
/// remove an optional field and cannot be combined with setting it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct ConfigPatch {
    pub maintainer_address: Option<String>,
    pub airdropper_address: Option<String>,
    pub whitelist_address: Option<String>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub max_per_address_mint: Option<u32>,
    pub max_per_address_bundle_mint: Option<u32>,
    pub mint_price: Option<Uint128>,
    pub bundle_mint_price: Option<Uint128>,
    pub mint_denom: Option<String>,
    pub escrow_funds: Option<bool>,
    pub bundle_enabled: Option<bool>,
    pub extension: Option<SharedCollectionInfoMsg>,
    #[serde(default)]
    pub clear_maintainer_address: bool,
    #[serde(default)]
    pub clear_airdropper_address: bool,
    #[serde(default)]
    pub clear_whitelist_address: bool,
    /// back to an open-ended mint
    #[serde(default)]
    pub clear_end_time: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    UpdateConfig(ConfigPatch),
    /// (Re)instantiates a sub-module. The reply replaces the stored address
    InitSubmodule {
        target: ExecutionTarget,
        module_info: ModuleInstantiateInfo,
    },
    /// Whitelist mint before `start_time`, public mint after it. With
    /// `is_promised_mint` a free mint promised by the airdropper
    Mint {
        is_promised_mint: bool,
        minter_address: Option<String>,
    },
    /// One token from every sub-collection
    MintBundle {},
    /// Mints the specific tokens the airdropper promised to an address
    AirdropClaim {
        limit: Option<u32>,
        minter_address: Option<String>,
    },
    /// Pulls every airdropper-assigned token out of the random draw
    CleanClaimedTokensFromShuffle {},
    ShuffleTokenOrder {},
    SubmoduleHook(ExecutionTarget, CosmosMsg<Empty>),
    DisburseFunds {
        address: String,
    },
    /// Stages a hand-picked token set sold as one bundle
    ProcessCustomBundle {
        content_count: u32,
        mint_price: Uint128,
        purge: bool,
        tokens: Option<Vec<TokenRef>>,
    },
    MintCustomBundle {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    GetConfig {},
    CheckAddressMints {
        minter_address: String,
    },
    GetAddressMints {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    GetEscrowBalances {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    GetCw721CollectionInfo {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    GetBundleMintTracker {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    GetCustomBundleMintTracker {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    GetCollectionCurrentTokenSupply {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Global supply figures. With an address, also that address' allowance
    GetRemainingTokens {
        address: Option<String>,
    },
    GetCw721Addrs {},
    GetShuffleState {},
    GetCustomBundle {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ConfigResponse {
    pub config: Config,
    pub shuffled: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct AddressValMsg {
    pub address: Addr,
    pub value: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct AddressBalance {
    pub address: Addr,
    pub balance: Uint128,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct AddressMintsResponse {
    pub address: Addr,
    pub public: u32,
    pub whitelist: u32,
    pub airdrop: u32,
    pub bundle: u32,
    pub custom_bundle: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct CollectionSupplyResponse {
    pub collection_id: u64,
    pub token_supply: u32,
    pub issued: u32,
    pub remaining: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct Cw721AddrResponse {
    pub collection_id: u64,
    pub address: Addr,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct GetRemainingTokensResponse {
    pub total_token_supply: u32,
    pub remaining_token_supply: u32,
    pub remaining_bundle_mints: u32,
    pub remaining_custom_bundle_mints: u32,
    pub max_per_address_mint: u32,
    pub max_per_address_bundle_mint: u32,
    pub address_minted: Option<u32>,
    pub address_bundles_minted: Option<u32>,
    pub address_custom_bundles_minted: Option<u32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ShuffleStateResponse {
    pub shuffled: bool,
    pub locked: bool,
    pub total: u32,
    pub issued: u32,
    pub pending: u32,
    pub reserved: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct CustomBundleResponse {
    pub enabled: bool,
    pub completed: bool,
    pub mint_price: Uint128,
    pub content_count: u32,
    pub staged_tokens: Vec<TokenRef>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct MigrateMsg {}
