use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// One sub-collection, backed by its own cw721 contract. `id` doubles as the
/// reply id of that contract's instantiation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct CollectionInfo {
    pub id: u64,
    pub token_supply: u32,
    pub name: String,
    pub symbol: String,
    pub base_token_uri: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, JsonSchema)]
pub struct TokenRef {
    pub collection_id: u64,
    pub token_id: u32,
}

impl TokenRef {
    pub fn new(collection_id: u64, token_id: u32) -> Self {
        TokenRef {
            collection_id,
            token_id,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, JsonSchema)]
pub struct SupplyRecord {
    pub token_supply: u32,
    pub issued: u32,
}

impl SupplyRecord {
    pub fn remaining(&self) -> u32 {
        self.token_supply - self.issued
    }
}

/// Contiguous run of arena slots owned by one sub-collection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct CollectionSlots {
    pub collection_id: u64,
    pub offset: u32,
    pub token_supply: u32,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Pending,
    /// Held back for an airdrop claim.
    Reserved,
    /// Staged for the custom bundle. Only a custom bundle mint can issue it.
    Staged,
    Issued,
}

/// Arena-indexed token order.
///
/// `order[..cursor]` holds the slots already issued, in issue order, and
/// `order[cursor..]` the pending window. Reserved and staged slots sit
/// outside `order` until they are claimed or released.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ShuffleState {
    pub layout: Vec<CollectionSlots>,
    pub order: Vec<u32>,
    pub cursor: u32,
    pub status: Vec<SlotStatus>,
    pub shuffled: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct EscrowTotals {
    pub deposited: Uint128,
    pub disbursed: Uint128,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const CW721_COLLECTION_INFO: Map<u64, CollectionInfo> = Map::new("cw721_collection_info");
pub const CW721_ADDRS: Map<u64, Addr> = Map::new("cw721_addrs");

// allocation
pub const SHUFFLE_STATE: Item<ShuffleState> = Item::new("shuffle_state");
pub const COLLECTION_SUPPLY: Map<u64, SupplyRecord> = Map::new("collection_supply");
pub const CUSTOM_BUNDLE_TOKENS: Item<Vec<TokenRef>> = Item::new("custom_bundle_tokens");

// trackers
pub const ADDRESS_MINT_TRACKER: Map<Addr, u32> = Map::new("address_mint_tracker");
pub const WHITELIST_MINT_TRACKER: Map<Addr, u32> = Map::new("whitelist_mint_tracker");
pub const AIRDROP_MINT_TRACKER: Map<Addr, u32> = Map::new("airdrop_mint_tracker");
pub const BUNDLE_MINT_TRACKER: Map<Addr, u32> = Map::new("bundle_mint_tracker");
pub const CUSTOM_BUNDLE_MINT_TRACKER: Map<Addr, u32> = Map::new("custom_bundle_mint_tracker");

// escrow
pub const BANK_BALANCES: Map<Addr, Uint128> = Map::new("bank_balances");
pub const ESCROW_TOTALS: Item<EscrowTotals> = Item::new("escrow_totals");
