use cosmwasm_std::{Addr, Deps, Order, StdResult};
use cw_storage_plus::Bound;
use cw_utils::maybe_addr;

use crate::allocation::TokenAllocator;
use crate::ledger::{self, MintChannel};
use crate::msg::{
    AddressBalance, AddressMintsResponse, AddressValMsg, CollectionSupplyResponse,
    ConfigResponse, Cw721AddrResponse, CustomBundleResponse, GetRemainingTokensResponse,
    ShuffleStateResponse,
};
use crate::state::{
    CollectionInfo, BANK_BALANCES, COLLECTION_SUPPLY, CONFIG, CUSTOM_BUNDLE_TOKENS, CW721_ADDRS,
    CW721_COLLECTION_INFO,
};

const DEFAULT_LIMIT: u32 = 30;
const MAX_LIMIT: u32 = 100;

fn page_size(limit: Option<u32>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize
}

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    let allocator = TokenAllocator::load(deps.storage)?;
    Ok(ConfigResponse {
        config,
        shuffled: allocator.is_shuffled(),
    })
}

pub fn query_check_address_mints(
    deps: Deps,
    minter_address: String,
) -> StdResult<AddressMintsResponse> {
    let address = deps.api.addr_validate(&minter_address)?;
    Ok(AddressMintsResponse {
        public: ledger::peek(deps.storage, &address, MintChannel::Public)?,
        whitelist: ledger::peek(deps.storage, &address, MintChannel::Whitelist)?,
        airdrop: ledger::peek(deps.storage, &address, MintChannel::Airdrop)?,
        bundle: ledger::peek(deps.storage, &address, MintChannel::Bundle)?,
        custom_bundle: ledger::peek(deps.storage, &address, MintChannel::CustomBundle)?,
        address,
    })
}

pub fn query_channel_mints(
    deps: Deps,
    channel: MintChannel,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Vec<AddressValMsg>> {
    let start_after = maybe_addr(deps.api, start_after)?;
    let entries = ledger::list(deps.storage, channel, start_after, page_size(limit))?;
    Ok(entries
        .into_iter()
        .map(|(address, value)| AddressValMsg { address, value })
        .collect())
}

pub fn query_escrow_balances(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Vec<AddressBalance>> {
    let start = maybe_addr(deps.api, start_after)?.map(Bound::<Addr>::exclusive);
    BANK_BALANCES
        .range(deps.storage, start, None, Order::Ascending)
        .take(page_size(limit))
        .map(|item| {
            let (address, balance) = item?;
            Ok(AddressBalance { address, balance })
        })
        .collect()
}

pub fn query_cw721_collection_info(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Vec<CollectionInfo>> {
    let start = start_after.map(Bound::exclusive);
    CW721_COLLECTION_INFO
        .range(deps.storage, start, None, Order::Ascending)
        .take(page_size(limit))
        .map(|item| item.map(|(_, info)| info))
        .collect()
}

pub fn query_collection_current_token_supply(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Vec<CollectionSupplyResponse>> {
    let start = start_after.map(Bound::exclusive);
    COLLECTION_SUPPLY
        .range(deps.storage, start, None, Order::Ascending)
        .take(page_size(limit))
        .map(|item| {
            let (collection_id, supply) = item?;
            Ok(CollectionSupplyResponse {
                collection_id,
                token_supply: supply.token_supply,
                issued: supply.issued,
                remaining: supply.remaining(),
            })
        })
        .collect()
}

pub fn query_remaining_tokens(
    deps: Deps,
    address: Option<String>,
) -> StdResult<GetRemainingTokensResponse> {
    let config = CONFIG.load(deps.storage)?;
    let allocator = TokenAllocator::load(deps.storage)?;

    // every bundle takes one token from each sub-collection
    let remaining_bundle_mints = if config.bundle_enabled && !config.bundle_completed {
        allocator
            .collection_ids()
            .into_iter()
            .map(|collection_id| allocator.pending_in(collection_id))
            .min()
            .unwrap_or(0)
    } else {
        0
    };

    let remaining_custom_bundle_mints = if config.custom_bundle_enabled
        && !config.custom_bundle_completed
        && config.custom_bundle_content_count > 0
    {
        let staged = CUSTOM_BUNDLE_TOKENS.may_load(deps.storage)?.unwrap_or_default();
        staged.len() as u32 / config.custom_bundle_content_count
    } else {
        0
    };

    let mut res = GetRemainingTokensResponse {
        total_token_supply: allocator.total_supply(),
        remaining_token_supply: allocator.remaining(),
        remaining_bundle_mints,
        remaining_custom_bundle_mints,
        max_per_address_mint: config.max_per_address_mint,
        max_per_address_bundle_mint: config.max_per_address_bundle_mint,
        address_minted: None,
        address_bundles_minted: None,
        address_custom_bundles_minted: None,
    };

    if let Some(address) = maybe_addr(deps.api, address)? {
        res.address_minted = Some(ledger::peek(deps.storage, &address, MintChannel::Public)?);
        res.address_bundles_minted =
            Some(ledger::peek(deps.storage, &address, MintChannel::Bundle)?);
        res.address_custom_bundles_minted =
            Some(ledger::peek(deps.storage, &address, MintChannel::CustomBundle)?);
    }

    Ok(res)
}

pub fn query_cw721_addrs(deps: Deps) -> StdResult<Vec<Cw721AddrResponse>> {
    CW721_ADDRS
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| {
            let (collection_id, address) = item?;
            Ok(Cw721AddrResponse {
                collection_id,
                address,
            })
        })
        .collect()
}

pub fn query_shuffle_state(deps: Deps) -> StdResult<ShuffleStateResponse> {
    let allocator = TokenAllocator::load(deps.storage)?;
    let total = allocator.total_supply();
    let issued = allocator.issued();
    let pending = allocator.pending();
    Ok(ShuffleStateResponse {
        shuffled: allocator.is_shuffled(),
        locked: issued > 0,
        total,
        issued,
        pending,
        reserved: total - issued - pending,
    })
}

pub fn query_custom_bundle(deps: Deps) -> StdResult<CustomBundleResponse> {
    let config = CONFIG.load(deps.storage)?;
    let staged_tokens = CUSTOM_BUNDLE_TOKENS.may_load(deps.storage)?.unwrap_or_default();
    Ok(CustomBundleResponse {
        enabled: config.custom_bundle_enabled,
        completed: config.custom_bundle_completed,
        mint_price: config.custom_bundle_mint_price,
        content_count: config.custom_bundle_content_count,
        staged_tokens,
    })
}

