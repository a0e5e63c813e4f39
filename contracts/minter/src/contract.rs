use cosmwasm_std::{
    coin, coins, to_binary, Addr, BankMsg, Binary, CosmosMsg, Deps, DepsMut, Empty, Env,
    MessageInfo, Reply, StdError, StdResult, Uint128, WasmMsg,
};
#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cw2::set_contract_version;
use cw721_base::{msg::ExecuteMsg as Cw721ExecuteMsg, InstantiateMsg as Cw721InstantiateMsg, MintMsg};
use cw_utils::{may_pay, maybe_addr, nonpayable, parse_reply_instantiate_data};
use semver::Version;
use sg1::checked_fair_burn;
use sg_std::StargazeMsgWrapper;
use url::Url;

use crate::allocation::TokenAllocator;
use crate::config::{self, Config, MAX_TOKEN_SUPPLY};
use crate::error::ContractError;
use crate::escrow;
use crate::helpers::entropy;
use crate::ledger::{self, MintChannel};
use crate::msg::{
    Admin, CollectionInfoMsg, ConfigPatch, ExecuteMsg, ExecutionTarget, InstantiateMsg,
    MigrateMsg, ModuleInstantiateInfo, QueryMsg,
};
use crate::query;
use crate::state::{
    CollectionInfo, TokenRef, CONFIG, CUSTOM_BUNDLE_TOKENS, CW721_ADDRS, CW721_COLLECTION_INFO,
    ESCROW_TOTALS,
};
use crate::submodule::{AirdropperModule, Collaborator, WhitelistModule};

pub type Response = cosmwasm_std::Response<StargazeMsgWrapper>;
pub type SubMsg = cosmwasm_std::SubMsg<StargazeMsgWrapper>;

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:nft-minter";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const INSTANTIATE_AIRDROPPER_REPLY_ID: u64 = 1;
const INSTANTIATE_WHITELIST_REPLY_ID: u64 = 2;
// sub-collection ids, and their cw721 reply ids, count up from here
const INSTANTIATE_TOKEN_REPLY_ID: u64 = 100;

// paid by anyone but the admin or maintainer to reshuffle before minting starts
pub const SHUFFLE_FEE: u128 = 500_000_000;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    // If current time is beyond the provided start time return error
    if env.block.time > msg.base_fields.start_time {
        return Err(ContractError::invalid_config(
            "start_time must not be in the past",
        ));
    }
    if let Some(end_time) = msg.base_fields.end_time {
        if end_time <= env.block.time {
            return Err(ContractError::invalid_config(
                "end_time must be in the future",
            ));
        }
    }

    if msg.base_fields.airdropper_address.is_some() && msg.airdropper_instantiate_info.is_some() {
        return Err(ContractError::invalid_config(
            "set either airdropper_address or airdropper_instantiate_info",
        ));
    }
    if msg.base_fields.whitelist_address.is_some() && msg.whitelist_instantiate_info.is_some() {
        return Err(ContractError::invalid_config(
            "set either whitelist_address or whitelist_instantiate_info",
        ));
    }

    let collections = validate_collection_infos(msg.collection_infos)?;
    let total_token_supply: u32 = collections.iter().map(|c| c.token_supply).sum();

    let admin = msg
        .admin
        .unwrap_or(Admin::Address {
            address: info.sender.to_string(),
        })
        .into_role(deps.api, &info.sender)?;

    let base = msg.base_fields;
    let config = Config {
        admin,
        maintainer_addr: maybe_addr(deps.api, base.maintainer_address)?,
        airdropper_addr: maybe_addr(deps.api, base.airdropper_address)?,
        whitelist_addr: maybe_addr(deps.api, base.whitelist_address)?,
        start_time: base.start_time,
        end_time: base.end_time,
        total_token_supply,
        max_per_address_mint: base.max_per_address_mint,
        max_per_address_bundle_mint: base.max_per_address_bundle_mint,
        mint_price: base.mint_price,
        bundle_mint_price: base.bundle_mint_price,
        mint_denom: base.mint_denom,
        token_code_id: base.token_code_id,
        escrow_funds: base.escrow_funds,
        bundle_enabled: base.bundle_enabled,
        bundle_completed: false,
        custom_bundle_enabled: false,
        custom_bundle_completed: false,
        custom_bundle_mint_price: Uint128::zero(),
        custom_bundle_content_count: 0,
        extension: config::shared_collection_info(deps.api, msg.extension)?,
    };
    config.validate()?;
    CONFIG.save(deps.storage, &config)?;

    let supplies: Vec<(u64, u32)> = collections.iter().map(|c| (c.id, c.token_supply)).collect();
    TokenAllocator::new(&supplies).save(deps.storage)?;
    CUSTOM_BUNDLE_TOKENS.save(deps.storage, &vec![])?;
    ESCROW_TOTALS.save(deps.storage, &Default::default())?;

    let mut sub_msgs: Vec<SubMsg> = vec![];
    if let Some(module_info) = msg.airdropper_instantiate_info {
        sub_msgs.push(SubMsg::reply_on_success(
            module_info.into_wasm_msg(env.contract.address.clone()),
            INSTANTIATE_AIRDROPPER_REPLY_ID,
        ));
    }
    if let Some(module_info) = msg.whitelist_instantiate_info {
        sub_msgs.push(SubMsg::reply_on_success(
            module_info.into_wasm_msg(env.contract.address.clone()),
            INSTANTIATE_WHITELIST_REPLY_ID,
        ));
    }

    for collection in collections {
        let cw721_instantiate_info = ModuleInstantiateInfo {
            code_id: config.token_code_id,
            msg: to_binary(&Cw721InstantiateMsg {
                name: collection.name.clone(),
                symbol: collection.symbol.clone(),
                minter: env.contract.address.to_string(),
            })?,
            admin: Admin::None {},
            label: format!("{} collection", collection.name),
        };
        sub_msgs.push(SubMsg::reply_on_success(
            cw721_instantiate_info.into_wasm_msg(env.contract.address.clone()),
            collection.id,
        ));
        CW721_COLLECTION_INFO.save(deps.storage, collection.id, &collection)?;
    }

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract_name", CONTRACT_NAME)
        .add_attribute("contract_version", CONTRACT_VERSION)
        .add_attribute("sender", info.sender)
        .add_attribute("total_token_supply", total_token_supply.to_string())
        .add_submessages(sub_msgs))
}

fn validate_collection_infos(
    msgs: Vec<CollectionInfoMsg>,
) -> Result<Vec<CollectionInfo>, ContractError> {
    let mut collections = Vec::with_capacity(msgs.len());
    let mut total_token_supply: u32 = 0;

    for (index, msg) in msgs.into_iter().enumerate() {
        let parsed_token_uri = Url::parse(&msg.base_token_uri)?;
        if !matches!(parsed_token_uri.scheme(), "ipfs" | "https") {
            return Err(ContractError::invalid_config(
                "base_token_uri must be an ipfs or https uri",
            ));
        }
        if msg.token_supply == 0 {
            return Err(ContractError::invalid_config(format!(
                "collection {} has no tokens",
                msg.name
            )));
        }
        total_token_supply = total_token_supply.saturating_add(msg.token_supply);

        collections.push(CollectionInfo {
            id: INSTANTIATE_TOKEN_REPLY_ID + 1 + index as u64,
            token_supply: msg.token_supply,
            name: msg.name,
            symbol: msg.symbol,
            base_token_uri: msg.base_token_uri,
        });
    }

    if !(1..=MAX_TOKEN_SUPPLY).contains(&total_token_supply) {
        return Err(ContractError::invalid_config(format!(
            "total token supply must be between 1 and {}, got {}",
            MAX_TOKEN_SUPPLY, total_token_supply
        )));
    }

    Ok(collections)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::UpdateConfig(patch) => execute_update_config(deps, env, info, patch),
        ExecuteMsg::InitSubmodule {
            target,
            module_info,
        } => execute_init_submodule(deps, env, info, target, module_info),
        ExecuteMsg::Mint {
            is_promised_mint,
            minter_address,
        } => execute_mint(deps, env, info, is_promised_mint, minter_address),
        ExecuteMsg::MintBundle {} => execute_mint_bundle(deps, env, info),
        ExecuteMsg::AirdropClaim {
            limit,
            minter_address,
        } => execute_airdrop_claim(deps, env, info, limit, minter_address),
        ExecuteMsg::CleanClaimedTokensFromShuffle {} => {
            execute_clean_claimed_tokens_from_shuffle(deps, info)
        }
        ExecuteMsg::ShuffleTokenOrder {} => execute_shuffle_token_order(deps, env, info),
        ExecuteMsg::SubmoduleHook(target, msg) => execute_submodule_hook(deps, info, target, msg),
        ExecuteMsg::DisburseFunds { address } => execute_disburse_funds(deps, info, address),
        ExecuteMsg::ProcessCustomBundle {
            content_count,
            mint_price,
            purge,
            tokens,
        } => execute_process_custom_bundle(deps, info, content_count, mint_price, purge, tokens),
        ExecuteMsg::MintCustomBundle {} => execute_mint_custom_bundle(deps, env, info),
    }
}

pub fn execute_update_config(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    patch: ConfigPatch,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let previous = CONFIG.load(deps.storage)?;
    let config = config::update(deps, env.block.time, &info.sender, patch)?;

    // keep the sub-modules' maintainer in sync
    let mut msgs: Vec<CosmosMsg<StargazeMsgWrapper>> = vec![];
    if config.maintainer_addr != previous.maintainer_addr {
        for module in collaborators(&config) {
            msgs.push(module.update_maintainer(config.maintainer_addr.as_ref())?);
        }
    }

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_attribute("sender", info.sender)
        .add_messages(msgs))
}

pub fn execute_init_submodule(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    target: ExecutionTarget,
    module_info: ModuleInstantiateInfo,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    config.assert_can_administer(&info.sender)?;

    let reply_id = match target {
        ExecutionTarget::Airdropper => INSTANTIATE_AIRDROPPER_REPLY_ID,
        ExecutionTarget::Whitelist => INSTANTIATE_WHITELIST_REPLY_ID,
        ExecutionTarget::None => return Err(ContractError::InvalidTargetAddress {}),
    };
    let msg = SubMsg::reply_on_success(module_info.into_wasm_msg(env.contract.address), reply_id);

    Ok(Response::new()
        .add_attribute("action", "init_submodule")
        .add_attribute("sender", info.sender)
        .add_submessage(msg))
}

/// Whitelist, public and promised mints of a single random token.
pub fn execute_mint(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    is_promised_mint: bool,
    minter_address: Option<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let recipient = resolve_recipient(deps.as_ref(), &config, &info.sender, minter_address)?;
    let now = env.block.time;

    let gate: Option<Box<dyn Collaborator>> = if is_promised_mint {
        let airdropper = config
            .airdropper_addr
            .clone()
            .map(AirdropperModule::new)
            .ok_or_else(|| ContractError::not_eligible("no airdropper is attached"))?;
        Some(Box::new(airdropper) as Box<dyn Collaborator>)
    } else if now < config.start_time {
        config
            .whitelist_addr
            .clone()
            .map(|addr| Box::new(WhitelistModule::new(addr)) as Box<dyn Collaborator>)
    } else {
        None
    };
    let channel = match (&gate, is_promised_mint) {
        (Some(_), true) => MintChannel::Airdrop,
        (Some(_), false) => MintChannel::Whitelist,
        (None, _) => MintChannel::Public,
    };

    ledger::check(deps.storage, &config, now, &recipient, channel, 1)?;

    let price = match &gate {
        Some(module) => {
            let eligibility = module.check_eligibility(&deps.querier, &recipient)?;
            eligibility.verify(channel, 1)?;
            eligibility.price
        }
        None => config.mint_price,
    };
    let payment = check_payment(&info, &config, price)?;

    let mut allocator = TokenAllocator::load(deps.storage)?;
    allocator.ensure_shuffled(entropy(&env, &info.sender))?;
    let token = allocator.next_token(None)?;

    let mut msgs = vec![mint_msg(deps.as_ref(), &recipient, &token)?];
    if let Some(module) = &gate {
        msgs.push(module.record_mint(&recipient)?);
    }

    ledger::record_mint(deps.storage, &config, now, &recipient, channel)?;
    allocator.save(deps.storage)?;
    msgs.append(&mut escrow::disburse_or_escrow(deps.storage, &config, payment)?);

    Ok(Response::new()
        .add_attribute("action", "mint")
        .add_attribute("sender", info.sender)
        .add_attribute("recipient", recipient)
        .add_attribute("channel", channel.to_string())
        .add_attribute("collection_id", token.collection_id.to_string())
        .add_attribute("token_id", token.token_id.to_string())
        .add_attribute("mint_price", payment)
        .add_messages(msgs))
}

/// One token from every sub-collection at the bundle price.
pub fn execute_mint_bundle(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    let now = env.block.time;

    ledger::check(deps.storage, &config, now, &info.sender, MintChannel::Bundle, 1)?;
    let payment = check_payment(&info, &config, config.bundle_mint_price)?;

    let mut allocator = TokenAllocator::load(deps.storage)?;
    allocator.ensure_shuffled(entropy(&env, &info.sender))?;
    let collection_ids = allocator.collection_ids();
    let mut tokens = Vec::with_capacity(collection_ids.len());
    for collection_id in &collection_ids {
        tokens.push(allocator.next_token(Some(*collection_id))?);
    }

    let mut msgs = tokens
        .iter()
        .map(|token| mint_msg(deps.as_ref(), &info.sender, token))
        .collect::<Result<Vec<_>, _>>()?;

    ledger::record_mint(deps.storage, &config, now, &info.sender, MintChannel::Bundle)?;
    allocator.save(deps.storage)?;
    // a bundle needs every bucket, so the first empty one ends the channel
    if collection_ids
        .iter()
        .any(|collection_id| allocator.pending_in(*collection_id) == 0)
    {
        config.bundle_completed = true;
        CONFIG.save(deps.storage, &config)?;
    }
    msgs.append(&mut escrow::disburse_or_escrow(deps.storage, &config, payment)?);

    Ok(Response::new()
        .add_attribute("action", "mint_bundle")
        .add_attribute("sender", info.sender)
        .add_attribute("token_count", tokens.len().to_string())
        .add_attribute("bundle_completed", config.bundle_completed.to_string())
        .add_attribute("mint_price", payment)
        .add_messages(msgs))
}

/// Mints the specific tokens the airdropper promised to an address. Free.
pub fn execute_airdrop_claim(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    limit: Option<u32>,
    minter_address: Option<String>,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    let recipient = resolve_recipient(deps.as_ref(), &config, &info.sender, minter_address)?;
    let now = env.block.time;

    let airdropper = config
        .airdropper_addr
        .clone()
        .map(AirdropperModule::new)
        .ok_or_else(|| ContractError::not_eligible("no airdropper is attached"))?;
    let promised = airdropper.promised_tokens(&deps.querier, &recipient)?;
    if promised.airdrop_mint_is_closed || !promised.airdrop_mint_in_progress {
        return Err(ContractError::minting_closed(
            "airdrop claim is not in progress",
        ));
    }

    let claimed = promised.address_claimed_token_ids;
    let tokens: Vec<TokenRef> = promised
        .address_promised_token_ids
        .into_iter()
        .filter(|token| !claimed.contains(token))
        .take(limit.unwrap_or(u32::MAX) as usize)
        .collect();
    if tokens.is_empty() {
        return Err(ContractError::not_eligible(
            "address has no unclaimed promised tokens",
        ));
    }
    let units = tokens.len() as u32;
    ledger::check(deps.storage, &config, now, &recipient, MintChannel::Airdrop, units)?;

    let mut allocator = TokenAllocator::load(deps.storage)?;
    allocator.ensure_shuffled(entropy(&env, &info.sender))?;
    let mut msgs = vec![];
    for token in &tokens {
        allocator.claim(token)?;
        msgs.push(mint_msg(deps.as_ref(), &recipient, token)?);
        msgs.push(airdropper.mark_claimed(&recipient, token)?);
    }

    ledger::record_units(deps.storage, &config, now, &recipient, MintChannel::Airdrop, units)?;
    allocator.save(deps.storage)?;

    Ok(Response::new()
        .add_attribute("action", "airdrop_claim")
        .add_attribute("sender", info.sender)
        .add_attribute("recipient", recipient)
        .add_attribute("token_count", units.to_string())
        .add_messages(msgs))
}

pub fn execute_clean_claimed_tokens_from_shuffle(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    config.assert_can_administer(&info.sender)?;

    let airdropper = config
        .airdropper_addr
        .map(AirdropperModule::new)
        .ok_or(ContractError::InvalidTargetAddress {})?;
    let assigned = airdropper.assigned_tokens(&deps.querier)?;

    let mut allocator = TokenAllocator::load(deps.storage)?;
    let removed = allocator.remove_claimed(&assigned);
    allocator.save(deps.storage)?;

    Ok(Response::new()
        .add_attribute("action", "clean_claimed_tokens_from_shuffle")
        .add_attribute("sender", info.sender)
        .add_attribute("removed", removed.to_string()))
}

pub fn execute_shuffle_token_order(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let mut allocator = TokenAllocator::load(deps.storage)?;
    allocator.initialize_shuffle(entropy(&env, &info.sender))?;

    let fee_msgs = if config.can_administer(&info.sender) {
        nonpayable(&info)?;
        vec![]
    } else {
        checked_fair_burn(&info, SHUFFLE_FEE, None)?
    };

    allocator.save(deps.storage)?;

    Ok(Response::new()
        .add_attribute("action", "shuffle_token_order")
        .add_attribute("sender", info.sender)
        .add_messages(fee_msgs))
}

pub fn execute_submodule_hook(
    deps: DepsMut,
    info: MessageInfo,
    target: ExecutionTarget,
    msg: CosmosMsg<Empty>,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    config.assert_can_administer(&info.sender)?;

    let module: Box<dyn Collaborator> = match target {
        ExecutionTarget::Airdropper => config
            .airdropper_addr
            .map(|addr| Box::new(AirdropperModule::new(addr)) as Box<dyn Collaborator>),
        ExecutionTarget::Whitelist => config
            .whitelist_addr
            .map(|addr| Box::new(WhitelistModule::new(addr)) as Box<dyn Collaborator>),
        ExecutionTarget::None => None,
    }
    .ok_or(ContractError::InvalidTargetAddress {})?;
    let forwarded = module.forward(msg)?;

    Ok(Response::new()
        .add_attribute("action", "submodule_hook")
        .add_attribute("sender", info.sender)
        .add_attribute("target", module.addr().to_string())
        .add_message(forwarded))
}

pub fn execute_disburse_funds(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    config.assert_can_administer(&info.sender)?;

    let payee = deps.api.addr_validate(&address)?;
    let amount = escrow::disburse(deps.storage, &payee)?;

    let mut res = Response::new()
        .add_attribute("action", "disburse_funds")
        .add_attribute("sender", info.sender)
        .add_attribute("recipient", payee.to_string())
        .add_attribute("amount", amount);
    if !amount.is_zero() {
        res = res.add_message(BankMsg::Send {
            to_address: payee.to_string(),
            amount: coins(amount.u128(), &config.mint_denom),
        });
    }
    Ok(res)
}

pub fn execute_process_custom_bundle(
    deps: DepsMut,
    info: MessageInfo,
    content_count: u32,
    mint_price: Uint128,
    purge: bool,
    tokens: Option<Vec<TokenRef>>,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let mut config = CONFIG.load(deps.storage)?;
    config.assert_can_administer(&info.sender)?;

    if content_count == 0 {
        return Err(ContractError::invalid_config(
            "custom bundle content_count must be at least 1",
        ));
    }

    let mut allocator = TokenAllocator::load(deps.storage)?;
    let mut staged = CUSTOM_BUNDLE_TOKENS.may_load(deps.storage)?.unwrap_or_default();

    let tokens = tokens.unwrap_or_default();
    let assigned = match &config.airdropper_addr {
        Some(addr) if !tokens.is_empty() => {
            AirdropperModule::new(addr.clone()).assigned_tokens(&deps.querier)?
        }
        _ => vec![],
    };

    let mut released = 0u32;
    if purge {
        for token in staged.drain(..) {
            if allocator.unstage(&token)? {
                released += 1;
            }
        }
    }
    for token in tokens {
        if staged.contains(&token) {
            return Err(ContractError::invalid_config(format!(
                "token {}:{} is staged twice",
                token.collection_id, token.token_id
            )));
        }
        if assigned.contains(&token) {
            return Err(ContractError::invalid_config(format!(
                "token {}:{} is promised by the airdropper",
                token.collection_id, token.token_id
            )));
        }
        allocator.stage(&token)?;
        staged.push(token);
    }

    config.custom_bundle_enabled = true;
    config.custom_bundle_completed = (staged.len() as u32) < content_count;
    config.custom_bundle_content_count = content_count;
    config.custom_bundle_mint_price = mint_price;

    allocator.save(deps.storage)?;
    CUSTOM_BUNDLE_TOKENS.save(deps.storage, &staged)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "process_custom_bundle")
        .add_attribute("sender", info.sender)
        .add_attribute("staged", staged.len().to_string())
        .add_attribute("released", released.to_string())
        .add_attribute("content_count", content_count.to_string())
        .add_attribute("mint_price", mint_price))
}

/// Sells the next `custom_bundle_content_count` staged tokens as one bundle.
pub fn execute_mint_custom_bundle(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    let now = env.block.time;

    ledger::check(deps.storage, &config, now, &info.sender, MintChannel::CustomBundle, 1)?;
    let payment = check_payment(&info, &config, config.custom_bundle_mint_price)?;

    let mut staged = CUSTOM_BUNDLE_TOKENS.load(deps.storage)?;
    let content_count = config.custom_bundle_content_count as usize;
    if staged.len() < content_count {
        return Err(ContractError::SoldOut {});
    }
    let bundle: Vec<TokenRef> = staged.drain(..content_count).collect();

    let mut allocator = TokenAllocator::load(deps.storage)?;
    allocator.ensure_shuffled(entropy(&env, &info.sender))?;
    let mut msgs = vec![];
    for token in &bundle {
        allocator.claim_staged(token)?;
        msgs.push(mint_msg(deps.as_ref(), &info.sender, token)?);
    }

    ledger::record_mint(deps.storage, &config, now, &info.sender, MintChannel::CustomBundle)?;
    allocator.save(deps.storage)?;
    CUSTOM_BUNDLE_TOKENS.save(deps.storage, &staged)?;
    if staged.len() < content_count {
        config.custom_bundle_completed = true;
        CONFIG.save(deps.storage, &config)?;
    }
    msgs.append(&mut escrow::disburse_or_escrow(deps.storage, &config, payment)?);

    Ok(Response::new()
        .add_attribute("action", "mint_custom_bundle")
        .add_attribute("sender", info.sender)
        .add_attribute("token_count", bundle.len().to_string())
        .add_attribute("custom_bundle_completed", config.custom_bundle_completed.to_string())
        .add_attribute("mint_price", payment)
        .add_messages(msgs))
}

/// Minting for someone else is reserved to the admin and maintainer. The
/// recipient's ledger entries are the ones charged.
fn resolve_recipient(
    deps: Deps,
    config: &Config,
    sender: &Addr,
    minter_address: Option<String>,
) -> Result<Addr, ContractError> {
    match maybe_addr(deps.api, minter_address)? {
        Some(recipient) if recipient != *sender => {
            if !config.can_administer(sender) {
                return Err(ContractError::Unauthorized(
                    "Only an admin or maintainer can mint for another address".to_owned(),
                ));
            }
            Ok(recipient)
        }
        _ => Ok(sender.clone()),
    }
}

// Exact payment only accepted
fn check_payment(
    info: &MessageInfo,
    config: &Config,
    price: Uint128,
) -> Result<Uint128, ContractError> {
    let payment = may_pay(info, &config.mint_denom)?;
    if payment != price {
        return Err(ContractError::IncorrectPaymentAmount(
            coin(payment.u128(), &config.mint_denom),
            config.price(price),
        ));
    }
    Ok(payment)
}

fn mint_msg(
    deps: Deps,
    owner: &Addr,
    token: &TokenRef,
) -> Result<CosmosMsg<StargazeMsgWrapper>, ContractError> {
    let collection = CW721_COLLECTION_INFO.load(deps.storage, token.collection_id)?;
    let cw721_address = CW721_ADDRS
        .may_load(deps.storage, token.collection_id)?
        .ok_or_else(|| ContractError::InstantiateError {
            contract: format!("cw721 collection {}", token.collection_id),
        })?;

    let mint_msg = Cw721ExecuteMsg::Mint(MintMsg::<Empty> {
        token_id: token.token_id.to_string(),
        owner: owner.to_string(),
        token_uri: Some(format!("{}/{}", collection.base_token_uri, token.token_id)),
        extension: Empty {},
    });
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: cw721_address.to_string(),
        msg: to_binary(&mint_msg)?,
        funds: vec![],
    }))
}

fn collaborators(config: &Config) -> Vec<Box<dyn Collaborator>> {
    let mut modules: Vec<Box<dyn Collaborator>> = vec![];
    if let Some(addr) = &config.airdropper_addr {
        modules.push(Box::new(AirdropperModule::new(addr.clone())));
    }
    if let Some(addr) = &config.whitelist_addr {
        modules.push(Box::new(WhitelistModule::new(addr.clone())));
    }
    modules
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::GetConfig {} => to_binary(&query::query_config(deps)?),
        QueryMsg::CheckAddressMints { minter_address } => {
            to_binary(&query::query_check_address_mints(deps, minter_address)?)
        }
        QueryMsg::GetAddressMints { start_after, limit } => to_binary(
            &query::query_channel_mints(deps, MintChannel::Public, start_after, limit)?,
        ),
        QueryMsg::GetEscrowBalances { start_after, limit } => {
            to_binary(&query::query_escrow_balances(deps, start_after, limit)?)
        }
        QueryMsg::GetCw721CollectionInfo { start_after, limit } => {
            to_binary(&query::query_cw721_collection_info(deps, start_after, limit)?)
        }
        QueryMsg::GetBundleMintTracker { start_after, limit } => to_binary(
            &query::query_channel_mints(deps, MintChannel::Bundle, start_after, limit)?,
        ),
        QueryMsg::GetCustomBundleMintTracker { start_after, limit } => to_binary(
            &query::query_channel_mints(deps, MintChannel::CustomBundle, start_after, limit)?,
        ),
        QueryMsg::GetCollectionCurrentTokenSupply { start_after, limit } => to_binary(
            &query::query_collection_current_token_supply(deps, start_after, limit)?,
        ),
        QueryMsg::GetRemainingTokens { address } => {
            to_binary(&query::query_remaining_tokens(deps, address)?)
        }
        QueryMsg::GetCw721Addrs {} => to_binary(&query::query_cw721_addrs(deps)?),
        QueryMsg::GetShuffleState {} => to_binary(&query::query_shuffle_state(deps)?),
        QueryMsg::GetCustomBundle {} => to_binary(&query::query_custom_bundle(deps)?),
    }
}

// Reply callback triggered from sub-module and cw721 contract instantiation
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    let contract = match msg.id {
        INSTANTIATE_AIRDROPPER_REPLY_ID => "airdropper".to_string(),
        INSTANTIATE_WHITELIST_REPLY_ID => "whitelist".to_string(),
        id => {
            if CW721_COLLECTION_INFO.may_load(deps.storage, id)?.is_none() {
                return Err(ContractError::InvalidReplyID {});
            }
            format!("cw721 collection {}", id)
        }
    };

    let id = msg.id;
    let res = parse_reply_instantiate_data(msg).map_err(|_| ContractError::InstantiateError {
        contract: contract.clone(),
    })?;
    let addr = deps.api.addr_validate(&res.contract_address)?;

    match id {
        INSTANTIATE_AIRDROPPER_REPLY_ID => {
            CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
                config.airdropper_addr = Some(addr.clone());
                Ok(config)
            })?;
        }
        INSTANTIATE_WHITELIST_REPLY_ID => {
            CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
                config.whitelist_addr = Some(addr.clone());
                Ok(config)
            })?;
        }
        collection_id => CW721_ADDRS.save(deps.storage, collection_id, &addr)?,
    }

    Ok(Response::default()
        .add_attribute("action", "instantiate_reply")
        .add_attribute("contract", contract)
        .add_attribute("address", addr))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let current_version = cw2::get_contract_version(deps.storage)?;
    if current_version.contract != CONTRACT_NAME {
        return Err(StdError::generic_err("Cannot upgrade to a different contract").into());
    }
    let version: Version = current_version
        .version
        .parse()
        .map_err(|_| StdError::generic_err("Invalid contract version"))?;
    let new_version: Version = CONTRACT_VERSION
        .parse()
        .map_err(|_| StdError::generic_err("Invalid contract version"))?;

    if version > new_version {
        return Err(StdError::generic_err("Cannot upgrade to a previous contract version").into());
    }
    // if same version return
    if version == new_version {
        return Ok(Response::new());
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", current_version.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
