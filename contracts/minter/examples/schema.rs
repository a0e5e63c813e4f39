use std::env::current_dir;
use std::fs::create_dir_all;

use cosmwasm_schema::{export_schema, export_schema_with_title, remove_schemas, schema_for};

use nft_minter::config::Config;
use nft_minter::msg::{
    AddressBalance, AddressMintsResponse, AddressValMsg, CollectionSupplyResponse,
    ConfigResponse, Cw721AddrResponse, CustomBundleResponse, ExecuteMsg,
    GetRemainingTokensResponse, InstantiateMsg, QueryMsg, ShuffleStateResponse,
};
use nft_minter::state::CollectionInfo;

fn main() {
    let mut out_dir = current_dir().unwrap();
    out_dir.push("schema");
    create_dir_all(&out_dir).unwrap();
    remove_schemas(&out_dir).unwrap();

    export_schema(&schema_for!(InstantiateMsg), &out_dir);
    export_schema(&schema_for!(ExecuteMsg), &out_dir);
    export_schema(&schema_for!(QueryMsg), &out_dir);
    export_schema(&schema_for!(Config), &out_dir);
    export_schema_with_title(&schema_for!(ConfigResponse), &out_dir, "GetConfigResponse");
    export_schema_with_title(
        &schema_for!(AddressMintsResponse),
        &out_dir,
        "CheckAddressMintsResponse",
    );
    export_schema_with_title(
        &schema_for!(Vec<AddressValMsg>),
        &out_dir,
        "GetAddressMintsResponse",
    );
    export_schema_with_title(
        &schema_for!(Vec<AddressBalance>),
        &out_dir,
        "GetEscrowBalancesResponse",
    );
    export_schema_with_title(
        &schema_for!(Vec<CollectionInfo>),
        &out_dir,
        "GetCw721CollectionInfoResponse",
    );
    export_schema_with_title(
        &schema_for!(Vec<CollectionSupplyResponse>),
        &out_dir,
        "GetCollectionCurrentTokenSupplyResponse",
    );
    export_schema(&schema_for!(GetRemainingTokensResponse), &out_dir);
    export_schema_with_title(
        &schema_for!(Vec<Cw721AddrResponse>),
        &out_dir,
        "GetCw721AddrsResponse",
    );
    export_schema(&schema_for!(ShuffleStateResponse), &out_dir);
    export_schema(&schema_for!(CustomBundleResponse), &out_dir);
}
