//! RPC request handlers and their wire types.

use axum::extract::{Path, State};
use axum::Json;
use disperse_asset::{CallContext, FungibleAsset, Host, NativeAsset};
use disperse_engine::{AllocationMode, BatchRequest, CommitReceipt, Commitment, DisperseReceipt};
use disperse_store::{CommitRecord, CommitStore};
use disperse_types::{parse_amount, Address, AssetKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::RpcError;
use crate::server::AppState;

fn address(field: &str, raw: &str) -> Result<Address, RpcError> {
    raw.parse::<Address>()
        .map_err(|e| RpcError::InvalidRequest(format!("{field}: {e}")))
}

fn amount(field: &str, raw: &str) -> Result<u128, RpcError> {
    parse_amount(raw).map_err(|e| RpcError::InvalidRequest(format!("{field}: {e}")))
}

fn optional_amount(field: &str, raw: Option<&str>) -> Result<u128, RpcError> {
    raw.map_or(Ok(0), |s| amount(field, s))
}

fn batch(recipients: &[String], amounts: &[String], is_percentage: bool) -> Result<BatchRequest, RpcError> {
    let recipients = recipients
        .iter()
        .enumerate()
        .map(|(i, r)| address(&format!("recipients[{i}]"), r))
        .collect::<Result<Vec<_>, _>>()?;
    let amounts = amounts
        .iter()
        .enumerate()
        .map(|(i, a)| amount(&format!("amounts[{i}]"), a))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BatchRequest::new(recipients, amounts, is_percentage))
}

// ── Health ───────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub contract: String,
    pub committed_accounts: u64,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, RpcError> {
    let ledger = state.ledger.lock().await;
    let committed_accounts = ledger
        .contract
        .escrow()
        .store()
        .account_count()
        .map_err(|e| RpcError::Server(e.to_string()))?;
    Ok(Json(HealthResponse {
        status: "ok".into(),
        contract: ledger.contract.address().to_string(),
        committed_accounts,
    }))
}

// ── Dispersal ────────────────────────────────────────────────────────────

// Field aliases accept the original API's payloads (`values`, `is_percentages`,
// `token_address`, `token_type`).

#[derive(Deserialize)]
pub struct DisperseNativeRequest {
    pub caller: String,
    /// Native value attached to the call. Defaults to the sum of `amounts`.
    pub value: Option<String>,
    pub recipients: Vec<String>,
    #[serde(alias = "values")]
    pub amounts: Vec<String>,
    #[serde(default, alias = "is_percentages")]
    pub is_percentage: bool,
}

#[derive(Deserialize)]
pub struct DisperseFungibleRequest {
    pub caller: String,
    #[serde(alias = "token_address")]
    pub asset: String,
    pub recipients: Vec<String>,
    #[serde(alias = "values")]
    pub amounts: Vec<String>,
    #[serde(default, alias = "is_percentages")]
    pub is_percentage: bool,
    /// Must be absent or zero; present so clients can reproduce the rejection.
    pub value: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct PayoutResponse {
    pub recipient: String,
    pub amount: String,
}

#[derive(Serialize, Deserialize)]
pub struct DisperseResponse {
    pub kind: AssetKind,
    pub asset: Option<String>,
    pub mode: AllocationMode,
    pub total: String,
    pub distributed: String,
    pub dust: String,
    pub payouts: Vec<PayoutResponse>,
}

impl From<DisperseReceipt> for DisperseResponse {
    fn from(r: DisperseReceipt) -> Self {
        Self {
            kind: r.kind,
            asset: r.asset.map(|a| a.to_string()),
            mode: r.mode,
            total: r.total.to_string(),
            distributed: r.distributed.to_string(),
            dust: r.dust.to_string(),
            payouts: r
                .payouts
                .into_iter()
                .map(|p| PayoutResponse {
                    recipient: p.recipient.to_string(),
                    amount: p.amount.to_string(),
                })
                .collect(),
        }
    }
}

pub async fn disperse_native(
    State(state): State<AppState>,
    Json(req): Json<DisperseNativeRequest>,
) -> Result<Json<DisperseResponse>, RpcError> {
    let batch = batch(&req.recipients, &req.amounts, req.is_percentage)?;
    let value = match req.value.as_deref() {
        Some(raw) => amount("value", raw)?,
        None => batch
            .amounts_sum()
            .ok_or_else(|| RpcError::InvalidRequest("value: sum of amounts overflows".into()))?,
    };
    let ctx = CallContext::with_value(address("caller", &req.caller)?, value);

    let mut guard = state.ledger.lock().await;
    let ledger = &mut *guard;
    let receipt = ledger.contract.disperse_native(&mut ledger.host, &ctx, &batch)?;
    ledger.persist()?;
    Ok(Json(receipt.into()))
}

pub async fn disperse_fungible(
    State(state): State<AppState>,
    Json(req): Json<DisperseFungibleRequest>,
) -> Result<Json<DisperseResponse>, RpcError> {
    let ctx = CallContext::with_value(
        address("caller", &req.caller)?,
        optional_amount("value", req.value.as_deref())?,
    );
    let asset = address("asset", &req.asset)?;
    let batch = batch(&req.recipients, &req.amounts, req.is_percentage)?;

    let mut guard = state.ledger.lock().await;
    let ledger = &mut *guard;
    let receipt = ledger.contract.disperse_fungible(&mut ledger.host, &ctx, &asset, &batch)?;
    ledger.persist()?;
    Ok(Json(receipt.into()))
}

// ── Escrow ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CommitRequest {
    pub caller: String,
    /// `"native"` or `"fungible"` (`"eth"`/`"erc20"` and `0`/`1` also accepted).
    #[serde(alias = "token_type")]
    pub kind: String,
    /// Token contract; ignored for native commits.
    #[serde(alias = "token_address")]
    pub asset: Option<String>,
    /// Token amount. For native commits it stands in for a missing `value`.
    pub amount: Option<String>,
    /// Attached native value.
    pub value: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct CommitResponse {
    pub account: String,
    pub kind: AssetKind,
    pub asset: Option<String>,
    pub amount: String,
    pub new_total: String,
}

impl From<CommitReceipt> for CommitResponse {
    fn from(r: CommitReceipt) -> Self {
        Self {
            account: r.account.to_string(),
            kind: r.kind,
            asset: r.asset.map(|a| a.to_string()),
            amount: r.amount.to_string(),
            new_total: r.new_total.to_string(),
        }
    }
}

pub async fn commit(
    State(state): State<AppState>,
    Json(req): Json<CommitRequest>,
) -> Result<Json<CommitResponse>, RpcError> {
    let kind = req
        .kind
        .parse::<AssetKind>()
        .map_err(|e| RpcError::InvalidRequest(format!("kind: {e}")))?;
    let asset = match req.asset.as_deref() {
        Some(raw) => address("asset", raw)?,
        None => Address::ZERO,
    };
    let token_amount = optional_amount("amount", req.amount.as_deref())?;
    let commitment = Commitment::from_parts(kind, asset, token_amount);
    let value = match (kind, req.value.as_deref()) {
        (AssetKind::Native, None) => token_amount,
        (_, raw) => optional_amount("value", raw)?,
    };
    let ctx = CallContext::with_value(address("caller", &req.caller)?, value);

    let mut guard = state.ledger.lock().await;
    let ledger = &mut *guard;
    let receipt = ledger.contract.commit(&mut ledger.host, &ctx, commitment)?;
    ledger.persist()?;
    Ok(Json(receipt.into()))
}

#[derive(Serialize, Deserialize)]
pub struct AmountResponse {
    pub account: String,
    pub asset: Option<String>,
    pub amount: String,
}

pub async fn native_commitment(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Result<Json<AmountResponse>, RpcError> {
    let account = address("account", &account)?;
    let ledger = state.ledger.lock().await;
    Ok(Json(AmountResponse {
        account: account.to_string(),
        asset: None,
        amount: ledger.contract.get_native_amount(&account).to_string(),
    }))
}

pub async fn token_commitment(
    State(state): State<AppState>,
    Path((account, asset)): Path<(String, String)>,
) -> Result<Json<AmountResponse>, RpcError> {
    let account = address("account", &account)?;
    let asset = address("asset", &asset)?;
    let ledger = state.ledger.lock().await;
    Ok(Json(AmountResponse {
        account: account.to_string(),
        asset: Some(asset.to_string()),
        amount: ledger.contract.get_token_amount(&account, &asset).to_string(),
    }))
}

#[derive(Serialize, Deserialize)]
pub struct CommitRecordResponse {
    pub account: String,
    pub native: String,
    pub tokens: BTreeMap<String, String>,
}

impl From<CommitRecord> for CommitRecordResponse {
    fn from(r: CommitRecord) -> Self {
        Self {
            account: r.account.to_string(),
            native: r.native_committed.to_string(),
            tokens: r
                .token_committed
                .into_iter()
                .map(|(asset, total)| (asset.to_string(), total.to_string()))
                .collect(),
        }
    }
}

pub async fn commit_record(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Result<Json<CommitRecordResponse>, RpcError> {
    let account = address("account", &account)?;
    let ledger = state.ledger.lock().await;
    Ok(Json(ledger.contract.get_commit_record(&account)?.into()))
}

// ── Development ledger ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ApproveRequest {
    pub owner: String,
    pub asset: String,
    pub amount: String,
}

#[derive(Serialize, Deserialize)]
pub struct ApproveResponse {
    pub owner: String,
    pub spender: String,
    pub asset: String,
    pub allowance: String,
}

/// Grant the contract an allowance on a token, as the owner would on-chain.
pub async fn approve(
    State(state): State<AppState>,
    Json(req): Json<ApproveRequest>,
) -> Result<Json<ApproveResponse>, RpcError> {
    let owner = address("owner", &req.owner)?;
    let asset = address("asset", &req.asset)?;
    let value = amount("amount", &req.amount)?;

    let mut guard = state.ledger.lock().await;
    let ledger = &mut *guard;
    let spender = *ledger.contract.address();
    let token = ledger.host.fungible_mut(&asset).ok_or(RpcError::UnknownAsset(asset))?;
    if !token.approve(&owner, &spender, value)? {
        return Err(RpcError::InvalidRequest("token refused the approval".into()));
    }
    let allowance = token.allowance(&owner, &spender);
    ledger.persist()?;
    Ok(Json(ApproveResponse {
        owner: owner.to_string(),
        spender: spender.to_string(),
        asset: asset.to_string(),
        allowance: allowance.to_string(),
    }))
}

pub async fn native_balance(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Result<Json<AmountResponse>, RpcError> {
    let account = address("account", &account)?;
    let ledger = state.ledger.lock().await;
    Ok(Json(AmountResponse {
        account: account.to_string(),
        asset: None,
        amount: ledger.host.native().balance_of(&account).to_string(),
    }))
}

pub async fn token_balance(
    State(state): State<AppState>,
    Path((account, asset)): Path<(String, String)>,
) -> Result<Json<AmountResponse>, RpcError> {
    let account = address("account", &account)?;
    let asset = address("asset", &asset)?;
    let ledger = state.ledger.lock().await;
    let token = ledger.host.fungible(&asset).ok_or(RpcError::UnknownAsset(asset))?;
    Ok(Json(AmountResponse {
        account: account.to_string(),
        asset: Some(asset.to_string()),
        amount: token.balance_of(&account).to_string(),
    }))
}
