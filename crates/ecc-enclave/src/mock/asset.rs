//! Sample asset-transfer chaincode.
//!
//! Balances are unsigned integers stored as decimal strings under the
//! composite key `balance/<account>`.
//!
//! | function   | parameters            |
//! |------------|-----------------------|
//! | `put`      | account, amount       |
//! | `get`      | account               |
//! | `del`      | account               |
//! | `transfer` | from, to, amount      |

use crate::chaincode::{write_output, Chaincode, InvokeOutcome};
use crate::context::{create_composite_key, InvocationContext};
use ecc_types::CHAINCODE_STATUS_OK;
use serde::Serialize;
use tracing::debug;

pub const ASSET_STATUS_BAD_REQUEST: i32 = 1;
pub const ASSET_STATUS_OUTPUT_TOO_SMALL: i32 = 2;
pub const ASSET_STATUS_NOT_FOUND: i32 = 3;
pub const ASSET_STATUS_INSUFFICIENT_FUNDS: i32 = 4;

const BALANCE_OBJECT_TYPE: &str = "balance";

#[derive(Debug, Serialize)]
struct AssetResponse<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    account: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    balance: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<'a> AssetResponse<'a> {
    fn ok() -> Self {
        Self {
            status: "ok",
            account: None,
            balance: None,
            message: None,
        }
    }

    fn balance(account: &'a str, balance: u64) -> Self {
        Self {
            account: Some(account),
            balance: Some(balance),
            ..Self::ok()
        }
    }
}

struct AssetFailure {
    status: i32,
    message: String,
}

impl AssetFailure {
    fn new(status: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

type AssetResult<T> = Result<T, AssetFailure>;

#[derive(Debug, Default, Clone, Copy)]
pub struct AssetChaincode;

impl AssetChaincode {
    pub fn new() -> Self {
        Self
    }

    /// Ledger key holding the balance of `account`.
    pub fn balance_key(account: &str) -> String {
        create_composite_key(BALANCE_OBJECT_TYPE, &[account])
    }

    fn dispatch(&self, ctx: &mut InvocationContext<'_>) -> AssetResult<Vec<u8>> {
        let function = ctx.function().to_string();
        let params = ctx.parameters().to_vec();
        match (function.as_str(), params.as_slice()) {
            ("put", [account, amount]) => {
                let amount = parse_amount(amount)?;
                ctx.put_state(&Self::balance_key(account), amount.to_string().as_bytes());
                to_json(&AssetResponse::balance(account, amount))
            }
            ("get", [account]) => {
                let balance = read_balance(ctx, account)?;
                to_json(&AssetResponse::balance(account, balance))
            }
            ("del", [account]) => {
                read_balance(ctx, account)?;
                ctx.del_state(&Self::balance_key(account));
                to_json(&AssetResponse::ok())
            }
            ("transfer", [from, to, _]) if from == to => Err(AssetFailure::new(
                ASSET_STATUS_BAD_REQUEST,
                format!("cannot transfer from {from} to itself"),
            )),
            ("transfer", [from, to, amount]) => {
                let amount = parse_amount(amount)?;
                let from_balance = read_balance(ctx, from)?;
                let to_balance = read_balance(ctx, to)?;
                let remaining = from_balance.checked_sub(amount).ok_or_else(|| {
                    AssetFailure::new(
                        ASSET_STATUS_INSUFFICIENT_FUNDS,
                        format!("{from} holds {from_balance}, cannot send {amount}"),
                    )
                })?;
                let credited = to_balance.checked_add(amount).ok_or_else(|| {
                    AssetFailure::new(ASSET_STATUS_BAD_REQUEST, "balance overflow")
                })?;

                ctx.put_state(&Self::balance_key(from), remaining.to_string().as_bytes());
                ctx.put_state(&Self::balance_key(to), credited.to_string().as_bytes());
                to_json(&AssetResponse::balance(from, remaining))
            }
            (name, _) => Err(AssetFailure::new(
                ASSET_STATUS_BAD_REQUEST,
                format!("unknown function or wrong arity: {name}"),
            )),
        }
    }
}

impl Chaincode for AssetChaincode {
    fn invoke(&self, output: &mut [u8], ctx: &mut InvocationContext<'_>) -> InvokeOutcome {
        let (status, body) = match self.dispatch(ctx) {
            Ok(body) => (CHAINCODE_STATUS_OK, body),
            Err(failure) => {
                debug!(status = failure.status, message = %failure.message, "Asset call failed");
                let body = to_json(&AssetResponse {
                    status: "error",
                    message: Some(failure.message),
                    ..AssetResponse::ok()
                })
                .unwrap_or_default();
                (failure.status, body)
            }
        };

        match write_output(output, &body) {
            Some(bytes_written) => InvokeOutcome {
                bytes_written,
                status,
            },
            None => InvokeOutcome::failed(ASSET_STATUS_OUTPUT_TOO_SMALL, 0),
        }
    }
}

fn parse_amount(raw: &str) -> AssetResult<u64> {
    raw.parse()
        .map_err(|_| AssetFailure::new(ASSET_STATUS_BAD_REQUEST, format!("invalid amount: {raw}")))
}

fn read_balance(ctx: &mut InvocationContext<'_>, account: &str) -> AssetResult<u64> {
    let raw = ctx
        .get_state(&AssetChaincode::balance_key(account))
        .ok_or_else(|| AssetFailure::new(ASSET_STATUS_NOT_FOUND, format!("no account {account}")))?;
    std::str::from_utf8(&raw)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| AssetFailure::new(ASSET_STATUS_BAD_REQUEST, format!("corrupt balance for {account}")))
}

fn to_json<T: Serialize>(value: &T) -> AssetResult<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| AssetFailure::new(ASSET_STATUS_BAD_REQUEST, e.to_string()))
}
