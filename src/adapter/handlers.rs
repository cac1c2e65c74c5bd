//! REST endpoints translated to daemon RPC calls.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::adapter::rpc::{RpcClient, RpcError};

/// Errors surfaced by the adapter endpoints.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("unexpected `{method}` result: {reason}")]
    UnexpectedResult { method: &'static str, reason: String },
}

impl IntoResponse for AdapterError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Wallet adapter RPC failure");
        let body = json!({
            "error": "rpc_error",
            "message": self.to_string(),
        });
        (StatusCode::BAD_GATEWAY, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HeightResponse {
    pub height: u64,
    pub network_height: u64,
    pub status: &'static str,
}

impl HeightResponse {
    /// Heights are zero-based, block counts are not.
    pub fn from_count(count: u64) -> Self {
        let height = count.saturating_sub(1);
        Self {
            height,
            network_height: height,
            status: "OK",
        }
    }
}

pub async fn get_last_block_header(
    State(rpc): State<RpcClient>,
) -> Result<Json<Value>, AdapterError> {
    Ok(Json(rpc.call("getlastblockheader", json!({})).await?))
}

pub async fn get_height(State(rpc): State<RpcClient>) -> Result<Json<HeightResponse>, AdapterError> {
    let result = rpc.call("getblockcount", json!({})).await?;
    let count = result
        .get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| AdapterError::UnexpectedResult {
            method: "getblockcount",
            reason: format!("missing numeric `count` in {}", result),
        })?;
    Ok(Json(HeightResponse::from_count(count)))
}

pub async fn get_info(State(rpc): State<RpcClient>) -> Result<Json<Value>, AdapterError> {
    Ok(Json(rpc.call("getinfo", json!({})).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_from_count() {
        assert_eq!(
            HeightResponse::from_count(1200),
            HeightResponse { height: 1199, network_height: 1199, status: "OK" }
        );
        assert_eq!(HeightResponse::from_count(0).height, 0);
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let err = AdapterError::UnexpectedResult {
            method: "getblockcount",
            reason: "missing numeric `count`".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "rpc_error");
        assert!(body["message"].as_str().unwrap().contains("getblockcount"));
    }
}
