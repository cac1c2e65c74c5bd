//! Wallet adapter: fixed REST endpoints backed by daemon JSON-RPC calls.
//!
//! | REST                      | RPC method           |
//! |---------------------------|----------------------|
//! | `GET /getlastblockheader` | `getlastblockheader` |
//! | `GET /height`             | `getblockcount`      |
//! | `GET /info`               | `getinfo`            |

pub mod handlers;
pub mod rpc;

use axum::{body::Body, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::observability::tracing::make_request_span;
use self::handlers::{get_height, get_info, get_last_block_header};
pub use self::rpc::{RpcClient, RpcError};

pub fn setup_adapter_router(rpc: RpcClient) -> Router {
    Router::new()
        .route("/getlastblockheader", get(get_last_block_header))
        .route("/height", get(get_height))
        .route("/info", get(get_info))
        .with_state(rpc)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
}
