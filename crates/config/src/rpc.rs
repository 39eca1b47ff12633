//! JSON-RPC plumbing for the factory status checks.
//!
//! Transport failures are reported through `anyhow`, while error objects
//! returned by the node surface as [`ConfigError::Rpc`] so callers can match on
//! the code.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use url::Url;

use crate::ConfigError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a [Value],
}

#[derive(Debug, Deserialize)]
struct Response<T> {
    result: Option<T>,
    error: Option<ErrorObject>,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

/// HTTP client used for every node request.
pub fn create_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")
}

/// Send `method` to the node at `url` and decode its result as `T`.
pub async fn json_rpc_call<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &Url,
    method: &str,
    params: Vec<Value>,
) -> anyhow::Result<T> {
    let request = Request {
        jsonrpc: "2.0",
        id: 1,
        method,
        params: &params,
    };

    tracing::trace!(method, %url, "Sending JSON-RPC request");

    let body: Value = client
        .post(url.clone())
        .json(&request)
        .send()
        .await
        .with_context(|| format!("Failed to send {method} request to {url}"))?
        .json()
        .await
        .with_context(|| format!("Failed to read {method} response"))?;

    Ok(decode_response(method, body)?)
}

fn decode_response<T: DeserializeOwned>(method: &str, body: Value) -> Result<T, ConfigError> {
    let response: Response<T> = serde_json::from_value(body)?;

    if let Some(error) = response.error {
        return Err(ConfigError::Rpc {
            method: method.to_string(),
            code: error.code,
            message: error.message,
        });
    }

    response.result.ok_or_else(|| ConfigError::EmptyRpcResponse {
        method: method.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_core::primitives::U64;

    #[test]
    fn test_decode_result() {
        let chain_id: U64 =
            decode_response("eth_chainId", serde_json::json!({ "id": 1, "result": "0x2ced" })).unwrap();
        assert_eq!(chain_id.to::<u64>(), 11501);
    }

    #[test]
    fn test_node_error_keeps_code() {
        let err = decode_response::<U64>(
            "eth_sendRawTransaction",
            serde_json::json!({ "id": 1, "error": { "code": -32000, "message": "nonce too low" } }),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Rpc { ref method, code: -32000, ref message }
                if method == "eth_sendRawTransaction" && message == "nonce too low"
        ));
        assert_eq!(
            err.to_string(),
            "eth_sendRawTransaction failed with RPC error -32000: nonce too low"
        );
    }

    #[test]
    fn test_missing_result() {
        let err = decode_response::<U64>("eth_chainId", serde_json::json!({ "id": 1 })).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyRpcResponse { ref method } if method == "eth_chainId"));
    }

    #[test]
    fn test_malformed_result() {
        let err =
            decode_response::<U64>("eth_chainId", serde_json::json!({ "id": 1, "result": [1] })).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_request_shape() {
        let params = [serde_json::json!("latest")];
        let request = Request {
            jsonrpc: "2.0",
            id: 1,
            method: "eth_getCode",
            params: &params,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "jsonrpc": "2.0", "id": 1, "method": "eth_getCode", "params": ["latest"] })
        );
    }
}
