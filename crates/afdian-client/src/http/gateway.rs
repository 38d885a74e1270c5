/*
[INPUT]:  Endpoint name and parameter map
[OUTPUT]: Decoded response envelope or a classified failure
[POS]:    HTTP layer - signed envelope construction and response decoding
[UPDATE]: When the envelope layout or response codes change
*/

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::http::transport::{HttpStatus, TransportRequest, TransportResponse};
use crate::http::{AfdianClient, AfdianError, Result};
use crate::types::{ApiResponse, SignedEnvelope};

/// `ec` value the API uses for success
pub const EC_SUCCESS: i64 = 200;

impl AfdianClient {
    /// Call an open API endpoint, signed with the current time
    ///
    /// POST {api_root}/{endpoint}
    pub async fn call<P>(&self, endpoint: &str, params: &P) -> Result<ApiResponse>
    where
        P: Serialize + ?Sized,
    {
        let ts = Utc::now().timestamp();
        self.call_at(endpoint, params, ts).await
    }

    /// Call an endpoint with an explicit timestamp.
    ///
    /// The params are serialized once; that exact text is both signed and
    /// sent, and `ts` is used for both the signature and the envelope.
    pub async fn call_at<P>(&self, endpoint: &str, params: &P, ts: i64) -> Result<ApiResponse>
    where
        P: Serialize + ?Sized,
    {
        if endpoint.trim().is_empty() {
            return Err(AfdianError::EmptyEndpoint);
        }

        let params = serde_json::to_string(params)?;
        let envelope = SignedEnvelope {
            user_id: self.signer().user_id().to_string(),
            sign: self.signer().sign_request(&params, ts),
            params,
            ts,
        };
        let body = serde_json::to_string(&envelope)?;
        let url = self.endpoint_url(endpoint)?;

        tracing::debug!(endpoint, ts, "sending signed request");
        let request = TransportRequest::new(url.as_str(), body)
            .header("Content-Type", "application/json");
        let response = self.transport().send(request).await;

        decode_envelope(endpoint, response)
    }
}

fn decode_envelope(endpoint: &str, response: TransportResponse) -> Result<ApiResponse> {
    match response.status {
        HttpStatus::Code(200) => {}
        HttpStatus::Code(status) => {
            tracing::debug!(endpoint, status, "non-200 status");
            return Err(AfdianError::HttpStatus {
                status,
                body: response.body,
            });
        }
        HttpStatus::Error(message) => {
            tracing::debug!(endpoint, error = %message, "transport error");
            return Err(AfdianError::Transport(message));
        }
    }

    let mut object = match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Object(object)) => object,
        _ => {
            return Err(AfdianError::UnparseableBody {
                body: response.body,
            });
        }
    };

    let code = object.get("ec").and_then(parse_code);
    let message = object.get("em").and_then(Value::as_str).map(str::to_string);

    if code == Some(EC_SUCCESS) {
        Ok(ApiResponse {
            ec: EC_SUCCESS,
            em: message,
            data: object.remove("data").unwrap_or(Value::Null),
        })
    } else {
        tracing::debug!(endpoint, ?code, ?message, "api returned error");
        Err(AfdianError::Api { code, message })
    }
}

/// The API sends `ec` as a number; a numeric string is accepted too
fn parse_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}
