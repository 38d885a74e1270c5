/*
[INPUT]:  API token, user id, serialized params and a timestamp
[OUTPUT]: Request signature (lowercase hex MD5)
[POS]:    HTTP layer - request signing for every open API call
[UPDATE]: When changing signing algorithm or message layout
*/

use md5::{Digest, Md5};

use crate::http::client::Credentials;

/// Compute the signature for one request.
///
/// Format: "{token}params{params}ts{ts}user_id{user_id}"
/// Returns the MD5 digest as 32 lowercase hex characters.
pub fn sign(token: &str, user_id: &str, params: &str, ts: i64) -> String {
    let message = format!("{token}params{params}ts{ts}user_id{user_id}");
    digest_hex(message.as_bytes())
}

fn digest_hex(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}

/// Signs request parameters with the client's credentials
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    /// Create a new request signer for the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn user_id(&self) -> &str {
        &self.credentials.user_id
    }

    /// Sign serialized params for the given timestamp
    pub fn sign_request(&self, params: &str, ts: i64) -> String {
        sign(
            &self.credentials.token,
            &self.credentials.user_id,
            params,
            ts,
        )
    }
}
