/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: Signed requests and decoded API results
[POS]:    HTTP layer - open API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod gateway;
pub mod mock;
pub mod query;
pub mod signature;
pub mod transport;

pub use error::{AfdianError, Result};
pub use signature::{RequestSigner, sign};

pub use client::{AfdianClient, ClientConfig, Credentials, DEFAULT_API_ROOT};
pub use mock::ScriptedTransport;
pub use transport::{HttpStatus, ReqwestTransport, Transport, TransportRequest, TransportResponse};
