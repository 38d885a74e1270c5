/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Afdian client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod cache;
pub mod http;
pub mod lookup;
pub mod pagination;
pub mod types;

// Re-export commonly used types from http
pub use http::{
    AfdianClient,
    AfdianError,
    ClientConfig,
    Credentials,
    DEFAULT_API_ROOT,
    HttpStatus,
    ReqwestTransport,
    RequestSigner,
    Result,
    ScriptedTransport,
    Transport,
    TransportRequest,
    TransportResponse,
    sign,
};

// Re-export commonly used types from cache
pub use cache::{CacheBackend, FileCache, KeyValueStore, MemoryStore, RedisCache, StoredValue};

pub use lookup::{
    find_order_by_id,
    find_orders_by_plan_id,
    find_orders_by_user_id,
    find_sponsor_by_name,
    find_sponsor_by_user_id,
};

pub use pagination::fetch_all;

// Re-export all types
pub use types::*;
