/*
[INPUT]:  Page numbers
[OUTPUT]: Order and sponsor pages, ping status
[POS]:    HTTP layer - per-endpoint query methods
[UPDATE]: When adding new endpoints or changing query parameters
*/

use crate::http::{AfdianClient, Result};
use crate::types::{
    ApiResponse, Order, Page, PageParams, PingParams, Record, ResourceKind, Sponsor,
};

impl AfdianClient {
    /// Check that the credentials are accepted and the server is reachable
    ///
    /// POST /api/open/ping
    pub async fn ping_server(&self) -> bool {
        match self.call("ping", &PingParams::default()).await {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(error = %err, "ping failed");
                false
            }
        }
    }

    /// Query one page of orders
    ///
    /// POST /api/open/query-order
    pub async fn get_orders(&self, page: u32) -> Result<ApiResponse> {
        self.query_page(ResourceKind::Orders, page).await
    }

    /// Query one page of sponsors
    ///
    /// POST /api/open/query-sponsor
    pub async fn get_sponsors(&self, page: u32) -> Result<ApiResponse> {
        self.query_page(ResourceKind::Sponsors, page).await
    }

    /// Query one page of orders, decoded
    pub async fn get_orders_page(&self, page: u32) -> Result<Page<Order>> {
        self.get_orders(page).await?.page()
    }

    /// Query one page of sponsors, decoded
    pub async fn get_sponsors_page(&self, page: u32) -> Result<Page<Sponsor>> {
        self.get_sponsors(page).await?.page()
    }

    /// Query one decoded page of whichever resource `T` belongs to
    pub async fn get_page<T: Record>(&self, page: u32) -> Result<Page<T>> {
        self.query_page(T::KIND, page).await?.page()
    }

    async fn query_page(&self, kind: ResourceKind, page: u32) -> Result<ApiResponse> {
        self.call(kind.endpoint(), &PageParams { page }).await
    }
}
