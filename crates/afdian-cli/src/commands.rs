/*
[INPUT]:  Parsed subcommand, client, cache configuration
[OUTPUT]: JSON value describing the result
[POS]:    Command layer - maps subcommands onto client operations
[UPDATE]: When adding subcommands
*/

use afdian_client::{
    AfdianClient, Aggregate, Order, Sponsor, find_order_by_id, find_orders_by_plan_id,
    find_orders_by_user_id, find_sponsor_by_name, find_sponsor_by_user_id,
};
use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::{Value, json};

use crate::config::CacheConfig;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check credentials against the server
    Ping,
    /// List every order
    Orders,
    /// List every sponsor
    Sponsors,
    /// Show one order by trade number
    Order { id: String },
    /// List orders placed by a user
    OrdersByUser { user_id: String },
    /// List orders for a plan
    OrdersByPlan { plan_id: String },
    /// Show the sponsor with a user id
    SponsorByUser { user_id: String },
    /// Show the sponsor with a display name
    SponsorByName { name: String },
}

pub async fn execute(client: &AfdianClient, cache: &CacheConfig, command: &Command) -> Result<Value> {
    let value = match command {
        Command::Ping => json!({ "ok": client.ping_server().await }),
        Command::Orders => serde_json::to_value(orders(client, cache).await?)?,
        Command::Sponsors => serde_json::to_value(sponsors(client, cache).await?)?,
        Command::Order { id } => {
            let orders = orders(client, cache).await?;
            serde_json::to_value(find_order_by_id(&orders, id)?)?
        }
        Command::OrdersByUser { user_id } => {
            let orders = orders(client, cache).await?;
            serde_json::to_value(find_orders_by_user_id(&orders, user_id)?)?
        }
        Command::OrdersByPlan { plan_id } => {
            let orders = orders(client, cache).await?;
            serde_json::to_value(find_orders_by_plan_id(&orders, plan_id)?)?
        }
        Command::SponsorByUser { user_id } => {
            let sponsors = sponsors(client, cache).await?;
            serde_json::to_value(find_sponsor_by_user_id(&sponsors, user_id)?)?
        }
        Command::SponsorByName { name } => {
            let sponsors = sponsors(client, cache).await?;
            serde_json::to_value(find_sponsor_by_name(&sponsors, name)?)?
        }
    };
    Ok(value)
}

async fn orders(client: &AfdianClient, cache: &CacheConfig) -> Result<Aggregate<Order>> {
    let orders = client
        .get_all_orders_with_descriptor(cache.ttl_seconds, &cache.orders)
        .await
        .context("load orders")?;
    tracing::info!(count = orders.len(), cache = ?orders.cache, "orders loaded");
    Ok(orders)
}

async fn sponsors(client: &AfdianClient, cache: &CacheConfig) -> Result<Aggregate<Sponsor>> {
    let sponsors = client
        .get_all_sponsors_with_descriptor(cache.ttl_seconds, &cache.sponsors)
        .await
        .context("load sponsors")?;
    tracing::info!(count = sponsors.len(), cache = ?sponsors.cache, "sponsors loaded");
    Ok(sponsors)
}
