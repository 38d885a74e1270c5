/*
[INPUT]:  Aggregated orders or sponsors and a lookup key
[OUTPUT]: Matching record(s) or a not-found error
[POS]:    Query helpers - in-memory filters, no I/O
[UPDATE]: When adding lookup keys
*/

use crate::http::{AfdianError, Result};
use crate::types::{Aggregate, Order, Sponsor};

fn ensure_input<T>(result: &Aggregate<T>, key: &str, what: &'static str) -> Result<()> {
    if result.is_empty() || key.is_empty() {
        return Err(AfdianError::EmptyInput(what));
    }
    Ok(())
}

/// First order whose trade number is `order_id`
pub fn find_order_by_id<'a>(result: &'a Aggregate<Order>, order_id: &str) -> Result<&'a Order> {
    ensure_input(result, order_id, "result or order id")?;
    result
        .list
        .iter()
        .find(|order| order.out_trade_no == order_id)
        .ok_or(AfdianError::NotFound("Order id"))
}

/// Every order placed by `user_id`, in list order
pub fn find_orders_by_user_id<'a>(
    result: &'a Aggregate<Order>,
    user_id: &str,
) -> Result<Vec<&'a Order>> {
    ensure_input(result, user_id, "result or user id")?;
    Ok(result
        .list
        .iter()
        .filter(|order| order.user_id == user_id)
        .collect())
}

/// Every order for `plan_id`, in list order
pub fn find_orders_by_plan_id<'a>(
    result: &'a Aggregate<Order>,
    plan_id: &str,
) -> Result<Vec<&'a Order>> {
    ensure_input(result, plan_id, "result or plan id")?;
    Ok(result
        .list
        .iter()
        .filter(|order| order.plan_id == plan_id)
        .collect())
}

pub fn find_sponsor_by_user_id<'a>(
    result: &'a Aggregate<Sponsor>,
    user_id: &str,
) -> Result<&'a Sponsor> {
    ensure_input(result, user_id, "result or user id")?;
    result
        .list
        .iter()
        .find(|sponsor| sponsor.user.user_id == user_id)
        .ok_or(AfdianError::NotFound("User id"))
}

pub fn find_sponsor_by_name<'a>(result: &'a Aggregate<Sponsor>, name: &str) -> Result<&'a Sponsor> {
    ensure_input(result, name, "result or user name")?;
    result
        .list
        .iter()
        .find(|sponsor| sponsor.user.name == name)
        .ok_or(AfdianError::NotFound("User name"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CacheState;
    use serde_json::json;

    fn orders() -> Aggregate<Order> {
        let list = serde_json::from_value(json!([
            {"out_trade_no": "t1", "user_id": "alice", "plan_id": "basic"},
            {"out_trade_no": "t2", "user_id": "bob", "plan_id": "pro"},
            {"out_trade_no": "t3", "user_id": "alice", "plan_id": "pro"}
        ]))
        .unwrap();
        Aggregate::new(list, CacheState::None)
    }

    fn sponsors() -> Aggregate<Sponsor> {
        let list = serde_json::from_value(json!([
            {"user": {"user_id": "u1", "name": "Lain"}},
            {"user": {"user_id": "u2", "name": "Iwakura"}},
            {"all_sum_amount": "1.00"}
        ]))
        .unwrap();
        Aggregate::new(list, CacheState::Cached)
    }

    #[test]
    fn test_find_order_by_id() {
        let orders = orders();
        assert_eq!(find_order_by_id(&orders, "t2").unwrap().user_id, "bob");
        assert!(matches!(
            find_order_by_id(&orders, "t9"),
            Err(AfdianError::NotFound(_))
        ));
    }

    #[test]
    fn test_find_orders_by_user_id_keeps_order() {
        let orders = orders();
        let found: Vec<&str> = find_orders_by_user_id(&orders, "alice")
            .unwrap()
            .iter()
            .map(|order| order.out_trade_no.as_str())
            .collect();
        assert_eq!(found, vec!["t1", "t3"]);
        assert!(find_orders_by_user_id(&orders, "carol").unwrap().is_empty());
    }

    #[test]
    fn test_find_orders_by_plan_id() {
        let orders = orders();
        let found: Vec<&str> = find_orders_by_plan_id(&orders, "pro")
            .unwrap()
            .iter()
            .map(|order| order.out_trade_no.as_str())
            .collect();
        assert_eq!(found, vec!["t2", "t3"]);
        assert!(find_orders_by_plan_id(&orders, "gold").unwrap().is_empty());
    }

    #[test]
    fn test_find_sponsor() {
        let sponsors = sponsors();
        assert_eq!(find_sponsor_by_user_id(&sponsors, "u2").unwrap().user.name, "Iwakura");
        assert_eq!(find_sponsor_by_name(&sponsors, "Lain").unwrap().user.user_id, "u1");

        let err = find_sponsor_by_user_id(&sponsors, "u9").unwrap_err();
        assert_eq!(err.to_string(), "User id not found");
        let err = find_sponsor_by_name(&sponsors, "nobody").unwrap_err();
        assert_eq!(err.to_string(), "User name not found");
    }

    #[test]
    fn test_empty_input_checked_first() {
        let orders = orders();
        let empty_orders: Aggregate<Order> = Aggregate::empty();
        let empty_sponsors: Aggregate<Sponsor> = Aggregate::empty();

        assert!(matches!(find_order_by_id(&orders, ""), Err(AfdianError::EmptyInput(_))));
        assert!(matches!(find_order_by_id(&empty_orders, "t1"), Err(AfdianError::EmptyInput(_))));
        assert!(matches!(find_orders_by_user_id(&empty_orders, "alice"), Err(AfdianError::EmptyInput(_))));
        assert!(matches!(find_orders_by_plan_id(&orders, ""), Err(AfdianError::EmptyInput(_))));
        assert!(matches!(find_sponsor_by_user_id(&empty_sponsors, "u1"), Err(AfdianError::EmptyInput(_))));
        assert!(matches!(find_sponsor_by_name(&sponsors(), ""), Err(AfdianError::EmptyInput(_))));
    }
}
