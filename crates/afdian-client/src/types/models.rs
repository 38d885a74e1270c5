/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - order and sponsor records
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::ResourceKind;

/// Key under `extra` holding fields (or a whole record) that did not decode
pub const UNPARSED_KEY: &str = "unparsed";

/// A record type served by one of the paged list endpoints
pub trait Record: Serialize + DeserializeOwned + Default + Send + Sync {
    const KIND: ResourceKind;

    fn extra_mut(&mut self) -> &mut Map<String, Value>;

    /// Decode one record without ever discarding it.
    ///
    /// Fields that fail to decode on their own move under `extra["unparsed"]`;
    /// a record that is not an object is kept there whole.
    fn from_value_lenient(value: Value) -> Self {
        let Value::Object(fields) = value else {
            tracing::warn!(kind = ?Self::KIND, "record is not an object, kept unparsed");
            let mut record = Self::default();
            record.extra_mut().insert(UNPARSED_KEY.to_string(), value);
            return record;
        };

        let err = match serde_json::from_value(Value::Object(fields.clone())) {
            Ok(record) => return record,
            Err(err) => err,
        };

        let (decodable, unparsed): (Map<String, Value>, Map<String, Value>) =
            fields.into_iter().partition(|(key, value)| {
                let mut single = Map::new();
                single.insert(key.clone(), value.clone());
                serde_json::from_value::<Self>(Value::Object(single)).is_ok()
            });
        tracing::warn!(
            kind = ?Self::KIND,
            error = %err,
            unparsed = ?unparsed.keys().collect::<Vec<_>>(),
            "record partially decoded"
        );

        let mut record: Self = serde_json::from_value(Value::Object(decodable)).unwrap_or_default();
        if !unparsed.is_empty() {
            record
                .extra_mut()
                .insert(UNPARSED_KEY.to_string(), Value::Object(unparsed));
        }
        record
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub out_trade_no: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub user_id: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub plan_id: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_int_or_zero")]
    pub month: i64,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub total_amount: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub show_amount: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_int_or_zero")]
    pub status: i64,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub remark: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub redeem_id: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_int_or_zero")]
    pub product_type: i64,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub discount: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_list_lenient")]
    pub sku_detail: Vec<SkuDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_address: Option<String>,
    /// Fields the API sends that are not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Order {
    const KIND: ResourceKind = ResourceKind::Orders;

    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkuDetail {
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub sku_id: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_int_or_zero")]
    pub count: i64,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub album_id: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub pic: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sponsor {
    #[serde(default, deserialize_with = "serde_helpers::deserialize_list_lenient")]
    pub sponsor_plans: Vec<Plan>,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_object_or_none")]
    pub current_plan: Option<Plan>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub all_sum_amount: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_int_or_zero")]
    pub create_time: i64,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_int_or_zero")]
    pub last_pay_time: i64,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_object_or_default")]
    pub user: SponsorUser,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Sponsor {
    const KIND: ResourceKind = ResourceKind::Sponsors;

    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SponsorUser {
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub user_id: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub avatar: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub plan_id: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_lenient")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub price: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_int_or_zero")]
    pub product_type: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

mod serde_helpers {
    use super::Decimal;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use std::str::FromStr;

    /// Arrays decode element by element; an object (PHP's empty array
    /// encodes as `{}`) contributes its values; anything else is empty.
    /// Elements that do not decode are dropped.
    pub fn deserialize_list_lenient<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let items: Vec<Value> = match Value::deserialize(deserializer)? {
            Value::Array(items) => items,
            Value::Object(map) => map.into_iter().map(|(_, item)| item).collect(),
            _ => Vec::new(),
        };
        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }

    /// Only an object that decodes is `Some`; `[]`, null and scalars are `None`
    pub fn deserialize_object_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(deserializer)? {
            value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
            _ => Ok(None),
        }
    }

    pub fn deserialize_object_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Ok(deserialize_object_or_none(deserializer)?.unwrap_or_default())
    }

    pub fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Decimal::ZERO);
        }

        if let Some(raw) = value.as_str() {
            if raw.trim().is_empty() {
                return Ok(Decimal::ZERO);
            }
            return Decimal::from_str(raw.trim()).map_err(serde::de::Error::custom);
        }

        if value.is_number() {
            return Decimal::from_str(&value.to_string()).map_err(serde::de::Error::custom);
        }

        Err(serde::de::Error::custom("invalid decimal value"))
    }

    pub fn serialize_decimal<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    /// Ids arrive as strings, occasionally as numbers; null reads as empty
    pub fn deserialize_string_lenient<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(String::new()),
            Value::String(raw) => Ok(raw),
            Value::Number(number) => Ok(number.to_string()),
            Value::Bool(flag) => Ok(flag.to_string()),
            _ => Err(serde::de::Error::custom("expected string value")),
        }
    }

    pub fn deserialize_int_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(0),
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|f| f as i64))
                .ok_or_else(|| serde::de::Error::custom("integer out of range")),
            Value::String(raw) if raw.trim().is_empty() => Ok(0),
            Value::String(raw) => raw.trim().parse().map_err(serde::de::Error::custom),
            _ => Err(serde::de::Error::custom("expected integer value")),
        }
    }
}
