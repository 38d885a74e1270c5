/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - response envelope, pages and aggregates
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::CacheState;
use super::models::Record;
use crate::http::{AfdianError, Result};

/// Successful response envelope (`ec == 200`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub ec: i64,
    #[serde(default)]
    pub em: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl ApiResponse {
    /// Decode `data` as one page of a list endpoint
    pub fn page<T: Record>(&self) -> Result<Page<T>> {
        Page::from_data(&self.data)
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub list: Option<Vec<T>>,
    pub total_page: Option<u32>,
    pub page: Option<u32>,
    pub total_count: Option<u64>,
}

/// `data` as sent, before any record is interpreted
#[derive(Deserialize)]
struct RawPage {
    #[serde(default)]
    list: Value,
    #[serde(default)]
    total_page: Value,
    #[serde(default)]
    page: Value,
    #[serde(default)]
    total_count: Value,
}

impl<T: Record> Page<T> {
    /// Decode a page record by record; one odd record never costs the others.
    ///
    /// `data` must be an object. A `list` that is an object (PHP's encoding of
    /// an empty or keyed array) contributes its values. Counters accept
    /// numbers or numeric strings.
    pub fn from_data(data: &Value) -> Result<Self> {
        if !data.is_object() {
            let err = <serde_json::Error as serde::de::Error>::custom("page data is not an object");
            return Err(AfdianError::Serialization(err));
        }
        let raw = RawPage::deserialize(data)?;
        let items = match raw.list {
            Value::Array(items) => Some(items),
            Value::Object(map) => Some(map.into_iter().map(|(_, item)| item).collect()),
            _ => None,
        };

        Ok(Page {
            list: items.map(|items| items.into_iter().map(T::from_value_lenient).collect()),
            total_page: lenient_count(&raw.total_page).and_then(|n| u32::try_from(n).ok()),
            page: lenient_count(&raw.page).and_then(|n| u32::try_from(n).ok()),
            total_count: lenient_count(&raw.total_count),
        })
    }
}

fn lenient_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

/// Every page of a list endpoint flattened in page order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate<T> {
    pub list: Vec<T>,
    #[serde(default)]
    pub cache: CacheState,
}

impl<T> Aggregate<T> {
    pub fn new(list: Vec<T>, cache: CacheState) -> Self {
        Self { list, cache }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), CacheState::None)
    }

    pub fn is_cached(&self) -> bool {
        self.cache == CacheState::Cached
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<T> Default for Aggregate<T> {
    fn default() -> Self {
        Self::empty()
    }
}
