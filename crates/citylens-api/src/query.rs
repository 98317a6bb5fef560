//! Parsing of the `data` query parameter.
//!
//! `/location` takes `data` as the raw search text. Resource routes take a
//! location reference, either as a JSON object (`data={"id":1,...}`) or in
//! the bracket form browsers emit for nested objects
//! (`data[id]=1&data[latitude]=47.6`).

use std::collections::HashMap;
use std::str::FromStr;

use citylens_core::{Error, LocationRef, Result};

const DATA: &str = "data";

pub type QueryParams = HashMap<String, String>;

/// The search text for location resolution.
pub fn search_query_param(params: &QueryParams) -> Result<String> {
    params
        .get(DATA)
        .filter(|q| !q.trim().is_empty())
        .cloned()
        .ok_or_else(|| Error::InvalidInput("query parameter 'data' is required".to_string()))
}

/// The location reference for resource resolution.
pub fn location_param(params: &QueryParams) -> Result<LocationRef> {
    if let Some(raw) = params.get(DATA) {
        return serde_json::from_str(raw)
            .map_err(|e| Error::InvalidInput(format!("'data' is not a valid location: {}", e)));
    }

    let id = bracket_field::<i64>(params, "id")?
        .ok_or_else(|| Error::InvalidInput("query parameter 'data[id]' is required".to_string()))?;

    Ok(LocationRef {
        id,
        search_query: params
            .get("data[search_query]")
            .filter(|q| !q.trim().is_empty())
            .cloned(),
        latitude: bracket_field(params, "latitude")?,
        longitude: bracket_field(params, "longitude")?,
    })
}

fn bracket_field<T: FromStr>(params: &QueryParams, field: &str) -> Result<Option<T>> {
    let key = format!("{}[{}]", DATA, field);
    match params.get(&key).map(|v| v.trim()) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidInput(format!("'{}' has an invalid value", key))),
    }
}
