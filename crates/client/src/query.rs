//! Query-string builder shared by every listing call.

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::ApiError;

/// Serialize `params` into `?key=value&...`.
///
/// Unset (`None`/`null`) and empty-string values are dropped, numbers and
/// booleans are written in their JSON form and arrays are joined with commas.
/// Returns an empty string when nothing remains.
///
/// # Errors
///
/// Returns `ApiError::InvalidQuery` if `params` is not a flat object.
pub fn build_query_string<T: Serialize + ?Sized>(params: &T) -> Result<String, ApiError> {
    let value =
        serde_json::to_value(params).map_err(|e| ApiError::InvalidQuery(e.to_string()))?;

    let fields = match value {
        Value::Object(fields) => fields,
        Value::Null => return Ok(String::new()),
        other => {
            return Err(ApiError::InvalidQuery(format!(
                "expected an object, got {other}"
            )));
        }
    };

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in fields {
        if let Some(text) = scalar_text(&key, &value)? {
            serializer.append_pair(&key, &text);
            any = true;
        }
    }

    if any {
        Ok(format!("?{}", serializer.finish()))
    } else {
        Ok(String::new())
    }
}

fn scalar_text(key: &str, value: &Value) -> Result<Option<String>, ApiError> {
    Ok(match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts = items
                .iter()
                .map(|item| scalar_text(key, item))
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .flatten()
                .collect::<Vec<_>>();
            Some(parts.join(",")).filter(|joined| !joined.is_empty())
        }
        Value::Object(_) => {
            return Err(ApiError::InvalidQuery(format!(
                "nested object for key `{key}`"
            )));
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drops_empty_and_unset() {
        let query = build_query_string(&json!({ "a": 1, "b": "", "c": null })).unwrap();
        assert_eq!(query, "?a=1");
    }

    #[test]
    fn test_empty_params() {
        assert_eq!(build_query_string(&json!({})).unwrap(), "");
        assert_eq!(build_query_string(&json!({ "x": null })).unwrap(), "");
        assert_eq!(build_query_string(&Option::<()>::None).unwrap(), "");
    }

    #[test]
    fn test_encodes_values() {
        let query = build_query_string(&json!({
            "ids": ["p1", "p2"],
            "inStock": true,
            "search": "baby bottle & cup"
        }))
        .unwrap();
        assert_eq!(query, "?ids=p1%2Cp2&inStock=true&search=baby+bottle+%26+cup");
    }

    #[test]
    fn test_rejects_nested_objects() {
        let err = build_query_string(&json!({ "filter": { "a": 1 } })).unwrap_err();
        assert!(matches!(err, ApiError::InvalidQuery(_)));
        assert!(build_query_string(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_struct_with_options() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Params {
            page: Option<u32>,
            sort_order: Option<&'static str>,
            search: Option<String>,
        }

        let query = build_query_string(&Params {
            page: Some(2),
            sort_order: Some("desc"),
            search: None,
        })
        .unwrap();
        assert_eq!(query, "?page=2&sortOrder=desc");
    }
}
