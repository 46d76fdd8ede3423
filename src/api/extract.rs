//! Request extractors

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, Uri},
};
use serde::de::DeserializeOwned;

use crate::gateway::{GatewayError, ValidationError};

/// Query string extractor that reports failures through the gateway error envelope.
///
/// Keys are matched case-insensitively: they are lower-cased before
/// deserializing, so query structs declare lower-case field names.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

/// Lower-case the key of every `key=value` pair, leaving values untouched
pub fn normalize_query(query: &str) -> String {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => format!("{}={}", key.to_ascii_lowercase(), value),
            None => pair.to_ascii_lowercase(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = normalize_query(parts.uri.query().unwrap_or_default());
        let uri: Uri = format!("/?{}", query)
            .parse()
            .map_err(|e| ValidationError::MalformedQuery(format!("{}", e)))?;

        let Query(value) = Query::<T>::try_from_uri(&uri)
            .map_err(|rejection| ValidationError::MalformedQuery(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Parse a boolean query value the way form binders do, ignoring case
pub fn deserialize_flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected `true` or `false`, got `{}`",
            raw
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_cases_keys_only() {
        assert_eq!(
            normalize_query("minSoc=30&MinSocGrid=40&x=AbC"),
            "minsoc=30&minsocgrid=40&x=AbC"
        );
    }

    #[test]
    fn keeps_flag_keys_and_drops_empty_pairs() {
        assert_eq!(normalize_query("Flag&&a=1"), "flag&a=1");
        assert_eq!(normalize_query(""), "");
    }
}
