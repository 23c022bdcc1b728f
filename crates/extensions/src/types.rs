//! Request value types shared by every endpoint and every base client.
//!
//! A [`RequestSpec`] is the complete, transport-neutral description of one
//! call: method, optional query, optional JSON body, and headers. Endpoint
//! functions build one; a [`crate::StoreClient`] turns it into I/O.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ClientError;

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

/// HTTP verb of a storefront API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read-only retrieval.
    Get,
    /// Creation or action invocation.
    Post,
    /// Full update of an existing resource.
    Put,
    /// Removal of a resource.
    Delete,
}

impl HttpMethod {
    /// Returns the canonical upper-case verb.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// A set of request headers.
///
/// Header names are case-insensitive on the wire, so keys are stored
/// lower-cased. Inserting an existing name replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    /// Creates an empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing any existing value with the same name.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.as_ref().to_ascii_lowercase(), value.into())
    }

    /// Builder-style [`Headers::insert`].
    #[must_use]
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the value for `name`, matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Returns `true` if a header with `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    /// Number of headers in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlays `overrides` onto `self`. Values from `overrides` win on
    /// name collision.
    #[must_use]
    pub fn merged_with(mut self, overrides: &Headers) -> Self {
        for (name, value) in overrides.iter() {
            self.insert(name, value);
        }
        self
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

// ---------------------------------------------------------------------------
// Request description
// ---------------------------------------------------------------------------

/// Query-string parameters as a JSON object.
///
/// Scalars, arrays and nested objects are all allowed; the base client decides
/// how to flatten them onto the URL.
pub type Query = Map<String, Value>;

/// Transport-neutral description of one storefront API call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Query parameters. `None` means no query string at all.
    pub query: Option<Query>,
    /// JSON request body. `None` means no body.
    pub body: Option<Value>,
    /// Fully merged outgoing headers.
    pub headers: Headers,
}

impl RequestSpec {
    /// Creates a bare request with no query, body, or headers.
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            query: None,
            body: None,
            headers: Headers::new(),
        }
    }

    /// Shorthand for `RequestSpec::new(HttpMethod::Get)`.
    pub fn get() -> Self {
        Self::new(HttpMethod::Get)
    }

    /// Shorthand for `RequestSpec::new(HttpMethod::Post)`.
    pub fn post() -> Self {
        Self::new(HttpMethod::Post)
    }

    /// Shorthand for `RequestSpec::new(HttpMethod::Put)`.
    pub fn put() -> Self {
        Self::new(HttpMethod::Put)
    }

    /// Shorthand for `RequestSpec::new(HttpMethod::Delete)`.
    pub fn delete() -> Self {
        Self::new(HttpMethod::Delete)
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Replaces the headers.
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

// ---------------------------------------------------------------------------
// Encoding helpers
// ---------------------------------------------------------------------------

/// Serialises `input` into query parameters.
///
/// `input` must serialise to a JSON object. `null` members are dropped so an
/// absent optional filter never reaches the query string.
pub fn encode_query<T: Serialize + ?Sized>(path: &str, input: &T) -> Result<Query, ClientError> {
    match to_value(path, input)? {
        Value::Object(map) => Ok(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        other => Err(ClientError::Encode {
            path: path.to_owned(),
            message: format!("query parameters must be an object, got {other}"),
        }),
    }
}

/// Serialises `input` into a JSON request body.
pub fn encode_body<T: Serialize + ?Sized>(path: &str, input: &T) -> Result<Value, ClientError> {
    to_value(path, input)
}

fn to_value<T: Serialize + ?Sized>(path: &str, input: &T) -> Result<Value, ClientError> {
    serde_json::to_value(input).map_err(|e| ClientError::Encode {
        path: path.to_owned(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_headers_are_case_insensitive() {
        let headers = Headers::new().with("Authorization", "Bearer a");
        assert_eq!(headers.get("authorization"), Some("Bearer a"));
        assert_eq!(headers.get("AUTHORIZATION"), Some("Bearer a"));
        assert!(headers.contains("Authorization"));
    }

    #[test]
    fn test_merged_with_prefers_overrides() {
        let auth: Headers = [("authorization", "Bearer auth"), ("x-tenant", "t1")]
            .into_iter()
            .collect();
        let caller = Headers::new().with("Authorization", "Bearer caller");

        let merged = auth.merged_with(&caller);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("authorization"), Some("Bearer caller"));
        assert_eq!(merged.get("x-tenant"), Some("t1"));
    }

    #[test]
    fn test_encode_query_drops_nulls() {
        #[derive(Serialize)]
        struct Filters {
            limit: u32,
            q: Option<String>,
        }

        let query = encode_query("/x", &Filters { limit: 5, q: None }).unwrap();
        assert_eq!(Value::Object(query), json!({ "limit": 5 }));
    }

    #[test]
    fn test_encode_query_rejects_non_objects() {
        let err = encode_query("/x", &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, ClientError::Encode { ref path, .. } if path == "/x"));
    }

    #[test]
    fn test_request_spec_builders() {
        let spec = RequestSpec::post().with_body(json!({ "a": 1 }));
        assert_eq!(spec.method, HttpMethod::Post);
        assert!(spec.query.is_none());
        assert_eq!(spec.body, Some(json!({ "a": 1 })));
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
