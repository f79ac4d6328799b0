//! Normalisation of registration input.
//!
//! A registration may arrive as a JSON body or as query parameters. The two
//! sources are never merged: a body that parses as a JSON object and carries a
//! non-empty string `token` wins outright, name included; otherwise the query
//! string is used as a whole. Once the body wins, its `name` must be a string
//! or absent.

use pushping_common::{invalid_input, PushPingError, TOKEN_REQUIRED};
use serde::Deserialize;
use serde_json::Value;

pub const NAME_MUST_BE_STRING: &str = "name must be a string";

/// Registration fields as they arrive, from either source.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema, utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SaveParams {
    /// The device push token
    pub token: Option<String>,
    /// Optional display name for the device
    pub name: Option<String>,
}

/// A validated registration: the token is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub token: String,
    pub name: Option<String>,
}

impl SaveRequest {
    /// Pick the authoritative source and validate it.
    ///
    /// Fails with `InvalidInput("token required")` when neither source has a
    /// non-empty token, and with `InvalidInput("name must be a string")` when
    /// the winning body carries a `name` of another JSON type.
    pub fn resolve(body: &[u8], query: SaveParams) -> Result<Self, PushPingError> {
        if let Some(request) = Self::from_body(body)? {
            return Ok(request);
        }

        match query.token {
            Some(token) if !token.is_empty() => Ok(Self {
                token,
                name: query.name,
            }),
            _ => Err(invalid_input(TOKEN_REQUIRED)),
        }
    }

    fn from_body(body: &[u8]) -> Result<Option<Self>, PushPingError> {
        let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
            return Ok(None);
        };

        let token = match fields.get("token") {
            Some(Value::String(token)) if !token.is_empty() => token.clone(),
            _ => return Ok(None),
        };

        let name = match fields.get("name") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name.clone()),
            Some(_) => return Err(invalid_input(NAME_MUST_BE_STRING)),
        };

        Ok(Some(Self { token, name }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(token: Option<&str>, name: Option<&str>) -> SaveParams {
        SaveParams {
            token: token.map(String::from),
            name: name.map(String::from),
        }
    }

    #[test]
    fn test_body_is_authoritative() {
        let body = br#"{"token":"abc","name":"phone1"}"#;

        let request = SaveRequest::resolve(body, query(Some("q"), Some("qname"))).unwrap();

        assert_eq!(
            request,
            SaveRequest {
                token: "abc".to_string(),
                name: Some("phone1".to_string())
            }
        );
    }

    #[test]
    fn test_body_without_name_does_not_borrow_query_name() {
        let request =
            SaveRequest::resolve(br#"{"token":"abc"}"#, query(None, Some("qname"))).unwrap();

        assert_eq!(request.name, None);
    }

    #[test]
    fn test_falls_back_to_query() {
        let bodies: [&[u8]; 6] = [
            b"",
            b"not json",
            br#"{}"#,
            br#"{"token":""}"#,
            br#"{"token":5,"name":"x"}"#,
            br#"[1,2]"#,
        ];
        for body in bodies {
            let request = SaveRequest::resolve(body, query(Some("q"), Some("n"))).unwrap();
            assert_eq!(request.token, "q");
            assert_eq!(request.name.as_deref(), Some("n"));
        }
    }

    #[test]
    fn test_token_required() {
        let err = SaveRequest::resolve(br#"{}"#, SaveParams::default()).unwrap_err();
        assert!(matches!(err, PushPingError::InvalidInput(ref m) if m == "token required"));

        assert!(SaveRequest::resolve(b"", query(Some(""), None)).is_err());
    }

    #[test]
    fn test_body_name_of_wrong_type_is_rejected() {
        let err = SaveRequest::resolve(br#"{"token":"abc","name":5}"#, query(Some("q"), None))
            .unwrap_err();

        assert!(matches!(err, PushPingError::InvalidInput(ref m) if m == NAME_MUST_BE_STRING));
    }

    #[test]
    fn test_body_null_name_is_no_name() {
        let request =
            SaveRequest::resolve(br#"{"token":"abc","name":null}"#, SaveParams::default()).unwrap();

        assert_eq!(request.name, None);
    }
}
