use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat field map of the first item in the dashboard response.
pub type RawReading = Map<String, Value>;

// ---------------------------------------------------------------------------
// Login: POST <login-url>
//
// Request:   { "Login": { "UserName": "...", "Password": "..." } }
// Response:  { "Success": true, ... }
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    #[serde(rename = "Login")]
    pub login: LoginBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginBody<'a> {
    pub user_name: &'a str,
    pub password: &'a str,
}

impl<'a> LoginRequest<'a> {
    pub fn new(user_name: &'a str, password: &'a str) -> Self {
        Self {
            login: LoginBody { user_name, password },
        }
    }
}

/// Only `Success` is consumed; the vendor also returns session details we
/// do not need because the auth context travels in cookies.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct LoginResponse(Map<String, Value>);

impl LoginResponse {
    /// `None` when `Success` is missing, otherwise its truthiness.
    pub fn succeeded(&self) -> Option<bool> {
        self.0.get("Success").map(is_truthy)
    }
}

/// JSON truthiness: `false`, `null`, `0`, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

// ---------------------------------------------------------------------------
// Dashboard: GET <data-url>
//
// Response:  { "Items": [ { "SensorId": ..., "MaxVolume": ..., ... }, ... ] }
//
// One account maps to one physical sensor, so only Items[0] is consulted.
// ---------------------------------------------------------------------------

/// Extract `Items[0]` from a dashboard payload.
///
/// Returns `None` when `Items` is missing, not an array, empty, or when its
/// first element is not an object.
pub fn first_item(payload: &Value) -> Option<RawReading> {
    payload
        .get("Items")?
        .as_array()?
        .first()?
        .as_object()
        .cloned()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn login_request_wire_shape() {
        let body = serde_json::to_value(LoginRequest::new("alice", "pw")).unwrap();
        assert_eq!(
            body,
            json!({ "Login": { "UserName": "alice", "Password": "pw" } })
        );
    }

    #[test]
    fn login_response_success_flags() {
        let ok: LoginResponse = serde_json::from_value(json!({ "Success": true })).unwrap();
        assert_eq!(ok.succeeded(), Some(true));

        let rejected: LoginResponse =
            serde_json::from_value(json!({ "Success": false, "Message": "nope" })).unwrap();
        assert_eq!(rejected.succeeded(), Some(false));

        let null: LoginResponse = serde_json::from_value(json!({ "Success": null })).unwrap();
        assert_eq!(null.succeeded(), Some(false));

        let missing: LoginResponse = serde_json::from_value(json!({ "Token": "x" })).unwrap();
        assert_eq!(missing.succeeded(), None);
    }

    #[test]
    fn login_response_must_be_an_object() {
        assert!(serde_json::from_value::<LoginResponse>(json!(true)).is_err());
    }

    #[test]
    fn truthiness_follows_json_emptiness() {
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!({ "a": 1 })));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn first_item_ignores_additional_sensors() {
        let payload = json!({
            "Items": [
                { "SensorId": "first", "MaxVolume": 1000 },
                { "SensorId": "second" }
            ]
        });
        let item = first_item(&payload).unwrap();
        assert_eq!(item["SensorId"], "first");
        assert_eq!(item["MaxVolume"], 1000);
    }

    #[test]
    fn first_item_handles_malformed_payloads() {
        assert!(first_item(&json!({})).is_none());
        assert!(first_item(&json!({ "Items": [] })).is_none());
        assert!(first_item(&json!({ "Items": "oops" })).is_none());
        assert!(first_item(&json!({ "Items": [42] })).is_none());
    }
}
