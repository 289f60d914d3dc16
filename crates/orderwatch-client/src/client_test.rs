use serde_json::json;

use super::*;

#[test]
fn new_rejects_invalid_url() {
    let result = OrderClient::new("not a url", 30, "orderwatch-test", &[]);
    assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
}

#[test]
fn new_rejects_invalid_header_name() {
    let headers = vec![("bad header".to_string(), "x".to_string())];
    let result = OrderClient::new("https://orders.example.com/detail", 30, "ua", &headers);
    assert!(
        matches!(result, Err(ClientError::InvalidConfig(ref msg)) if msg.contains("bad header"))
    );
}

#[test]
fn new_keeps_endpoint() {
    let client = OrderClient::new("https://orders.example.com/detail?id=7", 30, "ua", &[])
        .expect("client construction should not fail");
    assert_eq!(client.endpoint().as_str(), "https://orders.example.com/detail?id=7");
}

#[test]
fn unwrap_envelope_returns_data_object() {
    let order = unwrap_envelope(json!({"code": 0, "data": {"orderNo": "O1"}})).unwrap();
    assert_eq!(order.get("orderNo"), Some(&json!("O1")));
    assert!(order.get("code").is_none());
}

#[test]
fn unwrap_envelope_parses_json_encoded_data() {
    let order = unwrap_envelope(json!({"data": "{\"orderNo\":\"O2\"}"})).unwrap();
    assert_eq!(order.get("orderNo"), Some(&json!("O2")));
}

#[test]
fn unwrap_envelope_without_data_uses_payload() {
    let order = unwrap_envelope(json!({"orderNo": "O3"})).unwrap();
    assert_eq!(order.get("orderNo"), Some(&json!("O3")));
}

#[test]
fn unwrap_envelope_with_null_data_uses_payload() {
    let order = unwrap_envelope(json!({"orderNo": "O4", "data": null})).unwrap();
    assert_eq!(order.get("orderNo"), Some(&json!("O4")));
}

#[test]
fn unwrap_envelope_rejects_non_objects() {
    let err = unwrap_envelope(json!([1, 2])).unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedShape(ref m) if m.contains("array")));
}

#[test]
fn truncate_body_caps_long_bodies() {
    let long = "x".repeat(MAX_ERROR_BODY_CHARS + 10);
    let truncated = truncate_body(&long);
    assert_eq!(truncated.chars().count(), MAX_ERROR_BODY_CHARS + 1);
    assert!(truncated.ends_with('…'));
    assert_eq!(truncate_body("short"), "short");
}

#[test]
fn error_display_reports_body_length_not_content() {
    let status = ClientError::UnexpectedStatus {
        status: 401,
        body: "buyerIdCard=110101199001011234".to_string(),
    };
    let text = status.to_string();
    assert!(!text.contains("110101"), "{text}");
    assert!(text.contains("401"));
    assert!(text.contains("30 byte body"));

    let source = serde_json::from_str::<Value>("<html>张三</html>").unwrap_err();
    let deserialize = ClientError::Deserialize {
        context: "/order".to_string(),
        body: "<html>张三</html>".to_string(),
        source,
    };
    assert!(!deserialize.to_string().contains("张三"));
}
