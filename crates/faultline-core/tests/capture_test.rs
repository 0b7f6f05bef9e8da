use faultline_core::{Cause, ErrorCapture, FaultlineError, KindRegistry};
use serde_json::json;

#[test]
fn capture_converts_into_instance_chain() {
    let raw = json!({
        "name": "UploadFailed",
        "message": "upload failed",
        "data": { "bytes": 1024 },
        "callSite": [
            { "functionName": "upload", "fileName": "/srv/app/upload.js", "lineNumber": 3, "columnNumber": 9 }
        ],
        "cause": { "name": "Timeout", "message": "timed out" }
    })
    .to_string();

    let registry = KindRegistry::new();
    let instance = ErrorCapture::from_json_str(&raw)
        .expect("valid capture")
        .into_instance(&registry);

    assert_eq!(instance.name(), "UploadFailed");
    assert_eq!(instance.data().get("bytes"), Some(&json!(1024)));
    assert_eq!(instance.call_sites().len(), 1);
    assert_eq!(instance.call_sites()[0].function_name.as_deref(), Some("upload"));

    let cause = instance.cause().and_then(Cause::as_error).expect("nested capture");
    assert_eq!(cause.name(), "Timeout");
    assert!(registry.lookup("Timeout").is_some());
}

#[test]
fn non_capture_cause_is_kept_as_value() {
    let raw = json!({ "message": "outer", "cause": { "status": 503, "retry": true } }).to_string();
    let instance = ErrorCapture::from_json_str(&raw)
        .expect("valid capture")
        .into_instance(&KindRegistry::new());
    assert_eq!(instance.name(), "Error");
    assert!(matches!(instance.cause(), Some(Cause::Value(_))));
}

#[test]
fn capture_must_be_an_object() {
    let err = ErrorCapture::from_json_str("[1, 2]").expect_err("arrays are rejected");
    assert!(matches!(err, FaultlineError::InvalidCapture(_)));

    let err = ErrorCapture::from_json_str("{").expect_err("malformed json");
    assert!(matches!(err, FaultlineError::Json(_)));
}
