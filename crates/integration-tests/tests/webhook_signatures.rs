//! Webhook signature and metadata round-trip tests.
//!
//! The webhook handler must reject anything whose HMAC-SHA512 signature
//! does not match the raw body, and must be able to reconstruct the
//! purchase from the metadata it attached at initialization.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha512;

use menulane_core::{BillingCycle, UserId};

use menulane_dashboard::services::paystack::verify_webhook_signature;
use menulane_dashboard::services::subscription::ChargeMetadata;

const SECRET: &str = "sk_test_9f1c2d3e4a5b6c7d8e9f";

fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        Hmac::<Sha512>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

#[test]
fn valid_signature_is_accepted() {
    let body = br#"{"event":"charge.success","data":{"reference":"ml_abc"}}"#;
    let signature = sign(SECRET, body);
    assert!(verify_webhook_signature(SECRET, body, &signature));
}

#[test]
fn tampered_body_is_rejected() {
    let body = br#"{"event":"charge.success","data":{"amount":350000}}"#;
    let signature = sign(SECRET, body);

    let tampered = br#"{"event":"charge.success","data":{"amount":1}}"#;
    assert!(!verify_webhook_signature(SECRET, tampered, &signature));
}

#[test]
fn signature_from_another_secret_is_rejected() {
    let body = br#"{"event":"charge.success"}"#;
    let signature = sign("sk_test_some_other_secret", body);
    assert!(!verify_webhook_signature(SECRET, body, &signature));
}

#[test]
fn non_hex_signature_is_rejected() {
    let body = br#"{"event":"charge.success"}"#;
    assert!(!verify_webhook_signature(SECRET, body, "not a signature"));
    assert!(!verify_webhook_signature(SECRET, body, ""));
}

#[test]
fn charge_metadata_survives_the_gateway_round_trip() {
    let metadata = ChargeMetadata {
        user_id: UserId::new(42),
        cycle: BillingCycle::Yearly,
        features: vec!["unlimited-items".to_owned(), "whatsapp-ordering".to_owned()],
    };

    // The gateway stores metadata as opaque JSON and echoes it back in the
    // webhook payload.
    let echoed = serde_json::to_value(&metadata).unwrap();
    let parsed: ChargeMetadata = serde_json::from_value(echoed).unwrap();

    assert_eq!(parsed.user_id, UserId::new(42));
    assert_eq!(parsed.cycle, BillingCycle::Yearly);
    assert_eq!(parsed.features, metadata.features);
}

#[test]
fn metadata_with_missing_fields_fails_to_parse() {
    let bogus = json!({ "user_id": 42 });
    assert!(serde_json::from_value::<ChargeMetadata>(bogus).is_err());
}
