//! Paystack API client.
//!
//! Covers the two calls the dashboard makes (transaction initialize and
//! verify) plus webhook signature verification for the charge.success
//! event.

use hmac::{Hmac, Mac};
use menulane_core::Money;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use tracing::{debug, instrument};

use crate::config::PaystackConfig;

type HmacSha512 = Hmac<Sha512>;

/// Errors from the Paystack API.
#[derive(Debug, thiserror::Error)]
pub enum PaystackError {
    #[error("Paystack request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Paystack returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Paystack response declined: {0}")]
    Declined(String),
}

#[derive(Debug, Serialize)]
struct InitializeRequest<'a> {
    email: &'a str,
    /// Amount in minor units (kobo).
    amount: i64,
    reference: &'a str,
    callback_url: &'a str,
    metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: bool,
    message: String,
    data: Option<T>,
}

/// Payload returned by transaction initialize.
#[derive(Debug, Deserialize)]
pub struct InitializedTransaction {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// Payload returned by transaction verify.
#[derive(Debug, Deserialize)]
pub struct VerifiedTransaction {
    pub status: String,
    pub reference: String,
    pub amount: i64,
    /// The metadata attached at initialize, echoed back verbatim.
    pub metadata: Option<serde_json::Value>,
}

impl VerifiedTransaction {
    pub fn is_successful(&self) -> bool {
        self.status == "success"
    }
}

/// Thin client over the Paystack REST API.
#[derive(Clone)]
pub struct PaystackClient {
    client: reqwest::Client,
    base_url: String,
}

impl PaystackClient {
    /// Build a client with the secret key baked into default headers.
    pub fn new(config: &PaystackConfig) -> Self {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth_value =
            HeaderValue::from_str(&bearer).unwrap_or_else(|_| HeaderValue::from_static(""));
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    /// Initialize a transaction and return the hosted checkout URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Paystack declines it.
    #[instrument(skip(self, metadata), fields(reference = %reference))]
    pub async fn initialize_transaction(
        &self,
        email: &str,
        amount: Money,
        reference: &str,
        callback_url: &str,
        metadata: serde_json::Value,
    ) -> Result<InitializedTransaction, PaystackError> {
        let request = InitializeRequest {
            email,
            amount: amount.as_minor(),
            reference,
            callback_url,
            metadata,
        };

        let response = self
            .client
            .post(format!("{}/transaction/initialize", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaystackError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ApiEnvelope<InitializedTransaction> = response.json().await?;
        if !envelope.status {
            return Err(PaystackError::Declined(envelope.message));
        }
        envelope
            .data
            .ok_or_else(|| PaystackError::Declined("missing data in initialize response".into()))
    }

    /// Verify a transaction by reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Paystack declines it.
    #[instrument(skip(self))]
    pub async fn verify_transaction(
        &self,
        reference: &str,
    ) -> Result<VerifiedTransaction, PaystackError> {
        let response = self
            .client
            .get(format!("{}/transaction/verify/{reference}", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaystackError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ApiEnvelope<VerifiedTransaction> = response.json().await?;
        if !envelope.status {
            return Err(PaystackError::Declined(envelope.message));
        }
        let verified = envelope
            .data
            .ok_or_else(|| PaystackError::Declined("missing data in verify response".into()))?;
        debug!(status = %verified.status, "transaction verified");
        Ok(verified)
    }
}

/// Verify a webhook signature: hex-encoded HMAC-SHA512 of the raw body
/// keyed with the API secret, delivered in `x-paystack-signature`.
pub fn verify_webhook_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let body = br#"{"event":"charge.success"}"#;
        let signature = sign("sk_test_secret", body);
        assert!(verify_webhook_signature("sk_test_secret", body, &signature));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let body = br#"{"event":"charge.success","data":{"amount":350000}}"#;
        let signature = sign("sk_test_secret", body);
        let tampered = br#"{"event":"charge.success","data":{"amount":1}}"#;
        assert!(!verify_webhook_signature(
            "sk_test_secret",
            tampered,
            &signature
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = br#"{"event":"charge.success"}"#;
        let signature = sign("sk_test_secret", body);
        assert!(!verify_webhook_signature("sk_live_other", body, &signature));
    }

    #[test]
    fn test_garbage_signature_rejected() {
        assert!(!verify_webhook_signature(
            "sk_test_secret",
            b"{}",
            "not-hex!"
        ));
    }
}
