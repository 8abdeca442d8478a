//! Database webhook ingestion.
//!
//! The backend-as-a-service posts row changes as JSON:
//!
//! ```json
//! {"type": "UPDATE", "table": "bookings", "schema": "public",
//!  "record": {...}, "old_record": {...}}
//! ```
//!
//! Each request is signed with HMAC-SHA256 over `v1:{timestamp}:{body}` and
//! carries `X-Webhook-Timestamp` (unix seconds) and
//! `X-Webhook-Signature: v1=<hex>`. Requests more than five minutes away
//! from the server clock are rejected.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use venuedesk_core::notification::{BookingRecord, BookingStatus, ChangeEvent, CustomerRecord};

pub const TIMESTAMP_HEADER: &str = "x-webhook-timestamp";
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Maximum clock skew accepted, in seconds.
const TOLERANCE_SECS: u64 = 300;

const SIGNATURE_VERSION: &str = "v1";
const SIGNATURE_PREFIX: &str = "v1=";

/// Errors from verifying or decoding a webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("missing header: {0}")]
    MissingHeader(&'static str),

    #[error("invalid webhook timestamp")]
    InvalidTimestamp,

    #[error("webhook timestamp outside tolerance")]
    Expired,

    #[error("webhook signature mismatch")]
    SignatureMismatch,

    #[error("invalid webhook payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("invalid {table} record: {source}")]
    Record {
        table: String,
        source: serde_json::Error,
    },

    #[error("invalid signing key: {0}")]
    Key(String),
}

/// Row operation reported by the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

/// Raw webhook body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "type")]
    pub operation: Operation,
    pub table: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub record: Value,
    #[serde(default)]
    pub old_record: Option<Value>,
}

impl WebhookPayload {
    /// Parse a request body.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Payload` if the body is not a webhook envelope.
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Convert into a change event.
    ///
    /// Returns `Ok(None)` for changes nobody is notified about: deletes,
    /// customer updates, other tables and non-`public` schemas.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Record` if a relevant row does not decode.
    pub fn into_event(self) -> Result<Option<ChangeEvent>, WebhookError> {
        if self.schema.as_deref().is_some_and(|schema| schema != "public") {
            debug!(schema = ?self.schema, "Ignoring change outside public schema");
            return Ok(None);
        }

        let event = match (self.table.as_str(), self.operation) {
            ("bookings", Operation::Insert) => {
                ChangeEvent::BookingCreated(decode_record(&self.table, self.record)?)
            }
            ("bookings", Operation::Update) => {
                let booking: BookingRecord = decode_record(&self.table, self.record)?;
                ChangeEvent::BookingUpdated {
                    booking,
                    previous_status: self.old_record.as_ref().and_then(previous_status),
                }
            }
            ("customers", Operation::Insert) => {
                let customer: CustomerRecord = decode_record(&self.table, self.record)?;
                ChangeEvent::CustomerCreated(customer)
            }
            (table, operation) => {
                debug!(table, ?operation, "Ignoring change");
                return Ok(None);
            }
        };

        Ok(Some(event))
    }
}

fn decode_record<T: serde::de::DeserializeOwned>(
    table: &str,
    record: Value,
) -> Result<T, WebhookError> {
    serde_json::from_value(record).map_err(|source| WebhookError::Record {
        table: table.to_string(),
        source,
    })
}

/// Status from `old_record`. The backend omits unchanged columns unless the
/// table has full replica identity, so a missing status is `None`.
fn previous_status(old_record: &Value) -> Option<BookingStatus> {
    old_record
        .get("status")
        .and_then(|status| serde_json::from_value(status.clone()).ok())
}

/// Signs and verifies webhook requests.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: SecretString,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl WebhookVerifier {
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    fn mac(&self, timestamp: &str, body: &[u8]) -> Result<Hmac<Sha256>, WebhookError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| WebhookError::Key(e.to_string()))?;
        mac.update(format!("{SIGNATURE_VERSION}:{timestamp}:").as_bytes());
        mac.update(body);
        Ok(mac)
    }

    /// Compute the `v1=<hex>` signature for a body.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Key` if the HMAC cannot be keyed.
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> Result<String, WebhookError> {
        let mac = self.mac(timestamp, body)?;
        Ok(format!(
            "{SIGNATURE_VERSION}={}",
            hex::encode(mac.finalize().into_bytes())
        ))
    }

    /// Verify a request signature against the current time `now` (unix seconds).
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp does not parse, is more than five
    /// minutes off, or the signature does not match.
    pub fn verify(
        &self,
        timestamp: &str,
        body: &[u8],
        signature: &str,
        now: i64,
    ) -> Result<(), WebhookError> {
        let timestamp = timestamp.trim();
        let ts: i64 = timestamp
            .parse()
            .map_err(|_| WebhookError::InvalidTimestamp)?;

        let skew = now.checked_sub(ts).map(i64::unsigned_abs);
        if skew.is_none_or(|skew| skew > TOLERANCE_SECS) {
            return Err(WebhookError::Expired);
        }

        let digest = signature
            .trim()
            .strip_prefix(SIGNATURE_PREFIX)
            .and_then(|hex_digest| hex::decode(hex_digest).ok())
            .ok_or(WebhookError::SignatureMismatch)?;

        self.mac(timestamp, body)?
            .verify_slice(&digest)
            .map_err(|_| WebhookError::SignatureMismatch)?;

        debug!("Webhook signature verified");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use venuedesk_core::notification::ChangeChannel;

    use super::*;

    const NOW: i64 = 1_773_500_000;

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(SecretString::from("Pz4Rt8Lm1Xq6Vn3Kc9Bw2Hy5Jf7Gd0Ts"))
    }

    fn booking_row(status: &str) -> Value {
        json!({
            "id": "0d4b7a64-8a55-4d3f-9f0e-5b8f0e6c2a11",
            "organization_id": "5f0a1c1e-3b2d-4e6f-8a9b-0c1d2e3f4a5b",
            "customer_name": "Riley Chen",
            "game_name": "The Vault",
            "booking_date": "2026-03-14",
            "start_time": "19:30:00",
            "party_size": 4,
            "status": status,
            "total_amount": "120.00"
        })
    }

    #[test]
    fn test_sign_then_verify() {
        let body = br#"{"type":"INSERT"}"#;
        let ts = NOW.to_string();
        let signature = verifier().sign(&ts, body).unwrap();

        assert!(signature.starts_with("v1="));
        assert!(verifier().verify(&ts, body, &signature, NOW).is_ok());
    }

    #[test]
    fn test_tampered_body_rejected() {
        let ts = NOW.to_string();
        let signature = verifier().sign(&ts, b"original").unwrap();
        assert!(matches!(
            verifier().verify(&ts, b"tampered", &signature, NOW),
            Err(WebhookError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let ts = (NOW - 301).to_string();
        let signature = verifier().sign(&ts, b"{}").unwrap();
        assert!(matches!(
            verifier().verify(&ts, b"{}", &signature, NOW),
            Err(WebhookError::Expired)
        ));
    }

    #[test]
    fn test_garbage_timestamp_rejected() {
        assert!(matches!(
            verifier().verify("yesterday", b"{}", "v1=00", NOW),
            Err(WebhookError::InvalidTimestamp)
        ));
    }

    #[test]
    fn test_extreme_timestamps_are_expired() {
        for ts in [i64::MIN, i64::MAX] {
            assert!(matches!(
                verifier().verify(&ts.to_string(), b"{}", "v1=00", NOW),
                Err(WebhookError::Expired)
            ));
        }
        assert!(matches!(
            verifier().verify("0", b"{}", "v1=00", i64::MIN),
            Err(WebhookError::Expired)
        ));
    }

    #[test]
    fn test_malformed_signature_rejected() {
        let ts = NOW.to_string();
        let signature = verifier().sign(&ts, b"{}").unwrap();
        let bare = signature.trim_start_matches("v1=");

        for candidate in [bare, "v1=not-hex", "v2=00", ""] {
            assert!(matches!(
                verifier().verify(&ts, b"{}", candidate, NOW),
                Err(WebhookError::SignatureMismatch)
            ));
        }
    }

    #[test]
    fn test_booking_insert_event() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "type": "INSERT",
            "table": "bookings",
            "schema": "public",
            "record": booking_row("pending"),
            "old_record": null
        }))
        .unwrap();

        let event = payload.into_event().unwrap().unwrap();
        assert_eq!(event.channel(), ChangeChannel::Bookings);
    }

    #[test]
    fn test_booking_update_carries_previous_status() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "type": "UPDATE",
            "table": "bookings",
            "schema": "public",
            "record": booking_row("cancelled"),
            "old_record": booking_row("confirmed")
        }))
        .unwrap();

        match payload.into_event().unwrap().unwrap() {
            ChangeEvent::BookingUpdated {
                booking,
                previous_status,
            } => {
                assert_eq!(booking.status, BookingStatus::Cancelled);
                assert_eq!(previous_status, Some(BookingStatus::Confirmed));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_update_without_old_status() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "type": "UPDATE",
            "table": "bookings",
            "record": booking_row("confirmed"),
            "old_record": {"id": "0d4b7a64-8a55-4d3f-9f0e-5b8f0e6c2a11"}
        }))
        .unwrap();

        let event = payload.into_event().unwrap().unwrap();
        assert!(matches!(
            event,
            ChangeEvent::BookingUpdated {
                previous_status: None,
                ..
            }
        ));
    }

    #[test]
    fn test_ignored_changes() {
        for (operation, table, schema) in [
            ("DELETE", "bookings", "public"),
            ("UPDATE", "customers", "public"),
            ("INSERT", "games", "public"),
            ("INSERT", "bookings", "audit"),
        ] {
            let payload: WebhookPayload = serde_json::from_value(json!({
                "type": operation,
                "table": table,
                "schema": schema,
                "record": booking_row("pending"),
            }))
            .unwrap();
            assert!(payload.into_event().unwrap().is_none(), "{operation} {table}");
        }
    }

    #[test]
    fn test_bad_record_is_an_error() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "type": "INSERT",
            "table": "customers",
            "record": {"full_name": "No Id"}
        }))
        .unwrap();
        assert!(matches!(
            payload.into_event(),
            Err(WebhookError::Record { .. })
        ));
    }
}
