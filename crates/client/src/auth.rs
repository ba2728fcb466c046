//! TC3-HMAC-SHA256 request signing.
//!
//! The cloud API authenticates every call with a signature derived from
//! the secret key: a canonical request is hashed into a string-to-sign,
//! a key is derived through an HMAC chain (`TC3{secret}` → date → service
//! → `tc3_request`), and the final HMAC becomes the `Authorization`
//! header. The secret key itself never leaves this module.

use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use hy3d_core::credentials::Credentials;
use hy3d_core::hashing::sha256_hex;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signature scheme identifier sent in the `Authorization` header.
pub const ALGORITHM: &str = "TC3-HMAC-SHA256";

/// Headers included in the canonical request, in canonical order.
pub const SIGNED_HEADERS: &str = "content-type;host;x-tc-action";

/// Content type of every signed request; part of the canonical headers,
/// so the HTTP layer must send exactly this value.
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A fully signed request, ready to be turned into HTTP headers.
#[derive(Debug)]
pub struct SignedRequest {
    pub authorization: String,
    pub timestamp: i64,
}

/// Sign a JSON POST to a cloud API action.
///
/// * `host` — API endpoint host, e.g. `hunyuan.intl.tencentcloudapi.com`.
/// * `service` — service segment of the credential scope, e.g. `hunyuan`.
/// * `action` — API action name, e.g. `SubmitHunyuanTo3DProJob`.
/// * `payload` — the serialized JSON body.
/// * `timestamp` — unix seconds; also sent as `X-TC-Timestamp`.
pub fn sign_request(
    credentials: &Credentials,
    host: &str,
    service: &str,
    action: &str,
    payload: &str,
    timestamp: i64,
) -> SignedRequest {
    let date = Utc
        .timestamp_opt(timestamp, 0)
        .single()
        .unwrap_or_else(Utc::now)
        .format("%Y-%m-%d")
        .to_string();

    // Step 1: canonical request.
    let canonical_headers = format!(
        "content-type:{CONTENT_TYPE}\nhost:{host}\nx-tc-action:{}\n",
        action.to_lowercase()
    );
    let hashed_payload = sha256_hex(payload.as_bytes());
    let canonical_request =
        format!("POST\n/\n\n{canonical_headers}\n{SIGNED_HEADERS}\n{hashed_payload}");

    // Step 2: string to sign.
    let credential_scope = format!("{date}/{service}/tc3_request");
    let string_to_sign = format!(
        "{ALGORITHM}\n{timestamp}\n{credential_scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    // Step 3: derive the signing key and sign.
    let secret_date = hmac_sha256(
        format!("TC3{}", credentials.secret_key).as_bytes(),
        date.as_bytes(),
    );
    let secret_service = hmac_sha256(&secret_date, service.as_bytes());
    let secret_signing = hmac_sha256(&secret_service, b"tc3_request");
    let signature = hex_encode(&hmac_sha256(&secret_signing, string_to_sign.as_bytes()));

    // Step 4: authorization header.
    let authorization = format!(
        "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        credentials.secret_id
    );

    SignedRequest {
        authorization,
        timestamp,
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Encode bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        use std::fmt::Write;
        let _ = write!(out, "{b:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("AKIDexample", "examplesecretkey")
    }

    fn sign(payload: &str) -> SignedRequest {
        sign_request(
            &creds(),
            "hunyuan.intl.tencentcloudapi.com",
            "hunyuan",
            "SubmitHunyuanTo3DProJob",
            payload,
            1_700_000_000,
        )
    }

    #[test]
    fn signing_is_deterministic() {
        let a = sign(r#"{"Prompt":"a chair"}"#);
        let b = sign(r#"{"Prompt":"a chair"}"#);
        assert_eq!(a.authorization, b.authorization);
    }

    #[test]
    fn authorization_carries_scope_and_headers() {
        let signed = sign(r#"{"Prompt":"a chair"}"#);
        assert!(signed.authorization.starts_with("TC3-HMAC-SHA256 Credential=AKIDexample/"));
        assert!(signed.authorization.contains("/hunyuan/tc3_request"));
        assert!(signed
            .authorization
            .contains("SignedHeaders=content-type;host;x-tc-action"));
        // 2023-11-14 is the UTC date of timestamp 1_700_000_000.
        assert!(signed.authorization.contains("2023-11-14"));
    }

    #[test]
    fn signature_is_64_hex_chars() {
        let signed = sign(r#"{"Prompt":"a chair"}"#);
        let sig = signed
            .authorization
            .rsplit("Signature=")
            .next()
            .unwrap();
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn payload_changes_signature() {
        let a = sign(r#"{"Prompt":"a chair"}"#);
        let b = sign(r#"{"Prompt":"a table"}"#);
        assert_ne!(a.authorization, b.authorization);
    }

    #[test]
    fn secret_key_changes_signature() {
        let other = Credentials::new("AKIDexample", "differentsecret");
        let a = sign(r#"{}"#);
        let b = sign_request(
            &other,
            "hunyuan.intl.tencentcloudapi.com",
            "hunyuan",
            "SubmitHunyuanTo3DProJob",
            r#"{}"#,
            1_700_000_000,
        );
        assert_ne!(a.authorization, b.authorization);
    }

    #[test]
    fn secret_key_never_appears_in_output() {
        let signed = sign(r#"{}"#);
        assert!(!signed.authorization.contains("examplesecretkey"));
    }

    #[test]
    fn hex_encode_lowercase() {
        assert_eq!(hex_encode(&[0x00, 0xff, 0x0a]), "00ff0a");
    }
}
