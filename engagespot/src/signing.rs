//! HMAC-SHA256 user signatures for Engagespot HMAC authentication.
//!
//! When HMAC authentication is enabled on an Engagespot app, front-end SDKs must
//! present a signature of the user identifier alongside the user id:
//! - Signature is computed over the raw UTF-8 bytes of the user id
//! - The key is the raw UTF-8 bytes of the API secret
//! - The output is standard (padded) base64
//!
//! See: <https://documentation.engagespot.co/docs/HMAC-authentication/enabling-HMAC-authentication>

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &str, user_id: &str) -> HmacSha256 {
    // HMAC pads or hashes the key to the block size, so no key length is rejected
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(user_id.as_bytes());
    mac
}

/// Sign a user id with the API secret.
///
/// Returns the base64-encoded HMAC-SHA256 digest.
pub fn sign_user_id(secret: &str, user_id: &str) -> String {
    let signature = mac_for(secret, user_id).finalize().into_bytes();
    BASE64_STANDARD.encode(signature)
}

/// Verify a base64 user signature in constant time.
///
/// Returns `false` for signatures that are not valid base64.
pub fn verify_user_signature(secret: &str, user_id: &str, signature: &str) -> bool {
    let Ok(signature_bytes) = BASE64_STANDARD.decode(signature) else {
        return false;
    };

    mac_for(secret, user_id).verify_slice(&signature_bytes).is_ok()
}
