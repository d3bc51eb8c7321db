use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use shared_models::accounts::Role;
use shared_models::auth::{Identity, JwtClaims, JwtHeader};

type HmacSha256 = Hmac<Sha256>;

/// Validates an HS256 token issued by the identity provider and returns the
/// caller it describes.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Identity, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let header: JwtHeader = decode_segment(header_b64)
        .map_err(|_| "Invalid token header".to_string())?;
    if header.alg != "HS256" {
        debug!("Rejected token signed with {}", header.alg);
        return Err("Unsupported token algorithm".to_string());
    }

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims: JwtClaims = decode_segment(claims_b64)?;

    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err("Token expired".to_string());
        }
    }

    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| "Invalid subject claim".to_string())?;

    let role = claims
        .role
        .as_deref()
        .map(str::parse::<Role>)
        .transpose()
        .map_err(|_| "Unknown role claim".to_string())?;

    let issued_at = claims
        .iat
        .and_then(|timestamp| Utc.timestamp_opt(timestamp as i64, 0).single());

    let identity = Identity {
        user_id,
        username: claims.username,
        role,
        issued_at,
    };

    debug!("Token validated successfully for user: {}", identity.user_id);
    Ok(identity)
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| "Invalid claims encoding".to_string())?;

    serde_json::from_slice(&bytes).map_err(|e| {
        debug!("Failed to parse token segment: {}", e);
        "Invalid claims format".to_string()
    })
}
