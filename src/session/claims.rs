//! Decode-only access to the payload segment of an access token.
//!
//! Nothing here checks signatures or expiry. The values are used to prefill
//! form fields such as a task's creator; the server re-derives identity from
//! the bearer token on every request.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde_json::{Map, Value};

// JWT segments are base64url without padding, but tolerate padded input too
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode the claims object of a `header.payload.signature` token.
///
/// Returns `None` for anything that is not three dot-separated segments whose
/// middle segment is base64url-encoded JSON object.
pub fn decode_claims(token: &str) -> Option<Map<String, Value>> {
    let mut segments = token.split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }

    let bytes = PAYLOAD_ENGINE.decode(payload.trim()).ok()?;
    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(claims) => Some(claims),
        _ => None,
    }
}

/// The `user_id` claim, when present, as the value the API expects in payloads
pub fn user_id(token: &str) -> Option<Value> {
    decode_claims(token)?
        .remove("user_id")
        .filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token_for(claims: Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-secret")).unwrap()
    }

    #[test]
    fn reads_claims_without_the_signing_key() {
        let token = token_for(json!({ "user_id": 7, "token_type": "access", "exp": 1 }));

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims["token_type"], "access");
        assert_eq!(user_id(&token), Some(json!(7)));
    }

    #[test]
    fn accepts_padded_payload_segment() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(br#"{"user_id":"u-1"}"#);
        let token = format!("h.{payload}.s");
        assert_eq!(user_id(&token), Some(json!("u-1")));
    }

    #[test]
    fn malformed_tokens_decode_to_none() {
        assert_eq!(decode_claims(""), None);
        assert_eq!(decode_claims("A"), None);
        assert_eq!(decode_claims("a.b"), None);
        assert_eq!(decode_claims("a.!!!.c"), None);
        assert_eq!(decode_claims("a.b.c.d"), None);

        let array_payload = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(b"[1,2]");
        assert_eq!(decode_claims(&format!("h.{array_payload}.s")), None);
    }

    #[test]
    fn missing_user_id_is_none() {
        let token = token_for(json!({ "sub": "someone", "exp": 1 }));
        assert_eq!(user_id(&token), None);
    }
}
