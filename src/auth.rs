use base64::Engine;
use chrono::{DateTime, Utc};

use crate::ecr::RawAuthRecord;
use crate::error::{LoginError, Result};

/// Decoded registry credentials, as exposed to templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRecord {
    /// The token exactly as ECR returned it
    pub token: String,
    pub user: String,
    pub pass: String,
    pub proxy_endpoint: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthRecord {
    /// Decode an ECR token (base64 of "user:password")
    pub fn decode(raw: &RawAuthRecord) -> Result<Self> {
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&raw.authorization_token)
            .map_err(|e| LoginError::Decode(format!("token is not valid base64: {}", e)))?;

        let decoded = String::from_utf8(decoded)
            .map_err(|_| LoginError::Decode("token is not valid UTF-8".to_string()))?;

        // Passwords may contain ':' themselves
        let (user, pass) = decoded.split_once(':').ok_or_else(|| {
            LoginError::Decode(format!(
                "token for {} is not in user:password form",
                raw.proxy_endpoint
            ))
        })?;

        Ok(Self {
            token: raw.authorization_token.clone(),
            user: user.to_string(),
            pass: pass.to_string(),
            proxy_endpoint: raw.proxy_endpoint.clone(),
            expires_at: raw.expires_at,
        })
    }
}

/// Decode every record, keeping order and stopping at the first failure
pub fn decode_all(raw: &[RawAuthRecord]) -> Result<Vec<AuthRecord>> {
    raw.iter().map(AuthRecord::decode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    const ENDPOINT: &str = "https://123456789012.dkr.ecr.us-east-1.amazonaws.com";

    fn raw(token: &str) -> RawAuthRecord {
        RawAuthRecord {
            authorization_token: token.to_string(),
            proxy_endpoint: ENDPOINT.to_string(),
            expires_at: DateTime::from_timestamp(1_900_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn test_decode_user_and_password() {
        let token = STANDARD.encode("AWS:hunter2");
        let record = AuthRecord::decode(&raw(&token)).unwrap();
        assert_eq!(record.user, "AWS");
        assert_eq!(record.pass, "hunter2");
        assert_eq!(record.token, token);
        assert_eq!(record.proxy_endpoint, ENDPOINT);
    }

    #[test]
    fn test_password_keeps_colons() {
        let token = STANDARD.encode("AWS:pa:ss:word");
        let record = AuthRecord::decode(&raw(&token)).unwrap();
        assert_eq!(record.user, "AWS");
        assert_eq!(record.pass, "pa:ss:word");
    }

    #[test]
    fn test_empty_password_is_allowed() {
        let token = STANDARD.encode("AWS:");
        let record = AuthRecord::decode(&raw(&token)).unwrap();
        assert_eq!(record.user, "AWS");
        assert_eq!(record.pass, "");
    }

    #[test]
    fn test_missing_colon_is_decode_error() {
        let token = STANDARD.encode("AWSonly");
        let err = AuthRecord::decode(&raw(&token)).unwrap_err();
        assert!(matches!(err, LoginError::Decode(_)));
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        for token in ["not base64!", "QVdTOmh1bnRlcjI", "_-_-"] {
            let err = AuthRecord::decode(&raw(token)).unwrap_err();
            assert!(matches!(err, LoginError::Decode(_)), "accepted {:?}", token);
        }
    }

    #[test]
    fn test_non_utf8_is_rejected() {
        let token = STANDARD.encode([0xff, 0xfe, b':', b'x']);
        let err = AuthRecord::decode(&raw(&token)).unwrap_err();
        assert!(matches!(err, LoginError::Decode(_)));
    }

    #[test]
    fn test_decode_all_preserves_order() {
        let records = decode_all(&[
            raw(&STANDARD.encode("first:1")),
            raw(&STANDARD.encode("second:2")),
            raw(&STANDARD.encode("third:3")),
        ])
        .unwrap();
        let users: Vec<_> = records.iter().map(|r| r.user.as_str()).collect();
        assert_eq!(users, ["first", "second", "third"]);
    }

    #[test]
    fn test_decode_all_fails_on_any_bad_record() {
        let result = decode_all(&[raw(&STANDARD.encode("ok:1")), raw(&STANDARD.encode("bad"))]);
        assert!(matches!(result, Err(LoginError::Decode(_))));
    }
}
