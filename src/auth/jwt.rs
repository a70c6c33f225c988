use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

/// Bearer tokens live exactly one hour.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// HMAC-SHA256 signing and verification keys, derived once from the secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
        }
    }

    pub fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        self.sign_at(user_id, OffsetDateTime::now_utc())
    }

    pub(crate) fn sign_at(
        &self,
        user_id: i64,
        issued_at: OffsetDateTime,
    ) -> anyhow::Result<String> {
        let exp = issued_at + TimeDuration::seconds(TOKEN_TTL_SECS);
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.unix_timestamp(),
            exp: exp.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    /// Checks signature, issuer, audience and expiry (no leeway).
    pub fn claims(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_required_spec_claims(&["exp", "iat", "sub", "iss", "aud"]);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    /// Resolves a token to the user id it was issued for.
    pub fn verify(&self, token: &str) -> anyhow::Result<i64> {
        let claims = self.claims(token)?;
        let user_id = claims
            .sub
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| anyhow::anyhow!("token subject is not a user id"))?;
        debug!(user_id, "jwt verified");
        Ok(user_id)
    }
}

#[cfg(test)]
pub(crate) fn test_keys() -> JwtKeys {
    JwtKeys::from_config(&JwtConfig {
        secret: "test-secret".into(),
        issuer: "test-issuer".into(),
        audience: "test-aud".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    fn forge(keys: &JwtKeys, sub: &str) -> String {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: sub.into(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
        };
        encode(&Header::default(), &claims, &keys.encoding).expect("encode")
    }

    #[test]
    fn sign_and_verify_returns_subject() {
        let keys = test_keys();
        let token = keys.sign(42).expect("sign");
        assert_eq!(keys.verify(&token).expect("verify"), 42);
    }

    #[test]
    fn token_lives_one_hour() {
        let keys = test_keys();
        let claims = keys.claims(&keys.sign(1).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
        assert_eq!(claims.sub, "1");
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = test_keys();
        let two_hours_ago = OffsetDateTime::now_utc() - TimeDuration::hours(2);
        let token = keys.sign_at(7, two_hours_ago).unwrap();
        let err = keys.verify(&token).unwrap_err();
        let kind = err
            .downcast_ref::<jsonwebtoken::errors::Error>()
            .map(|e| e.kind());
        assert!(matches!(kind, Some(ErrorKind::ExpiredSignature)));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let other = JwtKeys::from_config(&JwtConfig {
            secret: "another-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
        });
        let token = other.sign(3).unwrap();
        assert!(test_keys().verify(&token).is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let keys = test_keys();
        let token = keys.sign(3).unwrap();
        let foreign = keys.sign(4).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let foreign_payload = foreign.split('.').nth(1).unwrap();
        // signature of token 3 over payload of token 4
        let spliced = format!("{}.{}.{}", parts[0], foreign_payload, parts[2]);
        assert!(keys.verify(&spliced).is_err());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let keys = test_keys();
        let other = JwtKeys::from_config(&JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "someone-else".into(),
        });
        assert!(keys.verify(&other.sign(5).unwrap()).is_err());
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert!(test_keys().verify("not.a.jwt").is_err());
        assert!(test_keys().verify("").is_err());
    }

    #[test]
    fn non_positive_or_non_numeric_subject_is_rejected() {
        let keys = test_keys();
        for sub in ["abc", "0", "-4", "1.5", ""] {
            let token = forge(&keys, sub);
            assert!(keys.claims(&token).is_ok(), "signature should be fine for {sub:?}");
            assert!(keys.verify(&token).is_err(), "subject {sub:?} must be refused");
        }
    }
}
