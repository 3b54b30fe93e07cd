//! Signed session tokens and the cookie that carries them.
//!
//! A session is a stateless HS256 token holding the user id, signed with
//! `SECRET_KEY`. "Remember me" sessions live 30 days in a persistent
//! cookie; plain sessions get a shorter token in a browser-session cookie.

use axum::{extract::FromRef, http::HeaderMap};
use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

pub(crate) use crate::auth::claims::Claims;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "autotrack_session";
const ISSUER: &str = "autotrack";

const EPHEMERAL_TTL: Duration = Duration::hours(12);
const REMEMBER_TTL: Duration = Duration::days(30);

/// Signing and verification keys for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.secret_key)
    }
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn sign(&self, user_id: i64, remember: bool) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = if remember { REMEMBER_TTL } else { EPHEMERAL_TTL };
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: (now + ttl).unix_timestamp() as usize,
            iss: ISSUER.to_string(),
            remember,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, remember, "session token signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

/// True when the request came through a TLS-terminating proxy, in which
/// case cookies are marked `Secure`.
pub fn via_tls_proxy(headers: &HeaderMap) -> bool {
    headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .map(|proto| proto.eq_ignore_ascii_case("https"))
        .unwrap_or(false)
}

/// Builds the session cookie. HttpOnly and SameSite=Lax always; Max-Age
/// only for "remember me" sessions so plain sessions end with the browser.
pub fn session_cookie(token: String, remember: bool, secure: bool) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure);
    if remember {
        builder = builder.max_age(REMEMBER_TTL);
    }
    builder.build()
}

/// Expired replacement used on logout.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> SessionKeys {
        SessionKeys::from_ref(&AppState::fake())
    }

    #[tokio::test]
    async fn sign_and_verify_round_trip() {
        let keys = make_keys();
        let token = keys.sign(42, false).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.iss, ISSUER);
        assert!(!claims.remember);
    }

    #[tokio::test]
    async fn remember_flag_survives_the_round_trip() {
        let keys = make_keys();
        let token = keys.sign(7, true).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert!(claims.remember);
        assert!(claims.exp - claims.iat > EPHEMERAL_TTL.whole_seconds() as usize);
    }

    #[tokio::test]
    async fn tokens_signed_with_another_key_are_rejected() {
        let token = SessionKeys::new("other-secret").sign(42, false).expect("sign");
        assert!(make_keys().verify(&token).is_err());
    }

    #[tokio::test]
    async fn tampered_tokens_are_rejected() {
        let keys = make_keys();
        let mut token = keys.sign(42, false).expect("sign");
        token.push('x');
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn remember_cookie_is_persistent_but_plain_is_not() {
        let remembered = session_cookie("tok".into(), true, false);
        assert_eq!(remembered.max_age(), Some(REMEMBER_TTL));

        let plain = session_cookie("tok".into(), false, false);
        assert_eq!(plain.max_age(), None);
    }

    #[test]
    fn cookie_flags_follow_the_proxy_detection() {
        let cookie = session_cookie("tok".into(), false, true);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));

        let cookie = session_cookie("tok".into(), false, false);
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn tls_proxy_detection_reads_the_forwarded_proto_header() {
        let mut headers = HeaderMap::new();
        assert!(!via_tls_proxy(&headers));
        headers.insert("x-forwarded-proto", "https".parse().expect("header"));
        assert!(via_tls_proxy(&headers));
        headers.insert("x-forwarded-proto", "http".parse().expect("header"));
        assert!(!via_tls_proxy(&headers));
    }
}
