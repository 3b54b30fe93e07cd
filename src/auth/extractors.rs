use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::auth::session::{SessionKeys, SESSION_COOKIE};

/// The authenticated user for this request, established from the verified
/// session cookie. Rejection redirects to the login page; the attempted
/// action is discarded.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i64,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| Redirect::to("/login"))?;

        let keys = SessionKeys::from_ref(state);
        match keys.verify(&token) {
            Ok(claims) => Ok(CurrentUser { id: claims.sub }),
            Err(_) => {
                warn!("invalid or expired session token");
                Err(Redirect::to("/login"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::FromRequestParts, http::Request};

    use crate::state::AppState;

    fn parts_with_cookie(cookie: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/vehicles");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        let (parts, ()) = builder.body(()).expect("request").into_parts();
        parts
    }

    #[tokio::test]
    async fn valid_session_cookie_yields_the_user_id() {
        let state = AppState::fake();
        let keys = SessionKeys::from_ref(&state);
        let token = keys.sign(42, false).expect("sign");
        let mut parts = parts_with_cookie(Some(format!("{SESSION_COOKIE}={token}")));

        let user = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .expect("authenticated");
        assert_eq!(user.id, 42);
    }

    #[tokio::test]
    async fn missing_cookie_redirects_to_login() {
        let state = AppState::fake();
        let mut parts = parts_with_cookie(None);
        assert!(CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn forged_token_redirects_to_login() {
        let state = AppState::fake();
        let forged = SessionKeys::new("attacker-secret")
            .sign(42, false)
            .expect("sign");
        let mut parts = parts_with_cookie(Some(format!("{SESSION_COOKIE}={forged}")));
        assert!(CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .is_err());
    }
}
