use axum::{
    extract::{FromRef, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthPage, CredentialValues, LoginForm, SignupForm},
        password::{hash_password, verify_password},
        repo::User,
        session::{clear_session_cookie, session_cookie, via_tls_proxy, SessionKeys},
    },
    error::{form_rejection, is_unique_violation, AppError, GENERIC_MESSAGE},
    flash,
    state::AppState,
    validate::FieldError,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password.";
const MIN_PASSWORD_LEN: usize = 6;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub async fn signup_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = flash::take(jar);
    (jar, Json(AuthPage { flash }))
}

pub async fn login_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = flash::take(jar);
    (jar, Json(AuthPage { flash }))
}

#[instrument(skip(state, jar, headers, form))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let email = form.email.trim().to_lowercase();
    let values = CredentialValues { email: &email };

    let mut errors = Vec::new();
    if email.is_empty() || form.password.is_empty() {
        errors.push(FieldError::new("form", "Email and password are required."));
    } else {
        if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Please enter a valid email address."));
        }
        if form.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters.",
            ));
        }
    }
    if !errors.is_empty() {
        warn!(email = %email, "signup rejected");
        return Ok(form_rejection(StatusCode::UNPROCESSABLE_ENTITY, &errors, &values));
    }

    let mut tx = state.db.begin().await?;
    if User::find_by_email(&mut *tx, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        let errors = [FieldError::new("email", "That email is already registered.")];
        return Ok(form_rejection(StatusCode::UNPROCESSABLE_ENTITY, &errors, &values));
    }

    let hash = hash_password(&form.password)?;
    let user = match User::create(&mut *tx, &email, &hash).await {
        Ok(user) => user,
        Err(err) if is_unique_violation(&err) => {
            let errors = [FieldError::new("email", "That email is already registered.")];
            return Ok(form_rejection(StatusCode::UNPROCESSABLE_ENTITY, &errors, &values));
        }
        Err(err) => {
            error!(error = %err, "create user failed");
            let errors = [FieldError::new("form", GENERIC_MESSAGE)];
            return Ok(form_rejection(StatusCode::INTERNAL_SERVER_ERROR, &errors, &values));
        }
    };
    tx.commit().await?;

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(user.id, false)?;
    let jar = jar.add(session_cookie(token, false, via_tls_proxy(&headers)));
    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(flash::redirect(
        jar,
        flash::Level::Success,
        "Account created successfully.",
        "/vehicles",
    ))
}

#[instrument(skip(state, jar, headers, form))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let email = form.email.trim().to_lowercase();
    // One response shape for unknown email and wrong password alike.
    let rejected = || {
        let errors = [FieldError::new("credentials", INVALID_CREDENTIALS)];
        form_rejection(StatusCode::UNAUTHORIZED, &errors, &CredentialValues { email: &email })
    };

    let mut conn = state.db.acquire().await?;
    let Some(user) = User::find_by_email(&mut *conn, &email).await? else {
        warn!(email = %email, "login with unknown email");
        return Ok(rejected());
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(user_id = user.id, "login with wrong password");
        return Ok(rejected());
    }

    let remember = form.remember_me();
    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(user.id, remember)?;
    let jar = jar.add(session_cookie(token, remember, via_tls_proxy(&headers)));
    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(flash::redirect(
        jar,
        flash::Level::Success,
        "Logged in successfully.",
        "/vehicles",
    ))
}

#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> Response {
    let jar = jar.add(clear_session_cookie());
    let jar = flash::set(jar, flash::Level::Info, "You have been signed out.");
    (jar, Redirect::to("/login")).into_response()
}
