//! One-shot notices carried across a redirect in a cookie, read and cleared
//! by the next page load.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

const FLASH_COOKIE: &str = "autotrack_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
    Info,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    fn parse(raw: &str) -> Self {
        match raw {
            "success" => Self::Success,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Builds the one-shot cookie for a notice. Messages are fixed strings and
/// contain no cookie delimiters.
pub fn cookie(level: Level, message: &str) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, format!("{}|{}", level.as_str(), message)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn set(jar: CookieJar, level: Level, message: &str) -> CookieJar {
    jar.add(cookie(level, message))
}

/// Reads and clears the pending notice, if any.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(found) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = found.value().split_once('|').map(|(level, message)| Flash {
        level: Level::parse(level),
        message: message.to_string(),
    });
    let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/").build());
    (jar, flash)
}

/// Flash-then-redirect, the standard exit of every successful mutation.
pub fn redirect(jar: CookieJar, level: Level, message: &str, to: &str) -> Response {
    (set(jar, level, message), Redirect::to(to)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_take_round_trips_the_notice() {
        let jar = set(CookieJar::new(), Level::Success, "Vehicle added successfully.");
        let (_, flash) = take(jar);
        assert_eq!(
            flash,
            Some(Flash::new(Level::Success, "Vehicle added successfully."))
        );
    }

    #[test]
    fn take_clears_the_cookie() {
        let jar = set(CookieJar::new(), Level::Error, "Vehicle not found.");
        let (jar, _) = take(jar);
        // Removal is recorded as an expired cookie in the delta.
        let removed = jar.get(FLASH_COOKIE).map(|c| c.value().to_string());
        assert!(removed.is_none() || removed == Some(String::new()));
    }

    #[test]
    fn take_on_empty_jar_yields_nothing() {
        let (_, flash) = take(CookieJar::new());
        assert!(flash.is_none());
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(Level::parse("warning"), Level::Info);
    }

    #[test]
    fn cookie_is_http_only_and_lax() {
        let c = cookie(Level::Info, "You have been signed out.");
        assert_eq!(c.http_only(), Some(true));
        assert_eq!(c.same_site(), Some(SameSite::Lax));
        assert_eq!(c.path(), Some("/"));
    }
}
