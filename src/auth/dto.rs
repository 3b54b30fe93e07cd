use serde::{Deserialize, Serialize};

use crate::flash::Flash;

/// Signup form body.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
}

/// Login form body. `remember` is the checkbox value when ticked.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: Option<String>,
}

impl LoginForm {
    pub fn remember_me(&self) -> bool {
        matches!(self.remember.as_deref(), Some("on" | "true" | "1"))
    }
}

/// Page model for the login and signup pages.
#[derive(Debug, Serialize)]
pub struct AuthPage {
    pub flash: Option<Flash>,
}

/// Echo of a rejected credential form. The password is never echoed.
#[derive(Debug, Serialize)]
pub struct CredentialValues<'a> {
    pub email: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remember_me_accepts_common_checkbox_values() {
        let form = |remember: Option<&str>| LoginForm {
            email: "a@x.com".into(),
            password: "secret1".into(),
            remember: remember.map(Into::into),
        };
        assert!(form(Some("on")).remember_me());
        assert!(form(Some("true")).remember_me());
        assert!(!form(Some("off")).remember_me());
        assert!(!form(None).remember_me());
    }

    #[test]
    fn credential_echo_never_contains_a_password_field() {
        let json = serde_json::to_string(&CredentialValues { email: "a@x.com" }).expect("json");
        assert!(!json.contains("password"));
    }
}
