//! Signup and login flows

use crate::api::Backend;
use crate::error::{ClientError, Result};
use crate::state::SessionStore;
use crate::types::{LoginRequest, SignupRequest, Token};

/// Exact backend message that marks a successful signup
pub const SIGNUP_SUCCESS_MESSAGE: &str = "User created successfully";

pub const MISSING_FIELDS_MESSAGE: &str = "All fields are required!";

pub const PASSWORD_POLICY_MESSAGE: &str =
    "Password must include: Min 8 characters, 1 uppercase, 1 lowercase, 1 number, 1 special character";

const PASSWORD_SPECIALS: &str = "@$!%*?&";
const PASSWORD_MIN_LEN: usize = 8;

/// Which form the authentication screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Signup,
    Login,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Signup => AuthMode::Login,
            AuthMode::Login => AuthMode::Signup,
        }
    }
}

/// Password rule: 8+ characters from letters, digits and `@$!%*?&`,
/// with at least one of each class.
pub fn password_meets_policy(password: &str) -> bool {
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c);

    password.chars().count() >= PASSWORD_MIN_LEN
        && password.chars().all(allowed)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// Raw signup form input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    /// Check required fields and the password policy without touching the network.
    pub fn validate(&self) -> Result<SignupRequest> {
        if self.first_name.is_empty()
            || self.last_name.is_empty()
            || self.email.is_empty()
            || self.password.is_empty()
        {
            return Err(ClientError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }
        if !password_meets_policy(&self.password) {
            return Err(ClientError::Validation(PASSWORD_POLICY_MESSAGE.to_string()));
        }
        Ok(SignupRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            full_name: format!("{} {}", self.first_name, self.last_name),
        })
    }
}

/// Create an account. `Ok` means the screen should switch to login mode.
pub async fn signup(backend: &dyn Backend, form: &SignupForm) -> Result<()> {
    let req = form.validate()?;
    let resp = backend.signup(&req).await?;

    match resp.message.as_deref() {
        Some(SIGNUP_SUCCESS_MESSAGE) => {
            tracing::info!("Account created for {}", req.email);
            Ok(())
        }
        _ => Err(ClientError::rejected(resp.message, "Signup failed")),
    }
}

/// Log in, persist the token and populate the session.
///
/// A failed session fetch after a successful login is logged by the store
/// and does not fail the login.
pub async fn login(
    backend: &dyn Backend,
    session: &SessionStore,
    email: &str,
    password: &str,
) -> Result<Token> {
    let req = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };
    let resp = backend.login(&req).await?;

    if !resp.status {
        return Err(ClientError::rejected(resp.message, "Login failed"));
    }
    let user_id = resp
        .user_id
        .ok_or_else(|| ClientError::Decode("login response has no user_id".to_string()))?;

    let token = Token {
        user_id,
        full_name: resp.full_name.unwrap_or_default(),
        email: req.email,
    };
    session.persist_token(&token)?;
    tracing::info!("Logged in as user {}", user_id);

    let _ = session.refresh(backend, user_id).await;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Passw0rd!", true)]
    #[case("Abcdef1@", true)]
    #[case("Zz9$Zz9$Zz9$", true)]
    #[case("Pa0!", false)]
    #[case("password1!", false)]
    #[case("PASSWORD1!", false)]
    #[case("Password!!", false)]
    #[case("Password12", false)]
    #[case("Passw0rd#", false)]
    #[case("Pass w0rd!", false)]
    fn password_policy(#[case] password: &str, #[case] ok: bool) {
        assert_eq!(password_meets_policy(password), ok, "{password}");
    }

    fn form(password: &str) -> SignupForm {
        SignupForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: password.into(),
        }
    }

    #[test]
    fn valid_form_builds_full_name() {
        let req = form("Passw0rd!").validate().unwrap();
        assert_eq!(req.full_name, "Ada Lovelace");
        assert_eq!(req.email, "ada@example.com");
    }

    #[test]
    fn missing_field_is_reported_before_policy() {
        let mut f = form("weak");
        f.last_name.clear();
        assert_eq!(
            f.validate(),
            Err(ClientError::Validation(MISSING_FIELDS_MESSAGE.into()))
        );
    }

    #[test]
    fn weak_password_is_rejected() {
        assert_eq!(
            form("weakpass").validate(),
            Err(ClientError::Validation(PASSWORD_POLICY_MESSAGE.into()))
        );
    }

    #[test]
    fn mode_toggles() {
        assert_eq!(AuthMode::default(), AuthMode::Signup);
        assert_eq!(AuthMode::Signup.toggled(), AuthMode::Login);
        assert_eq!(AuthMode::Login.toggled(), AuthMode::Signup);
    }
}
