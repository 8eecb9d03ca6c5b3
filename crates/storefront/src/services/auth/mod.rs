//! Authentication service.
//!
//! Password login against an [`Authenticator`], with the resulting session
//! kept in the key-value store under the [`keys`](crate::models::session::keys)
//! slots.

mod error;

pub use error::AuthError;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use althawqa_core::{AccountKind, Email, Notification};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::models::session::{CurrentUser, keys};
use crate::services::notify::Notifier;
use crate::services::validation::{FORM_ERRORS_MESSAGE, FieldErrors, check_email};
use crate::storage::KeyValueStore;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Login form data as typed by the visitor.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
    #[serde(default)]
    pub remember: bool,
    #[serde(default, rename = "type")]
    pub kind: AccountKind,
}

/// A validated login attempt.
#[derive(Debug)]
pub struct LoginRequest {
    pub email: Email,
    pub password: SecretString,
    pub remember: bool,
    pub kind: AccountKind,
}

impl LoginForm {
    /// Validate the form, consuming it.
    ///
    /// # Errors
    ///
    /// Returns field errors for a malformed email or a short password.
    pub fn into_request(self) -> std::result::Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = check_email(&mut errors, "email", &self.email);
        if !validate_password(&self.password) {
            errors.add(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
            );
        }

        match email {
            Some(email) if errors.is_empty() => Ok(LoginRequest {
                email,
                password: self.password,
                remember: self.remember,
                kind: self.kind,
            }),
            _ => Err(errors),
        }
    }
}

fn validate_password(password: &SecretString) -> bool {
    password.expose_secret().chars().count() >= MIN_PASSWORD_LENGTH
}

/// Identity returned by an [`Authenticator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub name: String,
    pub email: Email,
    pub kind: AccountKind,
}

/// Checks credentials.
pub trait Authenticator: Send + Sync {
    fn authenticate(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = std::result::Result<AuthenticatedUser, AuthError>> + Send;
}

struct DemoAccount {
    email: &'static str,
    password: &'static str,
    name: &'static str,
}

const DEMO_CUSTOMERS: &[DemoAccount] = &[
    DemoAccount {
        email: "customer@example.com",
        password: "123456",
        name: "Demo Customer",
    },
    DemoAccount {
        email: "user@test.com",
        password: "password",
        name: "Regular User",
    },
];

const DEMO_ADMINS: &[DemoAccount] = &[
    DemoAccount {
        email: "admin@althawqa.com",
        password: "admin123",
        name: "System Administrator",
    },
    DemoAccount {
        email: "manager@test.com",
        password: "manager123",
        name: "Restaurant Manager",
    },
];

/// Built-in accounts for demos, checked after a simulated round trip.
///
/// Each portal has its own accounts; an admin cannot sign in through the
/// customer portal and vice versa.
#[derive(Debug, Clone)]
pub struct DemoAuthenticator {
    delay: Duration,
}

impl DemoAuthenticator {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    fn lookup(request: &LoginRequest) -> Option<&'static DemoAccount> {
        let accounts = match request.kind {
            AccountKind::Customer => DEMO_CUSTOMERS,
            AccountKind::Admin => DEMO_ADMINS,
        };

        accounts.iter().find(|account| {
            account.email == request.email.as_str()
                && account.password == request.password.expose_secret()
        })
    }
}

impl Authenticator for DemoAuthenticator {
    fn authenticate(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = std::result::Result<AuthenticatedUser, AuthError>> + Send {
        let delay = self.delay;
        let result = Self::lookup(request)
            .map(|account| AuthenticatedUser {
                name: account.name.to_owned(),
                email: request.email.clone(),
                kind: request.kind,
            })
            .ok_or(AuthError::InvalidCredentials);

        async move {
            tokio::time::sleep(delay).await;
            result
        }
    }
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The form had field errors; nothing was checked.
    Invalid(FieldErrors),
    /// The authenticator refused the credentials.
    Rejected(AuthError),
    /// The session was stored.
    LoggedIn {
        user: CurrentUser,
        /// Page to send the user to.
        redirect_to: &'static str,
    },
}

/// Logs users in and out.
pub struct LoginService<A> {
    authenticator: A,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
}

impl<A: Authenticator> LoginService<A> {
    pub fn new(authenticator: A, storage: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            authenticator,
            storage,
            notifier,
        }
    }

    /// Validate, authenticate and store the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the session could not be written.
    /// Form and credential problems are reported in the outcome instead.
    #[instrument(skip_all, fields(kind = %form.kind))]
    pub async fn login(&self, form: LoginForm) -> Result<LoginOutcome> {
        let request = match form.into_request() {
            Ok(request) => request,
            Err(errors) => {
                self.notifier.notify(Notification::error(FORM_ERRORS_MESSAGE));
                return Ok(LoginOutcome::Invalid(errors));
            }
        };

        let authenticated = match self.authenticator.authenticate(&request).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(email = %request.email, error = %e, "Login rejected");
                self.notifier.notify(Notification::error(e.user_message()));
                return Ok(LoginOutcome::Rejected(e));
            }
        };

        let user = CurrentUser {
            name: authenticated.name,
            email: authenticated.email,
            kind: authenticated.kind,
            login_time: Utc::now(),
        };
        self.store_session(&user).map_err(AppError::captured)?;

        set_sentry_user(&user.email, Some(user.email.as_str()));
        tracing::info!(
            email = %user.email,
            kind = %user.kind,
            remember = request.remember,
            "User logged in"
        );
        self.notifier.notify(Notification::success(format!(
            "Welcome back! Logged in successfully as {}",
            user.kind
        )));

        let redirect_to = user.kind.landing_page();
        Ok(LoginOutcome::LoggedIn { user, redirect_to })
    }

    /// The logged-in user, if any.
    ///
    /// An unreadable session is treated as logged out.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the store cannot be read.
    pub fn current_user(&self) -> Result<Option<CurrentUser>> {
        if self.storage.get(keys::IS_LOGGED_IN)?.as_deref() != Some("true") {
            return Ok(None);
        }

        let Some(raw) = self.storage.get(keys::CURRENT_USER)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "Stored user is unreadable, treating as logged out");
                Ok(None)
            }
        }
    }

    /// Forget the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if a session key could not be removed.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<()> {
        for key in [keys::CURRENT_USER, keys::IS_LOGGED_IN, keys::USER_TYPE] {
            self.storage.remove(key)?;
        }
        clear_sentry_user();
        tracing::info!("User logged out");
        Ok(())
    }

    fn store_session(&self, user: &CurrentUser) -> Result<()> {
        let json = serde_json::to_string(user)?;
        self.storage.set(keys::CURRENT_USER, &json)?;
        self.storage.set(keys::IS_LOGGED_IN, "true")?;
        self.storage.set(keys::USER_TYPE, &user.kind.to_string())?;
        Ok(())
    }
}
