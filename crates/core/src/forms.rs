//! Login and registration forms
//!
//! Validation runs entirely on the client. A form that fails validation never
//! produces a request value, so nothing reaches the network.

use crate::types::{LoginRequest, RegisterRequest};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Client-side validation failure, displayed next to the form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("You must accept the Terms of Service and Privacy Policy")]
    TermsNotAccepted,

    #[error("Email is required")]
    MissingEmail,

    #[error("Password is required")]
    MissingPassword,
}

/// Sign-in form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check the form and build the login payload
    ///
    /// # Errors
    ///
    /// Returns the first failing check
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let email = required_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::MissingPassword);
        }

        Ok(LoginRequest {
            email,
            password: self.password.clone(),
        })
    }
}

/// Account creation form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

impl RegisterForm {
    /// Check the form and build the registration payload
    ///
    /// Checks run in display order: password confirmation, terms consent,
    /// then required fields.
    ///
    /// # Errors
    ///
    /// Returns the first failing check
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if !self.accept_terms {
            return Err(ValidationError::TermsNotAccepted);
        }
        let email = required_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::MissingPassword);
        }

        Ok(RegisterRequest {
            email,
            password: self.password.clone(),
            first_name: optional(&self.first_name),
            last_name: optional(&self.last_name),
        })
    }
}

fn required_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    Ok(email.to_string())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Submission state of a form: busy flag and the message shown beside it
///
/// The busy flag only mirrors a disabled submit button. It does not queue,
/// dedupe or cancel overlapping submissions.
#[derive(Debug, Default)]
pub struct FormState {
    busy: AtomicBool,
    error: Mutex<Option<String>>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Last error displayed for this form
    pub fn error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the displayed error
    pub fn set_error(&self, message: Option<String>) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = message;
    }

    /// Mark the form busy until the returned guard is dropped
    ///
    /// Clears the previous error, like a fresh submit does.
    pub fn begin(&self) -> BusyGuard<'_> {
        self.set_error(None);
        self.busy.store(true, Ordering::SeqCst);
        BusyGuard { state: self }
    }
}

/// Clears the busy flag on drop
#[derive(Debug)]
pub struct BusyGuard<'a> {
    state: &'a FormState,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.busy.store(false, Ordering::SeqCst);
    }
}
