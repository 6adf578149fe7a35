//! Authentication service: the sign-in and sign-up flows
//!
//! Validates the form, calls the endpoint, and on success stores the token and
//! user record in the session. Failures of any kind, validation included, come
//! back as a single [`ClientError`] and are also recorded as the form's
//! displayed error.

use crate::client::{ApiClient, ClientError};
use crate::types::AuthResponse;
use splitalgo_core::identity::{self, CredentialOutcome, ExternalCredential};
use splitalgo_core::{FormState, LoginForm, RegisterForm, Session};
use std::future::Future;
use tracing::{info, warn};

/// Authentication API service
pub struct AuthService {
    client: ApiClient,
    form: FormState,
}

impl AuthService {
    /// Create a new auth service around `client`
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            form: FormState::new(),
        }
    }

    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    pub const fn session(&self) -> &Session {
        self.client.session()
    }

    /// Submission state of the current form
    pub const fn form(&self) -> &FormState {
        &self.form
    }

    /// Sign in with email and password
    ///
    /// # Errors
    ///
    /// Returns a validation error without touching the network, or the API
    /// error from the login call
    pub async fn login(&self, form: &LoginForm) -> Result<AuthResponse, ClientError> {
        let request = self.validated(form.validate())?;
        self.submit("login", self.client.login(&request)).await
    }

    /// Create an account and sign in with it
    ///
    /// # Errors
    ///
    /// Returns a validation error without touching the network, or the API
    /// error from the registration call
    pub async fn register(&self, form: &RegisterForm) -> Result<AuthResponse, ClientError> {
        let request = self.validated(form.validate())?;
        self.submit("register", self.client.register(&request))
            .await
    }

    /// Forget the stored session
    pub fn logout(&self) {
        self.session().clear();
        info!("Signed out");
    }

    /// Success callback of the external identity widget
    ///
    /// The credential is acknowledged but not exchanged; the session is left
    /// unchanged.
    pub fn external_credential(&self, credential: &ExternalCredential) -> CredentialOutcome {
        identity::accept_external_credential(credential)
    }

    fn validated<T>(
        &self,
        result: Result<T, splitalgo_core::ValidationError>,
    ) -> Result<T, ClientError> {
        result.map_err(|err| {
            warn!(error = %err, "Form rejected before submission");
            self.form.set_error(Some(err.to_string()));
            ClientError::from(err)
        })
    }

    async fn submit(
        &self,
        action: &'static str,
        call: impl Future<Output = Result<AuthResponse, ClientError>>,
    ) -> Result<AuthResponse, ClientError> {
        let _busy = self.form.begin();

        match call.await {
            Ok(response) => {
                self.session()
                    .establish(&response.access_token, &response.user);
                info!(action, "Authentication succeeded");
                Ok(response)
            }
            Err(err) => {
                warn!(action, error = %err, "Authentication failed");
                self.form.set_error(Some(err.to_string()));
                Err(err)
            }
        }
    }
}
