//! Authentication API client methods

use super::{ApiClient, ClientError, Endpoint, RequestOptions};
use crate::types::{
    AuthResponse, ConnectWalletRequest, ConnectWalletResponse, LoginRequest, RegisterRequest, User,
};

impl ApiClient {
    /// Create an account
    ///
    /// Does not touch the session; see `AuthService` for the full sign-up flow.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        self.call(&Endpoint::Register, RequestOptions::post_json(request)?)
            .await
    }

    /// Exchange credentials for a token
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        self.call(&Endpoint::Login, RequestOptions::post_json(request)?)
            .await
    }

    /// Get current user info (requires authentication)
    pub async fn me(&self) -> Result<User, ClientError> {
        self.call(&Endpoint::Me, RequestOptions::get()).await
    }

    /// Attach a wallet address to the signed-in account
    pub async fn connect_wallet(
        &self,
        wallet_address: impl Into<String>,
    ) -> Result<ConnectWalletResponse, ClientError> {
        let request = ConnectWalletRequest {
            wallet_address: wallet_address.into(),
        };
        self.call(&Endpoint::ConnectWallet, RequestOptions::post_json(&request)?)
            .await
    }
}
