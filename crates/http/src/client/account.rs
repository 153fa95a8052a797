//! Sign-in, sign-out and the active shop

use super::{BrewClient, ClientError};
use crate::types::{LoginRequest, LoginResponse, RefreshRequest};
use reqwest::Method;

impl BrewClient {
    /// Sign in and persist the issued tokens.
    ///
    /// Login is a public call: a 401 here means bad credentials and never
    /// starts a refresh or a teardown.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<LoginResponse, ClientError> {
        let request = self
            .request(Method::POST, "/auth/login")
            .without_session()
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })?;

        let response: LoginResponse = self.execute(request).await?;
        self.session()
            .store_login(&response.tokens, username, remember_me)?;
        info!(username, remember_me, "Signed in");

        Ok(response)
    }

    /// Sign out. The server is told on a best-effort basis; local
    /// credentials are cleared regardless and no expiry is signalled.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if let Some(refresh_token) = self.session().refresh_token()? {
            let request = self
                .request(Method::POST, "/auth/logout")
                .without_session()
                .json(&RefreshRequest { refresh_token })?;

            if let Err(err) = self.execute_empty(request).await {
                debug!(error = %err, "Server-side logout failed");
            }
        }

        self.session().clear_session()?;
        info!("Signed out");
        Ok(())
    }

    /// Remember which shop the owner is managing
    pub fn select_shop(&self, shop_id: &str) -> Result<(), ClientError> {
        Ok(self.session().set_active_shop(shop_id)?)
    }

    /// Shop previously chosen with [`Self::select_shop`]
    pub fn active_shop(&self) -> Result<Option<String>, ClientError> {
        Ok(self.session().active_shop()?)
    }
}
