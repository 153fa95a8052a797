//! Signed-in user's profile

use super::{BrewClient, ClientError};
use crate::types::{Profile, ProfileUpdate};
use reqwest::Method;

impl BrewClient {
    pub async fn get_profile(&self) -> Result<Profile, ClientError> {
        let request = self.request(Method::GET, "/profile");
        self.execute(request).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ClientError> {
        let request = self.request(Method::PUT, "/profile").json(update)?;
        self.execute(request).await
    }
}
