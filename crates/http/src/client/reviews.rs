use super::{BrewClient, ClientError};
use crate::types::Review;
use reqwest::Method;

impl BrewClient {
    /// Reviews left on a shop, newest first as returned by the backend
    pub async fn list_reviews(&self, shop_id: &str) -> Result<Vec<Review>, ClientError> {
        let request = self.resource(Method::GET, &["shops", shop_id, "reviews"])?;
        self.execute(request).await
    }
}
