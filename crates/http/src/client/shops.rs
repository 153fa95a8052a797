//! Shop listing, details, ratings and opening hours

use super::{BrewClient, ClientError};
use crate::types::{OpeningHours, RatingRequest, Shop, ShopQuery, ShopUpdate};
use reqwest::Method;

impl BrewClient {
    /// List shops, optionally filtered by a search term
    pub async fn list_shops(&self, query: &ShopQuery) -> Result<Vec<Shop>, ClientError> {
        let mut request = self.request(Method::GET, "/shops");
        if let Some(search) = &query.search {
            request = request.query("search", search);
        }
        if let Some(page) = query.page {
            request = request.query("page", page);
        }
        self.execute(request).await
    }

    pub async fn get_shop(&self, shop_id: &str) -> Result<Shop, ClientError> {
        let request = self.resource(Method::GET, &["shops", shop_id])?;
        self.execute(request).await
    }

    /// Update shop details (owner only)
    pub async fn update_shop(&self, shop_id: &str, update: &ShopUpdate) -> Result<Shop, ClientError> {
        let request = self.resource(Method::PUT, &["shops", shop_id])?
            .json(update)?;
        self.execute(request).await
    }

    /// Rate a shop; returns the shop with its updated average
    pub async fn rate_shop(&self, shop_id: &str, rating: &RatingRequest) -> Result<Shop, ClientError> {
        if !(1..=5).contains(&rating.score) {
            return Err(ClientError::BadRequest(format!(
                "rating must be between 1 and 5, got {}",
                rating.score
            )));
        }
        let request = self.resource(Method::POST, &["shops", shop_id, "ratings"])?
            .json(rating)?;
        self.execute(request).await
    }

    pub async fn get_opening_hours(&self, shop_id: &str) -> Result<OpeningHours, ClientError> {
        let request = self.resource(Method::GET, &["shops", shop_id, "hours"])?;
        self.execute(request).await
    }

    pub async fn update_opening_hours(
        &self,
        shop_id: &str,
        hours: &OpeningHours,
    ) -> Result<OpeningHours, ClientError> {
        let request = self.resource(Method::PUT, &["shops", shop_id, "hours"])?
            .json(hours)?;
        self.execute(request).await
    }
}
