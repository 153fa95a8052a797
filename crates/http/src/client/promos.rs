//! Promotions

use super::{BrewClient, ClientError};
use crate::types::{Promotion, PromotionInput};
use reqwest::Method;

impl BrewClient {
    pub async fn list_promotions(&self, shop_id: &str) -> Result<Vec<Promotion>, ClientError> {
        let request = self.resource(Method::GET, &["shops", shop_id, "promos"])?;
        self.execute(request).await
    }

    pub async fn create_promotion(
        &self,
        shop_id: &str,
        promo: &PromotionInput,
    ) -> Result<Promotion, ClientError> {
        if promo.ends_at <= promo.starts_at {
            return Err(ClientError::BadRequest(
                "promotion must end after it starts".to_string(),
            ));
        }
        let request = self.resource(Method::POST, &["shops", shop_id, "promos"])?
            .json(promo)?;
        self.execute(request).await
    }

    pub async fn delete_promotion(&self, shop_id: &str, promo_id: &str) -> Result<(), ClientError> {
        let request = self.resource(Method::DELETE, &["shops", shop_id, "promos", promo_id])?;
        self.execute_empty(request).await
    }
}
