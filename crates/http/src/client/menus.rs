//! Menu management

use super::{BrewClient, ClientError};
use crate::types::{MenuItem, MenuItemInput};
use reqwest::Method;

impl BrewClient {
    pub async fn get_menu(&self, shop_id: &str) -> Result<Vec<MenuItem>, ClientError> {
        let request = self.resource(Method::GET, &["shops", shop_id, "menu"])?;
        self.execute(request).await
    }

    pub async fn add_menu_item(
        &self,
        shop_id: &str,
        item: &MenuItemInput,
    ) -> Result<MenuItem, ClientError> {
        let request = self.resource(Method::POST, &["shops", shop_id, "menu", "items"])?
            .json(item)?;
        self.execute(request).await
    }

    pub async fn update_menu_item(
        &self,
        shop_id: &str,
        item_id: &str,
        item: &MenuItemInput,
    ) -> Result<MenuItem, ClientError> {
        let request = self.resource(Method::PUT, &["shops", shop_id, "menu", "items", item_id])?
            .json(item)?;
        self.execute(request).await
    }

    pub async fn delete_menu_item(&self, shop_id: &str, item_id: &str) -> Result<(), ClientError> {
        let request = self.resource(Method::DELETE, &["shops", shop_id, "menu", "items", item_id])?;
        self.execute_empty(request).await
    }
}
