//! Check-in QR codes

use super::{BrewClient, ClientError};
use crate::types::QrCode;
use reqwest::Method;

impl BrewClient {
    /// Issue a fresh, short-lived QR code for a shop
    pub async fn create_qr_code(&self, shop_id: &str) -> Result<QrCode, ClientError> {
        let request = self.resource(Method::POST, &["shops", shop_id, "qr"])?;
        self.execute(request).await
    }
}
