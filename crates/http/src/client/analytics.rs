//! Shop analytics

use super::{BrewClient, ClientError};
use crate::types::{AnalyticsReport, DateRange};
use reqwest::Method;

impl BrewClient {
    /// Daily visits for a shop within `range` (inclusive)
    pub async fn get_analytics(
        &self,
        shop_id: &str,
        range: &DateRange,
    ) -> Result<AnalyticsReport, ClientError> {
        let request = self.resource(Method::GET, &["shops", shop_id, "analytics"])?
            .query("from", range.from)
            .query("to", range.to);

        let mut report: AnalyticsReport = self.execute(request).await?;
        report.retain_range(range);
        Ok(report)
    }
}
