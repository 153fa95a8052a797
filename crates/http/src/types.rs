//! Request and response bodies exchanged with the Brewdesk backend

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeDelta, Utc, Weekday};
use serde::{Deserialize, Serialize};

pub use brewdesk_core::TokenPair;

// Authentication

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login answer; the tokens are flattened into the body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    #[serde(default)]
    pub role: Option<AccountRole>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Customer,
    Owner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// A refresh answer may omit the token; that is treated as a failed refresh
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

// Shops

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub address: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f32>,
    #[serde(default)]
    pub rating_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRequest {
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Hours for one weekday; a day missing either time is closed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHours {
    pub weekday: Weekday,
    #[serde(default)]
    pub opens: Option<NaiveTime>,
    #[serde(default)]
    pub closes: Option<NaiveTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpeningHours {
    pub days: Vec<DailyHours>,
}

// Menus

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price_cents: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub available: bool,
}

const fn default_true() -> bool {
    true
}

// Promotions

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Promotion {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now && now < self.ends_at
    }

    /// Active and ending within `window` of `now`
    pub fn is_near_expiry(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.is_active(now) && self.ends_at - now <= window
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

// Reviews

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub score: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Profile

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// Analytics

/// Inclusive date range used to filter analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Range covering `from..=to`; `None` when `to` precedes `from`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    /// The `days` days ending on `today`, inclusive; `None` when the start
    /// would fall outside the supported calendar
    pub fn last_days(today: NaiveDate, days: u32) -> Option<Self> {
        let span = TimeDelta::try_days(i64::from(days.saturating_sub(1)))?;
        let from = today.checked_sub_signed(span)?;
        Some(Self { from, to: today })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyVisits {
    pub date: NaiveDate,
    pub visits: u32,
    #[serde(default)]
    pub scans: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub shop_id: String,
    pub daily: Vec<DailyVisits>,
}

impl AnalyticsReport {
    /// Drop days outside `range`; backends may pad the series
    pub fn retain_range(&mut self, range: &DateRange) {
        self.daily.retain(|day| range.contains(day.date));
    }

    pub fn total_visits(&self) -> u64 {
        self.daily.iter().map(|day| u64::from(day.visits)).sum()
    }
}

// QR codes

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCode {
    pub code: String,
    pub image_url: String,
    pub expires_at: DateTime<Utc>,
}

impl QrCode {
    /// Time left before the code expires, zero once it has
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn test_promotion_near_expiry_window() {
        let promo = Promotion {
            id: "p1".into(),
            title: "Happy hour".into(),
            description: None,
            starts_at: at(8),
            ends_at: at(18),
        };

        assert!(promo.is_near_expiry(at(16), Duration::hours(2)));
        assert!(!promo.is_near_expiry(at(10), Duration::hours(2)));
        // expired promotions are no longer "near" expiry
        assert!(!promo.is_near_expiry(at(19), Duration::hours(2)));
    }

    #[test]
    fn test_qr_remaining_saturates_at_zero() {
        let qr = QrCode {
            code: "abc".into(),
            image_url: "https://cdn.test/abc.png".into(),
            expires_at: at(12),
        };
        assert_eq!(qr.remaining(at(11)), Duration::hours(1));
        assert_eq!(qr.remaining(at(13)), Duration::zero());
        assert!(qr.is_expired(at(12)));
    }

    #[test]
    fn test_date_range_filters_report() {
        let range = DateRange::new(date(2), date(4)).unwrap();
        let mut report = AnalyticsReport {
            shop_id: "s1".into(),
            daily: (1..=5)
                .map(|day| DailyVisits {
                    date: date(day),
                    visits: day,
                    scans: 0,
                })
                .collect(),
        };

        report.retain_range(&range);
        assert_eq!(report.daily.len(), 3);
        assert_eq!(report.total_visits(), 2 + 3 + 4);
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        assert!(DateRange::new(date(4), date(2)).is_none());
        assert_eq!(DateRange::last_days(date(7), 7).unwrap().from, date(1));
    }

    #[test]
    fn test_last_days_out_of_calendar_is_none() {
        assert!(DateRange::last_days(date(1), u32::MAX).is_none());
        assert_eq!(DateRange::last_days(date(1), 0), DateRange::new(date(1), date(1)));
    }

    #[test]
    fn test_refresh_response_tolerates_missing_token() {
        let parsed: RefreshResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.access_token.is_none());
    }
}
