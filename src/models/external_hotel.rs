use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A hotel known to a third-party provider, with cached display fields.
/// Upserted whenever a fetch or admin action references it; `last_seen_at`
/// records the most recent reference.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct ExternalHotel {
    pub id: i64,
    pub provider: String,
    pub external_hotel_id: String,
    pub name_cached: Option<String>,
    pub url_cached: Option<String>,
    pub address_cached: Option<String>,
    pub city_cached: Option<String>,
    pub state_cached: Option<String>,
    pub country_cached: Option<String>,
    pub is_active: bool,
    pub last_seen_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
