use chrono::NaiveDate;
use serde_json::Value;

use crate::config::Config;
use crate::errors::ApiError;

/// Thin client for the RapidAPI Booking.com `getHotelDetails` endpoint.
pub struct BookingApiClient {
    http: reqwest::Client,
    base: String,
    host: String,
    key: String,
}

impl BookingApiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: config.booking_api_base.clone(),
            host: config.booking_api_host.clone(),
            key: config.booking_api_key.clone(),
        }
    }

    /// Fetch the raw provider JSON for one stay (checkin -> checkout).
    pub async fn fetch_stay(
        &self,
        hotel_id: &str,
        checkin: NaiveDate,
        checkout: NaiveDate,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/api/v1/hotels/getHotelDetails", self.base);
        log::debug!(
            "fetching stay hotel_id={} checkin={} checkout={}",
            hotel_id,
            checkin,
            checkout
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("hotel_id", hotel_id.to_string()),
                ("arrival_date", checkin.to_string()),
                ("departure_date", checkout.to_string()),
                ("adults", "1".to_string()),
                ("children_age", "1,17".to_string()),
                ("room_qty", "1".to_string()),
                ("units", "metric".to_string()),
                ("temperature_unit", "c".to_string()),
                ("languagecode", "en-us".to_string()),
                ("currency_code", "USD".to_string()),
            ])
            .header("X-RapidAPI-Host", &self.host)
            .header("X-RapidAPI-Key", &self.key)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?
            .error_for_status()
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Upstream(format!("invalid JSON from provider: {}", e)))
    }
}
