use std::env;

/// Runtime configuration, loaded once at startup from the environment
/// (a `.env` file is read first via dotenv).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    /// Expected value of the X-ADMIN-KEY header on admin endpoints.
    pub admin_key: String,
    pub booking_api_base: String,
    pub booking_api_host: String,
    pub booking_api_key: String,
    /// Optional pause between external calls in bulk fetches, to avoid
    /// provider rate limits on bursts. 0 disables the throttle.
    pub fetch_throttle_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: var_or("BIND_ADDR", "127.0.0.1:8080"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            admin_key: var_or("ADMIN_KEY", "dev-admin-key"),
            booking_api_base: var_or("BOOKING_API_BASE", "https://booking-com15.p.rapidapi.com"),
            booking_api_host: var_or("BOOKING_API_HOST", "booking-com15.p.rapidapi.com"),
            booking_api_key: env::var("BOOKING_API_KEY").unwrap_or_default(),
            fetch_throttle_ms: var_or("FETCH_THROTTLE_MS", "0")
                .parse()
                .expect("FETCH_THROTTLE_MS must be a number"),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        log::info!("{} not set, using default: {}", key, default);
        default.to_string()
    })
}
