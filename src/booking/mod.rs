pub mod client;
pub mod normalize;

pub use client::BookingApiClient;

/// Provider tag stored with hotels and snapshots originating from the
/// RapidAPI Booking.com integration.
pub const PROVIDER: &str = "RAPIDAPI_BOOKING";

/// Source tag stored on snapshots written by the fetch path.
pub const SOURCE: &str = "RAPIDAPI";
