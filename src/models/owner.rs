use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Created automatically when an admin approves a user; one per user.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct OwnerAccount {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct AdminActionResponse {
    pub user_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub email: String,
    pub status: String,
    pub message: String,
}
