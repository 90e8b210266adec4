//! Admin endpoints: user approval, owner accounts and price-table curation.
//! All of them require the X-ADMIN-KEY header.

use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;

use crate::config::Config;
use crate::errors::ApiError;
use crate::models::owner::{AdminActionResponse, OwnerAccount, OwnerResponse};
use crate::models::price_table::{
    AddHotelToPriceTableRequest, CreatePriceTableRequest, PriceTable, PriceTableResponse,
};
use crate::models::user::{User, UserResponse, UserStatus};

pub fn require_admin(req: &HttpRequest, config: &Config) -> Result<(), ApiError> {
    let provided = req
        .headers()
        .get("X-ADMIN-KEY")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if provided != config.admin_key {
        return Err(ApiError::Forbidden("not admin".to_string()));
    }
    Ok(())
}

/// GET /api/admin/users/pending
pub async fn pending_users(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &config)?;

    let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE status = $1 ORDER BY id")
        .bind(UserStatus::Pending.as_str())
        .fetch_all(pool.get_ref())
        .await?;
    let responses: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// POST /api/admin/users/{id}/approve — approve the user and create their
/// owner account. Approving twice is a no-op on the account.
pub async fn approve_user(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &config)?;

    let id = path.into_inner();
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
    )
    .bind(UserStatus::Approved.as_str())
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    let account = sqlx::query_as::<_, OwnerAccount>(
        r#"
        INSERT INTO owner_accounts (user_id, company_name, is_active)
        VALUES ($1, $2, TRUE)
        ON CONFLICT (user_id) DO UPDATE SET is_active = TRUE
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(format!("{} Hotels", user.name)) // default, can be edited later
    .fetch_one(pool.get_ref())
    .await?;

    log::info!("approved user {} as owner {}", user.id, account.id);

    Ok(HttpResponse::Ok().json(AdminActionResponse {
        user_id: user.id,
        owner_id: account.id,
        name: user.name,
        email: user.email,
        status: user.status,
        message: "User approved and owner account created".to_string(),
    }))
}

/// GET /api/admin/owners
pub async fn list_owners(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &config)?;

    let accounts = sqlx::query_as::<_, OwnerAccount>("SELECT * FROM owner_accounts ORDER BY id")
        .fetch_all(pool.get_ref())
        .await?;
    let responses: Vec<OwnerResponse> = accounts
        .into_iter()
        .map(|o| OwnerResponse {
            id: o.id,
            user_id: o.user_id,
            company_name: o.company_name,
            active: o.is_active,
        })
        .collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// POST /api/admin/owners/{owner_id}/price-tables
pub async fn create_price_table(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    path: web::Path<i64>,
    body: web::Json<CreatePriceTableRequest>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &config)?;

    let owner_id = path.into_inner();
    let owner_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM owner_accounts WHERE id = $1)")
            .bind(owner_id)
            .fetch_one(pool.get_ref())
            .await?;
    if !owner_exists {
        return Err(ApiError::NotFound("owner not found".to_string()));
    }

    let table = sqlx::query_as::<_, PriceTable>(
        "INSERT INTO price_tables (owner_id, name, city_label) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(owner_id)
    .bind(&body.name)
    .bind(&body.city_label)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Created().json(PriceTableResponse::from(table)))
}

/// POST /api/admin/price-tables/{table_id}/hotels — find-or-create the
/// external hotel, then link it to the table with the owner flag.
pub async fn add_hotel_to_table(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    path: web::Path<i64>,
    body: web::Json<AddHotelToPriceTableRequest>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &config)?;

    let table_id = path.into_inner();
    let table_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM price_tables WHERE id = $1)")
            .bind(table_id)
            .fetch_one(pool.get_ref())
            .await?;
    if !table_exists {
        return Err(ApiError::NotFound("price table not found".to_string()));
    }

    let hotel_ref: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO external_hotels
            (provider, external_hotel_id, name_cached, url_cached,
             city_cached, country_cached, is_active, last_seen_at)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE, now())
        ON CONFLICT (provider, external_hotel_id) DO UPDATE SET last_seen_at = now()
        RETURNING id
        "#,
    )
    .bind(&body.provider)
    .bind(&body.external_hotel_id)
    .bind(&body.name)
    .bind(&body.url)
    .bind(&body.city)
    .bind(&body.country)
    .fetch_one(pool.get_ref())
    .await?;

    sqlx::query(
        r#"
        INSERT INTO price_table_external_hotels (price_table_id, external_hotel_ref, is_owner_hotel)
        VALUES ($1, $2, $3)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(table_id)
    .bind(hotel_ref)
    .bind(body.is_owner_hotel)
    .execute(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Hotel {} linked to price table {}", body.external_hotel_id, table_id)
    })))
}
