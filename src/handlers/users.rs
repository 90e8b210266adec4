use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::errors::ApiError;
use crate::models::user::{SignupRequest, UpdateUserRequest, User, UserResponse, UserStatus};

const BCRYPT_COST: u32 = 12;

/// POST /api/auth/signup — create a PENDING user awaiting admin approval.
pub async fn signup(
    pool: web::Data<PgPool>,
    body: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    if let Err(e) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(e));
    }

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(&body.email)
        .fetch_one(pool.get_ref())
        .await?;
    if exists {
        return Err(ApiError::Conflict("email already registered".to_string()));
    }

    let hash = bcrypt::hash(&body.password, BCRYPT_COST)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, phone, password_hash, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&body.name)
    .bind(&body.email)
    .bind(&body.phone)
    .bind(&hash)
    .bind(UserStatus::Pending.as_str())
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

pub async fn get_users(pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
        .fetch_all(pool.get_ref())
        .await?;
    let responses: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(responses))
}

pub async fn get_user(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

pub async fn update_user(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    if let Err(e) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(e));
    }

    let id = path.into_inner();
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET name = $1, email = $2, updated_at = now() WHERE id = $3 RETURNING *",
    )
    .bind(&body.name)
    .bind(&body.email)
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

pub async fn delete_user(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool.get_ref())
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("user not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}
