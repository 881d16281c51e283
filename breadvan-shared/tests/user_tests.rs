//! Accounts and sessions against a real database

mod common;

use breadvan_shared::auth::jwt::validate_access_token;
use breadvan_shared::models::{driver::DriverStatus, user::UserRole};
use breadvan_shared::services::{resident, user, ServiceError};
use sqlx::PgPool;

const SECRET: &str = "user-tests-secret-at-least-32-bytes!";

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_driver_login_logout_toggles_status(pool: PgPool) {
    let bob = common::driver(&pool, "bob").await;

    let (logged_in, tokens) = user::login(&pool, "bob", "driverpass", SECRET).await.unwrap();
    assert!(logged_in.logged_in);

    let claims = validate_access_token(&tokens.access_token, SECRET).unwrap();
    assert_eq!(claims.sub, bob.id);
    assert_eq!(claims.role, UserRole::Driver);

    let profile = resident::view_driver_stats(&pool, bob.id).await.unwrap();
    assert_eq!(profile.status, DriverStatus::Available);

    let logged_out = user::logout(&pool, bob.id).await.unwrap();
    assert!(!logged_out.logged_in);

    let profile = resident::view_driver_stats(&pool, bob.id).await.unwrap();
    assert_eq!(profile.status, DriverStatus::Offline);
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_login_rejects_bad_credentials(pool: PgPool) {
    common::driver(&pool, "bob").await;

    let wrong = user::login(&pool, "bob", "nope-nope", SECRET).await;
    assert!(matches!(wrong, Err(ServiceError::Unauthorized(_))));

    let unknown = user::login(&pool, "nobody", "driverpass", SECRET).await;
    assert!(matches!(unknown, Err(ServiceError::Unauthorized(_))));
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_refresh_issues_new_pair(pool: PgPool) {
    user::create_user(&pool, "admin", "adminpass", UserRole::Admin)
        .await
        .unwrap();
    let (_, tokens) = user::login(&pool, "admin", "adminpass", SECRET).await.unwrap();

    let refreshed = user::refresh(&pool, &tokens.refresh_token, SECRET).await.unwrap();
    let claims = validate_access_token(&refreshed.access_token, SECRET).unwrap();
    assert_eq!(claims.role, UserRole::Admin);

    let err = user::refresh(&pool, &tokens.access_token, SECRET).await;
    assert!(matches!(err, Err(ServiceError::Unauthorized(_))));
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_create_user_and_rename(pool: PgPool) {
    let admin = user::create_user(&pool, "admin", "adminpass", UserRole::Admin)
        .await
        .unwrap();
    common::driver(&pool, "bob").await;

    let err = user::create_user(&pool, "rob", "robpass", UserRole::Driver)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Invalid(_)));

    let err = user::update_username(&pool, admin.id, "bob").await.unwrap_err();
    assert_eq!(err.to_string(), "Username already taken.");

    let renamed = user::update_username(&pool, admin.id, "root").await.unwrap();
    assert_eq!(renamed.username, "root");
    assert_eq!(user::get_user_by_username(&pool, "root").await.unwrap().id, admin.id);
    assert_eq!(user::list_users(&pool).await.unwrap().len(), 2);
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_password_is_hashed(pool: PgPool) {
    let admin = user::create_user(&pool, "admin", "adminpass", UserRole::Admin)
        .await
        .unwrap();

    let stored = user::get_user(&pool, admin.id).await.unwrap();
    assert!(stored.password_hash.starts_with("$argon2id$"));
    assert_ne!(stored.password_hash, "adminpass");
}
