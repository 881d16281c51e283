//! Router tests: JSON API and dashboards against a real database
//!
//! Requires `DATABASE_URL`; `#[sqlx::test]` creates a throwaway database per test.

mod common;

use axum::http::{header, StatusCode};
use common::{day, location, text, TestContext};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_health(pool: PgPool) {
    let ctx = TestContext::empty(pool);

    let (status, body) = ctx.json("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_login_and_me(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;

    let (status, body) = ctx
        .json(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": "bob", "password": "bobpass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "driver");
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["user"].get("password_hash").is_none());

    let token = body["access_token"].as_str().unwrap();
    let (status, me) = ctx.json("GET", "/v1/auth/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "bob");
    assert_eq!(me["logged_in"], true);

    // Logging in made bob available
    let bob_id = me["id"].as_i64().unwrap();
    let alice = ctx.token("alice", "alicepass").await;
    let (_, stats) = ctx
        .json("GET", &format!("/v1/resident/drivers/{}", bob_id), Some(&alice), None)
        .await;
    assert_eq!(stats["status"], "available");
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_login_rejects_bad_credentials(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;

    let (status, body) = ctx
        .json(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": "bob", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password.");

    let (status, body) = ctx
        .json(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": "", "password": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_refresh_issues_new_pair(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;

    let (_, login) = ctx
        .json(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": "jane", "password": "janepass" })),
        )
        .await;

    let refresh = login["refresh_token"].as_str().unwrap();
    let (status, pair) = ctx
        .json("POST", "/v1/auth/refresh", None, Some(json!({ "refresh_token": refresh })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(pair["access_token"].is_string());

    // An access token is not a refresh token
    let access = login["access_token"].as_str().unwrap();
    let (status, _) = ctx
        .json("POST", "/v1/auth/refresh", None, Some(json!({ "refresh_token": access })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_role_guards(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;

    let (status, _) = ctx.json("GET", "/v1/admin/areas", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .json("GET", "/v1/admin/areas", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let alice = ctx.token("alice", "alicepass").await;
    let (status, body) = ctx.json("GET", "/v1/admin/areas", Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "This action requires the Admin role");

    let (status, _) = ctx.json("GET", "/v1/driver/drives", Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = ctx.token("admin", "adminpass").await;
    let (status, body) = ctx.json("GET", "/v1/admin/areas", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_admin_catalog_and_geography(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;
    let admin = ctx.token("admin", "adminpass").await;

    let (status, area) = ctx
        .json("POST", "/v1/admin/areas", Some(&admin), Some(json!({ "name": "Curepe" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let area_id = area["id"].as_i64().unwrap();

    let (status, _) = ctx
        .json("POST", "/v1/admin/areas", Some(&admin), Some(json!({ "name": "Curepe" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, street) = ctx
        .json(
            "POST",
            &format!("/v1/admin/areas/{}/streets", area_id),
            Some(&admin),
            Some(json!({ "name": "Main Road" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(street["area_id"], area_id);

    let (_, streets) = ctx
        .json("GET", &format!("/v1/admin/streets?area_id={}", area_id), Some(&admin), None)
        .await;
    assert_eq!(streets["count"], 1);

    let (status, body) = ctx
        .json("POST", "/v1/admin/areas/999/streets", Some(&admin), Some(json!({ "name": "X" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Invalid area ID.");

    let (status, item) = ctx
        .json(
            "POST",
            "/v1/admin/items",
            Some(&admin),
            Some(json!({ "name": "Hops", "price": "1.50", "tags": ["bread", " soft "] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["price"], "1.50");
    assert_eq!(item["tags"], json!(["bread", "soft"]));

    let item_id = item["id"].as_i64().unwrap();
    let (status, _) = ctx
        .json("DELETE", &format!("/v1/admin/items/{}", item_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = ctx
        .json("DELETE", &format!("/v1/admin/items/{}", item_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Invalid item ID.");
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_admin_accounts(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;
    let admin = ctx.token("admin", "adminpass").await;

    let (status, driver) = ctx
        .json(
            "POST",
            "/v1/admin/drivers",
            Some(&admin),
            Some(json!({ "username": "carl", "password": "carlpass" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(driver["status"], "offline");

    let (status, body) = ctx
        .json(
            "POST",
            "/v1/admin/drivers",
            Some(&admin),
            Some(json!({ "username": "carl", "password": "carlpass" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already taken.");

    let (status, resident) = ctx
        .json(
            "POST",
            "/v1/admin/residents",
            Some(&admin),
            Some(json!({
                "username": "dana",
                "password": "danapass",
                "area_id": 1,
                "street_id": 2,
                "house_number": 7
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resident["house_number"], 7);

    let (_, residents) = ctx.json("GET", "/v1/admin/residents", Some(&admin), None).await;
    assert_eq!(residents["count"], 4);

    let driver_id = driver["id"].as_i64().unwrap();
    let (status, _) = ctx
        .json("DELETE", &format!("/v1/admin/drivers/{}", driver_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_register_resident(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;

    let (status, body) = ctx
        .json(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "username": "erin",
                "password": "erinpass",
                "area_id": 2,
                "street_id": 4,
                "house_number": 3
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "resident");

    let token = body["access_token"].as_str().unwrap();
    let (status, _) = ctx.json("GET", "/v1/resident/inbox", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Street 1 (Gordon Street) is not in area 2
    let (status, _) = ctx
        .json(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "username": "fred",
                "password": "fredpass",
                "area_id": 2,
                "street_id": 1,
                "house_number": 3
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx
        .json(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "username": "gail",
                "password": "gailpass",
                "area_id": 2,
                "street_id": 4,
                "house_number": 0
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "house_number");
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_schedule_drive_notifies_street(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;
    let bob = ctx.token("bob", "bobpass").await;

    let (status, drive) = ctx
        .json(
            "POST",
            "/v1/driver/drives",
            Some(&bob),
            Some(json!({ "area_id": 1, "street_id": 2, "date": day(2), "time": "09:30" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(drive["status"], "upcoming");
    assert_eq!(drive["street_name"], "Warner Street");

    let alice = ctx.token("alice", "alicepass").await;
    let (_, inbox) = ctx.json("GET", "/v1/resident/inbox", Some(&alice), None).await;
    let last = inbox["items"].as_array().unwrap().last().unwrap().as_str().unwrap();
    assert!(last.contains(&format!(
        "SCHEDULED>> Drive {} by Driver bob",
        drive["id"]
    )));

    let (status, body) = ctx
        .json(
            "POST",
            "/v1/driver/drives",
            Some(&bob),
            Some(json!({ "area_id": 1, "street_id": 2, "date": day(-1), "time": "09:30" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("past"));

    let (status, _) = ctx
        .json(
            "POST",
            "/v1/driver/drives",
            Some(&bob),
            Some(json!({ "area_id": 1, "street_id": 2, "date": "tomorrow", "time": "09:30" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_stop_request_and_decisions(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;
    let mary = ctx.token("mary", "marypass").await;
    let alice = ctx.token("alice", "alicepass").await;
    let drive_id = ctx.seeded_drive_id(&mary).await;

    let (_, drives) = ctx.json("GET", "/v1/resident/drives", Some(&alice), None).await;
    assert_eq!(drives["count"], 1);
    assert!(drives["items"][0]["my_stop"].is_null());

    let uri = format!("/v1/resident/drives/{}/stop", drive_id);
    let (status, stop) = ctx.json("POST", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stop["status"], "pending");

    let (status, body) = ctx.json("POST", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "You already requested a stop for this drive.");

    let (_, stops) = ctx
        .json("GET", &format!("/v1/driver/drives/{}/stops", drive_id), Some(&mary), None)
        .await;
    assert_eq!(stops["count"], 2);

    let stop_id = stop["id"].as_i64().unwrap();
    let (status, body) = ctx
        .json(
            "POST",
            &format!("/v1/driver/stops/{}/approve", stop_id),
            Some(&mary),
            Some(json!({ "eta": "about twenty-five minutes" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "eta");

    let (status, approved) = ctx
        .json(
            "POST",
            &format!("/v1/driver/stops/{}/approve", stop_id),
            Some(&mary),
            Some(json!({ "eta": "10:15" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "subscribed");
    assert_eq!(approved["eta"], "10:15");

    let (_, inbox) = ctx.json("GET", "/v1/resident/inbox", Some(&alice), None).await;
    let last = inbox["items"].as_array().unwrap().last().unwrap().as_str().unwrap();
    assert!(last.ends_with(&format!(
        "APPROVED>> Your stop request for drive {} has been approved. ETA: 10:15, Status: Subscribed",
        drive_id
    )));

    // A decided stop cannot be cancelled by the resident
    let (status, _) = ctx.json("DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Another driver cannot touch mary's stops
    let bob = ctx.token("bob", "bobpass").await;
    let (status, _) = ctx
        .json(
            "POST",
            &format!("/v1/driver/stops/{}/reject", stop_id),
            Some(&bob),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_reject_and_cancel(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;
    let mary = ctx.token("mary", "marypass").await;
    let jane = ctx.token("jane", "janepass").await;
    let alice = ctx.token("alice", "alicepass").await;
    let drive_id = ctx.seeded_drive_id(&mary).await;

    let (_, stops) = ctx
        .json("GET", &format!("/v1/driver/drives/{}/stops", drive_id), Some(&mary), None)
        .await;
    let jane_stop = stops["items"][0]["id"].as_i64().unwrap();

    let (status, rejected) = ctx
        .json(
            "POST",
            &format!("/v1/driver/stops/{}/reject", jane_stop),
            Some(&mary),
            Some(json!({ "reason": "Route full" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "rejected");

    let (_, inbox) = ctx.json("GET", "/v1/resident/inbox", Some(&jane), None).await;
    let last = inbox["items"].as_array().unwrap().last().unwrap().as_str().unwrap();
    assert!(last.ends_with("was rejected. Reason: Route full"));

    let uri = format!("/v1/resident/drives/{}/stop", drive_id);
    ctx.json("POST", &uri, Some(&alice), None).await;
    let (status, _) = ctx.json("DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx.json("DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No stop requested for this drive.");

    let (_, driver_inbox) = ctx.json("GET", "/v1/driver/inbox", Some(&mary), None).await;
    let last = driver_inbox["items"].as_array().unwrap().last().unwrap().as_str().unwrap();
    assert!(last.contains("Resident alice cancelled their stop request"));
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_drive_lifecycle(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;
    let mary = ctx.token("mary", "marypass").await;
    let drive_id = ctx.seeded_drive_id(&mary).await;

    let (status, drive) = ctx
        .json("POST", &format!("/v1/driver/drives/{}/start", drive_id), Some(&mary), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(drive["status"], "in_progress");

    let (_, me) = ctx.json("GET", "/v1/auth/me", Some(&mary), None).await;
    let alice = ctx.token("alice", "alicepass").await;
    let (_, stats) = ctx
        .json("GET", &format!("/v1/resident/drivers/{}", me["id"]), Some(&alice), None)
        .await;
    assert_eq!(stats["status"], "busy");
    assert_eq!(stats["street_id"], drive["street_id"]);

    // In progress drives cannot be cancelled
    let (status, body) = ctx
        .json("POST", &format!("/v1/driver/drives/{}/cancel", drive_id), Some(&mary), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only upcoming drives can be cancelled.");

    let (status, ended) = ctx.json("POST", "/v1/driver/drives/end", Some(&mary), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["status"], "completed");

    let (status, _) = ctx.json("POST", "/v1/driver/drives/end", Some(&mary), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_cancel_drive_notifies_street(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;
    let mary = ctx.token("mary", "marypass").await;
    let bob = ctx.token("bob", "bobpass").await;
    let drive_id = ctx.seeded_drive_id(&mary).await;

    let uri = format!("/v1/driver/drives/{}/cancel", drive_id);
    let (status, body) = ctx.json("POST", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Drive not found.");

    let (status, drive) = ctx.json("POST", &uri, Some(&mary), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(drive["status"], "cancelled");

    let alice = ctx.token("alice", "alicepass").await;
    let (_, inbox) = ctx.json("GET", "/v1/resident/inbox", Some(&alice), None).await;
    let last = inbox["items"].as_array().unwrap().last().unwrap().as_str().unwrap();
    assert!(last.contains(&format!("CANCELLED>> Drive {} by Driver mary", drive_id)));

    let (_, drives) = ctx.json("GET", "/v1/resident/drives", Some(&alice), None).await;
    assert_eq!(drives["count"], 0);
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_stock_and_menu(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;
    let mary = ctx.token("mary", "marypass").await;

    let (status, stock) = ctx
        .json(
            "PUT",
            "/v1/driver/stock",
            Some(&mary),
            Some(json!({ "name": "Coconut Bake", "price": "4.00", "quantity": 12 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock["quantity"], 12);

    let item_id = stock["item_id"].as_i64().unwrap();
    let (status, _) = ctx
        .json(
            "PUT",
            "/v1/driver/stock",
            Some(&mary),
            Some(json!({ "item_id": item_id, "quantity": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .json("PUT", "/v1/driver/stock", Some(&mary), Some(json!({ "quantity": 5 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, me) = ctx.json("GET", "/v1/auth/me", Some(&mary), None).await;
    let alice = ctx.token("alice", "alicepass").await;
    let (status, menu) = ctx
        .json("GET", &format!("/v1/resident/drivers/{}/stock", me["id"]), Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(menu["count"], 1);
    assert_eq!(menu["items"][0]["item_name"], "Coconut Bake");
    assert_eq!(menu["items"][0]["quantity"], 5);

    let stock_id = stock["id"].as_i64().unwrap();
    let (status, _) = ctx
        .json("DELETE", &format!("/v1/driver/stock/{}", stock_id), Some(&mary), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, remaining) = ctx.json("GET", "/v1/driver/stock", Some(&mary), None).await;
    assert_eq!(remaining["count"], 0);
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_logout_sets_driver_offline(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;
    let mary = ctx.token("mary", "marypass").await;

    let (status, user) = ctx.json("POST", "/v1/auth/logout", Some(&mary), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["logged_in"], false);

    let alice = ctx.token("alice", "alicepass").await;
    let (_, stats) = ctx
        .json("GET", &format!("/v1/resident/drivers/{}", user["id"]), Some(&alice), None)
        .await;
    assert_eq!(stats["status"], "offline");

    // The token is not revoked; it works until it expires
    let (status, me) = ctx.json("GET", "/v1/auth/me", Some(&mary), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["logged_in"], false);
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_web_login_flow(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;

    let response = ctx.page("/dashboard", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/web/login");

    let response = ctx.page("/web/login", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("<form method=\"post\" action=\"/web/login\">"));

    let response = ctx.form("/web/login", None, "username=mary&password=nope").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("Invalid username or password."));

    let response = ctx.form("/web/login", None, "username=mary&password=marypass").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/driver/dashboard");
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.contains("HttpOnly"));
    let token = cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("access_token="))
        .unwrap()
        .to_string();

    let response = ctx.page("/dashboard", Some(&token)).await;
    assert_eq!(location(&response), "/driver/dashboard");

    let response = ctx.page("/driver/dashboard", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = text(response).await;
    assert!(html.contains("Driver dashboard"));
    assert!(html.contains("Warner Street, St. Augustine"));
    assert!(html.contains("jane"));

    // Wrong dashboard bounces back to the caller's own
    let response = ctx.page("/admin/dashboard", Some(&token)).await;
    assert_eq!(location(&response), "/driver/dashboard");

    let response = ctx.page("/web/logout", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_web_driver_actions(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;
    let mary = ctx.token("mary", "marypass").await;
    let drive_id = ctx.seeded_drive_id(&mary).await;

    let (_, stops) = ctx
        .json("GET", &format!("/v1/driver/drives/{}/stops", drive_id), Some(&mary), None)
        .await;
    let stop_id = stops["items"][0]["id"].as_i64().unwrap();

    let response = ctx
        .form(
            "/driver/dashboard",
            Some(&mary),
            &format!("action=approve_stop&stop_id={}&eta_text=10%3A20", stop_id),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("Stop approved."));

    let response = ctx
        .form("/driver/dashboard", Some(&mary), "action=add_stock&item_name=Hops&item_quantity=")
        .await;
    assert!(text(response).await.contains("Quantity is required."));

    let response = ctx
        .form(
            "/driver/dashboard",
            Some(&mary),
            "action=add_stock&item_name=Hops&item_price=1.25&item_quantity=30",
        )
        .await;
    let html = text(response).await;
    assert!(html.contains("Menu updated."));
    assert!(html.contains("Hops"));

    let response = ctx
        .form(
            "/driver/dashboard",
            Some(&mary),
            &format!("action=schedule_drive&date_str={}&time_str=10%3A00&area_id=1&street_id=2", day(1)),
        )
        .await;
    assert!(text(response)
        .await
        .contains("Drive scheduled and residents notified."));
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_web_resident_and_admin_actions(pool: PgPool) {
    let ctx = TestContext::seeded(pool).await;
    let mary = ctx.token("mary", "marypass").await;
    let drive_id = ctx.seeded_drive_id(&mary).await;

    let alice = ctx.token("alice", "alicepass").await;
    let response = ctx
        .form(
            "/resident/dashboard",
            Some(&alice),
            &format!("action=request_stop&drive_id={}", drive_id),
        )
        .await;
    let html = text(response).await;
    assert!(html.contains(&format!("Stop requested for drive #{}.", drive_id)));
    assert!(html.contains("Pending"));

    let admin = ctx.token("admin", "adminpass").await;
    let response = ctx
        .form("/admin/create-driver", Some(&admin), "username=carl&password=carlpass")
        .await;
    let html = text(response).await;
    assert!(html.contains("carl"));
    assert!(html.contains("created successfully."));

    let response = ctx
        .form("/admin/create-driver", Some(&admin), "username=carl&password=carlpass")
        .await;
    assert!(text(response).await.contains("Username already taken."));

    let response = ctx.form("/admin/add-area", Some(&alice), "name=Curepe").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/resident/dashboard");
}
