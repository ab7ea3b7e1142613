use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use opsdesk_api::config::AppConfig;
use opsdesk_auth::{Role, SessionClaims};
use opsdesk_core::{SessionId, UserId};
use reqwest::StatusCode;
use serde_json::json;

const JWT_SECRET: &str = "test-secret";
const ADMIN_EMAIL: &str = "root@test.local";
const ADMIN_PASSWORD: &str = "root-password";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build the app (same router as prod), but bind to an ephemeral port.
        let config = AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: JWT_SECRET.to_string(),
            token_ttl: ChronoDuration::hours(8),
            admin_email: ADMIN_EMAIL.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
        };
        let app = opsdesk_api::app::build_app(config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn encode_claims(claims: &SessionClaims) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn mint_jwt(role: &str, issued_at: DateTime<Utc>, ttl: ChronoDuration) -> String {
    encode_claims(&SessionClaims::new(
        UserId::new(),
        Role::new(role.to_string()),
        SessionId::new(),
        issued_at,
        ttl,
    ))
}

fn mint_fresh(role: &str) -> String {
    mint_jwt(role, Utc::now(), ChronoDuration::minutes(10))
}

async fn list_users(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
) -> Vec<serde_json::Value> {
    let res = client
        .get(format!("{}/admin/users", base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    body["items"].as_array().unwrap().clone()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_rejected_before_any_write() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // No Authorization header at all.
    let res = client
        .post(format!("{}/admin/users", srv.base_url))
        .json(&json!({
            "email": "new@test.local",
            "display_name": "New User",
            "password": "pw"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "token_required");

    // Only the seeded bootstrap admin exists; the rejected request wrote nothing.
    let users = list_users(&client, &srv.base_url, &mint_fresh("admin")).await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn non_bearer_scheme_is_treated_as_missing() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .get(format!("{}/whoami", srv.base_url))
        .header(reqwest::header::AUTHORIZATION, "NotBearer xyz")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "token_required");
}

#[tokio::test]
async fn expired_token_is_rejected_as_invalid() {
    let srv = TestServer::spawn().await;

    // Correctly signed, but its window closed an hour ago.
    let token = mint_jwt("admin", Utc::now() - ChronoDuration::hours(2), ChronoDuration::hours(1));

    let res = reqwest::Client::new()
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn user_token_cannot_reach_admin_routes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/admin/users", srv.base_url))
        .bearer_auth(mint_fresh("user"))
        .json(&json!({
            "email": "sneaky@test.local",
            "display_name": "Sneaky",
            "password": "pw"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");

    // The denied request wrote nothing.
    let users = list_users(&client, &srv.base_url, &mint_fresh("admin")).await;
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn admin_token_creates_a_user_exactly_once() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_fresh("admin");

    let res = client
        .post(format!("{}/admin/users", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "email": "alice@test.local",
            "display_name": "Alice",
            "role": "agent",
            "password": "alice-pw"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["email"], "alice@test.local");
    assert_eq!(created["role"], "agent");
    assert!(created.get("password_hash").is_none());

    let users = list_users(&client, &srv.base_url, &token).await;
    assert_eq!(users.len(), 2);

    // The new record is readable by id.
    let id = created["id"].as_str().unwrap();
    let res = client
        .get(format!("{}/admin/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn whoami_echoes_the_token_principal() {
    let srv = TestServer::spawn().await;

    let user_id = UserId::new();
    let session_id = SessionId::new();
    let token = encode_claims(&SessionClaims::new(
        user_id,
        Role::new("agent"),
        session_id,
        Utc::now(),
        ChronoDuration::minutes(10),
    ));

    let res = reqwest::Client::new()
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"], user_id.to_string());
    assert_eq!(body["role"], "agent");
    assert_eq!(body["session_id"], session_id.to_string());
}

#[tokio::test]
async fn login_round_trip_reaches_protected_routes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Wrong password first.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": ADMIN_EMAIL, "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_credentials");

    // Then the seeded credentials.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["email"], ADMIN_EMAIL);
    assert!(body["user"].get("password_hash").is_none());

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn logout_drops_the_session_but_not_the_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    // One session on the books.
    let res = client
        .get(format!("{}/admin/sessions", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["active"], 1);

    let res = client
        .post(format!("{}/auth/logout", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // Verification is stateless, so the same token still reaches admin
    // routes and now sees an empty session list.
    let res = client
        .get(format!("{}/admin/sessions", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    // A second logout has nothing left to remove.
    let res = client
        .post(format!("{}/auth/logout", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ticket_lifecycle_respects_role_boundaries() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let user_token = mint_fresh("user");
    let agent_token = mint_fresh("agent");

    // A user opens a ticket.
    let res = client
        .post(format!("{}/tickets", srv.base_url))
        .bearer_auth(&user_token)
        .json(&json!({ "title": "VPN broken", "body": "cannot connect since morning" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let ticket: serde_json::Value = res.json().await.unwrap();
    assert_eq!(ticket["status"], "open");
    let id = ticket["id"].as_str().unwrap().to_string();

    // The same user cannot move it.
    let res = client
        .patch(format!("{}/tickets/{}", srv.base_url, id))
        .bearer_auth(&user_token)
        .json(&json!({ "status": "closed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // An agent can.
    let res = client
        .patch(format!("{}/tickets/{}", srv.base_url, id))
        .bearer_auth(&agent_token)
        .json(&json!({ "status": "closed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["status"], "closed");

    // And remove it.
    let res = client
        .delete(format!("{}/tickets/{}", srv.base_url, id))
        .bearer_auth(&agent_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/tickets/{}", srv.base_url, id))
        .bearer_auth(&agent_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_summary_counts_users_tickets_and_sessions() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin_token = mint_fresh("admin");

    client
        .post(format!("{}/admin/users", srv.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({
            "email": "bob@test.local",
            "display_name": "Bob",
            "password": "bob-pw"
        }))
        .send()
        .await
        .unwrap();

    // Admin passes the {user} check through the policy override.
    let res = client
        .post(format!("{}/tickets", srv.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({ "title": "Projector dead", "body": "room 4" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/dashboard/summary", srv.base_url))
        .bearer_auth(mint_fresh("agent"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    assert_eq!(body["users"]["total"], 2);
    assert_eq!(body["users"]["by_role"]["admin"], 1);
    assert_eq!(body["users"]["by_role"]["user"], 1);
    assert_eq!(body["tickets"]["total"], 1);
    assert_eq!(body["tickets"]["by_status"]["open"], 1);
    assert_eq!(body["sessions"]["active"], 0);
    assert_eq!(body["recent_tickets"].as_array().unwrap().len(), 1);

    // Plain users do not see the dashboard.
    let res = client
        .get(format!("{}/dashboard/summary", srv.base_url))
        .bearer_auth(mint_fresh("user"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn patch_user_ignores_immutable_and_unknown_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin_token = mint_fresh("admin");

    let res = client
        .post(format!("{}/admin/users", srv.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({
            "email": "carol@test.local",
            "display_name": "Carol",
            "password": "carol-pw"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    // Hostile body: only display_name and role are part of the patch surface.
    let res = client
        .patch(format!("{}/admin/users/{}", srv.base_url, id))
        .bearer_auth(&admin_token)
        .json(&json!({
            "display_name": "Carol R.",
            "role": "agent",
            "email": "hijacked@test.local",
            "password_hash": "owned",
            "id": "00000000-0000-0000-0000-000000000000",
            "created_at": "1970-01-01T00:00:00Z"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["display_name"], "Carol R.");
    assert_eq!(updated["role"], "agent");
    assert_eq!(updated["email"], "carol@test.local");
    assert_eq!(updated["id"], id);

    // The password hash survived the hostile patch: login still works.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "carol@test.local", "password": "carol-pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_ids_are_rejected_with_400() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .get(format!("{}/admin/users/not-a-uuid", srv.base_url))
        .bearer_auth(mint_fresh("admin"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_fresh("admin");

    let body = json!({
        "email": "dave@test.local",
        "display_name": "Dave",
        "password": "dave-pw"
    });
    let res = client
        .post(format!("{}/admin/users", srv.base_url))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Same address, different casing.
    let res = client
        .post(format!("{}/admin/users", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "email": "Dave@Test.Local",
            "display_name": "Dave Again",
            "password": "other-pw"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "conflict");
}
