use std::sync::Arc;

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use clientele_api::app::{AppServices, build_app};
use clientele_auth::{Hs256JwtValidator, JwtClaims, Role, SigningSecret, StaticCredentials, TokenService};
use clientele_core::CustomerId;
use clientele_customers::Customer;
use clientele_infra::{CustomerStore, InMemoryCustomerStore};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

const JWT_SECRET: &str = "c8279fdf3b4f47eba9a604a453c2fc37";

struct TestServer {
    base_url: String,
    store: Arc<InMemoryCustomerStore>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Build the production router around a fresh store, bound to an ephemeral port.
    async fn spawn(seed: Vec<Customer>) -> Self {
        let secret = SigningSecret::new(JWT_SECRET.as_bytes().to_vec()).unwrap();
        let creds = StaticCredentials::new()
            .with_user("user", "password", Role::USER)
            .with_user("admin", "password", Role::ADMIN);
        let tokens = TokenService::new(&secret, Arc::new(creds), ChronoDuration::hours(1)).unwrap();
        let store = Arc::new(InMemoryCustomerStore::with_customers(seed));
        let customers: Arc<dyn CustomerStore> = store.clone();

        let services = AppServices::new(
            Arc::new(tokens),
            Arc::new(Hs256JwtValidator::new(&secret)),
            customers,
        );
        let app = build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, store, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn customer(id: i64, name: &str, address: &str, phone: &str, birthday: (i32, u32, u32)) -> Customer {
    Customer {
        id: CustomerId::new(id),
        name: name.to_string(),
        address: address.to_string(),
        phone: phone.to_string(),
        birthday: NaiveDate::from_ymd_opt(birthday.0, birthday.1, birthday.2).unwrap(),
    }
}

fn john_doe() -> Customer {
    customer(1, "John Doe", "123 Main St", "555-1234", (1990, 1, 1))
}

fn jane_smith() -> Customer {
    customer(2, "Jane Smith", "456 Elm St", "555-5678", (1985, 2, 2))
}

async fn login(client: &reqwest::Client, srv: &TestServer, username: &str, password: &str) -> String {
    let res = client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "Username": username, "Password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK, "login as {username}");
    let body: serde_json::Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

/// Sign arbitrary claims with `secret`, bypassing the login endpoint.
fn mint_jwt(secret: &str, claims: &JwtClaims) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn claims_for(role: Role, issued_at: chrono::DateTime<Utc>, ttl: ChronoDuration) -> JwtClaims {
    JwtClaims {
        sub: "minted".to_string(),
        role,
        jti: uuid::Uuid::now_v7(),
        issued_at,
        expires_at: issued_at + ttl,
    }
}

async fn error_code(res: reqwest::Response) -> String {
    let body: serde_json::Value = res.json().await.unwrap();
    body["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn(vec![]).await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_issues_bearer_token() {
    let srv = TestServer::spawn(vec![]).await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "username": "user", "password": "password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
    assert!(body["expires_at"].is_string());
}

#[tokio::test]
async fn login_does_not_reveal_which_half_was_wrong() {
    let srv = TestServer::spawn(vec![]).await;
    let client = reqwest::Client::new();

    let mut bodies = Vec::new();
    for (username, password) in [("ghost", "password"), ("user", "wrong"), ("", "")] {
        let res = client
            .post(srv.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        bodies.push(res.json::<serde_json::Value>().await.unwrap());
    }

    assert_eq!(bodies[0]["error"], "invalid_credentials");
    assert!(bodies.iter().all(|b| *b == bodies[0]));
}

#[tokio::test]
async fn whoami_reflects_token_claims() {
    let srv = TestServer::spawn(vec![]).await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv, "admin", "password").await;

    let res = client
        .get(srv.url("/api/auth/whoami"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["subject"], "admin");
    assert_eq!(body["role"], "Admin");
}

#[tokio::test]
async fn get_returns_all_customers() {
    let srv = TestServer::spawn(vec![john_doe(), jane_smith()]).await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv, "user", "password").await;

    let res = client
        .get(srv.url("/api/customers"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let customers: Vec<Customer> = res.json().await.unwrap();
    assert_eq!(customers, vec![john_doe(), jane_smith()]);
}

#[tokio::test]
async fn post_creates_new_customer() {
    let srv = TestServer::spawn(vec![]).await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv, "user", "password").await;

    let new_customer = json!({
        "id": 3,
        "name": "New Customer",
        "address": "789 Oak St",
        "phone": "555-9876",
        "birthday": "1995-03-03",
    });

    let res = client
        .post(srv.url("/api/customers"))
        .bearer_auth(&token)
        .json(&new_customer)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created, new_customer);
    assert_eq!(srv.store.list().unwrap().len(), 1);
}

#[tokio::test]
async fn post_without_token_is_unauthorized() {
    let srv = TestServer::spawn(vec![]).await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/customers"))
        .json(&json!({
            "id": 3,
            "name": "New Customer",
            "address": "789 Oak St",
            "phone": "555-9876",
            "birthday": "1995-03-03",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()["www-authenticate"], "Bearer");
    assert_eq!(error_code(res).await, "missing_token");
    assert!(srv.store.list().unwrap().is_empty());
}

#[tokio::test]
async fn put_updates_customer() {
    let srv = TestServer::spawn(vec![john_doe()]).await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv, "user", "password").await;

    let res = client
        .put(srv.url("/api/customers/1"))
        .bearer_auth(&token)
        .json(&json!({
            "id": 1,
            "name": "Updated Name",
            "address": "Updated Address",
            "phone": "Updated Phone",
            "birthday": "1990-01-01",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let customers: Vec<Customer> = client
        .get(srv.url("/api/customers"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let customer = customers.iter().find(|c| c.id == CustomerId::new(1)).unwrap();
    assert_eq!(customer.name, "Updated Name");
    assert_eq!(customer.address, "Updated Address");
    assert_eq!(customer.phone, "Updated Phone");
}

#[tokio::test]
async fn put_with_mismatched_body_id_is_rejected() {
    let srv = TestServer::spawn(vec![john_doe(), jane_smith()]).await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv, "user", "password").await;

    let res = client
        .put(srv.url("/api/customers/2"))
        .bearer_auth(&token)
        .json(&json!({
            "id": 1,
            "name": "Jane Updated",
            "address": "456 Elm St",
            "phone": "555-5678",
            "birthday": "1985-02-02",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "invalid_request");
    assert_eq!(srv.store.list().unwrap(), vec![john_doe(), jane_smith()]);

    // Omitting the body id is fine; the path names the record.
    let res = client
        .put(srv.url("/api/customers/2"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Jane Updated",
            "address": "456 Elm St",
            "phone": "555-5678",
            "birthday": "1985-02-02",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let updated: Customer = res.json().await.unwrap();
    assert_eq!(updated.id, CustomerId::new(2));
    assert_eq!(srv.store.get(CustomerId::new(1)).unwrap(), john_doe());
    assert_eq!(srv.store.get(CustomerId::new(2)).unwrap().name, "Jane Updated");
}

#[tokio::test]
async fn user_token_cannot_delete() {
    let srv = TestServer::spawn(vec![john_doe()]).await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv, "user", "password").await;

    let res = client
        .delete(srv.url("/api/customers/1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "forbidden");
    assert_eq!(srv.store.list().unwrap(), vec![john_doe()]);
}

#[tokio::test]
async fn admin_token_cannot_create_or_update() {
    let srv = TestServer::spawn(vec![john_doe()]).await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv, "admin", "password").await;

    let res = client
        .post(srv.url("/api/customers"))
        .bearer_auth(&token)
        .json(&jane_smith())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .put(srv.url("/api/customers/1"))
        .bearer_auth(&token)
        .json(&john_doe())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    assert_eq!(srv.store.list().unwrap(), vec![john_doe()]);
}

#[tokio::test]
async fn delete_removes_customer() {
    let srv = TestServer::spawn(vec![john_doe()]).await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv, "admin", "password").await;

    let res = client
        .delete(srv.url("/api/customers/1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());

    let customers: Vec<Customer> = client
        .get(srv.url("/api/customers"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(customers.is_empty());

    // Second delete of the same id is a stable NotFound.
    let res = client
        .delete(srv.url("/api/customers/1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_outcomes_map_to_status_codes() {
    let srv = TestServer::spawn(vec![john_doe()]).await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv, "user", "password").await;

    let res = client
        .post(srv.url("/api/customers"))
        .bearer_auth(&token)
        .json(&customer(1, "Duplicate", "x", "y", (2000, 1, 1)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(srv.store.list().unwrap(), vec![john_doe()]);

    let res = client
        .put(srv.url("/api/customers/42"))
        .bearer_auth(&token)
        .json(&customer(42, "Nobody", "x", "y", (2000, 1, 1)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(srv.url("/api/customers/42"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(srv.url("/api/customers/1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: Customer = res.json().await.unwrap();
    assert_eq!(found, john_doe());
}

#[tokio::test]
async fn bad_requests_are_rejected_after_authorization() {
    let srv = TestServer::spawn(vec![john_doe()]).await;
    let client = reqwest::Client::new();
    let user = login(&client, &srv, "user", "password").await;
    let admin = login(&client, &srv, "admin", "password").await;

    // Authorized caller, broken body → 4xx validation error.
    let res = client
        .post(srv.url("/api/customers"))
        .bearer_auth(&user)
        .json(&json!({ "id": 5, "name": "No birthday" }))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error());
    assert_eq!(error_code(res).await, "invalid_request");

    // Unauthorized caller, same broken body → 403, the body is never looked at.
    let res = client
        .post(srv.url("/api/customers"))
        .bearer_auth(&admin)
        .json(&json!({ "id": 5, "name": "No birthday" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(srv.url("/api/customers/not-a-number"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(srv.store.list().unwrap(), vec![john_doe()]);
}

#[tokio::test]
async fn invalid_tokens_are_unauthorized() {
    let srv = TestServer::spawn(vec![john_doe()]).await;
    let client = reqwest::Client::new();
    let now = Utc::now();

    let foreign = mint_jwt(
        "0123456789abcdef0123456789abcdef",
        &claims_for(Role::ADMIN, now, ChronoDuration::minutes(10)),
    );
    let expired = mint_jwt(
        JWT_SECRET,
        &claims_for(Role::ADMIN, now - ChronoDuration::hours(2), ChronoDuration::hours(1)),
    );

    for (token, code) in [
        ("garbage".to_string(), "malformed_token"),
        (foreign, "invalid_signature"),
        (expired, "token_expired"),
    ] {
        let res = client
            .delete(srv.url("/api/customers/1"))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{code}");
        assert_eq!(error_code(res).await, code);
    }

    assert_eq!(srv.store.list().unwrap(), vec![john_doe()]);
}

#[tokio::test]
async fn minted_token_with_valid_signature_is_accepted() {
    let srv = TestServer::spawn(vec![john_doe()]).await;
    let client = reqwest::Client::new();

    let token = mint_jwt(
        JWT_SECRET,
        &claims_for(Role::ADMIN, Utc::now(), ChronoDuration::minutes(10)),
    );

    let res = client
        .delete(srv.url("/api/customers/1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn concurrent_creates_are_not_lost() {
    const N: i64 = 32;
    let srv = TestServer::spawn(vec![]).await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv, "user", "password").await;

    let mut tasks = Vec::new();
    for id in 0..N {
        let client = client.clone();
        let token = token.clone();
        let url = srv.url("/api/customers");
        tasks.push(tokio::spawn(async move {
            client
                .post(url)
                .bearer_auth(token)
                .json(&customer(id, "Concurrent", "1 Loop", "555-0000", (2000, 1, 1)))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }

    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::CREATED);
    }

    let customers: Vec<Customer> = client
        .get(srv.url("/api/customers"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(customers.len(), N as usize);
}
