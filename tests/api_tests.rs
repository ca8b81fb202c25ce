//! API integration tests
//!
//! These run against a live server with a fresh database:
//! `cargo test -- --ignored`

use reqwest::Client;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const GRAPHQL_URL: &str = "http://localhost:8080/graphql";

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Unique email per test run so suites can be re-run against the same database
fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}@example.org", tag, nanos, n)
}

/// Register a user and return its token
async fn register(client: &Client, tag: &str, role: Option<&str>) -> String {
    let mut body = json!({
        "name": tag,
        "email": unique_email(tag),
        "password": "s3cret"
    });
    if let Some(role) = role {
        body["role"] = json!(role);
    }

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&body)
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse register response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Create a book as admin and return its id
async fn create_book(client: &Client, admin_token: &str, title: &str, copies: i32) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(admin_token)
        .json(&json!({
            "title": title,
            "author": "Test Author",
            "isbn": "978-3-16-148410-0",
            "publication_date": "2001-06-14",
            "genre": "Systems",
            "copies": copies
        }))
        .send()
        .await
        .expect("Failed to send create book request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse book response");
    body["id"].as_i64().expect("No id in response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_and_login() {
    let client = Client::new();
    let email = unique_email("login");

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "name": "Login Test", "email": email, "password": "s3cret" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "s3cret" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());

    // Duplicate registration is rejected
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "name": "Login Test", "email": email, "password": "s3cret" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();
    let token = register(&client, "badpw", None).await;
    assert!(!token.is_empty());

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": "nobody@example.org", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
#[ignore]
async fn test_missing_and_invalid_tokens_are_distinct() {
    let client = Client::new();

    let response = client
        .get(format!("{}/borrows/history", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Access denied");

    let response = client
        .get(format!("{}/borrows/history", BASE_URL))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
#[ignore]
async fn test_book_mutation_requires_admin() {
    let client = Client::new();
    let member_token = register(&client, "member", None).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&member_token)
        .json(&json!({
            "title": "Forbidden Book",
            "author": "Nobody",
            "isbn": "0",
            "publication_date": "2020-01-01",
            "genre": "None",
            "copies": 1
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "FORBIDDEN");

    // Admin succeeds and gets a generated id back
    let admin_token = register(&client, "admin", Some("Admin")).await;
    let book_id = create_book(&client, &admin_token, "Allowed Book", 3).await;
    assert!(book_id > 0);
}

#[tokio::test]
#[ignore]
async fn test_one_copy_contention_scenario() {
    let client = Client::new();
    let admin_token = register(&client, "contention-admin", Some("Admin")).await;
    let u1 = register(&client, "contention-u1", None).await;
    let u2 = register(&client, "contention-u2", None).await;
    let book_id = create_book(&client, &admin_token, "Single Copy", 1).await;

    // U1 borrows the only copy
    let response = client
        .post(format!("{}/borrows/{}", BASE_URL, book_id))
        .bearer_auth(&u1)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["borrow"]["return_date"].is_null());

    // U2 is turned away
    let response = client
        .post(format!("{}/borrows/{}", BASE_URL, book_id))
        .bearer_auth(&u2)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "No copies available");

    // U1 returns, then U2 succeeds
    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, book_id))
        .bearer_auth(&u1)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .post(format!("{}/borrows/{}", BASE_URL, book_id))
        .bearer_auth(&u2)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_return_without_borrow_is_not_found() {
    let client = Client::new();
    let admin_token = register(&client, "return-admin", Some("Admin")).await;
    let member_token = register(&client, "return-member", None).await;
    let book_id = create_book(&client, &admin_token, "Never Borrowed", 2).await;

    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, book_id))
        .bearer_auth(&member_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
#[ignore]
async fn test_borrow_return_round_trip() {
    let client = Client::new();
    let admin_token = register(&client, "roundtrip-admin", Some("Admin")).await;
    let member_token = register(&client, "roundtrip-member", None).await;
    let book_id = create_book(&client, &admin_token, "Round Trip", 2).await;

    let response = client
        .post(format!("{}/borrows/{}", BASE_URL, book_id))
        .bearer_auth(&member_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, book_id))
        .bearer_auth(&member_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    // Copies restored to the pre-borrow value
    let response = client
        .get(format!("{}/books?per_page=100", BASE_URL))
        .bearer_auth(&member_token)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let book = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["id"].as_i64() == Some(book_id))
        .expect("Book missing from listing");
    assert_eq!(book["copies"], 2);

    // Exactly one history row for this book, and it is returned
    let response = client
        .get(format!("{}/borrows/history", BASE_URL))
        .bearer_auth(&member_token)
        .send()
        .await
        .expect("Failed to send request");
    let history: Value = response.json().await.expect("Failed to parse response");
    let rows: Vec<&Value> = history
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["book_id"].as_i64() == Some(book_id))
        .collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0]["return_date"].is_string());
    assert_eq!(rows[0]["book"]["title"], "Round Trip");
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_never_oversell() {
    let client = Client::new();
    let admin_token = register(&client, "concurrent-admin", Some("Admin")).await;
    let book_id = create_book(&client, &admin_token, "Contended", 2).await;

    let mut tokens = Vec::new();
    for i in 0..4 {
        tokens.push(register(&client, &format!("concurrent-{}", i), None).await);
    }

    let mut handles = Vec::new();
    for token in tokens {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(format!("{}/borrows/{}", BASE_URL, book_id))
                .bearer_auth(&token)
                .send()
                .await
                .expect("Failed to send request")
                .status()
                .as_u16()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() == 201 {
            successes += 1;
        }
    }

    // 4 borrowers against 2 copies: exactly min(4, 2) succeed
    assert_eq!(successes, 2);
}

#[tokio::test]
#[ignore]
async fn test_availability_report_invariant() {
    let client = Client::new();
    let admin_token = register(&client, "avail-admin", Some("Admin")).await;
    let member_token = register(&client, "avail-member", None).await;
    let book_id = create_book(&client, &admin_token, "Availability", 3).await;

    let response = client
        .post(format!("{}/borrows/{}", BASE_URL, book_id))
        .bearer_auth(&member_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/reports/availability", BASE_URL))
        .bearer_auth(&member_token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["borrowed_books"].as_i64().unwrap() + body["available_books"].as_i64().unwrap(),
        body["total_books"].as_i64().unwrap()
    );
    assert!(body["borrowed_unique_books"].as_i64().unwrap() >= 1);
}

#[tokio::test]
#[ignore]
async fn test_most_borrowed_report() {
    let client = Client::new();
    let admin_token = register(&client, "report-admin", Some("Admin")).await;
    let member_token = register(&client, "report-member", None).await;
    let book_id = create_book(&client, &admin_token, "Popular", 1).await;

    // Borrow and return twice so the all-time count is 2
    for _ in 0..2 {
        let response = client
            .post(format!("{}/borrows/{}", BASE_URL, book_id))
            .bearer_auth(&member_token)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);

        let response = client
            .post(format!("{}/borrows/{}/return", BASE_URL, book_id))
            .bearer_auth(&member_token)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 200);
    }

    let response = client
        .get(format!("{}/reports/most-borrowed?limit=100", BASE_URL))
        .bearer_auth(&member_token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let entry = body
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["book"]["id"].as_i64() == Some(book_id))
        .expect("Book missing from report");
    assert_eq!(entry["borrow_count"], 2);
}

#[tokio::test]
#[ignore]
async fn test_graphql_register_login_and_gate() {
    let client = Client::new();
    let email = unique_email("gql");

    // register and login are public
    let response = client
        .post(GRAPHQL_URL)
        .json(&json!({
            "query": "mutation($input: RegisterInput!) { register(input: $input) { token } }",
            "variables": { "input": { "name": "GQL User", "email": email, "password": "s3cret" } }
        }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["register"]["token"].is_string(), "{:?}", body);

    let response = client
        .post(GRAPHQL_URL)
        .json(&json!({
            "query": format!("mutation {{ login(email: \"{}\", password: \"s3cret\") {{ token }} }}", email)
        }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let token = body["data"]["login"]["token"].as_str().expect("No token").to_string();

    // Protected query without a token fails with UNAUTHORIZED
    let response = client
        .post(GRAPHQL_URL)
        .json(&json!({ "query": "{ me { id email } }" }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHORIZED");

    // With the token it succeeds
    let response = client
        .post(GRAPHQL_URL)
        .bearer_auth(&token)
        .json(&json!({ "query": "{ me { id email role } }" }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["me"]["email"], email.as_str());
    assert_eq!(body["data"]["me"]["role"], "Member");
}

#[tokio::test]
#[ignore]
async fn test_graphql_admin_guard_and_borrow() {
    let client = Client::new();
    let member_token = register(&client, "gql-member", None).await;
    let admin_token = register(&client, "gql-admin", Some("Admin")).await;

    let add_book = json!({
        "query": "mutation($input: BookInput!) { addBook(input: $input) { id title copies } }",
        "variables": { "input": {
            "title": "GraphQL Book",
            "author": "Resolver",
            "isbn": "1",
            "publicationDate": "2019-05-01",
            "genre": "Systems",
            "copies": 1
        }}
    });

    // Member is forbidden
    let response = client
        .post(GRAPHQL_URL)
        .bearer_auth(&member_token)
        .json(&add_book)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0]["extensions"]["code"], "FORBIDDEN");

    // Admin succeeds
    let response = client
        .post(GRAPHQL_URL)
        .bearer_auth(&admin_token)
        .json(&add_book)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["data"]["addBook"]["id"].as_i64().expect("No book id");

    // Borrow and return through GraphQL
    let response = client
        .post(GRAPHQL_URL)
        .bearer_auth(&member_token)
        .json(&json!({
            "query": format!("mutation {{ borrowBook(bookId: {}) {{ id returnDate }} }}", book_id)
        }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["borrowBook"]["returnDate"].is_null(), "{:?}", body);

    // Second copy does not exist: another member is turned away
    let response = client
        .post(GRAPHQL_URL)
        .bearer_auth(&admin_token)
        .json(&json!({
            "query": format!("mutation {{ borrowBook(bookId: {}) {{ id }} }}", book_id)
        }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0]["extensions"]["code"], "VALIDATION_ERROR");

    let response = client
        .post(GRAPHQL_URL)
        .bearer_auth(&member_token)
        .json(&json!({
            "query": format!("mutation {{ returnBook(bookId: {}) }}", book_id)
        }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["returnBook"], "Book returned successfully");
}
