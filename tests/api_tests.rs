//! API integration tests.
//!
//! These run against a live server with a clean database:
//! `cargo run` in one terminal, then `cargo test -- --ignored`.

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080";

/// Unique suffix so tests can be re-run against a persistent database
fn unique() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn create_book(client: &Client, isbn: &str, total_stock: i32) -> Value {
    let response = client
        .post(format!("{}/books/new", BASE_URL))
        .json(&json!({
            "title": "Test Book",
            "author": "Test Author",
            "isbn": isbn,
            "publisher": "Test House",
            "publication_year": 2020,
            "category": "testing",
            "total_stock": total_stock
        }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse book")
}

async fn create_reader(client: &Client, reader_number: &str) -> Value {
    let response = client
        .post(format!("{}/readers/new", BASE_URL))
        .json(&json!({
            "name": "Test Reader",
            "reader_number": reader_number,
            "contact": "test@example.org"
        }))
        .send()
        .await
        .expect("Failed to create reader");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse reader")
}

async fn get_book(client: &Client, book_id: i64) -> Value {
    client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to get book")
        .json()
        .await
        .expect("Failed to parse book")
}

async fn borrow(client: &Client, book_id: i64, reader_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/loans/borrow", BASE_URL))
        .json(&json!({
            "book_id": book_id,
            "reader_id": reader_id,
            "due_date": "2023-12-31"
        }))
        .send()
        .await
        .expect("Failed to send borrow request")
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
async fn test_create_and_get_book() {
    let client = Client::new();
    let isbn = format!("isbn-{}", unique());

    let book = create_book(&client, &isbn, 5).await;
    let book_id = book["book_id"].as_i64().expect("No book ID");

    // Create sets available_stock = total_stock
    assert_eq!(book["total_stock"], 5);
    assert_eq!(book["available_stock"], 5);

    let fetched = get_book(&client, book_id).await;
    assert_eq!(fetched["isbn"], isbn.as_str());
    assert_eq!(fetched["title"], "Test Book");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_rejected() {
    let client = Client::new();
    let isbn = format!("isbn-{}", unique());

    create_book(&client, &isbn, 5).await;

    let response = client
        .post(format!("{}/books/new", BASE_URL))
        .json(&json!({
            "title": "Another Book",
            "author": "Another Author",
            "isbn": isbn,
            "total_stock": 3
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    // The conflicting insert must not have created a row
    let listing: Value = client
        .get(format!("{}/books?search={}", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to list books")
        .json()
        .await
        .expect("Failed to parse listing");
    assert_eq!(listing["total"], 1);
}

#[tokio::test]
#[ignore]
async fn test_missing_title_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books/new", BASE_URL))
        .json(&json!({
            "title": "",
            "author": "Author",
            "isbn": format!("isbn-{}", unique()),
            "total_stock": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_update_book_stock_bounds() {
    let client = Client::new();
    let isbn = format!("isbn-{}", unique());

    let book = create_book(&client, &isbn, 5).await;
    let book_id = book["book_id"].as_i64().expect("No book ID");

    // available_stock > total_stock is rejected before any write
    let response = client
        .post(format!("{}/books/edit/{}", BASE_URL, book_id))
        .json(&json!({
            "title": "Test Book",
            "author": "Test Author",
            "isbn": isbn,
            "total_stock": 5,
            "available_stock": 6
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let fetched = get_book(&client, book_id).await;
    assert_eq!(fetched["available_stock"], 5);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_reader_number_rejected() {
    let client = Client::new();
    let number = format!("R-{}", unique());

    create_reader(&client, &number).await;

    let response = client
        .post(format!("{}/readers/new", BASE_URL))
        .json(&json!({
            "name": "Someone Else",
            "reader_number": number
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_restores_stock() {
    let client = Client::new();

    let book = create_book(&client, &format!("isbn-{}", unique()), 5).await;
    let book_id = book["book_id"].as_i64().expect("No book ID");
    let reader = create_reader(&client, &format!("R-{}", unique())).await;
    let reader_id = reader["reader_id"].as_i64().expect("No reader ID");

    // Borrow: stock 5 -> 4, one open loan
    let response = borrow(&client, book_id, reader_id).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let loan_id = body["loan"]["loan_id"].as_i64().expect("No loan ID");
    assert!(body["loan"]["return_date"].is_null());

    assert_eq!(get_book(&client, book_id).await["available_stock"], 4);

    // Return: stock back to 5, return_date set
    let response = client
        .post(format!("{}/loans/return/{}", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "returned");
    assert!(body["loan"]["return_date"].is_string());

    assert_eq!(get_book(&client, book_id).await["available_stock"], 5);
}

#[tokio::test]
#[ignore]
async fn test_borrow_out_of_stock_fails() {
    let client = Client::new();

    let book = create_book(&client, &format!("isbn-{}", unique()), 0).await;
    let book_id = book["book_id"].as_i64().expect("No book ID");
    let reader = create_reader(&client, &format!("R-{}", unique())).await;
    let reader_id = reader["reader_id"].as_i64().expect("No reader ID");

    let response = borrow(&client, book_id, reader_id).await;
    assert_eq!(response.status(), 422);

    // State unchanged: still zero stock, no loan created
    assert_eq!(get_book(&client, book_id).await["available_stock"], 0);
    let history: Value = client
        .get(format!("{}/search/book_loans/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to get history")
        .json()
        .await
        .expect("Failed to parse history");
    assert_eq!(history.as_array().expect("Not an array").len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_borrow_unknown_book_fails() {
    let client = Client::new();
    let reader = create_reader(&client, &format!("R-{}", unique())).await;
    let reader_id = reader["reader_id"].as_i64().expect("No reader ID");

    let response = borrow(&client, i32::MAX as i64, reader_id).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_borrow_unknown_reader_fails() {
    let client = Client::new();
    let book = create_book(&client, &format!("isbn-{}", unique()), 5).await;
    let book_id = book["book_id"].as_i64().expect("No book ID");

    let response = borrow(&client, book_id, i32::MAX as i64).await;
    assert_eq!(response.status(), 404);

    assert_eq!(get_book(&client, book_id).await["available_stock"], 5);
}

#[tokio::test]
#[ignore]
async fn test_double_return_rejected() {
    let client = Client::new();

    let book = create_book(&client, &format!("isbn-{}", unique()), 5).await;
    let book_id = book["book_id"].as_i64().expect("No book ID");
    let reader = create_reader(&client, &format!("R-{}", unique())).await;
    let reader_id = reader["reader_id"].as_i64().expect("No reader ID");

    let response = borrow(&client, book_id, reader_id).await;
    let body: Value = response.json().await.expect("Failed to parse response");
    let loan_id = body["loan"]["loan_id"].as_i64().expect("No loan ID");

    let response = client
        .post(format!("{}/loans/return/{}", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    // Second return is rejected and does not touch stock
    let response = client
        .post(format!("{}/loans/return/{}", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    assert_eq!(get_book(&client, book_id).await["available_stock"], 5);
}

#[tokio::test]
#[ignore]
async fn test_delete_book_with_open_loan_rejected() {
    let client = Client::new();

    let book = create_book(&client, &format!("isbn-{}", unique()), 5).await;
    let book_id = book["book_id"].as_i64().expect("No book ID");
    let reader = create_reader(&client, &format!("R-{}", unique())).await;
    let reader_id = reader["reader_id"].as_i64().expect("No reader ID");

    let response = borrow(&client, book_id, reader_id).await;
    let body: Value = response.json().await.expect("Failed to parse response");
    let loan_id = body["loan"]["loan_id"].as_i64().expect("No loan ID");

    // Delete refused while the loan is open
    let response = client
        .post(format!("{}/books/delete/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    // After the return, the delete goes through (closed history included)
    client
        .post(format!("{}/loans/return/{}", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .post(format!("{}/books/delete/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_delete_reader_with_open_loan_rejected() {
    let client = Client::new();

    let book = create_book(&client, &format!("isbn-{}", unique()), 5).await;
    let book_id = book["book_id"].as_i64().expect("No book ID");
    let reader = create_reader(&client, &format!("R-{}", unique())).await;
    let reader_id = reader["reader_id"].as_i64().expect("No reader ID");

    borrow(&client, book_id, reader_id).await;

    let response = client
        .post(format!("{}/readers/delete/{}", BASE_URL, reader_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_active_loans_listing() {
    let client = Client::new();

    let book = create_book(&client, &format!("isbn-{}", unique()), 5).await;
    let book_id = book["book_id"].as_i64().expect("No book ID");
    let reader = create_reader(&client, &format!("R-{}", unique())).await;
    let reader_id = reader["reader_id"].as_i64().expect("No reader ID");

    let response = borrow(&client, book_id, reader_id).await;
    let body: Value = response.json().await.expect("Failed to parse response");
    let loan_id = body["loan"]["loan_id"].as_i64().expect("No loan ID");

    let loans: Value = client
        .get(format!("{}/loans/active", BASE_URL))
        .send()
        .await
        .expect("Failed to list active loans")
        .json()
        .await
        .expect("Failed to parse active loans");

    let entry = loans
        .as_array()
        .expect("Not an array")
        .iter()
        .find(|l| l["loan_id"].as_i64() == Some(loan_id))
        .expect("Loan missing from active listing")
        .clone();
    assert_eq!(entry["book_title"], "Test Book");
    assert_eq!(entry["reader_name"], "Test Reader");

    // The due date (2023-12-31) is in the past, so it shows up as overdue
    let overdue: Value = client
        .get(format!("{}/loans/overdue", BASE_URL))
        .send()
        .await
        .expect("Failed to list overdue loans")
        .json()
        .await
        .expect("Failed to parse overdue loans");
    assert!(overdue
        .as_array()
        .expect("Not an array")
        .iter()
        .any(|l| l["loan_id"].as_i64() == Some(loan_id)));
}

#[tokio::test]
#[ignore]
async fn test_reader_loan_history() {
    let client = Client::new();

    let book = create_book(&client, &format!("isbn-{}", unique()), 5).await;
    let book_id = book["book_id"].as_i64().expect("No book ID");
    let reader = create_reader(&client, &format!("R-{}", unique())).await;
    let reader_id = reader["reader_id"].as_i64().expect("No reader ID");

    let response = borrow(&client, book_id, reader_id).await;
    let body: Value = response.json().await.expect("Failed to parse response");
    let loan_id = body["loan"]["loan_id"].as_i64().expect("No loan ID");

    client
        .post(format!("{}/loans/return/{}", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");

    // Closed loans stay in the history
    let history: Value = client
        .get(format!("{}/search/reader_loans/{}", BASE_URL, reader_id))
        .send()
        .await
        .expect("Failed to get history")
        .json()
        .await
        .expect("Failed to parse history");

    let entries = history.as_array().expect("Not an array");
    assert_eq!(entries.len(), 1);
    assert!(entries[0]["return_date"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_book_search() {
    let client = Client::new();
    let isbn = format!("isbn-{}", unique());
    create_book(&client, &isbn, 2).await;

    // Exact ISBN match
    let listing: Value = client
        .get(format!("{}/books?search={}", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to list books")
        .json()
        .await
        .expect("Failed to parse listing");
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["items"][0]["isbn"], isbn.as_str());

    // Substring on author
    let listing: Value = client
        .get(format!("{}/books?search=est%20Auth", BASE_URL))
        .send()
        .await
        .expect("Failed to list books")
        .json()
        .await
        .expect("Failed to parse listing");
    assert!(listing["total"].as_i64().expect("No total") >= 1);
}

#[tokio::test]
#[ignore]
async fn test_get_stats() {
    let client = Client::new();

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["books"]["total"].is_number());
    assert!(body["readers"]["total"].is_number());
    assert!(body["loans"]["active"].is_number());
    assert!(body["loans"]["overdue"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_never_oversell() {
    let client = Client::new();

    let book = create_book(&client, &format!("isbn-{}", unique()), 3).await;
    let book_id = book["book_id"].as_i64().expect("No book ID");
    let reader = create_reader(&client, &format!("R-{}", unique())).await;
    let reader_id = reader["reader_id"].as_i64().expect("No reader ID");

    // Fire more borrows than there are copies; exactly total_stock may win
    let mut handles = Vec::new();
    for _ in 0..10 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            borrow(&client, book_id, reader_id).await.status().as_u16()
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.expect("Task panicked") == 201 {
            created += 1;
        }
    }

    assert_eq!(created, 3);
    assert_eq!(get_book(&client, book_id).await["available_stock"], 0);
}
