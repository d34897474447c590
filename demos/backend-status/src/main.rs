//! Backend status classification demo.
//!
//! Shows how per-backend gateway configuration drives the classification of
//! upstream responses.

// Demo-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use std::collections::HashMap;

use gavel::prelude::*;
use serde_json::json;

// ============================================================================
// Canned upstream responses
// ============================================================================

fn canned_response(status: u16, body: &str, content_type: &str) -> BackendResponse {
    let mut headers = HashMap::new();
    if !content_type.is_empty() {
        headers.insert("Content-Type".to_string(), content_type.to_string());
    }
    BackendResponse::from_bytes(status, headers, body.to_string())
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let users = Backend::new(Method::GET, "/users/{id}");
    let health = Backend::new(Method::GET, "/health")
        .with_extra_config(NAMESPACE, json!({"return_error_code": true}));
    let orders = Backend::new(Method::POST, "/orders")
        .with_extra_config(NAMESPACE, json!({"return_error_details": "orders-backend"}));

    println!("=== Handler selection ===");
    for backend in [&users, &health, &orders] {
        let handler = StatusHandler::for_backend(backend);
        println!("{} selected {handler:?}", backend.error_prefix());
    }

    // A 200 through the default handler passes untouched.
    println!("\n=== Classification ===");
    let handler = StatusHandler::for_backend(&users);
    let mut response = handler
        .classify(canned_response(200, r#"{"id": 42}"#, "application/json"))
        .await?;
    let body = response
        .read_body()
        .await
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;
    println!(
        "GET /users/42 -> {} {}",
        response.status(),
        String::from_utf8_lossy(&body)
    );

    // A 404 through the default handler is rejected with endpoint context.
    let handler = StatusHandler::for_backend(&users);
    if let Err(rejection) = handler.classify(canned_response(404, "", "")).await {
        println!("GET /users/42 -> {rejection}");
    }

    // A 503 with return_error_code keeps the failure detail as a record.
    let handler = StatusHandler::for_backend(&health);
    if let Err(rejection) = handler
        .classify(canned_response(503, "try again later", "text/plain"))
        .await
    {
        if let Some(record) = rejection.error().detail() {
            println!("GET /health -> {}", serde_json::to_string(record)?);
        }
    }

    // A 500 with return_error_details names the backend and preserves the
    // response for downstream consumers.
    let handler = StatusHandler::for_backend(&orders);
    if let Err(rejection) = handler
        .classify(canned_response(500, "oops", "text/plain"))
        .await
    {
        println!(
            "POST /orders -> backend {} failed: {rejection}",
            rejection.error().name().unwrap_or("unknown"),
        );
        if let Some(mut preserved) = rejection.into_response() {
            let body = preserved
                .read_body()
                .await
                .map_err(|e| -> Box<dyn std::error::Error> { e })?;
            println!("preserved body: {}", String::from_utf8_lossy(&body));
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
