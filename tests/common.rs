#![allow(dead_code)]

use quotation_server::auth::{generate_session_token, NewUser, Role};
use quotation_server::config::{default_company, SessionConfig};
use quotation_server::document::StaticPageLayout;
use quotation_server::AppState;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const STAFF_EMAIL: &str = "staff@example.com";
pub const STAFF_PASSWORD: &str = "staff-password";

/// A directory holding placeholder images for every default static page.
pub fn static_pages_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for index in [1, 2, 3, 4, 5, 7, 8, 9] {
        std::fs::write(dir.path().join(format!("{}.jpg", index)), b"jpg")
            .expect("write page image");
    }
    dir
}

/// In-memory state with one admin and one staff account.
pub async fn setup_test_app_state(pages: &TempDir) -> AppState {
    let state = AppState::in_memory(
        SessionConfig::new(TEST_SECRET),
        StaticPageLayout::new(pages.path()),
        default_company(),
    );

    for (email, password, role) in [
        (ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin),
        (STAFF_EMAIL, STAFF_PASSWORD, Role::User),
    ] {
        state
            .users
            .create(NewUser {
                email: email.to_string(),
                password_hash: bcrypt::hash(password, 4).expect("hash password"),
                role,
            })
            .await
            .expect("create test user");
    }

    state
}

/// Bearer header value for an existing user.
pub async fn bearer_for(state: &AppState, email: &str) -> String {
    let user = state
        .users
        .find_by_email(email)
        .await
        .expect("lookup user")
        .expect("user exists");
    let token = generate_session_token(&state.session.secret, &user, state.session.ttl_seconds)
        .expect("sign token");
    format!("Bearer {}", token)
}

pub fn sample_quote_json(quote_number: &str) -> Value {
    json!({
        "quoteDetails": {
            "quoteNumber": quote_number,
            "issueDate": "2025-12-16",
            "expiryDate": "2026-01-15",
            "bidNumber": "351253"
        },
        "clientDetails": {
            "name": "Sarah Mitchell",
            "addressLine1": "12 Example St, Adelaide",
            "phone": "0400 000 000"
        },
        "companyDetails": {
            "name": "JRJ Contractors",
            "address": "78B Millicent St, Athol Park, Adelaide, 5012, South Australia",
            "email": "info@jrjcontractors.com.au",
            "phone": "+61 412 962 127"
        },
        "columnHeaders": {
            "room": "ROOM",
            "description": "DESCRIPTION",
            "amount": "AMOUNT"
        },
        "items": [
            {
                "category": "Kitchen",
                "description": "Flat Panel Melamine Doors\nHettich Soft Close Drawers",
                "amount": 15585.0
            }
        ],
        "taxDetails": {
            "enabled": false,
            "type": "percentage",
            "value": 10.0,
            "description": "GST (10%)",
            "displayAsSeparateRow": true
        },
        "totalDetails": {
            "label": "All Totals Inc GST",
            "totalAmount": 15585.0
        }
    })
}
