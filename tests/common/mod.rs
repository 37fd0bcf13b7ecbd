//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};
use storefront_admin::domain::auth::AuthTokens;
use storefront_admin::models::config::ClientConfig;
use storefront_admin::repository::HttpRepository;
use storefront_admin::session::SessionStore;

/// Client settings pointing at a mock server.
pub fn config(base_url: &str) -> ClientConfig {
    ClientConfig {
        api_base_url: base_url.to_string(),
        timeout_secs: 5,
        use_refresh_token: false,
        search_debounce_ms: 20,
        filter_debounce_ms: 20,
        page_size: 10,
        catalog_page_size: 12,
        notification_period_secs: 30,
    }
}

/// Session already holding the given token pair.
pub fn signed_in(access_token: &str, refresh_token: &str) -> Arc<SessionStore> {
    let session = Arc::new(SessionStore::new());
    session.set_tokens(AuthTokens {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
    });
    session
}

pub fn repository(config: &ClientConfig, session: &Arc<SessionStore>) -> HttpRepository {
    HttpRepository::new(config, session.clone()).unwrap()
}

pub fn product_json(id: &str, name: &str, stock: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "Warm light",
        "price": 25.5,
        "stock": stock,
        "low_stock_threshold": 5,
        "stock_status": null,
        "image_url": null,
        "category_id": "c-1",
        "category": {"id": "c-1", "name": "Lighting", "description": null},
        "creator": {"id": "u-1", "username": "root", "email": "root@example.com"},
        "created_by": "u-1",
        "created_at": "2024-05-01T10:00:00",
        "updated_at": "2024-05-02T08:30:00Z"
    })
}

pub fn user_json(id: &str, username: &str, role: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{username}@example.com"),
        "username": username,
        "full_name": "Ann Example",
        "role_id": role,
        "role": {"id": role, "name": role},
        "is_active": true,
        "created_at": "2024-05-01T10:00:00",
        "updated_at": "2024-05-01T10:00:00"
    })
}

/// Paginated envelope as produced by the list endpoints.
pub fn page_json(items: Vec<Value>, total: usize, skip: usize, limit: usize) -> String {
    json!({
        "data": items,
        "metadata": {
            "total": total,
            "skip": skip,
            "limit": limit,
            "page": skip / limit + 1,
            "total_pages": total.div_ceil(limit)
        }
    })
    .to_string()
}
