//! Shared helpers for integration tests against a mock Rebrickable server

#![allow(dead_code)]

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::MockServer;

use rebrick::{Rebrick, Settings};

pub const API_KEY: &str = "test-key";

/// Settings pointing every URL at the mock server, without throttling
pub fn settings(server: &MockServer) -> Settings {
    let uri = server.uri();
    let mut settings = Settings::new(API_KEY)
        .with_base_url(&uri)
        .with_request_delay(Duration::ZERO);

    settings.set_image_url = format!("{}/media/sets/{{id}}.jpg", uri);
    settings.element_image_url = format!("{}/media/parts/elements/{{id}}.jpg", uri);
    settings.lego_element_image_url = format!("{}/cdn/element/{{id}}.jpg", uri);
    settings
}

pub fn client(server: &MockServer) -> Rebrick {
    Rebrick::new(settings(server)).unwrap()
}

/// Pagination envelope as returned by list endpoints
pub fn page(results: Value, next: Option<String>) -> Value {
    let count = results.as_array().map(|r| r.len()).unwrap_or(0);
    json!({
        "count": count,
        "next": next,
        "previous": null,
        "results": results
    })
}

pub fn theme(id: u32, parent_id: Option<u32>, name: &str) -> Value {
    json!({"id": id, "parent_id": parent_id, "name": name})
}

pub fn set(set_num: &str, theme_id: u32, name: &str) -> Value {
    json!({
        "set_num": set_num,
        "theme_id": theme_id,
        "name": name,
        "year": 1995,
        "num_parts": 763,
        "set_url": format!("https://rebrickable.com/sets/{}/", set_num),
        "set_img_url": format!("https://m.rebrickable.com/media/sets/{}.jpg", set_num)
    })
}

pub fn color(id: i32, name: &str, rgb: &str) -> Value {
    json!({"id": id, "name": name, "rgb": rgb, "is_trans": false, "external_ids": {}})
}
