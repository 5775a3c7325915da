//! Integration tests for user account calls against a mock Rebrickable server

use serde_json::json;
use wiremock::matchers::{
    body_string_contains, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rebrick::api::{users, PageRequest, SetFilter, UserPartFilter};
use rebrick::{Rebrick, RebrickError};

mod common;
use common::{client, page, set, settings, API_KEY};

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v3/users/_token/"))
        .and(body_string_contains("username=brickfan"))
        .and(body_string_contains("password=hunter2"))
        .and(body_string_contains(format!("key={}", API_KEY)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_token": token})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_posts_credentials_and_keeps_token() {
    let server = MockServer::start().await;
    mount_login(&server, "tok123").await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users/tok123/setlists/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{"id": 3, "name": "Castles", "num_sets": 5, "is_buildable": true}]),
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client(&server);

    let token = client.login("brickfan", "hunter2").await.unwrap();
    assert_eq!(token.as_deref(), Some("tok123"));

    let setlists = client.get_users_setlists().await.unwrap().unwrap();
    assert_eq!(setlists.len(), 1);
    assert_eq!(setlists[0].to_string(), "ID: 3, Castles (5)");
}

#[tokio::test]
async fn test_failed_login_in_silent_mode() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/users/_token/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("{\"detail\":\"Invalid credentials\"}"),
        )
        .mount(&server)
        .await;

    let mut client = Rebrick::new(settings(&server).with_silent(true)).unwrap();

    let token = client.login("brickfan", "wrong").await.unwrap();
    assert!(token.is_none());

    let result = client.get_users_partlists().await;
    assert!(matches!(result, Err(RebrickError::MissingUserToken)));
}

#[tokio::test]
async fn test_missing_user_token_never_hits_network() {
    let server = MockServer::start().await;

    let result = client(&server).get_users_sets(&SetFilter::default()).await;

    assert!(matches!(result, Err(RebrickError::MissingUserToken)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_users_sets_carry_owned_quantity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users/tok/sets/"))
        .and(query_param("theme_id", "186"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([
                {
                    "list_id": 1,
                    "quantity": 2,
                    "include_spares": true,
                    "set": set("6090-1", 186, "Royal Knight's Castle")
                },
                {
                    "list_id": 1,
                    "quantity": 1,
                    "include_spares": true,
                    "set": set("6080-1", 186, "King's Castle")
                }
            ]),
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = Rebrick::new(settings(&server).with_user_token("tok")).unwrap();
    let filter = SetFilter {
        theme_id: Some(186),
        ..Default::default()
    };

    let sets = client.get_users_sets(&filter).await.unwrap().unwrap();

    let counts: Vec<Option<u32>> = sets.iter().map(|s| s.count).collect();
    assert_eq!(counts, vec![Some(2), Some(1)]);
    assert_eq!(sets[1].collection_id, "6080-1");
}

#[tokio::test]
async fn test_partlist_elements_use_token_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users/tok/partlists/7/parts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{
                "part": {"part_num": "3001", "part_cat_id": 11, "name": "Brick 2 x 4"},
                "color": {"id": 4, "name": "Red", "rgb": "C91A09", "is_trans": false},
                "quantity": 40
            }]),
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = Rebrick::new(settings(&server).with_user_token("tok")).unwrap();

    let elements = client
        .get_users_partlist_elements(7, Default::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(elements[0].count, Some(40));
    assert_eq!(elements[0].element_id, None);
}

#[tokio::test]
async fn test_build_endpoint_normalizes_set_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users/tok/build/6090-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "can_build": false,
            "pct_owned": 87.5,
            "num_missing": 95
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Rebrick::new(settings(&server).with_user_token("tok")).unwrap();

    let build = users::get_build(client.api(), "6090").await.unwrap();
    assert_eq!(build["num_missing"], 95);
}

#[tokio::test]
async fn test_badges_need_no_user_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users/badges/"))
        .and(query_param("page_size", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{"id": 1, "code": "first_set", "name": "First Set"}]),
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users/badges/1/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "First Set"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);

    let badges = users::get_badges(client.api(), &PageRequest::default().with_page_size(50))
        .await
        .unwrap();
    assert_eq!(badges["results"][0]["code"], "first_set");

    let badge = users::get_badge(client.api(), 1).await.unwrap();
    assert_eq!(badge["name"], "First Set");
}

#[tokio::test]
async fn test_profile_uses_token_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users/tok/profile/"))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": 42,
            "username": "brickfan"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Rebrick::new(settings(&server).with_user_token("tok")).unwrap();

    let profile = users::get_profile(client.api()).await.unwrap();
    assert_eq!(profile["username"], "brickfan");

    let result = users::get_profile(common::client(&server).api()).await;
    assert!(matches!(result, Err(RebrickError::MissingUserToken)));
}

#[tokio::test]
async fn test_partlists_elements_omit_detail_flag_when_unset() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users/tok/parts/"))
        .and(query_param("search", "slope"))
        .and(query_param_is_missing("inc_part_details"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), None)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users/tok/parts/"))
        .and(query_param("inc_part_details", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = Rebrick::new(settings(&server).with_user_token("tok")).unwrap();
    let mut filter = UserPartFilter {
        search: Some("slope".to_string()),
        ..Default::default()
    };

    users::get_partlists_elements(client.api(), &filter, &PageRequest::default())
        .await
        .unwrap();

    filter.search = None;
    filter.part_details = true;
    users::get_partlists_elements(client.api(), &filter, &PageRequest::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_partlist_part_color_path_and_detail_flag() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users/tok/partlists/7/parts/3001/4/"))
        .and(query_param_is_missing("inc_part_details"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"quantity": 12})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users/tok/partlists/7/parts/3001/4/"))
        .and(query_param("inc_part_details", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"quantity": 13})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Rebrick::new(settings(&server).with_user_token("tok")).unwrap();

    let plain = users::get_partlist_part_color(client.api(), 7, "3001", 4, false)
        .await
        .unwrap();
    assert_eq!(plain["quantity"], 12);

    let detailed = users::get_partlist_part_color(client.api(), 7, "3001", 4, true)
        .await
        .unwrap();
    assert_eq!(detailed["quantity"], 13);
}
