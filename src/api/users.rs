//! User account endpoints (`/api/v3/users/`)
//!
//! Apart from badges and the login call, every resource lives under the
//! user token, so these functions fail with `MissingUserToken` before
//! sending anything when the client has no token.

use serde_json::Value;

use crate::domain::catalog::normalize_set_id;
use super::error::RebrickResult;
use super::http_client::ApiClient;
use super::query::{ElementDetails, PageRequest, Params, SetFilter, UserPartFilter};

// ============================================================================
// Badges & Login
// ============================================================================

/// Get all available badges
pub async fn get_badges(api: &ApiClient, page: &PageRequest) -> RebrickResult<Value> {
    let params = Params::new().page(page);
    api.get(&api.users_url("badges/"), params).await
}

/// Get a single badge
pub async fn get_badge(api: &ApiClient, badge_id: u32) -> RebrickResult<Value> {
    let path = format!("badges/{}/", badge_id);
    api.get(&api.users_url(&path), Params::new()).await
}

/// Exchange username and password for a user token
pub async fn get_token(api: &ApiClient, username: &str, password: &str) -> RebrickResult<Value> {
    let params = Params::new()
        .set("username", Some(username))
        .set("password", Some(password));

    api.post(&api.users_url("_token/"), params).await
}

// ============================================================================
// Profile & Parts
// ============================================================================

/// Get the user's profile
pub async fn get_profile(api: &ApiClient) -> RebrickResult<Value> {
    let path = format!("{}/profile/", api.user_token()?);
    api.get(&api.users_url(&path), Params::new()).await
}

/// Find out how many parts the user still needs to build a set
pub async fn get_build(api: &ApiClient, set_id: &str) -> RebrickResult<Value> {
    let path = format!("{}/build/{}/", api.user_token()?, normalize_set_id(set_id));
    api.get(&api.users_url(&path), Params::new()).await
}

/// Get every part the user owns, across sets and part lists
pub async fn get_elements(
    api: &ApiClient,
    filter: &UserPartFilter,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new()
        .set("part_num", filter.part_id.as_deref())
        .set("part_cat_id", filter.part_cat_id)
        .set("color_id", filter.color_id)
        .flag("inc_part_details", filter.part_details)
        .page(page);

    let path = format!("{}/allparts/", api.user_token()?);
    api.get(&api.users_url(&path), params).await
}

/// Get the parts the user marked as lost
pub async fn get_lost_elements(
    api: &ApiClient,
    part_details: bool,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new()
        .flag("inc_part_details", part_details)
        .page(page);

    let path = format!("{}/lost_parts/", api.user_token()?);
    api.get(&api.users_url(&path), params).await
}

/// Get the parts contained in all of the user's part lists
pub async fn get_partlists_elements(
    api: &ApiClient,
    filter: &UserPartFilter,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new()
        .set("search", filter.search.as_deref())
        .set("part_num", filter.part_id.as_deref())
        .set("part_cat_id", filter.part_cat_id)
        .set("color_id", filter.color_id)
        .set("inc_part_details", filter.part_details.then_some(1))
        .page(page);

    let path = format!("{}/parts/", api.user_token()?);
    api.get(&api.users_url(&path), params).await
}

// ============================================================================
// Part Lists
// ============================================================================

/// Get the user's part lists
pub async fn get_partlists(api: &ApiClient, page: &PageRequest) -> RebrickResult<Value> {
    let params = Params::new().page(page);
    let path = format!("{}/partlists/", api.user_token()?);
    api.get(&api.users_url(&path), params).await
}

/// Get a single part list
pub async fn get_partlist(api: &ApiClient, list_id: u32) -> RebrickResult<Value> {
    let path = format!("{}/partlists/{}/", api.user_token()?, list_id);
    api.get(&api.users_url(&path), Params::new()).await
}

/// Get the parts of a part list
pub async fn get_partlist_elements(
    api: &ApiClient,
    list_id: u32,
    details: ElementDetails,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new()
        .flag("inc_part_details", details.part_details)
        .flag("inc_color_details", details.color_details)
        .page(page);

    let path = format!("{}/partlists/{}/parts/", api.user_token()?, list_id);
    api.get(&api.users_url(&path), params).await
}

/// Get one part/color entry of a part list
pub async fn get_partlist_part_color(
    api: &ApiClient,
    list_id: u32,
    part_id: &str,
    color_id: i32,
    part_details: bool,
) -> RebrickResult<Value> {
    let params = Params::new().set("inc_part_details", part_details.then_some(1));

    let path = format!(
        "{}/partlists/{}/parts/{}/{}/",
        api.user_token()?,
        list_id,
        part_id,
        color_id
    );
    api.get(&api.users_url(&path), params).await
}

// ============================================================================
// Sets & Set Lists
// ============================================================================

/// Get the sets the user owns
pub async fn get_sets(
    api: &ApiClient,
    filter: &SetFilter,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new()
        .set("search", filter.search.as_deref())
        .set("theme_id", filter.theme_id)
        .set("min_year", filter.min_year)
        .set("max_year", filter.max_year)
        .set("min_parts", filter.min_pieces)
        .set("max_parts", filter.max_pieces)
        .page(page);

    let path = format!("{}/sets/", api.user_token()?);
    api.get(&api.users_url(&path), params).await
}

/// Get the user's set lists
pub async fn get_setlists(api: &ApiClient, page: &PageRequest) -> RebrickResult<Value> {
    let params = Params::new().page(page);
    let path = format!("{}/setlists/", api.user_token()?);
    api.get(&api.users_url(&path), params).await
}

/// Get a single set list
pub async fn get_setlist(api: &ApiClient, list_id: u32) -> RebrickResult<Value> {
    let path = format!("{}/setlists/{}/", api.user_token()?, list_id);
    api.get(&api.users_url(&path), Params::new()).await
}

/// Get the sets of a set list
pub async fn get_setlist_sets(
    api: &ApiClient,
    list_id: u32,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new().page(page);
    let path = format!("{}/setlists/{}/sets/", api.user_token()?, list_id);
    api.get(&api.users_url(&path), params).await
}
