//! Catalog endpoints (`/api/v3/lego/`)
//!
//! One function per remote resource. Each shapes its parameters and hands
//! them to the [`ApiClient`]; the decoded JSON body is returned untouched.
//!
//! API Docs: https://rebrickable.com/api/v3/docs/

use serde_json::Value;

use crate::domain::catalog::{normalize_moc_id, normalize_set_id};
use super::error::{RebrickError, RebrickResult};
use super::http_client::ApiClient;
use super::query::{ElementDetails, MinifigFilter, PageRequest, Params, PartFilter, SetFilter};

// ============================================================================
// Categories & Colors
// ============================================================================

/// Get all part categories
pub async fn get_categories(api: &ApiClient, page: &PageRequest) -> RebrickResult<Value> {
    let params = Params::new().page(page);
    api.get(&api.lego_url("part_categories/"), params).await
}

/// Get a single part category
pub async fn get_category(api: &ApiClient, category_id: u32) -> RebrickResult<Value> {
    let path = format!("part_categories/{}/", category_id);
    api.get(&api.lego_url(&path), Params::new()).await
}

/// Get all colors
pub async fn get_colors(api: &ApiClient, page: &PageRequest) -> RebrickResult<Value> {
    let params = Params::new().page(page);
    api.get(&api.lego_url("colors/"), params).await
}

/// Get a single color
pub async fn get_color(api: &ApiClient, color_id: i32) -> RebrickResult<Value> {
    let path = format!("colors/{}/", color_id);
    api.get(&api.lego_url(&path), Params::new()).await
}

/// Get a single element (specific part/color combination)
pub async fn get_element(api: &ApiClient, element_id: &str) -> RebrickResult<Value> {
    let path = format!("elements/{}/", element_id);
    api.get(&api.lego_url(&path), Params::new()).await
}

// ============================================================================
// Minifigs
// ============================================================================

/// Search minifigs
pub async fn get_minifigs(
    api: &ApiClient,
    filter: &MinifigFilter,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new()
        .set("search", filter.search.as_deref())
        .set("in_set_num", filter.set_id.as_deref())
        .set("in_theme_id", filter.theme_id)
        .set("min_parts", filter.min_pieces)
        .set("max_parts", filter.max_pieces)
        .page(page);

    api.get(&api.lego_url("minifigs/"), params).await
}

/// Get a single minifig
pub async fn get_minifig(api: &ApiClient, minifig_id: &str) -> RebrickResult<Value> {
    let path = format!("minifigs/{}/", minifig_id);
    api.get(&api.lego_url(&path), Params::new()).await
}

/// Get the elements of a minifig
pub async fn get_minifig_elements(
    api: &ApiClient,
    minifig_id: &str,
    details: ElementDetails,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new()
        .flag("inc_part_details", details.part_details)
        .flag("inc_color_details", details.color_details)
        .page(page);

    let path = format!("minifigs/{}/parts/", minifig_id);
    api.get(&api.lego_url(&path), params).await
}

/// Get the sets containing a minifig
pub async fn get_minifig_sets(
    api: &ApiClient,
    minifig_id: &str,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new().page(page);
    let path = format!("minifigs/{}/sets/", minifig_id);
    api.get(&api.lego_url(&path), params).await
}

// ============================================================================
// MOCs
// ============================================================================

/// Get a single MOC
///
/// The MOC resources were retired from the public API, so this fails without
/// sending a request.
pub async fn get_moc(_api: &ApiClient, moc_id: &str) -> RebrickResult<Value> {
    Err(moc_unsupported(moc_id))
}

/// Get the elements of a MOC
///
/// Retired from the public API like [`get_moc`].
pub async fn get_moc_elements(
    _api: &ApiClient,
    moc_id: &str,
    _part_details: bool,
    _page: &PageRequest,
) -> RebrickResult<Value> {
    Err(moc_unsupported(moc_id))
}

fn moc_unsupported(moc_id: &str) -> RebrickError {
    RebrickError::Unsupported(format!(
        "{} cannot be fetched, MOCs are no longer available via the API",
        normalize_moc_id(moc_id)
    ))
}

// ============================================================================
// Parts
// ============================================================================

/// Search parts
pub async fn get_parts(
    api: &ApiClient,
    filter: &PartFilter,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new()
        .set("search", filter.search.as_deref())
        .set("part_num", filter.part_id.as_deref())
        .list("part_nums", &filter.part_ids)
        .set("part_cat_id", filter.part_cat_id)
        .set("color_id", filter.color_id)
        .set("bricklink_id", filter.bricklink_id.as_deref())
        .set("brickowl_id", filter.brickowl_id.as_deref())
        .set("lego_id", filter.lego_id.as_deref())
        .set("ldraw_id", filter.ldraw_id.as_deref())
        .flag("inc_part_details", filter.part_details)
        .page(page);

    api.get(&api.lego_url("parts/"), params).await
}

/// Get a single part
pub async fn get_part(api: &ApiClient, part_id: &str) -> RebrickResult<Value> {
    let path = format!("parts/{}/", part_id);
    api.get(&api.lego_url(&path), Params::new()).await
}

/// Get a part/color combination, including its element IDs
pub async fn get_part_color(api: &ApiClient, part_id: &str, color_id: i32) -> RebrickResult<Value> {
    let path = format!("parts/{}/colors/{}/", part_id, color_id);
    api.get(&api.lego_url(&path), Params::new()).await
}

/// Get the colors a part appears in
pub async fn get_part_colors(
    api: &ApiClient,
    part_id: &str,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new().page(page);
    let path = format!("parts/{}/colors/", part_id);
    api.get(&api.lego_url(&path), params).await
}

/// Get the sets containing a part/color combination
pub async fn get_part_color_sets(
    api: &ApiClient,
    part_id: &str,
    color_id: i32,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new().page(page);
    let path = format!("parts/{}/colors/{}/sets/", part_id, color_id);
    api.get(&api.lego_url(&path), params).await
}

// ============================================================================
// Sets
// ============================================================================

/// Search sets
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

    api.get(&api.lego_url("sets/"), params).await
}

/// Get a single set; bare set numbers refer to the first variant
pub async fn get_set(api: &ApiClient, set_id: &str) -> RebrickResult<Value> {
    let path = format!("sets/{}/", normalize_set_id(set_id));
    api.get(&api.lego_url(&path), Params::new()).await
}

/// Get MOCs built from the parts of a set
pub async fn get_set_alternates(
    api: &ApiClient,
    set_id: &str,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new().page(page);
    let path = format!("sets/{}/alternates/", normalize_set_id(set_id));
    api.get(&api.lego_url(&path), params).await
}

/// Get the elements of a set
pub async fn get_set_elements(
    api: &ApiClient,
    set_id: &str,
    details: ElementDetails,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new()
        .flag("inc_part_details", details.part_details)
        .flag("inc_color_details", details.color_details)
        .flag("inc_minifig_parts", details.minifig_parts)
        .page(page);

    let path = format!("sets/{}/parts/", normalize_set_id(set_id));
    api.get(&api.lego_url(&path), params).await
}

/// Get the minifigs contained in a set
pub async fn get_set_minifigs(
    api: &ApiClient,
    set_id: &str,
    page: &PageRequest,
) -> RebrickResult<Value> {
    let params = Params::new().page(page);
    let path = format!("sets/{}/minifigs/", normalize_set_id(set_id));
    api.get(&api.lego_url(&path), params).await
}

// ============================================================================
// Themes
// ============================================================================

/// Get all themes
pub async fn get_themes(api: &ApiClient, page: &PageRequest) -> RebrickResult<Value> {
    let params = Params::new().page(page);
    api.get(&api.lego_url("themes/"), params).await
}

/// Get a single theme
pub async fn get_theme(api: &ApiClient, theme_id: u32) -> RebrickResult<Value> {
    let path = format!("themes/{}/", theme_id);
    api.get(&api.lego_url(&path), Params::new()).await
}
