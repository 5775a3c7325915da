//! High level Rebrickable client
//!
//! [`Rebrick`] wraps the endpoint functions, follows pagination and maps
//! responses into catalog records. With `silent` enabled, transport and
//! service errors are logged and reported as `Ok(None)` instead.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::api::models::{RawPartColor, RawPartColorDetail, RawSet, RawToken};
use crate::api::{
    lego, users, ApiClient, Cursor, ElementDetails, MinifigFilter, PageRequest, Paginator,
    PartFilter, RebrickResult, RebrickableMapper, SetFilter, Throttle, UserPartFilter,
};
use crate::config::Settings;
use crate::domain::catalog::{
    normalize_set_id, Category, Collection, Color, Element, Minifig, Part, Partlist, Setlist,
    Theme,
};

/// Rebrickable client facade
pub struct Rebrick {
    api: ApiClient,
    settings: Settings,
}

/// First page when `cursor` is `None`, otherwise the page it points to
fn page_at(cursor: Option<Cursor>) -> PageRequest {
    PageRequest {
        page: cursor,
        ..Default::default()
    }
}

impl Rebrick {
    /// Create a new client from settings
    pub fn new(settings: Settings) -> RebrickResult<Self> {
        let api = ApiClient::new(&settings)?;
        Ok(Rebrick { api, settings })
    }

    /// Share a throttle with other clients
    pub fn with_throttle(mut self, throttle: Arc<Throttle>) -> Self {
        self.api = self.api.with_throttle(throttle);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Underlying request builder, for endpoints the facade does not cover
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    /// Apply silent mode to the outcome of an operation
    fn settle<T>(&self, operation: &str, result: RebrickResult<T>) -> RebrickResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.settings.silent && err.is_http() => {
                warn!(operation, status = ?err.status(), error = %err, "Request failed");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Fetch a single resource and map it
    async fn fetch_one<Raw, T, Fut>(
        &self,
        resource: &str,
        request: Fut,
        map: impl FnOnce(Raw) -> T,
    ) -> RebrickResult<Option<T>>
    where
        Raw: DeserializeOwned,
        Fut: Future<Output = RebrickResult<Value>>,
    {
        let result = request
            .await
            .and_then(RebrickableMapper::parse::<Raw>)
            .map(map);

        self.settle(resource, result)
    }

    /// Fetch every page of a list resource and map the results
    async fn fetch_all<Raw, T, F, Fut>(
        &self,
        resource: &str,
        fetch: F,
        map: impl Fn(Raw) -> T,
    ) -> RebrickResult<Option<Vec<T>>>
    where
        Raw: DeserializeOwned,
        F: FnMut(Option<Cursor>) -> Fut,
        Fut: Future<Output = RebrickResult<Value>>,
    {
        let result = Paginator::collect_all(resource, fetch, map).await;

        if let Ok(items) = &result {
            info!(resource, count = items.len(), "Collected all pages");
        }

        self.settle(resource, result)
    }

    // ========================================================================
    // Account
    // ========================================================================

    /// Log in and keep the returned user token for user account calls
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, username: &str, password: &str) -> RebrickResult<Option<String>> {
        let result = users::get_token(&self.api, username, password)
            .await
            .and_then(RebrickableMapper::parse::<RawToken>);

        let Some(token) = self.settle("login", result)? else {
            return Ok(None);
        };

        if token.user_token.is_some() {
            info!(username, "Logged in");
        }

        self.api.set_user_token(token.user_token.clone());
        Ok(token.user_token)
    }

    // ========================================================================
    // Categories & Colors
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> RebrickResult<Option<Vec<Category>>> {
        let api = &self.api;
        self.fetch_all(
            "part_categories",
            move |cursor| {
                let page = page_at(cursor);
                async move { lego::get_categories(api, &page).await }
            },
            RebrickableMapper::map_category,
        )
        .await
    }

    pub async fn get_category(&self, category_id: u32) -> RebrickResult<Option<Category>> {
        self.fetch_one(
            "part_category",
            lego::get_category(&self.api, category_id),
            RebrickableMapper::map_category,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_colors(&self) -> RebrickResult<Option<Vec<Color>>> {
        let api = &self.api;
        self.fetch_all(
            "colors",
            move |cursor| {
                let page = page_at(cursor);
                async move { lego::get_colors(api, &page).await }
            },
            RebrickableMapper::map_color,
        )
        .await
    }

    pub async fn get_color(&self, color_id: i32) -> RebrickResult<Option<Color>> {
        self.fetch_one("color", lego::get_color(&self.api, color_id), RebrickableMapper::map_color)
            .await
    }

    // ========================================================================
    // Elements
    // ========================================================================

    pub async fn get_element(&self, element_id: &str) -> RebrickResult<Option<Element>> {
        self.fetch_one(
            "element",
            lego::get_element(&self.api, element_id),
            RebrickableMapper::map_element,
        )
        .await
    }

    /// Element IDs of a part/color combination
    pub async fn get_element_ids(
        &self,
        part_id: &str,
        color_id: i32,
    ) -> RebrickResult<Option<Vec<String>>> {
        self.fetch_one(
            "part_color",
            lego::get_part_color(&self.api, part_id, color_id),
            |detail: RawPartColorDetail| detail.elements,
        )
        .await
    }

    /// Element image, from Rebrickable first and LEGO as a fallback
    ///
    /// Returns `None` when neither source has the image.
    pub async fn get_element_image(&self, element_id: &str) -> RebrickResult<Option<Bytes>> {
        let sources = [
            self.settings.element_image(element_id),
            self.settings.lego_element_image(element_id),
        ];

        for url in sources {
            match self.api.get_file(&url).await {
                Ok(data) => return Ok(Some(data)),
                Err(e) => debug!(url = %url, error = %e, "Element image not available"),
            }
        }

        Ok(None)
    }

    // ========================================================================
    // Minifigs
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn get_minifigs(
        &self,
        filter: &MinifigFilter,
    ) -> RebrickResult<Option<Vec<Minifig>>> {
        let api = &self.api;
        self.fetch_all(
            "minifigs",
            move |cursor| {
                let page = page_at(cursor);
                async move { lego::get_minifigs(api, filter, &page).await }
            },
            RebrickableMapper::map_minifig,
        )
        .await
    }

    pub async fn get_minifig(&self, minifig_id: &str) -> RebrickResult<Option<Minifig>> {
        self.fetch_one(
            "minifig",
            lego::get_minifig(&self.api, minifig_id),
            RebrickableMapper::map_minifig,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_minifig_elements(
        &self,
        minifig_id: &str,
        details: ElementDetails,
    ) -> RebrickResult<Option<Vec<Element>>> {
        let api = &self.api;
        self.fetch_all(
            "minifig_parts",
            move |cursor| {
                let page = page_at(cursor);
                async move { lego::get_minifig_elements(api, minifig_id, details, &page).await }
            },
            RebrickableMapper::map_element,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_minifig_sets(
        &self,
        minifig_id: &str,
    ) -> RebrickResult<Option<Vec<Collection>>> {
        let api = &self.api;
        self.fetch_all(
            "minifig_sets",
            move |cursor| {
                let page = page_at(cursor);
                async move { lego::get_minifig_sets(api, minifig_id, &page).await }
            },
            RebrickableMapper::map_set,
        )
        .await
    }

    // ========================================================================
    // MOCs
    // ========================================================================

    pub async fn get_moc(&self, moc_id: &str) -> RebrickResult<Option<Collection>> {
        self.fetch_one("moc", lego::get_moc(&self.api, moc_id), RebrickableMapper::map_moc)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_moc_elements(
        &self,
        moc_id: &str,
        part_details: bool,
    ) -> RebrickResult<Option<Vec<Element>>> {
        let api = &self.api;
        self.fetch_all(
            "moc_parts",
            move |cursor| {
                let page = page_at(cursor);
                async move { lego::get_moc_elements(api, moc_id, part_details, &page).await }
            },
            RebrickableMapper::map_element,
        )
        .await
    }

    // ========================================================================
    // Parts
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn get_parts(&self, filter: &PartFilter) -> RebrickResult<Option<Vec<Part>>> {
        let api = &self.api;
        self.fetch_all(
            "parts",
            move |cursor| {
                let page = page_at(cursor);
                async move { lego::get_parts(api, filter, &page).await }
            },
            RebrickableMapper::map_part,
        )
        .await
    }

    pub async fn get_part(&self, part_id: &str) -> RebrickResult<Option<Part>> {
        self.fetch_one("part", lego::get_part(&self.api, part_id), RebrickableMapper::map_part)
            .await
    }

    /// Colors a part is available in, with full color details
    ///
    /// Colors missing from the color table are skipped.
    #[instrument(skip(self))]
    pub async fn get_part_colors(&self, part_id: &str) -> RebrickResult<Option<Vec<Color>>> {
        let Some(colors) = self.get_colors().await? else {
            return Ok(None);
        };

        let lookup: HashMap<i32, Color> = colors
            .into_iter()
            .filter_map(|color| color.color_id.map(|id| (id, color)))
            .collect();

        let api = &self.api;
        let color_ids = self
            .fetch_all(
                "part_colors",
                move |cursor| {
                    let page = page_at(cursor);
                    async move { lego::get_part_colors(api, part_id, &page).await }
                },
                |item: RawPartColor| item.color_id,
            )
            .await?;

        Ok(color_ids.map(|ids| {
            ids.into_iter()
                .filter_map(|id| lookup.get(&id).cloned())
                .collect()
        }))
    }

    #[instrument(skip(self))]
    pub async fn get_part_color_sets(
        &self,
        part_id: &str,
        color_id: i32,
    ) -> RebrickResult<Option<Vec<Collection>>> {
        let api = &self.api;
        self.fetch_all(
            "part_color_sets",
            move |cursor| {
                let page = page_at(cursor);
                async move { lego::get_part_color_sets(api, part_id, color_id, &page).await }
            },
            RebrickableMapper::map_set,
        )
        .await
    }

    // ========================================================================
    // Sets
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn get_sets(&self, filter: &SetFilter) -> RebrickResult<Option<Vec<Collection>>> {
        let api = &self.api;
        self.fetch_all(
            "sets",
            move |cursor| {
                let page = page_at(cursor);
                async move { lego::get_sets(api, filter, &page).await }
            },
            RebrickableMapper::map_set,
        )
        .await
    }

    pub async fn get_set(&self, set_id: &str) -> RebrickResult<Option<Collection>> {
        self.fetch_one("set", lego::get_set(&self.api, set_id), RebrickableMapper::map_set)
            .await
    }

    /// MOCs that can be built from the parts of a set
    #[instrument(skip(self))]
    pub async fn get_set_alternates(&self, set_id: &str) -> RebrickResult<Option<Vec<Collection>>> {
        let api = &self.api;
        self.fetch_all(
            "set_alternates",
            move |cursor| {
                let page = page_at(cursor);
                async move { lego::get_set_alternates(api, set_id, &page).await }
            },
            RebrickableMapper::map_moc,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_set_elements(
        &self,
        set_id: &str,
        details: ElementDetails,
    ) -> RebrickResult<Option<Vec<Element>>> {
        let api = &self.api;
        self.fetch_all(
            "set_parts",
            move |cursor| {
                let page = page_at(cursor);
                async move { lego::get_set_elements(api, set_id, details, &page).await }
            },
            RebrickableMapper::map_element,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_set_minifigs(&self, set_id: &str) -> RebrickResult<Option<Vec<Minifig>>> {
        let api = &self.api;
        self.fetch_all(
            "set_minifigs",
            move |cursor| {
                let page = page_at(cursor);
                async move { lego::get_set_minifigs(api, set_id, &page).await }
            },
            RebrickableMapper::map_minifig,
        )
        .await
    }

    /// Theme hierarchy of a set, root theme first
    #[instrument(skip(self))]
    pub async fn get_set_themes(&self, set_id: &str) -> RebrickResult<Option<Vec<Theme>>> {
        let set = lego::get_set(&self.api, set_id)
            .await
            .and_then(RebrickableMapper::parse::<RawSet>);

        let Some(set) = self.settle("set", set)? else {
            return Ok(None);
        };

        let mut themes = Vec::new();
        let mut visited = HashSet::new();
        let mut theme_id = set.theme_id;

        // Walk up to the root, stopping on a parent cycle
        while let Some(id) = theme_id.filter(|id| visited.insert(*id)) {
            let Some(theme) = self.get_theme(id).await? else {
                return Ok(None);
            };

            theme_id = theme.parent_id;
            themes.insert(0, theme);
        }

        Ok(Some(themes))
    }

    /// Set image, `None` when it cannot be downloaded
    pub async fn get_set_image(&self, set_id: &str) -> RebrickResult<Option<Bytes>> {
        let url = self.settings.set_image(&normalize_set_id(set_id));

        match self.api.get_file(&url).await {
            Ok(data) => Ok(Some(data)),
            Err(e) => {
                debug!(url = %url, error = %e, "Set image not available");
                Ok(None)
            }
        }
    }

    // ========================================================================
    // Themes
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn get_themes(&self) -> RebrickResult<Option<Vec<Theme>>> {
        let api = &self.api;
        self.fetch_all(
            "themes",
            move |cursor| {
                let page = page_at(cursor);
                async move { lego::get_themes(api, &page).await }
            },
            RebrickableMapper::map_theme,
        )
        .await
    }

    pub async fn get_theme(&self, theme_id: u32) -> RebrickResult<Option<Theme>> {
        self.fetch_one("theme", lego::get_theme(&self.api, theme_id), RebrickableMapper::map_theme)
            .await
    }

    // ========================================================================
    // User Parts
    // ========================================================================

    /// All parts owned by the logged in user
    #[instrument(skip(self))]
    pub async fn get_users_elements(
        &self,
        filter: &UserPartFilter,
    ) -> RebrickResult<Option<Vec<Element>>> {
        let api = &self.api;
        self.fetch_all(
            "user_parts",
            move |cursor| {
                let page = page_at(cursor);
                async move { users::get_elements(api, filter, &page).await }
            },
            RebrickableMapper::map_element,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_users_lost_elements(
        &self,
        part_details: bool,
    ) -> RebrickResult<Option<Vec<Element>>> {
        let api = &self.api;
        self.fetch_all(
            "user_lost_parts",
            move |cursor| {
                let page = page_at(cursor);
                async move { users::get_lost_elements(api, part_details, &page).await }
            },
            RebrickableMapper::map_element,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_users_partlists(&self) -> RebrickResult<Option<Vec<Partlist>>> {
        let api = &self.api;
        self.fetch_all(
            "user_partlists",
            move |cursor| {
                let page = page_at(cursor);
                async move { users::get_partlists(api, &page).await }
            },
            RebrickableMapper::map_partlist,
        )
        .await
    }

    pub async fn get_users_partlist(&self, list_id: u32) -> RebrickResult<Option<Partlist>> {
        self.fetch_one(
            "user_partlist",
            users::get_partlist(&self.api, list_id),
            RebrickableMapper::map_partlist,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_users_partlist_elements(
        &self,
        list_id: u32,
        details: ElementDetails,
    ) -> RebrickResult<Option<Vec<Element>>> {
        let api = &self.api;
        self.fetch_all(
            "user_partlist_parts",
            move |cursor| {
                let page = page_at(cursor);
                async move { users::get_partlist_elements(api, list_id, details, &page).await }
            },
            RebrickableMapper::map_element,
        )
        .await
    }

    // ========================================================================
    // User Sets
    // ========================================================================

    /// Sets owned by the logged in user, with the owned quantity as `count`
    #[instrument(skip(self))]
    pub async fn get_users_sets(
        &self,
        filter: &SetFilter,
    ) -> RebrickResult<Option<Vec<Collection>>> {
        let api = &self.api;
        self.fetch_all(
            "user_sets",
            move |cursor| {
                let page = page_at(cursor);
                async move { users::get_sets(api, filter, &page).await }
            },
            RebrickableMapper::map_owned_set,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_users_setlists(&self) -> RebrickResult<Option<Vec<Setlist>>> {
        let api = &self.api;
        self.fetch_all(
            "user_setlists",
            move |cursor| {
                let page = page_at(cursor);
                async move { users::get_setlists(api, &page).await }
            },
            RebrickableMapper::map_setlist,
        )
        .await
    }

    pub async fn get_users_setlist(&self, list_id: u32) -> RebrickResult<Option<Setlist>> {
        self.fetch_one(
            "user_setlist",
            users::get_setlist(&self.api, list_id),
            RebrickableMapper::map_setlist,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_users_setlist_sets(
        &self,
        list_id: u32,
    ) -> RebrickResult<Option<Vec<Collection>>> {
        let api = &self.api;
        self.fetch_all(
            "user_setlist_sets",
            move |cursor| {
                let page = page_at(cursor);
                async move { users::get_setlist_sets(api, list_id, &page).await }
            },
            RebrickableMapper::map_owned_set,
        )
        .await
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Download a file, e.g. an image URL taken from a record
    pub async fn get_file(&self, url: &str) -> RebrickResult<Option<Bytes>> {
        let result = self.api.get_file(url).await;
        self.settle("file", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RebrickError;
    use std::time::Duration;

    fn offline(silent: bool) -> Rebrick {
        let settings = Settings::new("key")
            .with_base_url("http://127.0.0.1:9")
            .with_request_delay(Duration::ZERO)
            .with_silent(silent);
        Rebrick::new(settings).unwrap()
    }

    #[test]
    fn test_page_at() {
        assert_eq!(page_at(None).page, None);
        assert_eq!(page_at(Some(Cursor::Page(2))).page, Some(Cursor::Page(2)));
    }

    #[test]
    fn test_settle_swallows_http_errors_when_silent() {
        let client = offline(true);
        let err = RebrickError::ApiError { status: 404, message: "Not found".to_string() };

        assert!(matches!(client.settle::<()>("set", Err(err)), Ok(None)));
    }

    #[test]
    fn test_settle_propagates_other_errors_when_silent() {
        let client = offline(true);

        let result = client.settle::<()>("set", Err(RebrickError::ParseError("bad".to_string())));
        assert!(matches!(result, Err(RebrickError::ParseError(_))));

        let result = client.settle::<()>("user_sets", Err(RebrickError::MissingUserToken));
        assert!(matches!(result, Err(RebrickError::MissingUserToken)));
    }

    #[test]
    fn test_settle_propagates_http_errors_when_loud() {
        let client = offline(false);
        let err = RebrickError::ApiError { status: 500, message: "boom".to_string() };

        assert!(matches!(
            client.settle::<()>("set", Err(err)),
            Err(RebrickError::ApiError { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_moc_is_unsupported() {
        let client = offline(true);

        let result = client.get_moc("24522").await;
        match result {
            Err(RebrickError::Unsupported(msg)) => assert!(msg.contains("MOC-24522")),
            other => panic!("expected unsupported error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_user_calls_require_token() {
        let client = offline(true);

        let result = client.get_users_setlists().await;
        assert!(matches!(result, Err(RebrickError::MissingUserToken)));
    }
}
