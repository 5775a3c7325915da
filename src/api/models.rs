//! Rebrickable API Response Models
//!
//! These models represent the JSON responses from the Rebrickable API.
//! They are mapped to the domain records in the mapper module. Fields the
//! records cannot do without are declared without defaults, so a payload
//! missing them fails to deserialize with `missing field`.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

// ============================================================================
// API Response Wrapper
// ============================================================================

/// Paginated list envelope shared by every list endpoint
#[derive(Debug, Deserialize)]
pub struct PageEnvelope<T> {
    #[serde(default)]
    pub count: Option<u64>,
    /// Cursor URL of the next page, `null` on the last page
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

// ============================================================================
// Identifier Helpers
// ============================================================================

/// External identifier, sent either as a number or as a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Number(i64),
    Text(String),
}

impl From<ExternalId> for String {
    fn from(id: ExternalId) -> Self {
        match id {
            ExternalId::Number(n) => n.to_string(),
            ExternalId::Text(s) => s,
        }
    }
}

/// Key must be present, value may be `null`
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Optional identifier normalized to a string
fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ExternalId>::deserialize(deserializer)?.map(String::from))
}

/// ID list normalized to strings, `null` entries skipped
fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<ExternalId>>>::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().map(String::from).collect())
}

/// Per-source ID lists normalized to strings, `null` entries skipped
fn id_lists<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Vec<Option<ExternalId>>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(source, ids)| (source, ids.into_iter().flatten().map(String::from).collect()))
        .collect())
}

// ============================================================================
// Catalog
// ============================================================================

/// Part category (`/part_categories/`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawCategory {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub part_count: Option<u32>,
}

/// Color (`/colors/`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawColor {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub rgb: String,
    #[serde(default)]
    pub is_trans: Option<bool>,
    /// Missing when colors are embedded without details
    #[serde(default)]
    pub external_ids: Option<BTreeMap<String, RawExternalColor>>,
}

/// Color names and IDs in one external catalog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExternalColor {
    #[serde(default)]
    pub ext_ids: Vec<Option<ExternalId>>,
    /// One list of names per external ID
    #[serde(default)]
    pub ext_descrs: Vec<Vec<String>>,
}

/// Part (`/parts/`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawPart {
    pub part_num: String,
    #[serde(deserialize_with = "nullable")]
    pub part_cat_id: Option<u32>,
    pub name: String,
    #[serde(default, deserialize_with = "id_lists")]
    pub external_ids: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub year_from: Option<u32>,
    #[serde(default)]
    pub year_to: Option<u32>,
    #[serde(default)]
    pub part_url: Option<String>,
    #[serde(default)]
    pub part_img_url: Option<String>,
    #[serde(default)]
    pub print_of: Option<String>,
    #[serde(default)]
    pub prints: Vec<String>,
    #[serde(default)]
    pub molds: Vec<String>,
    #[serde(default)]
    pub alternates: Vec<String>,
}

/// Element (`/elements/{id}/` and every `.../parts/` listing)
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    pub part: RawPart,
    pub color: RawColor,
    #[serde(default, deserialize_with = "optional_id")]
    pub element_id: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub design_id: Option<String>,
    #[serde(default)]
    pub element_img_url: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub is_spare: Option<bool>,
}

/// Color availability of a part (`/parts/{id}/colors/`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawPartColor {
    pub color_id: i32,
    #[serde(default)]
    pub color_name: Option<String>,
    #[serde(default)]
    pub num_sets: Option<u32>,
    #[serde(default)]
    pub part_img_url: Option<String>,
    #[serde(default, deserialize_with = "id_list")]
    pub elements: Vec<String>,
}

/// Part/color combination detail (`/parts/{id}/colors/{color}/`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawPartColorDetail {
    #[serde(default, deserialize_with = "id_list")]
    pub elements: Vec<String>,
}

/// Official set (`/sets/`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawSet {
    pub set_num: String,
    #[serde(deserialize_with = "nullable")]
    pub theme_id: Option<u32>,
    pub name: String,
    pub year: u32,
    pub num_parts: u32,
    #[serde(deserialize_with = "nullable")]
    pub set_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub set_img_url: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// MOC (`/sets/{id}/alternates/`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawMoc {
    pub set_num: String,
    #[serde(deserialize_with = "nullable")]
    pub theme_id: Option<u32>,
    pub name: String,
    pub year: u32,
    pub num_parts: u32,
    #[serde(deserialize_with = "nullable")]
    pub moc_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub moc_img_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub designer_name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub designer_url: Option<String>,
}

/// Set entry of a user collection (`/users/{token}/sets/`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawOwnedSet {
    #[serde(default)]
    pub list_id: Option<u32>,
    pub quantity: u32,
    pub set: RawSet,
}

/// Minifig (`/minifigs/` and `/sets/{id}/minifigs/`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawMinifig {
    pub set_num: String,
    #[serde(alias = "set_name")]
    pub name: String,
    #[serde(default)]
    pub num_parts: Option<u32>,
    #[serde(default)]
    pub set_url: Option<String>,
    #[serde(default)]
    pub set_img_url: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Theme (`/themes/`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawTheme {
    pub id: u32,
    #[serde(default)]
    pub parent_id: Option<u32>,
    pub name: String,
}

// ============================================================================
// Users
// ============================================================================

/// Part list (`/users/{token}/partlists/`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawPartlist {
    pub id: u32,
    pub name: String,
    pub num_parts: u32,
    #[serde(default)]
    pub is_buildable: Option<bool>,
}

/// Set list (`/users/{token}/setlists/`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawSetlist {
    pub id: u32,
    pub name: String,
    pub num_sets: u32,
    #[serde(default)]
    pub is_buildable: Option<bool>,
}

/// Login response (`/users/_token/`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawToken {
    #[serde(default)]
    pub user_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_envelope_deserialize() {
        let json = json!({
            "count": 2,
            "next": "https://rebrickable.com/api/v3/lego/themes/?page=2",
            "previous": null,
            "results": [
                {"id": 1, "parent_id": null, "name": "Technic"},
                {"id": 2, "parent_id": 1, "name": "Arctic Technic"}
            ]
        });

        let page: PageEnvelope<RawTheme> = serde_json::from_value(json).unwrap();

        assert_eq!(page.count, Some(2));
        assert!(page.next.is_some());
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].parent_id, Some(1));
    }

    #[test]
    fn test_page_envelope_requires_results() {
        let result = serde_json::from_value::<PageEnvelope<RawTheme>>(json!({"next": null}));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("missing field `results`"));
    }

    #[test]
    fn test_set_nullable_keys_must_be_present() {
        let mut json = json!({
            "set_num": "6090-1",
            "theme_id": null,
            "name": "Royal Knight's Castle",
            "year": 1995,
            "num_parts": 763,
            "set_url": null,
            "set_img_url": null
        });

        let set: RawSet = serde_json::from_value(json.clone()).unwrap();
        assert!(set.theme_id.is_none());
        assert!(set.quantity.is_none());

        json.as_object_mut().unwrap().remove("set_img_url");
        let err = serde_json::from_value::<RawSet>(json).unwrap_err().to_string();
        assert!(err.contains("missing field `set_img_url`"));
    }

    #[test]
    fn test_external_ids_accept_numbers_and_strings() {
        let json = json!({
            "part_num": "3001",
            "part_cat_id": 11,
            "name": "Brick 2 x 4",
            "external_ids": {
                "BrickLink": ["3001"],
                "LEGO": [3001, null, "300121"]
            }
        });

        let part: RawPart = serde_json::from_value(json).unwrap();

        assert_eq!(part.external_ids["BrickLink"], vec!["3001"]);
        assert_eq!(part.external_ids["LEGO"], vec!["3001", "300121"]);
        assert!(part.prints.is_empty());
    }

    #[test]
    fn test_minifig_accepts_set_name() {
        let json = json!({
            "id": 4352,
            "set_num": "fig-000284",
            "set_name": "Knight",
            "quantity": 2,
            "set_img_url": null
        });

        let fig: RawMinifig = serde_json::from_value(json).unwrap();

        assert_eq!(fig.name, "Knight");
        assert_eq!(fig.quantity, Some(2));
    }

    #[test]
    fn test_element_numeric_ids() {
        let json = json!({
            "part": {"part_num": "3001", "part_cat_id": 11, "name": "Brick 2 x 4"},
            "color": {"id": 4, "name": "Red", "rgb": "C91A09"},
            "element_id": 300121,
            "design_id": "3001"
        });

        let element: RawElement = serde_json::from_value(json).unwrap();

        assert_eq!(element.element_id.as_deref(), Some("300121"));
        assert_eq!(element.design_id.as_deref(), Some("3001"));
        assert!(element.color.external_ids.is_none());
    }

    #[test]
    fn test_part_color_detail_elements() {
        let json = json!({"num_sets": 10, "elements": ["300121", 4181135]});
        let detail: RawPartColorDetail = serde_json::from_value(json).unwrap();
        assert_eq!(detail.elements, vec!["300121", "4181135"]);
    }
}
