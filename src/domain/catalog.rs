//! Catalog Domain Models
//!
//! Typed records for Rebrickable catalog and user collection resources. Every
//! record is a snapshot of a single API response; they are built by the
//! mapper in [`crate::api`] and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Separator between a set number and its variant suffix
const SET_VARIANT_SEPARATOR: char = '-';

/// Prefix carried by every MOC number
const MOC_PREFIX: &str = "MOC";

// ============================================================================
// Identifiers
// ============================================================================

/// Normalize a set number to its variant form
///
/// A bare number such as `6090` refers to the first variant, `6090-1`.
/// Numbers that already carry a variant suffix are returned unchanged.
pub fn normalize_set_id(set_id: &str) -> String {
    if set_id.contains(SET_VARIANT_SEPARATOR) {
        set_id.to_string()
    } else {
        format!("{}{}1", set_id, SET_VARIANT_SEPARATOR)
    }
}

/// Normalize a MOC number to its `MOC-` prefixed form
pub fn normalize_moc_id(moc_id: &str) -> String {
    if moc_id.contains(MOC_PREFIX) {
        moc_id.to_string()
    } else {
        format!("{}-{}", MOC_PREFIX, moc_id)
    }
}

// ============================================================================
// Categories & Themes
// ============================================================================

/// Part category definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: u32,
    pub name: String,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Category ID: {} {}", self.category_id, self.name)
    }
}

/// Set theme definition
///
/// Themes form a tree through `parent_id`; root themes have no parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub theme_id: u32,
    pub parent_id: Option<u32>,
    pub name: String,
}

impl Theme {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent_id {
            Some(parent) => write!(f, "Theme ID: {} ({}) {}", self.theme_id, parent, self.name),
            None => write!(f, "Theme ID: {} {}", self.theme_id, self.name),
        }
    }
}

// ============================================================================
// Colors, Parts & Elements
// ============================================================================

/// Color definition with its names and IDs in external catalogs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Rebrickable color ID (`-1` is the "unknown" color)
    pub color_id: Option<i32>,
    pub name: String,
    /// Hex RGB code without the leading `#`
    pub rgb: String,
    pub is_trans: Option<bool>,
    /// Color names keyed by external source (BrickLink, LEGO, LDraw, ...)
    pub external_names: BTreeMap<String, Vec<String>>,
    /// Color IDs keyed by external source
    pub external_ids: BTreeMap<String, Vec<String>>,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color_id {
            Some(id) => write!(f, "Color ID: {}, {}, {}", id, self.name, self.rgb),
            None => write!(f, "Color: {}, {}", self.name, self.rgb),
        }
    }
}

/// Part definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub part_id: String,
    pub category_id: Option<u32>,
    pub name: String,
    /// Part IDs keyed by external source
    pub external_ids: BTreeMap<String, Vec<String>>,
    /// Year of the first appearance
    pub year_from: Option<u32>,
    /// Year of the last appearance
    pub year_to: Option<u32>,
    pub url: Option<String>,
    pub img_url: Option<String>,
    /// Parent non-printed part
    pub print_of: Option<String>,
    pub prints: Vec<String>,
    pub molds: Vec<String>,
    pub alternates: Vec<String>,
}

impl Part {
    pub fn is_print(&self) -> bool {
        self.print_of.is_some()
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Part ID: {}, {}", self.part_id, self.name)
    }
}

/// A specific combination of part and color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub element_id: Option<String>,
    /// LEGO design ID
    pub design_id: Option<String>,
    pub part: Part,
    pub color: Color,
    pub img_url: Option<String>,
    /// Quantity within the containing set or list
    pub count: Option<u32>,
    pub is_spare: Option<bool>,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Element ID: {}, {}, {}",
            self.element_id.as_deref().unwrap_or("-"),
            self.part,
            self.color
        )
    }
}

// ============================================================================
// Collections
// ============================================================================

/// Kind of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Official LEGO set
    Set,
    /// Fan design (My Own Creation)
    Moc,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::Set => write!(f, "set"),
            CollectionKind::Moc => write!(f, "moc"),
        }
    }
}

/// A set or a MOC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub kind: CollectionKind,
    pub collection_id: String,
    pub theme_id: Option<u32>,
    pub name: String,
    /// Release year
    pub year: u32,
    /// Number of pieces
    pub pieces: u32,
    pub url: Option<String>,
    pub img_url: Option<String>,
    /// MOC designer name
    pub designer_name: Option<String>,
    /// MOC designer page
    pub designer_url: Option<String>,
    /// Quantity owned, for user collections
    pub count: Option<u32>,
}

impl Collection {
    pub fn is_moc(&self) -> bool {
        self.kind == CollectionKind::Moc
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ID: {}, {}",
            self.kind.to_string().to_uppercase(),
            self.collection_id,
            self.name
        )
    }
}

/// Minifig definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minifig {
    pub minifig_id: String,
    pub name: String,
    pub pieces: Option<u32>,
    pub url: Option<String>,
    pub img_url: Option<String>,
    /// Quantity within the containing set
    pub count: Option<u32>,
}

impl fmt::Display for Minifig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Minifig ID: {}, {}", self.minifig_id, self.name)
    }
}

// ============================================================================
// User Lists
// ============================================================================

/// A user's named part list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partlist {
    pub list_id: u32,
    pub name: String,
    /// Number of parts in the list
    pub items: u32,
}

impl fmt::Display for Partlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}, {} ({})", self.list_id, self.name, self.items)
    }
}

/// A user's named set list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setlist {
    pub list_id: u32,
    pub name: String,
    /// Number of sets in the list
    pub items: u32,
}

impl fmt::Display for Setlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}, {} ({})", self.list_id, self.name, self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_set_id() {
        assert_eq!(normalize_set_id("6090"), "6090-1");
        assert_eq!(normalize_set_id("6090-1"), "6090-1");
        assert_eq!(normalize_set_id("10294-2"), "10294-2");
        assert_eq!(normalize_set_id("fig-005891"), "fig-005891");
    }

    #[test]
    fn test_normalize_moc_id() {
        assert_eq!(normalize_moc_id("24522"), "MOC-24522");
        assert_eq!(normalize_moc_id("MOC-24522"), "MOC-24522");
    }

    #[test]
    fn test_collection_display() {
        let set = Collection {
            kind: CollectionKind::Set,
            collection_id: "6090-1".to_string(),
            theme_id: Some(186),
            name: "Royal Knight's Castle".to_string(),
            year: 1995,
            pieces: 763,
            url: None,
            img_url: None,
            designer_name: None,
            designer_url: None,
            count: None,
        };

        assert!(!set.is_moc());
        assert_eq!(set.to_string(), "SET ID: 6090-1, Royal Knight's Castle");
    }

    #[test]
    fn test_theme_root() {
        let root = Theme { theme_id: 186, parent_id: None, name: "Castle".to_string() };
        let child = Theme {
            theme_id: 190,
            parent_id: Some(186),
            name: "Royal Knights".to_string(),
        };

        assert!(root.is_root());
        assert!(!child.is_root());
        assert_eq!(child.to_string(), "Theme ID: 190 (186) Royal Knights");
    }

    #[test]
    fn test_collection_kind_serialization() {
        assert_eq!(serde_json::to_string(&CollectionKind::Moc).unwrap(), "\"moc\"");
        assert_eq!(CollectionKind::Set.to_string(), "set");
    }
}
