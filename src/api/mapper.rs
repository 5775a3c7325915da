//! Rebrickable to Domain Model Mapper
//!
//! Maps Rebrickable API responses to the catalog records.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::catalog::{
    Category, Collection, CollectionKind, Color, Element, Minifig, Part, Partlist, Setlist, Theme,
};
use super::error::RebrickResult;
use super::models::*;

/// Mapper for Rebrickable API responses
pub struct RebrickableMapper;

impl RebrickableMapper {
    /// Decode a JSON payload into a wire model
    ///
    /// Fails with `missing field` when a required attribute is absent.
    pub fn parse<T: DeserializeOwned>(data: Value) -> RebrickResult<T> {
        Ok(serde_json::from_value(data)?)
    }

    pub fn map_category(category: RawCategory) -> Category {
        Category {
            category_id: category.id,
            name: category.name,
        }
    }

    /// Map a color, flattening external names to one list per source
    pub fn map_color(color: RawColor) -> Color {
        let mut external_names = BTreeMap::new();
        let mut external_ids = BTreeMap::new();

        for (source, external) in color.external_ids.unwrap_or_default() {
            let names: Vec<String> = external.ext_descrs.into_iter().flatten().collect();
            let ids: Vec<String> = external
                .ext_ids
                .into_iter()
                .flatten()
                .map(String::from)
                .collect();

            external_names.insert(source.clone(), names);
            external_ids.insert(source, ids);
        }

        Color {
            color_id: color.id,
            name: color.name,
            rgb: color.rgb,
            is_trans: color.is_trans,
            external_names,
            external_ids,
        }
    }

    pub fn map_part(part: RawPart) -> Part {
        Part {
            part_id: part.part_num,
            category_id: part.part_cat_id,
            name: part.name,
            external_ids: part.external_ids,
            year_from: part.year_from,
            year_to: part.year_to,
            url: part.part_url,
            img_url: part.part_img_url,
            print_of: part.print_of,
            prints: part.prints,
            molds: part.molds,
            alternates: part.alternates,
        }
    }

    pub fn map_element(element: RawElement) -> Element {
        Element {
            element_id: element.element_id,
            design_id: element.design_id,
            part: Self::map_part(element.part),
            color: Self::map_color(element.color),
            img_url: element.element_img_url,
            count: element.quantity,
            is_spare: element.is_spare,
        }
    }

    /// Map an official set
    pub fn map_set(set: RawSet) -> Collection {
        Collection {
            kind: CollectionKind::Set,
            collection_id: set.set_num,
            theme_id: set.theme_id,
            name: set.name,
            year: set.year,
            pieces: set.num_parts,
            url: set.set_url,
            img_url: set.set_img_url,
            designer_name: None,
            designer_url: None,
            count: set.quantity,
        }
    }

    /// Map a set owned by a user, carrying the owned quantity
    pub fn map_owned_set(owned: RawOwnedSet) -> Collection {
        let mut set = Self::map_set(owned.set);
        set.count = Some(owned.quantity);
        set
    }

    /// Map a MOC
    pub fn map_moc(moc: RawMoc) -> Collection {
        Collection {
            kind: CollectionKind::Moc,
            collection_id: moc.set_num,
            theme_id: moc.theme_id,
            name: moc.name,
            year: moc.year,
            pieces: moc.num_parts,
            url: moc.moc_url,
            img_url: moc.moc_img_url,
            designer_name: moc.designer_name,
            designer_url: moc.designer_url,
            count: None,
        }
    }

    pub fn map_minifig(minifig: RawMinifig) -> Minifig {
        Minifig {
            minifig_id: minifig.set_num,
            name: minifig.name,
            pieces: minifig.num_parts,
            url: minifig.set_url,
            img_url: minifig.set_img_url,
            count: minifig.quantity,
        }
    }

    pub fn map_theme(theme: RawTheme) -> Theme {
        Theme {
            theme_id: theme.id,
            parent_id: theme.parent_id,
            name: theme.name,
        }
    }

    pub fn map_partlist(list: RawPartlist) -> Partlist {
        Partlist {
            list_id: list.id,
            name: list.name,
            items: list.num_parts,
        }
    }

    pub fn map_setlist(list: RawSetlist) -> Setlist {
        Setlist {
            list_id: list.id,
            name: list.name,
            items: list.num_sets,
        }
    }
}
