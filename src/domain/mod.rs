//! Domain models
//!
//! Provider-independent records returned by the facade.

pub mod catalog;

pub use catalog::{
    normalize_moc_id, normalize_set_id, Category, Collection, CollectionKind, Color, Element,
    Minifig, Part, Partlist, Setlist, Theme,
};
