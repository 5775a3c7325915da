//! Rebrick
//!
//! Async client for the Rebrickable LEGO catalog API. Provides throttled
//! access to the catalog and user account endpoints, follows pagination and
//! maps responses into typed catalog records.
//!
//! ```no_run
//! use rebrick::{Rebrick, Settings};
//!
//! # async fn run() -> rebrick::RebrickResult<()> {
//! let client = Rebrick::new(Settings::new("your-api-key"))?;
//!
//! if let Some(set) = client.get_set("6090").await? {
//!     println!("{}", set);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod domain;
mod rebrick;

pub use crate::api::{RebrickError, RebrickResult};
pub use crate::config::Settings;
pub use crate::domain::catalog::{
    Category, Collection, CollectionKind, Color, Element, Minifig, Part, Partlist, Setlist, Theme,
};
pub use crate::rebrick::Rebrick;
