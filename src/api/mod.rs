//! Rebrickable API access
//!
//! # Architecture
//!
//! ```text
//!            ┌──────────────┐
//!            │   Rebrick    │  facade: pagination, silent mode
//!            └──────┬───────┘
//!        ┌──────────┼───────────┐
//!   ┌────┴────┐ ┌───┴───┐  ┌────┴────┐
//!   │  lego   │ │ users │  │ mapper  │
//!   └────┬────┘ └───┬───┘  └─────────┘
//!        └─────┬────┘
//!        ┌─────┴──────┐
//!        │ ApiClient  │  params, throttle, JSON
//!        └────────────┘
//! ```

pub mod error;
pub mod http_client;
pub mod lego;
pub mod mapper;
pub mod models;
pub mod pagination;
pub mod query;
pub mod users;

// Re-export commonly used types
pub use error::{RebrickError, RebrickResult};
pub use http_client::{ApiClient, Throttle};
pub use mapper::RebrickableMapper;
pub use pagination::Paginator;
pub use query::{
    Cursor,
    ElementDetails,
    MinifigFilter,
    PageRequest,
    Params,
    PartFilter,
    SetFilter,
    UserPartFilter,
};
