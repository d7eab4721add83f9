//! Land-use zone classification search.
//!
//! Loads the land-parcel sheet from its CSV export, narrows it by plot,
//! former VDC and ward, and serves the result to a browser dashboard.

pub mod cache;
pub mod cascade;
pub mod columns;
pub mod config;
pub mod error;
pub mod fetch;
pub mod html;
pub mod i18n;
pub mod server;
pub mod session;
pub mod table;
pub mod view;

pub use config::Config;
pub use error::DataUnavailable;
pub use fetch::{Dataset, Loader};
pub use table::Table;
