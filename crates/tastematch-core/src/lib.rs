//! tastematch-core
//!
//! Domain types, configuration, the error taxonomy and the profile
//! aggregation stage shared by the scoring and storage crates.

pub mod config;
pub mod error;
pub mod profile;
pub mod rows;
pub mod traits;
pub mod types;
