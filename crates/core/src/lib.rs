//! Domain types and pure logic for the page builder block service.
//!
//! Nothing in here touches the database or HTTP; the `db` and `api` crates
//! build on these types so validation and ordering rules live in one place.

pub mod block_content;
pub mod block_meta;
pub mod error;
pub mod ordering;
pub mod roles;
pub mod search;
pub mod templates;
pub mod types;
pub mod versioning;
pub mod zones;
