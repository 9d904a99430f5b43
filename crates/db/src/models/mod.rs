//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod block_store;
pub mod block_template;
pub mod block_version;
pub mod page;
pub mod page_block;
pub mod page_zone;
