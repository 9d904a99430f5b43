//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod block_store_repo;
pub mod block_template_repo;
pub mod block_version_repo;
pub mod page_block_repo;
pub mod page_repo;
pub mod page_zone_repo;

pub use block_store_repo::BlockStoreRepo;
pub use block_template_repo::BlockTemplateRepo;
pub use block_version_repo::BlockVersionRepo;
pub use page_block_repo::PageBlockRepo;
pub use page_repo::PageRepo;
pub use page_zone_repo::PageZoneRepo;
