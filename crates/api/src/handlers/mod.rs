//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource. Handlers
//! validate input, delegate to the corresponding repository in `empower_db`
//! and map errors via [`AppError`](crate::error::AppError).

pub mod block_store;
pub mod block_template;
pub mod block_version;
pub mod page;
pub mod page_block;
pub mod page_zone;
