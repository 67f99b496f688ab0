//! rusty-forum/crates/rf-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Rusty-Forum:
//! thread aggregation, soft-delete masking, ownership guards and likes.

pub mod aggregate;
pub mod entities;
pub mod error;
pub mod guards;
pub mod likes;
pub mod models;
pub mod services;
pub mod traits;

// Re-exporting for easier access in other crates
pub use entities::*;
pub use error::*;
pub use models::*;
pub use services::{ForumService, Repos};
pub use traits::*;
