//! Data models for the school website.
//!
//! Field names match the JSON the frontend consumes.

mod content;
mod event;
mod health;
mod news;
mod page;
mod staff;
mod user;

pub use content::*;
pub use event::*;
pub use health::*;
pub use news::*;
pub use page::*;
pub use staff::*;
pub use user::*;
