pub mod entity;
pub mod fallback;
pub mod health;

pub use entity::{entity_routes, Store};
pub use fallback::{json_error_bodies, not_found};
pub use health::{health, root};
