//! Domain entities - the core business objects.

mod filter;
mod post;

pub use filter::PostFilter;
pub use post::{Post, PostFields, PostId};
