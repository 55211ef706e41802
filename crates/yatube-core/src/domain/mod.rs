//! Domain entities - the core business objects.

mod group;
mod post;
mod user;

pub use group::Group;
pub use post::{DETAIL_PREVIEW_CHARS, Post};
pub use user::{MAX_USERNAME_LEN, User};
