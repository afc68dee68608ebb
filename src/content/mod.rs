//! Content module - markdown entries, the content store and its queries

mod entry;
mod frontmatter;
pub mod loader;
mod markdown;
mod query;
mod store;

pub use entry::{slug_for, ContentEntry, ImageRef};
pub use frontmatter::{parse_date_string, FrontMatter};
pub use markdown::MarkdownRenderer;
pub use query::{ContentQuery, Direction, SortKey};
pub use store::ContentStore;
