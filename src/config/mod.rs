//! Configuration module

mod site;

pub use site::BuiltWith;
pub use site::HighlightConfig;
pub use site::ProjectSection;
pub use site::SiteConfig;
