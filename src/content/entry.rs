//! Content entry model

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// A resolved image reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRef {
    /// URL the image is served from
    pub public_url: String,
}

/// A markdown document after loading and rendering
#[derive(Debug, Clone, Serialize)]
pub struct ContentEntry {
    /// Unique key: source path relative to the content directory
    pub id: String,

    /// Title, from front-matter or the file name
    pub title: String,

    /// Parsed date used for sorting
    #[serde(skip)]
    pub published: Option<DateTime<FixedOffset>>,

    /// Display-formatted date
    pub date: String,

    pub excerpt: Option<String>,

    pub image: Option<ImageRef>,

    /// Rendered HTML body
    pub body_html: String,

    /// Detail-page path, e.g. `/blog/hello-world/`
    pub slug: String,

    /// Explicit position among project cards
    pub order: Option<f64>,
}

impl ContentEntry {
    /// Create an entry with only the identifying fields set
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            published: None,
            date: String::new(),
            excerpt: None,
            image: None,
            body_html: String::new(),
            slug: slug_for(id),
            order: None,
        }
    }
}

/// Derive the detail-page path from a source path relative to the content dir.
///
/// `blog/hello.md` becomes `/blog/hello/` and `blog/trip/index.md` becomes
/// `/blog/trip/`.
pub fn slug_for(source: &str) -> String {
    let source = source.replace('\\', "/");
    let without_ext = source
        .strip_suffix(".markdown")
        .or_else(|| source.strip_suffix(".md"))
        .unwrap_or(&source);

    let path = if without_ext == "index" {
        ""
    } else {
        without_ext.strip_suffix("/index").unwrap_or(without_ext)
    };

    let path = path.trim_matches('/');
    if path.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", path)
    }
}
