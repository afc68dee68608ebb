//! Content loader - loads markdown entries from the content directory

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{ContentEntry, ContentStore, FrontMatter, ImageRef, MarkdownRenderer};
use crate::error::Error;
use crate::helpers::{encode_path, format_date, is_external_url, join_url_path, url_for};
use crate::Site;

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
    ignore: Vec<glob::Pattern>,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> crate::error::Result<Self> {
        let renderer = MarkdownRenderer::with_options(&site.config.highlight);
        let ignore = site
            .config
            .ignore
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|source| Error::InvalidGlob {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            site,
            renderer,
            ignore,
        })
    }

    /// Load every markdown document into a content store
    pub fn load(&self) -> Result<ContentStore> {
        let content_dir = &self.site.content_dir;
        if !content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", content_dir);
            return Ok(ContentStore::default());
        }

        let mut entries = Vec::new();

        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            let relative = relative_source(content_dir, path);
            if self.is_ignored(&relative) {
                tracing::debug!("Ignoring {}", relative);
                continue;
            }

            match self.load_entry(path, &relative) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Failed to load {:?}: {}", path, e);
                }
            }
        }

        tracing::debug!("Loaded {} content entries", entries.len());
        Ok(ContentStore::from_entries(entries)?)
    }

    fn is_ignored(&self, relative: &str) -> bool {
        self.ignore.iter().any(|p| p.matches(relative))
    }

    /// Load a single entry from a markdown file
    fn load_entry(&self, path: &Path, relative: &str) -> Result<ContentEntry> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let title = fm.title.clone().unwrap_or_else(|| default_title(path));

        let published = fm.parse_date();
        if fm.date.is_some() && published.is_none() {
            tracing::warn!("Unrecognized date {:?} in {}", fm.date, relative);
        }
        let date = published
            .map(|d| format_date(&d, &self.site.config.date_format))
            .unwrap_or_default();

        let image = fm
            .image
            .as_deref()
            .filter(|i| !i.trim().is_empty())
            .map(|i| self.resolve_image(relative, i));

        let mut entry = ContentEntry::new(relative, &title);
        entry.published = published;
        entry.date = date;
        entry.excerpt = fm.excerpt;
        entry.image = image;
        entry.body_html = self.renderer.render(body);
        entry.order = fm.order;

        Ok(entry)
    }

    /// Map a front-matter image reference to the URL it is served from
    fn resolve_image(&self, relative: &str, image: &str) -> ImageRef {
        if is_external_url(image) {
            return ImageRef {
                public_url: image.to_string(),
            };
        }

        // Root-relative images are served from the static dir,
        // anything else sits next to its markdown file.
        let (site_path, on_disk) = match image.strip_prefix('/') {
            Some(rooted) => (rooted.to_string(), self.site.static_dir.join(rooted)),
            None => {
                let dir = relative.rsplit_once('/').map_or("", |(dir, _)| dir);
                let joined = join_url_path(dir, image);
                let on_disk = self.site.content_dir.join(&joined);
                (joined, on_disk)
            }
        };

        if !on_disk.exists() {
            tracing::warn!("Image {:?} referenced by {} not found", on_disk, relative);
        }

        ImageRef {
            public_url: url_for(&self.site.config, &encode_path(&site_path)),
        }
    }
}

/// Check if a file is a markdown file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Source path relative to the content dir, always `/`-separated
fn relative_source(content_dir: &Path, path: &Path) -> String {
    path.strip_prefix(content_dir)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Title used when front-matter has none: the file stem, or the
/// directory name for `index.md`
fn default_title(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("Untitled");
    if stem == "index" {
        if let Some(dir) = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
        {
            return dir.to_string();
        }
    }
    stem.to_string()
}
