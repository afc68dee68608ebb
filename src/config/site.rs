//! Site configuration (_config.yml)

use chrono::{DateTime, FixedOffset, Local, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub static_dir: String,
    pub public_dir: String,
    #[serde(default)]
    pub ignore: Vec<String>,

    // Writing
    pub date_format: String,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Pages
    pub blog_pattern: String,
    /// Number of posts previewed on the home page, `None` hides the section
    pub recent_posts: Option<usize>,
    pub project_sections: Vec<ProjectSection>,
    /// Header navigation, label -> path, in display order
    pub nav: IndexMap<String, String>,
    #[serde(default)]
    pub built_with: BuiltWith,
    pub feed: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut nav = IndexMap::new();
        nav.insert("Projects".to_string(), "/".to_string());
        nav.insert("Blog".to_string(), "/blog/".to_string());

        Self {
            title: String::new(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),
            timezone: String::new(),

            url: "http://localhost".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),
            ignore: Vec::new(),

            date_format: "D MMMM YYYY".to_string(),
            highlight: HighlightConfig::default(),

            blog_pattern: "blog".to_string(),
            recent_posts: Some(3),
            project_sections: vec![
                ProjectSection::new("Can it be done in React Web?", "react-web"),
                ProjectSection::new("Other Projects", "other"),
            ],
            nav,
            built_with: BuiltWith::default(),
            feed: true,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a YAML or TOML file, chosen by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let is_toml = path.extension().is_some_and(|e| e == "toml");
        let parsed: std::result::Result<Self, String> = if is_toml {
            toml::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };

        let config = parsed.map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Find and load `_config.yml` (or `_config.toml`) in a site directory
    pub fn discover<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        for name in ["_config.yml", "_config.yaml", "_config.toml"] {
            let path = base_dir.join(name);
            if path.exists() {
                return Self::load(path);
            }
        }
        tracing::debug!("No config file in {:?}, using defaults", base_dir);
        Ok(Self::default())
    }

    /// Current time in the configured timezone
    pub fn now(&self) -> Result<DateTime<FixedOffset>> {
        if self.timezone.trim().is_empty() {
            return Ok(Local::now().fixed_offset());
        }
        let tz: chrono_tz::Tz = self
            .timezone
            .parse()
            .map_err(|_| Error::Timezone(self.timezone.clone()))?;
        Ok(Utc::now().with_timezone(&tz).fixed_offset())
    }
}

/// A titled group of project cards on the home page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSection {
    pub title: String,
    /// Regex matched against each entry's source path
    pub pattern: String,
}

impl ProjectSection {
    pub fn new(title: &str, pattern: &str) -> Self {
        Self {
            title: title.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

/// Footer credit link
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuiltWith {
    pub name: String,
    pub url: String,
}

impl Default for BuiltWith {
    fn default() -> Self {
        Self {
            name: "folio".to_string(),
            url: "https://github.com/folio-rs/folio".to_string(),
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}
