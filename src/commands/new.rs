//! Create a new blog post or project entry

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::ContentQuery;
use crate::Site;

/// Create a markdown entry under `content/{section}/`, returning its path
pub fn create_entry(
    site: &Site,
    title: &str,
    section: &str,
    order: Option<f64>,
) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title: {:?}", title);
    }

    let section = section.trim_matches('/');
    let target_dir = site.content_dir.join(section);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let mut front_matter = format!("---\ntitle: {}\n", yaml_string(title));
    // Entries the blog query will pick up get a date, everything else an order
    let id = format!("{}/{}.md", section, slug);
    if ContentQuery::matching(&site.config.blog_pattern)?.matches(&id) {
        let today = site.config.now()?.format("%Y-%m-%d");
        front_matter.push_str(&format!("date: {}\n", today));
    } else {
        let order = order.unwrap_or(0.0);
        front_matter.push_str(&format!("order: {}\n", order));
    }
    front_matter.push_str("---\n\n");

    fs::write(&file_path, front_matter)?;
    tracing::debug!("Wrote scaffold to {:?}", file_path);

    Ok(file_path)
}

/// Run the new command
pub fn run(site: &Site, title: &str, section: &str, order: Option<f64>) -> Result<()> {
    let path = create_entry(site, title, section, order)?;
    println!("Created: {}", path.display());
    Ok(())
}

// Single-quoted YAML scalar, so titles with colons survive
fn yaml_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;
    use tempfile::TempDir;

    #[test]
    fn test_create_blog_post() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = create_entry(&site, "Hooks: A Retrospective", "blog", None).unwrap();
        assert_eq!(path, dir.path().join("content/blog/hooks-a-retrospective.md"));

        let source = fs::read_to_string(&path).unwrap();
        let (fm, _) = FrontMatter::parse(&source).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hooks: A Retrospective"));
        assert!(fm.parse_date().is_some());
    }

    #[test]
    fn test_create_project() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = create_entry(&site, "Pong", "react-web", Some(2.0)).unwrap();
        let source = fs::read_to_string(&path).unwrap();
        let (fm, _) = FrontMatter::parse(&source).unwrap();
        assert_eq!(fm.order, Some(2.0));
        assert!(fm.date.is_none());
    }

    #[test]
    fn test_custom_blog_pattern_gets_date() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "blog_pattern: ^posts/\n").unwrap();
        let site = Site::new(dir.path()).unwrap();

        let post = create_entry(&site, "Hello", "posts", None).unwrap();
        let (fm, _) = FrontMatter::parse(&fs::read_to_string(&post).unwrap()).unwrap();
        assert!(fm.parse_date().is_some());
        assert!(fm.order.is_none());

        let project = create_entry(&site, "Hello", "blog", Some(1.0)).unwrap();
        let (fm, _) = FrontMatter::parse(&fs::read_to_string(&project).unwrap()).unwrap();
        assert!(fm.date.is_none());
        assert_eq!(fm.order, Some(1.0));
    }

    #[test]
    fn test_existing_file_is_kept() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();

        create_entry(&site, "Hello", "blog", None).unwrap();
        assert!(create_entry(&site, "Hello", "blog", None).is_err());
    }
}
