//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::content::loader::ContentLoader;
use crate::content::ContentStore;
use crate::generator::Generator;
use crate::Site;

/// Print site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    print!("{}", listing(site, content_type)?);
    Ok(())
}

/// Render the listing for a content type
pub fn listing(site: &Site, content_type: &str) -> Result<String> {
    let store = ContentLoader::new(site)?.load()?;
    let mut out = String::new();

    match content_type {
        "project" | "projects" => list_projects(site, &store, &mut out)?,
        "post" | "posts" | "blog" => list_posts(site, &store, &mut out)?,
        "all" => {
            writeln!(out, "Entries ({}):", store.len())?;
            for entry in store.entries() {
                writeln!(out, "  {} -> {}", entry.id, entry.slug)?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: projects, blog, all",
                content_type
            );
        }
    }

    Ok(out)
}

fn list_projects(site: &Site, store: &ContentStore, out: &mut String) -> Result<()> {
    for section in &site.config.project_sections {
        let query = Generator::project_query(&section.pattern)?;
        let projects = store.query(&query);
        writeln!(out, "{} ({}):", section.title, projects.len())?;
        for project in projects {
            let order = project
                .order
                .map(|o| o.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(out, "  {:>3}  {} [{}]", order, project.title, project.id)?;
        }
    }
    Ok(())
}

fn list_posts(site: &Site, store: &ContentStore, out: &mut String) -> Result<()> {
    let generator = Generator::new(site)?;
    let posts = store.query(&generator.blog_query()?);
    writeln!(out, "Posts ({}):", posts.len())?;
    for post in posts {
        let date = if post.date.is_empty() { "undated" } else { &post.date };
        writeln!(out, "  {} - {} [{}]", date, post.title, post.slug)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(content.join("blog")).unwrap();
        fs::create_dir_all(content.join("other")).unwrap();
        fs::write(
            content.join("blog/a.md"),
            "---\ntitle: Alpha\ndate: 2020-03-05\n---\n",
        )
        .unwrap();
        fs::write(content.join("other/b.md"), "---\ntitle: Beta\norder: 1\n---\n").unwrap();
        let site = Site::new(dir.path()).unwrap();
        (dir, site)
    }

    #[test]
    fn test_list_posts() {
        let (_dir, site) = site();
        let out = listing(&site, "blog").unwrap();
        assert!(out.contains("Posts (1):"));
        assert!(out.contains("5 March 2020 - Alpha [/blog/a/]"));
    }

    #[test]
    fn test_list_projects() {
        let (_dir, site) = site();
        let out = listing(&site, "projects").unwrap();
        assert!(out.contains("Can it be done in React Web? (0):"));
        assert!(out.contains("Other Projects (1):"));
        assert!(out.contains("1  Beta [other/b.md]"));
    }

    #[test]
    fn test_unknown_type() {
        let (_dir, site) = site();
        assert!(listing(&site, "tags").is_err());
    }
}
