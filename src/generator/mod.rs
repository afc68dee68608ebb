//! Generator module - renders every page and writes the static site

mod feed;

pub use feed::{atom_feed, FEED_LIMIT};

use anyhow::{Context as _, Result};
use chrono::Datelike;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;
use walkdir::WalkDir;

use crate::content::loader::is_markdown_file;
use crate::content::{ContentEntry, ContentQuery, ContentStore, Direction, SortKey};
use crate::helpers::{
    encode_path, full_url_for, is_current, is_external_url, strip_html, truncate, url_for,
};
use crate::templates::{
    BlogIntroData, NavLink, PostData, ProjectData, SectionData, SeoData, SiteData,
    TemplateRenderer, STYLESHEET,
};
use crate::Site;

/// Path of the full blog listing
pub const BLOG_PATH: &str = "/blog/";

/// Length of descriptions derived from a post body
const DESCRIPTION_LENGTH: usize = 160;

/// Static site generator using Tera templates
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
    year: i32,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let year = site.config.now()?.year();

        Ok(Self {
            site: site.clone(),
            renderer,
            year,
        })
    }

    /// Generate the entire site, returning the number of pages written
    pub fn generate(&self, store: &ContentStore) -> Result<usize> {
        // Queries are validated while rendering, before any output exists
        let index = self.render_index(store)?;
        let blog = self.render_blog(store)?;
        let posts = store.query(&self.blog_query()?);

        fs::create_dir_all(&self.site.public_dir)?;
        self.copy_static_files()?;
        self.copy_content_assets()?;
        self.write_file("css/style.css", STYLESHEET)?;

        self.write_file("index.html", &index)?;
        self.write_file("blog/index.html", &blog)?;
        let mut pages = 2;

        for post in &posts {
            if is_current(&post.slug, "/") || is_current(&post.slug, BLOG_PATH) {
                tracing::warn!("Skipping {}: slug {} is a reserved route", post.id, post.slug);
                continue;
            }
            let html = self.render_blog_post(store, &post.slug)?;
            let output = Path::new(post.slug.trim_matches('/')).join("index.html");
            self.write_file(output, &html)?;
            pages += 1;
        }

        if self.site.config.feed {
            self.write_file("atom.xml", &atom_feed(&self.site.config, &posts))?;
            tracing::info!("Generated atom.xml");
        }

        tracing::info!("Generated {} pages", pages);
        Ok(pages)
    }

    /// All blog posts, newest first
    pub fn blog_query(&self) -> crate::error::Result<ContentQuery> {
        Ok(ContentQuery::matching(&self.site.config.blog_pattern)?
            .sort_by(SortKey::Date, Direction::Desc))
    }

    /// Projects whose source path matches `pattern`, in explicit order
    pub fn project_query(pattern: &str) -> crate::error::Result<ContentQuery> {
        Ok(ContentQuery::matching(pattern)?.sort_by(SortKey::Order, Direction::Asc))
    }

    /// Render the home page: one card section per project group, then recent posts
    pub fn render_index(&self, store: &ContentStore) -> Result<String> {
        let sections = self
            .site
            .config
            .project_sections
            .iter()
            .map(|section| {
                let query = Self::project_query(&section.pattern)?;
                Ok(SectionData {
                    title: section.title.clone(),
                    projects: store
                        .query(&query)
                        .into_iter()
                        .map(project_data)
                        .collect(),
                })
            })
            .collect::<crate::error::Result<Vec<_>>>()?;

        let mut context = self.base_context("/", "Home", None);
        context.insert("sections", &sections);

        if let Some(cap) = self.site.config.recent_posts {
            let query = self.blog_query()?.limit(cap);
            let recent: Vec<BlogIntroData> = store
                .query(&query)
                .into_iter()
                .map(|p| self.blog_intro_data(p))
                .collect();
            context.insert("recent_posts", &recent);
            context.insert("blog_url", &url_for(&self.site.config, BLOG_PATH));
        }

        Ok(self.renderer.render("index.html", &context)?)
    }

    /// Render the full blog listing, newest first
    pub fn render_blog(&self, store: &ContentStore) -> Result<String> {
        let posts: Vec<BlogIntroData> = store
            .query(&self.blog_query()?)
            .into_iter()
            .map(|p| self.blog_intro_data(p))
            .collect();

        let mut context = self.base_context(BLOG_PATH, "Blog", None);
        context.insert("posts", &posts);

        Ok(self.renderer.render("blog.html", &context)?)
    }

    /// Render the page for the blog post with the given slug
    pub fn render_blog_post(&self, store: &ContentStore, slug: &str) -> Result<String> {
        let post = store.find_by_slug(slug)?;

        let mut context =
            self.base_context(&post.slug, &format!("Blog - {}", post.title), Some(post));
        context.insert(
            "post",
            &PostData {
                title: post.title.clone(),
                date: post.date.clone(),
                body_html: post.body_html.clone(),
            },
        );

        Ok(self.renderer.render("blog_post.html", &context)?)
    }

    /// Context shared by every page: site chrome, navigation and SEO metadata
    fn base_context(&self, path: &str, page_title: &str, entry: Option<&ContentEntry>) -> Context {
        let config = &self.site.config;

        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: config.title.clone(),
                author: config.author.clone(),
                language: config.language.clone(),
                home_url: url_for(config, "/"),
                stylesheet: url_for(config, "css/style.css"),
                feed_url: config.feed.then(|| url_for(config, "atom.xml")),
                year: self.year,
                built_with: config.built_with.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        );
        context.insert("nav", &self.nav_links(path));
        context.insert("seo", &self.seo_data(path, page_title, entry));
        context
    }

    /// Header links, marking the one for the current route
    pub fn nav_links(&self, path: &str) -> Vec<NavLink> {
        let current = url_for(&self.site.config, path);
        self.site
            .config
            .nav
            .iter()
            .map(|(label, target)| {
                let href = if is_external_url(target) {
                    target.clone()
                } else {
                    url_for(&self.site.config, target)
                };
                NavLink {
                    label: label.clone(),
                    active: is_current(&current, &href),
                    href,
                }
            })
            .collect()
    }

    fn seo_data(&self, path: &str, page_title: &str, entry: Option<&ContentEntry>) -> SeoData {
        let config = &self.site.config;

        let title = match (page_title.is_empty(), config.title.is_empty()) {
            (true, _) => config.title.clone(),
            (false, true) => page_title.to_string(),
            (false, false) => format!("{} | {}", page_title, config.title),
        };

        let description = entry
            .map(|e| {
                e.excerpt.clone().unwrap_or_else(|| {
                    truncate(&strip_html(&e.body_html), DESCRIPTION_LENGTH, "...")
                })
            })
            .unwrap_or_else(|| config.description.clone());

        let image = entry
            .and_then(|e| e.image.as_ref())
            .map(|i| absolute_url(config, &i.public_url));

        SeoData {
            title,
            description,
            og_type: if entry.is_some() { "article" } else { "website" }.to_string(),
            url: full_url_for(config, &encode_path(path)),
            image,
        }
    }

    fn blog_intro_data(&self, post: &ContentEntry) -> BlogIntroData {
        BlogIntroData {
            id: post.id.clone(),
            title: post.title.clone(),
            url: url_for(&self.site.config, &encode_path(&post.slug)),
            excerpt: post.excerpt.clone(),
            date: post.date.clone(),
        }
    }

    /// Write a file below the public directory, creating parent dirs
    fn write_file(&self, relative: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let output_path = self.site.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, content)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(output_path)
    }

    /// Copy the static directory to the output root
    fn copy_static_files(&self) -> Result<()> {
        copy_tree(&self.site.static_dir, &self.site.public_dir, |_| true)
    }

    /// Copy images and other non-markdown files next to their content
    fn copy_content_assets(&self) -> Result<()> {
        copy_tree(&self.site.content_dir, &self.site.public_dir, |path| {
            !is_markdown_file(path)
        })
    }
}

fn project_data(project: &ContentEntry) -> ProjectData {
    ProjectData {
        id: project.id.clone(),
        title: project.title.clone(),
        image: project.image.as_ref().map(|i| i.public_url.clone()),
        body_html: project.body_html.clone(),
    }
}

fn absolute_url(config: &crate::config::SiteConfig, url: &str) -> String {
    if is_external_url(url) {
        url.to_string()
    } else {
        format!("{}{}", config.url.trim_end_matches('/'), url)
    }
}

/// Copy every file under `source` accepted by `include` into `dest`,
/// skipping hidden files and directories
fn copy_tree(source: &Path, dest: &Path, include: impl Fn(&Path) -> bool) -> Result<()> {
    if !source.exists() {
        return Ok(());
    }

    let mut copied = 0;
    for entry in WalkDir::new(source)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !include(path) {
            continue;
        }

        let target = dest.join(path.strip_prefix(source)?);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &target).with_context(|| format!("Failed to copy {:?}", path))?;
        copied += 1;
    }

    tracing::debug!("Copied {} files from {:?}", copied, source);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProjectSection, SiteConfig};
    use crate::content::loader::ContentLoader;
    use chrono::Local;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn portfolio(config: SiteConfig) -> (TempDir, Site, ContentStore) {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        write(
            &content,
            "react-web/second.md",
            "---\ntitle: Second Flagship\norder: 2\n---\nTwo.\n",
        );
        write(
            &content,
            "react-web/first/index.md",
            "---\ntitle: First Flagship\norder: 1\nimage: ./shot.png\n---\n<b>raw</b> one.\n",
        );
        write(&content, "react-web/first/shot.png", "png");
        write(
            &content,
            "other/tool.md",
            "---\ntitle: Handy Tool\norder: 1\n---\nA tool.\n",
        );
        for (name, date) in [
            ("oldest", "2018-05-01"),
            ("older", "2019-05-01"),
            ("newer", "2020-05-01"),
            ("newest", "2021-05-01"),
        ] {
            write(
                &content,
                &format!("blog/{}.md", name),
                &format!(
                    "---\ntitle: Post {}\ndate: {}\nexcerpt: About {}\n---\nBody of {}.\n",
                    name, date, name, name
                ),
            );
        }
        write(&dir.path().join("static"), "favicon.ico", "ico");

        let site = Site::with_config(dir.path(), config);
        let store = ContentLoader::new(&site).unwrap().load().unwrap();
        (dir, site, store)
    }

    fn config() -> SiteConfig {
        SiteConfig {
            title: "Alex Anthony".to_string(),
            author: "Alex Anthony".to_string(),
            ..Default::default()
        }
    }

    fn positions(html: &str, needles: &[&str]) -> Vec<usize> {
        needles.iter().map(|n| html.find(n).unwrap()).collect()
    }

    #[test]
    fn test_index_sections_in_order() {
        let (_dir, site, store) = portfolio(config());
        let html = Generator::new(&site).unwrap().render_index(&store).unwrap();

        let pos = positions(
            &html,
            &[
                "Can it be done in React Web?",
                "First Flagship",
                "Second Flagship",
                "Other Projects",
                "Handy Tool",
                "Recent Posts",
            ],
        );
        assert!(pos.windows(2).all(|w| w[0] < w[1]), "{:?}", pos);
        assert!(html.contains("<div><p><b>raw</b> one.</p>\n</div>"));
    }

    #[test]
    fn test_image_only_for_entries_with_image() {
        let (_dir, site, store) = portfolio(config());
        let html = Generator::new(&site).unwrap().render_index(&store).unwrap();

        assert_eq!(html.matches("<img").count(), 1);
        assert!(html.contains(
            r#"<img class="project-image" src="/react-web/first/shot.png" alt="First Flagship">"#
        ));
    }

    #[test]
    fn test_recent_posts_capped_newest_first() {
        let (_dir, site, store) = portfolio(config());
        let html = Generator::new(&site).unwrap().render_index(&store).unwrap();

        assert_eq!(html.matches(r#"class="blog-intro""#).count(), 3);
        assert!(!html.contains("Post oldest"));
        let pos = positions(&html, &["Post newest", "Post newer", "Post older"]);
        assert!(pos.windows(2).all(|w| w[0] < w[1]));
        assert!(html.contains(r#"<a href="/blog/">See all</a>"#));
    }

    #[test]
    fn test_recent_posts_disabled() {
        let config = SiteConfig {
            recent_posts: None,
            ..config()
        };
        let (_dir, site, store) = portfolio(config);
        let html = Generator::new(&site).unwrap().render_index(&store).unwrap();
        assert!(!html.contains("Recent Posts"));
        assert!(!html.contains("blog-intro"));
    }

    #[test]
    fn test_empty_section_keeps_title() {
        let config = SiteConfig {
            project_sections: vec![ProjectSection::new("Games", "games")],
            ..config()
        };
        let (_dir, site, store) = portfolio(config);
        let html = Generator::new(&site).unwrap().render_index(&store).unwrap();
        assert!(html.contains("Games"));
        assert!(!html.contains(r#"class="project""#));
    }

    #[test]
    fn test_blog_listing() {
        let (_dir, site, store) = portfolio(config());
        let html = Generator::new(&site).unwrap().render_blog(&store).unwrap();

        assert_eq!(html.matches(r#"class="blog-intro""#).count(), 4);
        let pos = positions(
            &html,
            &["Post newest", "Post newer", "Post older", "Post oldest"],
        );
        assert!(pos.windows(2).all(|w| w[0] < w[1]));
        assert!(html.contains(r#"<a href="/blog/newest/"><h3>Post newest</h3></a>"#));
        assert!(html.contains("<p>About newest</p>"));
        assert!(html.contains("1 May 2021"));
        assert!(html.contains("<title>Blog | Alex Anthony</title>"));
    }

    #[test]
    fn test_slug_urls_are_encoded() {
        let (dir, site, _) = portfolio(config());
        let content = dir.path().join("content");
        write(
            &content,
            "blog/tips&tricks.md",
            "---\ntitle: Tips\ndate: 2022-01-01\n---\nT.\n",
        );
        write(
            &content,
            "blog/say \"hi\".md",
            "---\ntitle: Q\ndate: 2022-02-01\n---\nQ.\n",
        );
        let store = ContentLoader::new(&site).unwrap().load().unwrap();
        let generator = Generator::new(&site).unwrap();

        let blog = generator.render_blog(&store).unwrap();
        assert!(blog.contains(r#"<a href="/blog/tips%26tricks/"><h3>Tips</h3></a>"#));
        assert!(blog.contains(r#"<a href="/blog/say%20%22hi%22/"><h3>Q</h3></a>"#));

        let posts = store.query(&generator.blog_query().unwrap());
        let feed = atom_feed(&site.config, &posts);
        assert!(!feed.contains("tips&tricks"));
        assert!(feed.contains(r#"<link href="http://localhost/blog/tips%26tricks/"/>"#));

        let post = generator.render_blog_post(&store, "/blog/tips&tricks/").unwrap();
        assert!(post.contains(r#"content="http://localhost/blog/tips%26tricks/""#));

        generator.generate(&store).unwrap();
        assert!(dir.path().join("public/blog/tips&tricks/index.html").exists());
    }

    #[test]
    fn test_blog_post_rendered_once() {
        let (_dir, site, store) = portfolio(config());
        let html = Generator::new(&site)
            .unwrap()
            .render_blog_post(&store, "/blog/older/")
            .unwrap();

        assert_eq!(html.matches("<h2>Post older</h2>").count(), 1);
        assert_eq!(html.matches("1 May 2019").count(), 1);
        assert_eq!(html.matches("Body of older.").count(), 1);
        assert!(html.contains("<title>Blog - Post older | Alex Anthony</title>"));
        assert!(html.contains(r#"<meta name="description" content="About older">"#));
    }

    #[test]
    fn test_missing_slug_is_error() {
        let (_dir, site, store) = portfolio(config());
        let err = Generator::new(&site)
            .unwrap()
            .render_blog_post(&store, "/blog/nope/")
            .unwrap_err();
        assert!(err.to_string().contains("/blog/nope/"));
    }

    #[test]
    fn test_header_title_and_active_link() {
        let (_dir, site, store) = portfolio(config());
        let generator = Generator::new(&site).unwrap();

        let blog = generator.render_blog(&store).unwrap();
        assert!(blog.contains(r#"<h1><a class="header-link" href="/">Alex Anthony</a></h1>"#));
        assert!(blog.contains(r#"<a class="header-link active" href="/blog/">Blog</a>"#));
        assert!(blog.contains(r#"<a class="header-link" href="/">Projects</a>"#));

        let index = generator.render_index(&store).unwrap();
        assert!(index.contains(r#"<a class="header-link active" href="/">Projects</a>"#));

        let post = generator.render_blog_post(&store, "/blog/newer/").unwrap();
        assert!(!post.contains("header-link active"));
    }

    #[test]
    fn test_header_title_defaults_to_empty() {
        let (_dir, site, store) = portfolio(SiteConfig::default());
        let html = Generator::new(&site).unwrap().render_blog(&store).unwrap();
        assert!(html.contains(r#"<h1><a class="header-link" href="/"></a></h1>"#));
        assert!(html.contains("<title>Blog</title>"));
    }

    #[test]
    fn test_footer_has_year() {
        let (_dir, site, store) = portfolio(config());
        let html = Generator::new(&site).unwrap().render_blog(&store).unwrap();
        assert!(html.contains(&format!(
            "© Alex Anthony {}, Built with",
            Local::now().year()
        )));
    }

    #[test]
    fn test_renders_are_deterministic() {
        let (_dir, site, store) = portfolio(config());
        let generator = Generator::new(&site).unwrap();
        assert_eq!(
            generator.render_index(&store).unwrap(),
            generator.render_index(&store).unwrap()
        );
    }

    #[test]
    fn test_generate_writes_site() {
        let (dir, site, store) = portfolio(config());
        let pages = Generator::new(&site).unwrap().generate(&store).unwrap();
        assert_eq!(pages, 6);

        let public = dir.path().join("public");
        for path in [
            "index.html",
            "blog/index.html",
            "blog/newest/index.html",
            "blog/oldest/index.html",
            "css/style.css",
            "atom.xml",
            "favicon.ico",
            "react-web/first/shot.png",
        ] {
            assert!(public.join(path).exists(), "missing {}", path);
        }
        assert!(!public.join("react-web/first/index.md").exists());
        assert!(!public.join("react-web/first/index.html").exists());
    }

    #[test]
    fn test_feed_disabled() {
        let config = SiteConfig {
            feed: false,
            ..config()
        };
        let (dir, site, store) = portfolio(config);
        let html = Generator::new(&site).unwrap().render_blog(&store).unwrap();
        assert!(!html.contains("application/atom+xml"));
        Generator::new(&site).unwrap().generate(&store).unwrap();
        assert!(!dir.path().join("public/atom.xml").exists());
    }
}
