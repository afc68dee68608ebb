//! Built-in site templates using the Tera template engine
//!
//! Templates and the stylesheet are embedded in the binary.

use serde::Serialize;
use tera::{Context, Tera};

use crate::config::BuiltWith;
use crate::error::Result;

/// Stylesheet written to `css/style.css`
pub const STYLESHEET: &str = include_str!("site/style.css");

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Escaping is explicit (`| escape`) so URLs and rendered markdown
        // pass through untouched
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("macros.html", include_str!("site/macros.html")),
            ("index.html", include_str!("site/index.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("blog_post.html", include_str!("site/blog_post.html")),
            // Partials
            ("partials/seo.html", include_str!("site/partials/seo.html")),
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

// Data structures for template context

/// Site-wide values used by the layout, header and footer
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub author: String,
    pub language: String,
    pub home_url: String,
    pub stylesheet: String,
    pub feed_url: Option<String>,
    pub year: i32,
    pub built_with: BuiltWith,
    pub version: String,
}

/// Document metadata for the SEO partial
#[derive(Debug, Clone, Serialize)]
pub struct SeoData {
    pub title: String,
    pub description: String,
    pub og_type: String,
    pub url: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// A project card on the home page
#[derive(Debug, Clone, Serialize)]
pub struct ProjectData {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub body_html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub title: String,
    pub projects: Vec<ProjectData>,
}

/// A blog list item, linking to the post
#[derive(Debug, Clone, Serialize)]
pub struct BlogIntroData {
    pub id: String,
    pub title: String,
    pub url: String,
    pub excerpt: Option<String>,
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub date: String,
    pub body_html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_data(title: &str) -> SiteData {
        SiteData {
            title: title.to_string(),
            author: "Alex Anthony".to_string(),
            language: "en".to_string(),
            home_url: "/".to_string(),
            stylesheet: "/css/style.css".to_string(),
            feed_url: None,
            year: 2020,
            built_with: BuiltWith::default(),
            version: "0.1.0".to_string(),
        }
    }

    fn base_context(title: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", &site_data(title));
        context.insert(
            "seo",
            &SeoData {
                title: "Blog".to_string(),
                description: String::new(),
                og_type: "website".to_string(),
                url: "http://localhost/blog/".to_string(),
                image: None,
            },
        );
        context.insert(
            "nav",
            &vec![NavLink {
                label: "Blog".to_string(),
                href: "/blog/".to_string(),
                active: true,
            }],
        );
        context
    }

    #[test]
    fn test_all_templates_parse() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_blog_post_template() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context("My Site");
        context.insert(
            "post",
            &PostData {
                title: "Hello".to_string(),
                date: "5 March 2020".to_string(),
                body_html: "<p>Body <em>here</em></p>".to_string(),
            },
        );
        let html = renderer.render("blog_post.html", &context).unwrap();
        assert!(html.contains("<h2>Hello</h2>"));
        assert!(html.contains("<article><p>Body <em>here</em></p></article>"));
        assert!(html.contains(r#"class="header-link active" href="/blog/""#));
        assert!(html.contains("© Alex Anthony 2020, Built with"));
    }

    #[test]
    fn test_text_is_escaped() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context("Tom & Jerry");
        context.insert(
            "post",
            &PostData {
                title: "<script>".to_string(),
                date: String::new(),
                body_html: String::new(),
            },
        );
        let html = renderer.render("blog_post.html", &context).unwrap();
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("<h2>&lt;script&gt;</h2>"));
    }
}
