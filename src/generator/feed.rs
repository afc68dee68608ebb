//! Atom feed for blog posts

use chrono::Utc;

use crate::config::SiteConfig;
use crate::content::ContentEntry;
use crate::helpers::{
    absolutize_urls, date_xml, encode_path, escape_xml, full_url_for, strip_invalid_xml_chars,
};

/// Most recent posts included in the feed
pub const FEED_LIMIT: usize = 20;

/// Render an Atom feed from posts sorted newest first
pub fn atom_feed(config: &SiteConfig, posts: &[&ContentEntry]) -> String {
    let base_url = config.url.trim_end_matches('/');
    let home = full_url_for(config, "/");
    let updated = posts
        .iter()
        .find_map(|p| p.published)
        .map(|d| date_xml(&d))
        .unwrap_or_else(|| date_xml(&Utc::now()));

    let mut feed = String::new();
    feed.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    feed.push_str("<feed xmlns=\"http://www.w3.org/2005/Atom\">\n");
    feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
    feed.push_str(&format!(
        "  <link href=\"{}\" rel=\"self\"/>\n",
        full_url_for(config, "atom.xml")
    ));
    feed.push_str(&format!("  <link href=\"{}\"/>\n", home));
    feed.push_str(&format!("  <updated>{}</updated>\n", updated));
    feed.push_str(&format!("  <id>{}</id>\n", home));
    if !config.author.is_empty() {
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));
    }

    for post in posts.iter().take(FEED_LIMIT) {
        let link = escape_xml(&full_url_for(config, &encode_path(&post.slug)));
        feed.push_str("  <entry>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
        feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
        feed.push_str(&format!("    <id>{}</id>\n", link));
        if let Some(published) = post.published {
            let published = date_xml(&published);
            feed.push_str(&format!("    <published>{}</published>\n", published));
            feed.push_str(&format!("    <updated>{}</updated>\n", published));
        }
        if let Some(excerpt) = &post.excerpt {
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_xml(excerpt)
            ));
        }
        let content = absolutize_urls(&post.body_html, base_url);
        feed.push_str(&format!(
            "    <content type=\"html\"><![CDATA[{}]]></content>\n",
            strip_invalid_xml_chars(&content).replace("]]>", "]]]]><![CDATA[>")
        ));
        feed.push_str("  </entry>\n");
    }

    feed.push_str("</feed>\n");
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_date_string;

    fn post(id: &str, title: &str, date: &str) -> ContentEntry {
        let mut entry = ContentEntry::new(id, title);
        entry.published = parse_date_string(date);
        entry.body_html = r#"<p><img src="/img/x.png"></p>"#.to_string();
        entry
    }

    #[test]
    fn test_atom_feed() {
        let config = SiteConfig {
            title: "Alex & Co".to_string(),
            url: "https://example.com".to_string(),
            ..Default::default()
        };
        let newer = post("blog/b.md", "Second", "2021-02-01T00:00:00Z");
        let older = post("blog/a.md", "First", "2020-01-01T00:00:00Z");
        let feed = atom_feed(&config, &[&newer, &older]);

        assert!(feed.contains("<title>Alex &amp; Co</title>"));
        assert!(feed.contains("<updated>2021-02-01T00:00:00+00:00</updated>"));
        assert!(feed.contains("<link href=\"https://example.com/blog/b/\"/>"));
        assert!(feed.contains(r#"src="https://example.com/img/x.png""#));
        assert!(feed.find("Second").unwrap() < feed.find("First").unwrap());
        assert!(!feed.contains("<author>"));
    }

    #[test]
    fn test_atom_feed_limit() {
        let config = SiteConfig::default();
        let posts: Vec<ContentEntry> = (0..25)
            .map(|i| post(&format!("blog/{}.md", i), &format!("Post {}", i), "2020-01-01"))
            .collect();
        let refs: Vec<&ContentEntry> = posts.iter().collect();
        let feed = atom_feed(&config, &refs);
        assert_eq!(feed.matches("<entry>").count(), FEED_LIMIT);
    }
}
