//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::helpers::escape_html;

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Option<Theme>,
    line_numbers: bool,
}

/// A fenced or indented code block being collected
struct CodeBlock {
    lang: String,
    source: String,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    /// Create a renderer using the configured theme and gutter setting
    pub fn with_options(highlight: &HighlightConfig) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = match themes.remove(&highlight.theme) {
            Some(theme) => Some(theme),
            None => {
                tracing::warn!(
                    "Unknown highlight theme {:?}, falling back to the first bundled theme",
                    highlight.theme
                );
                themes.into_values().next()
            }
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers: highlight.line_number,
        }
    }

    /// Render a markdown body (front-matter already removed) to HTML
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;

        let mut events: Vec<Event> = Vec::new();
        let mut code: Option<CodeBlock> = None;
        let mut heading: Option<usize> = None;
        let mut anchors = Anchors::default();

        for event in Parser::new_ext(markdown, options) {
            if let Some(block) = code.as_mut() {
                match event {
                    Event::Text(text) => block.source.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let html = self.highlight_code(&block.source, &block.lang);
                        events.push(Event::Html(CowStr::from(html)));
                        code = None;
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => code_lang(&info),
                        CodeBlockKind::Indented => String::new(),
                    };
                    code = Some(CodeBlock {
                        lang,
                        source: String::new(),
                    });
                }
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) => {
                    // Headings without an explicit {#id} get one from their text
                    if id.is_none() {
                        heading = Some(events.len());
                    }
                    events.push(Event::Start(Tag::Heading {
                        level,
                        id,
                        classes,
                        attrs,
                    }));
                }
                Event::End(TagEnd::Heading(level)) => {
                    if let Some(start) = heading.take() {
                        let text = heading_text(&events[start + 1..]);
                        let anchor = anchors.next(&text);
                        if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
                            *id = (!anchor.is_empty()).then(|| CowStr::from(anchor));
                        }
                    }
                    events.push(Event::End(TagEnd::Heading(level)));
                }
                event => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let token = if lang.is_empty() { "text" } else { lang };

        let syntax = self
            .syntax_set
            .find_syntax_by_token(token)
            .or_else(|| self.syntax_set.find_syntax_by_extension(token))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = self
            .theme
            .as_ref()
            .and_then(|theme| highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok());

        match highlighted {
            Some(html) if self.line_numbers => {
                with_line_numbers(&html, code.lines().count(), token)
            }
            Some(html) => format!(r#"<figure class="highlight {}">{}</figure>"#, token, html),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                token,
                escape_html(code)
            ),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// First word of a fence info string, limited to characters safe in a class name
fn code_lang(info: &str) -> String {
    info.split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#'))
        .collect()
}

/// Plain text of the events inside a heading
fn heading_text(events: &[Event]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Text(t) | Event::Code(t) => Some(t.as_ref()),
            _ => None,
        })
        .collect()
}

/// Unique heading ids within one document
#[derive(Default)]
struct Anchors {
    seen: HashMap<String, usize>,
}

impl Anchors {
    fn next(&mut self, text: &str) -> String {
        let base = slug::slugify(text);
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        match *count {
            1 => base,
            n => format!("{}-{}", base, n - 1),
        }
    }
}

/// Wrap highlighted HTML in a table with one gutter number per source line
fn with_line_numbers(html: &str, line_count: usize, lang: &str) -> String {
    let gutter = (1..=line_count)
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang, gutter, html
    )
}
