//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Site
title: My Portfolio
description: ''
author: Jane Doe
language: en
timezone: ''

# URL
url: http://example.com
root: /

# Directory
content_dir: content
static_dir: static
public_dir: public
ignore: []

# Writing
date_format: D MMMM YYYY
highlight:
  theme: base16-ocean.dark
  line_number: false

# Pages
blog_pattern: blog
recent_posts: 3
project_sections:
  - title: Can it be done in React Web?
    pattern: react-web
  - title: Other Projects
    pattern: other
nav:
  Projects: /
  Blog: /blog/
feed: true
"#;

const HELLO_WORLD: &str = r#"---
title: Hello World
date: {{ date }}
excerpt: The first post on this site.
---

Welcome to your new site. Blog posts live in `content/blog/` and are listed
newest first on the blog page.

```bash
$ folio new "My New Post"
$ folio serve
```
"#;

const REACT_WEB_PROJECT: &str = r#"---
title: Sample Web Project
order: 1
---

Projects under `content/react-web/` appear in the first section of the home
page, sorted by their `order` field.
"#;

const OTHER_PROJECT: &str = r#"---
title: Sample Side Project
order: 1
---

Projects under `content/other/` appear in the "Other Projects" section.
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("A site already exists in {:?}", target_dir);
    }

    let content = target_dir.join("content");
    fs::create_dir_all(content.join("blog"))?;
    fs::create_dir_all(content.join("react-web"))?;
    fs::create_dir_all(content.join("other"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    fs::write(&config_path, CONFIG)?;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    fs::write(
        content.join("blog/hello-world.md"),
        HELLO_WORLD.replace("{{ date }}", &today),
    )?;
    fs::write(content.join("react-web/sample.md"), REACT_WEB_PROJECT)?;
    fs::write(content.join("other/sample.md"), OTHER_PROJECT)?;

    Ok(())
}
