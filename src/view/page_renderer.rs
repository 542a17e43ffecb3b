use std::io;
use std::io::ErrorKind;
use std::path::Path;

use ramhorns::Template;
use spdlog::debug;

use crate::content::content_renderer::{ContentRenderer, MarkdownRenderer, RenderOptions};
use crate::content::Post;
use crate::text_utils::format_date_time;

pub const DEFAULT_LAYOUT: &str = "post";

const DEFAULT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{title}}</title>
</head>
<body class="layout-{{layout}}">
  <article>
    <header>
      <h1>{{title}}</h1>
      <time datetime="{{date}}">{{date}}</time> · {{read_time}} min read
      <ul class="categories">{{#categories}}<li>{{tag}}</li>{{/categories}}</ul>
      <ul class="tags">{{#tags}}<li>{{tag}}</li>{{/tags}}</ul>
    </header>
    {{{body}}}
  </article>
</body>
</html>
"##;

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewPage<'a> {
    title: &'a str,
    layout: &'a str,
    date: &'a str,
    time: &'a str,
    slug: &'a str,
    tags: Vec<ViewTag<'a>>,
    categories: Vec<ViewTag<'a>>,
    read_time: i64,
    body: &'a str,
}

pub struct PageRenderer<'a> {
    pub template: Template<'a>,
}

impl PageRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PageRenderer> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing page template: {}", e)));
            }
        };

        Ok(PageRenderer {
            template,
        })
    }

    pub fn default_template() -> &'static str {
        DEFAULT_TEMPLATE
    }

    pub fn render(&self, post: &Post, render_options: &RenderOptions) -> io::Result<String> {
        let body = MarkdownRenderer::render(post, render_options)?;
        let (date, time) = format_date_time(&post.date);
        let rendered_page = self.template.render(&ViewPage {
            title: post.title.as_str(),
            layout: post.layout.as_deref().unwrap_or(DEFAULT_LAYOUT),
            date: date.as_str(),
            time: time.as_str(),
            slug: post.slug.as_str(),
            tags: post.tags.iter().map(|t| ViewTag { tag: t.as_str() }).collect(),
            categories: post.categories.iter().map(|t| ViewTag { tag: t.as_str() }).collect(),
            read_time: post.read_time() as i64,
            body: body.as_str(),
        });

        Ok(rendered_page)
    }
}

/// Template source for a post layout: `<template_dir>/<layout>.tpl` when it exists,
/// the built-in page otherwise.
pub fn read_layout_template(template_dir: Option<&Path>, post: &Post) -> io::Result<String> {
    let layout = post.layout.as_deref().unwrap_or(DEFAULT_LAYOUT);
    if let Some(template_dir) = template_dir {
        let template_path = template_dir.join(format!("{}.tpl", layout));
        if template_path.is_file() {
            debug!("Using template {} for {}", template_path.display(), post.slug);
            return std::fs::read_to_string(&template_path);
        }
        debug!("No template {} found, using the built-in page", template_path.display());
    }
    Ok(DEFAULT_TEMPLATE.to_string())
}
