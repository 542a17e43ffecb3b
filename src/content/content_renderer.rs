use std::io;
use std::io::ErrorKind;

use markdown::Options;

use crate::content::parsing_utils::{extract_content, remove_comments};
use crate::content::Post;

pub const DEFAULT_BREAK_TAG: &str = "<!-- more -->";

#[derive(Clone, Debug)]
pub struct BreakTag(pub String);

impl Default for BreakTag {
    fn default() -> Self {
        BreakTag(DEFAULT_BREAK_TAG.to_string())
    }
}

#[derive(Clone, Debug)]
pub enum RenderOptions {
    PreviewOnly(BreakTag),
    FullContent,
}

pub trait ContentRenderer {
    fn render(post: &Post, render_options: &RenderOptions) -> io::Result<String>;
}

/// Renders post bodies as GitHub flavoured markdown.
pub struct MarkdownRenderer {}

impl ContentRenderer for MarkdownRenderer {
    fn render(post: &Post, render_options: &RenderOptions) -> io::Result<String> {
        let content = extract_content(&post.body, render_options);
        Self::render_markdown(&content).map_err(|e| {
            io::Error::new(e.kind(), format!("{} - file={}", e, post.file_name.display()))
        })
    }
}

impl MarkdownRenderer {
    pub fn render_markdown(md_text: &str) -> io::Result<String> {
        let buf = remove_comments(md_text)?;
        match markdown::to_html_with_options(buf.as_str(), &Options::gfm()) {
            Ok(x) => Ok(x),
            Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason)),
        }
    }
}
