use std::fmt::{Display, Formatter};
use std::io;
use std::io::ErrorKind;
use std::ops::Range;

use crate::content::code_blocks::{code_ranges, extract_code_blocks, inside_code, CodeBlock};
use crate::content::content_renderer::RenderOptions;

/// First level one ATX heading (`# Title`) that is not inside a code block.
pub fn parse_title_markdown(body: &str) -> Option<String> {
    let blocks = extract_code_blocks(body).unwrap_or_default();
    let mut offset = 0;
    for raw_line in body.split_inclusive('\n') {
        let line_start = offset;
        offset += raw_line.len();
        if inside_code(&blocks, line_start) {
            continue;
        }

        let line = raw_line.trim_end();
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent > 3 {
            continue;
        }
        if let Some(title) = line[indent..].strip_prefix("# ") {
            // Closing sequence of an ATX heading is optional: `# Title #`
            let title = title.trim().trim_end_matches('#').trim_end();
            if !title.is_empty() {
                return Some(title.to_string());
            }
        }
    }
    None
}

/// `net8-performance-optimisation` -> `Net8 Performance Optimisation`
pub fn title_from_slug(slug: &str) -> String {
    slug.split(|c| c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// The body up to the first line holding the break tag outside code, or the whole body.
pub fn extract_content(body: &str, render_options: &RenderOptions) -> String {
    match render_options {
        RenderOptions::PreviewOnly(break_tag) => {
            let tag = break_tag.0.as_str();
            let blocks = extract_code_blocks(body).unwrap_or_default();
            let ranges = code_ranges(body, &blocks);

            let mut content = String::new();
            let mut offset = 0;
            for raw_line in body.split_inclusive('\n') {
                let line_start = offset;
                offset += raw_line.len();
                let is_break = raw_line.match_indices(tag)
                    .any(|(idx, _)| !in_ranges(&ranges, line_start + idx));
                if is_break {
                    break;
                }
                content.push_str(raw_line.trim_end_matches(['\n', '\r']));
                content.push('\n');
            }
            content
        }
        RenderOptions::FullContent => body.to_string(),
    }
}

fn in_ranges(ranges: &[Range<usize>], pos: usize) -> bool {
    ranges.iter().any(|r| r.contains(&pos))
}

pub fn extract_tags(tags_str: &str) -> Vec<String> {
    tags_str.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|x| !x.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnterminatedComment {
    /// 1-based line of the body where the comment opens
    pub line: usize,
}

impl Display for UnterminatedComment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error finding end of comment opened at line {}", self.line)
    }
}

impl From<UnterminatedComment> for io::Error {
    fn from(value: UnterminatedComment) -> Self {
        io::Error::new(ErrorKind::InvalidData, value.to_string())
    }
}

/// Removes HTML comments from the markdown, leaving code blocks and code spans untouched.
pub fn remove_comments(md_post: &str) -> io::Result<String> {
    let blocks: Vec<CodeBlock> = extract_code_blocks(md_post)?;
    Ok(remove_comments_outside(md_post, &blocks)?)
}

pub fn remove_comments_outside(md_post: &str, blocks: &[CodeBlock]) -> Result<String, UnterminatedComment> {
    let start_comment = "<!--";
    let end_comment = "-->";

    let ranges = code_ranges(md_post, blocks);
    let mut res: String = String::new();
    let mut pos = 0;

    while pos < md_post.len() {
        let Some(found) = md_post[pos..].find(start_comment) else {
            res.push_str(&md_post[pos..]);
            break;
        };
        let start = pos + found;

        if let Some(range) = ranges.iter().find(|r| r.contains(&start)) {
            // Comment markers inside code are literal text
            res.push_str(&md_post[pos..range.end]);
            pos = range.end;
            continue;
        }

        res.push_str(&md_post[pos..start]);
        let after = start + start_comment.len();
        match md_post[after..].find(end_comment) {
            Some(end) => pos = after + end + end_comment.len(),
            None => {
                let line = md_post[..start].matches('\n').count() + 1;
                return Err(UnterminatedComment { line });
            }
        }
    }

    Ok(res)
}
