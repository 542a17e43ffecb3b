use std::fmt::{Display, Formatter};
use std::io;
use std::io::ErrorKind;
use std::ops::Range;

/// A fenced code block found in a post body.
///
/// `span` covers the opening fence line up to the end of the closing fence line
/// (without its line break). `content_span` covers the lines between both fences.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub lang: Option<String>,
    pub info: String,
    pub fence: String,
    pub content: String,
    pub span: Range<usize>,
    pub content_span: Range<usize>,
    /// 1-based line of the opening fence
    pub line: usize,
}

impl CodeBlock {
    pub fn raw<'a>(&self, body: &'a str) -> &'a str {
        &body[self.span.clone()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnclosedFence {
    pub line: usize,
    pub fence: String,
}

impl Display for UnclosedFence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "code fence {} opened at line {} is never closed", self.fence, self.line)
    }
}

impl From<UnclosedFence> for io::Error {
    fn from(value: UnclosedFence) -> Self {
        io::Error::new(ErrorKind::InvalidData, value.to_string())
    }
}

struct OpenFence {
    fence_char: char,
    fence_len: usize,
    info: String,
    start: usize,
    content_start: usize,
    line: usize,
}

/// (fence char, fence length, rest of the line) when the line starts with a fence run
fn fence_run(line: &str) -> Option<(char, usize, &str)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let line = &line[indent..];
    let fence_char = line.chars().next()?;
    if fence_char != '`' && fence_char != '~' {
        return None;
    }
    let fence_len = line.len() - line.trim_start_matches(fence_char).len();
    if fence_len < 3 {
        return None;
    }
    Some((fence_char, fence_len, &line[fence_len..]))
}

fn opening_fence(line: &str) -> Option<(char, usize, String)> {
    let (fence_char, fence_len, rest) = fence_run(line)?;
    // A backtick info string cannot hold backticks, `` ```a`b `` is inline code
    if fence_char == '`' && rest.contains('`') {
        return None;
    }
    Some((fence_char, fence_len, rest.trim().to_string()))
}

fn is_closing_fence(line: &str, open: &OpenFence) -> bool {
    match fence_run(line) {
        Some((fence_char, fence_len, rest)) => {
            fence_char == open.fence_char && fence_len >= open.fence_len && rest.trim().is_empty()
        }
        None => false,
    }
}

pub fn extract_code_blocks(body: &str) -> Result<Vec<CodeBlock>, UnclosedFence> {
    let mut blocks = vec![];
    let mut open: Option<OpenFence> = None;
    let mut offset = 0;

    for (idx, raw_line) in body.split_inclusive('\n').enumerate() {
        let line = raw_line.trim_end_matches(['\n', '\r']);
        let line_start = offset;
        offset += raw_line.len();

        match open {
            None => {
                if let Some((fence_char, fence_len, info)) = opening_fence(line) {
                    open = Some(OpenFence {
                        fence_char,
                        fence_len,
                        info,
                        start: line_start,
                        content_start: offset,
                        line: idx + 1,
                    });
                }
            }
            Some(ref fence) => {
                if is_closing_fence(line, fence) {
                    let lang = fence.info.split_whitespace().next().map(|s| s.to_string());
                    let content_span = fence.content_start..line_start;
                    blocks.push(CodeBlock {
                        lang,
                        info: fence.info.clone(),
                        fence: fence.fence_char.to_string().repeat(fence.fence_len),
                        content: body[content_span.clone()].to_string(),
                        span: fence.start..line_start + line.len(),
                        content_span,
                        line: fence.line,
                    });
                    open = None;
                }
            }
        }
    }

    match open {
        Some(fence) => Err(UnclosedFence {
            line: fence.line,
            fence: fence.fence_char.to_string().repeat(fence.fence_len),
        }),
        None => Ok(blocks),
    }
}

/// Replaces the content of `block` inside `body`, keeping both fences untouched.
pub fn replace_content(body: &str, block: &CodeBlock, new_content: &str) -> String {
    let mut res = String::with_capacity(body.len() + new_content.len());
    res.push_str(&body[..block.content_span.start]);
    res.push_str(new_content);
    res.push_str(&body[block.content_span.end..]);
    res
}

/// True if the byte `pos` of the body lies inside one of the blocks.
pub fn inside_code(blocks: &[CodeBlock], pos: usize) -> bool {
    blocks.iter().any(|b| b.span.contains(&pos))
}

fn backtick_run(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|b| **b == b'`').count()
}

/// End of the first run of exactly `len` backticks in `bytes[from..limit]`
fn closing_run(bytes: &[u8], from: usize, limit: usize, len: usize) -> Option<usize> {
    let mut pos = from;
    while pos < limit {
        if bytes[pos] == b'`' {
            let run = backtick_run(&bytes[..limit], pos);
            if run == len {
                return Some(pos + run);
            }
            pos += run;
        } else {
            pos += 1;
        }
    }
    None
}

/// Inline code spans outside the fenced blocks, backticks included.
///
/// A span opened by N backticks is closed by the next run of exactly N backticks.
/// A run never closed is literal text.
pub fn extract_code_spans(body: &str, blocks: &[CodeBlock]) -> Vec<Range<usize>> {
    let bytes = body.as_bytes();
    let mut spans = vec![];
    let mut pos = 0;

    while pos < bytes.len() {
        if let Some(block) = blocks.iter().find(|b| b.span.contains(&pos)) {
            pos = block.span.end;
            continue;
        }
        match bytes[pos] {
            b'\\' => pos += 2,
            b'`' => {
                let run = backtick_run(bytes, pos);
                // Spans do not reach into the next fenced block
                let limit = blocks.iter()
                    .map(|b| b.span.start)
                    .filter(|start| *start > pos)
                    .min()
                    .unwrap_or(bytes.len());
                match closing_run(bytes, pos + run, limit, run) {
                    Some(end) => {
                        spans.push(pos..end);
                        pos = end;
                    }
                    None => pos += run,
                }
            }
            _ => pos += 1,
        }
    }

    spans
}

/// Byte ranges holding code, fenced blocks and inline spans, ordered by start.
pub fn code_ranges(body: &str, blocks: &[CodeBlock]) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = blocks.iter().map(|b| b.span.clone()).collect();
    ranges.extend(extract_code_spans(body, blocks));
    ranges.sort_by_key(|r| r.start);
    ranges
}

#[cfg(test)]
mod tests {
    use crate::test_data::CODE_BLOCKS_MD;

    use super::*;

    #[test]
    fn test_extract_blocks() {
        let blocks = extract_code_blocks(CODE_BLOCKS_MD).unwrap();
        assert_eq!(blocks.len(), 3);

        assert_eq!(blocks[0].lang.as_deref(), Some("csharp"));
        assert_eq!(blocks[0].content, "var options = new JsonSerializerOptions();\n");
        assert_eq!(blocks[0].line, 3);

        assert_eq!(blocks[1].lang.as_deref(), Some("xml"));
        assert_eq!(blocks[1].fence, "~~~~");
        assert!(blocks[1].content.contains("```"));

        assert_eq!(blocks[2].lang, None);
        assert_eq!(blocks[2].content, "dotnet build\n");
    }

    #[test]
    fn test_raw_block_round_trip() {
        let blocks = extract_code_blocks(CODE_BLOCKS_MD).unwrap();
        for block in blocks.iter() {
            let raw = block.raw(CODE_BLOCKS_MD);
            assert!(raw.starts_with(&block.fence));
            assert!(raw.ends_with(&block.fence));

            let mut rebuilt = String::new();
            rebuilt.push_str(&CODE_BLOCKS_MD[..block.span.start]);
            rebuilt.push_str(raw);
            rebuilt.push_str(&CODE_BLOCKS_MD[block.span.end..]);
            assert_eq!(rebuilt, CODE_BLOCKS_MD);

            assert_eq!(replace_content(CODE_BLOCKS_MD, block, &block.content), CODE_BLOCKS_MD);
        }
    }

    #[test]
    fn test_replace_content() {
        let body = "Intro\n```bash\nls\n```\nOutro\n";
        let blocks = extract_code_blocks(body).unwrap();
        let replaced = replace_content(body, &blocks[0], "ls -la\n");
        assert_eq!(replaced, "Intro\n```bash\nls -la\n```\nOutro\n");
    }

    #[test]
    fn test_unclosed_fence() {
        let body = "Text\n\n```csharp\nvar x = 1;\n``\n";
        let err = extract_code_blocks(body).unwrap_err();
        assert_eq!(err, UnclosedFence { line: 3, fence: "```".to_string() });
    }

    #[test]
    fn test_shorter_closing_fence_does_not_close() {
        let body = "````yaml\nkey: value\n```\n";
        assert!(extract_code_blocks(body).is_err());

        let body = "````yaml\nkey: value\n`````\n";
        assert_eq!(extract_code_blocks(body).unwrap().len(), 1);
    }

    #[test]
    fn test_not_fences() {
        // Indented by four spaces or inline code
        let body = "    ```\ncode\n\nUse ```a`b``` inline\n";
        assert!(extract_code_blocks(body).unwrap().is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let body = "Intro\r\n```bash\r\necho hi\r\n```\r\n";
        let blocks = extract_code_blocks(body).unwrap();
        assert_eq!(blocks[0].content, "echo hi\r\n");
        assert_eq!(blocks[0].raw(body), "```bash\r\necho hi\r\n```");
    }

    #[test]
    fn test_code_spans() {
        let body = "Comments start with `<!--` and ``a ` b`` is one span, `never closed\n";
        let spans = extract_code_spans(body, &[]);
        assert_eq!(spans.len(), 2);
        assert_eq!(&body[spans[0].clone()], "`<!--`");
        assert_eq!(&body[spans[1].clone()], "``a ` b``");

        assert!(extract_code_spans(r"Escaped \`tick` here", &[]).is_empty());
    }

    #[test]
    fn test_code_spans_skip_fenced_blocks() {
        let body = "Use `dotnet` then\n```bash\ndotnet `build`\n```\nand `run`\n";
        let blocks = extract_code_blocks(body).unwrap();
        let ranges = code_ranges(body, &blocks);
        let texts: Vec<&str> = ranges.iter().map(|r| &body[r.clone()]).collect();
        assert_eq!(texts, vec!["`dotnet`", "```bash\ndotnet `build`\n```", "`run`"]);
    }

    #[test]
    fn test_inside_code() {
        let body = "a\n```\nb\n```\nc\n";
        let blocks = extract_code_blocks(body).unwrap();
        assert!(!inside_code(&blocks, 0));
        assert!(inside_code(&blocks, body.find('b').unwrap()));
        assert!(!inside_code(&blocks, body.find('c').unwrap()));
    }
}
