use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::io::ErrorKind;

use serde::Deserialize;

use crate::content::parsing_utils::extract_tags;

pub const DELIMITER: &str = "---";
const ALT_END_DELIMITER: &str = "...";

/// `title: 2024` or `tags: [dotnet, 8]` are read as text
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_yaml::Number),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// `tags: json parsing performance` and `tags: [json, parsing]` are both accepted
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum Terms {
    Text(Scalar),
    List(Vec<Scalar>),
}

impl Terms {
    fn into_set(self) -> BTreeSet<String> {
        match self {
            Terms::Text(s) => extract_tags(&s.into_string()).into_iter().collect(),
            Terms::List(list) => list.into_iter()
                .flat_map(|item| extract_tags(&item.into_string()))
                .collect(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct RawFrontMatter {
    layout: Option<String>,
    title: Option<Scalar>,
    tags: Option<Terms>,
    categories: Option<Terms>,
    date: Option<serde_yaml::Value>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub layout: Option<String>,
    pub title: Option<String>,
    pub tags: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    /// Kept as written, parsing happens when building the post
    pub date: Option<String>,
    pub unrecognized: Vec<String>,
}

impl FrontMatter {
    pub fn parse(block: &str) -> io::Result<FrontMatter> {
        if block.trim().is_empty() {
            return Ok(FrontMatter::default());
        }

        let raw: RawFrontMatter = serde_yaml::from_str(block).map_err(|e| {
            io::Error::new(ErrorKind::InvalidData, format!("Malformed front-matter: {}", e))
        })?;

        let date = match raw.date {
            None | Some(serde_yaml::Value::Null) => None,
            Some(serde_yaml::Value::String(s)) => Some(s),
            Some(serde_yaml::Value::Number(n)) => Some(n.to_string()),
            Some(other) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("Front-matter date must be a scalar, found {:?}", other),
                ));
            }
        };

        Ok(FrontMatter {
            layout: raw.layout,
            title: raw.title.map(|t| t.into_string().trim().to_string()).filter(|t| !t.is_empty()),
            tags: raw.tags.map(Terms::into_set).unwrap_or_default(),
            categories: raw.categories.map(Terms::into_set).unwrap_or_default(),
            date,
            unrecognized: raw.extra.into_keys().collect(),
        })
    }
}

fn is_delimiter(line: &str, delimiter: &str) -> bool {
    line.trim_end() == delimiter
}

/// Splits a raw post into its front-matter block and its body.
///
/// The block must open on the very first line. A missing closing delimiter is an error,
/// a file not starting with `---` has no front-matter and is all body.
pub fn split_front_matter(raw: &str) -> io::Result<(Option<&str>, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut lines = raw.split_inclusive('\n');
    let first = match lines.next() {
        Some(line) => line,
        None => return Ok((None, raw)),
    };
    if !is_delimiter(first, DELIMITER) {
        return Ok((None, raw));
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if is_delimiter(line, DELIMITER) || is_delimiter(line, ALT_END_DELIMITER) {
            let block = &raw[block_start..offset];
            let body = &raw[offset + line.len()..];
            return Ok((Some(block), body));
        }
        offset += line.len();
    }

    Err(io::Error::new(ErrorKind::InvalidData, "Front-matter closing delimiter is missing"))
}
