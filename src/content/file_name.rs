use std::io;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::text_utils::parse_date;

/// The `YYYY-MM-DD-slug` convention of a post file stem.
#[derive(Debug, Clone, PartialEq)]
pub struct PostFileName {
    pub date: Option<NaiveDate>,
    pub slug: String,
}

impl PostFileName {
    pub fn parse(file_path: &Path) -> io::Result<PostFileName> {
        lazy_static! {
            static ref FILE_NAME_REGEX: Regex = Regex::new(r"^(?P<date>\d{4}-\d{2}-\d{2})-(?P<slug>.+)$").unwrap();
        }

        let stem = match file_path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem,
            None => return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("Invalid post path {}", file_path.display()),
            )),
        };

        let Some(caps) = FILE_NAME_REGEX.captures(stem) else {
            return Ok(PostFileName { date: None, slug: stem.to_string() });
        };

        let date = parse_date(&caps["date"]).map_err(|e| {
            io::Error::new(ErrorKind::InvalidData, format!("{} - file={}", e, file_path.display()))
        })?;

        Ok(PostFileName {
            date: Some(date),
            slug: caps["slug"].to_string(),
        })
    }
}
