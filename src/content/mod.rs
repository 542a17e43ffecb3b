use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::io;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{NaiveDateTime, NaiveTime};
use spdlog::debug;

use crate::content::content_file::ContentFile;
use crate::content::front_matter::{split_front_matter, FrontMatter};
use crate::content::parsing_utils::{parse_title_markdown, title_from_slug};
use crate::text_utils::parse_date_time;

pub mod code_blocks;
pub mod content_file;
pub mod content_renderer;
pub mod file_name;
pub mod front_matter;
pub mod parsing_utils;

const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub file_name: PathBuf,
    pub slug: String,
    pub layout: Option<String>,
    pub title: String,
    pub tags: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub date: NaiveDateTime,
    pub body: String,
    pub has_front_matter: bool,
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "slug={}, date={}, layout={}\ntitle={}\ntags={}\ncategories={}",
               self.slug,
               self.date.format("%Y-%m-%d"),
               self.layout.as_deref().unwrap_or("-"),
               self.title,
               self.tags.iter().cloned().collect::<Vec<_>>().join(" "),
               self.categories.iter().cloned().collect::<Vec<_>>().join(" "),
        )
    }
}

impl Post {
    pub fn from_file(file_name: &PathBuf) -> io::Result<Post> {
        let content_file = ContentFile::from_file(file_name.clone())?;
        Self::parse(&content_file)
    }

    /// Builds a post from a file, falling back to the file name and the leading heading
    /// for whatever the front-matter does not provide.
    pub fn parse(content_file: &ContentFile) -> io::Result<Post> {
        let file_path = &content_file.file_path;
        let with_file = |e: io::Error| {
            io::Error::new(e.kind(), format!("{} - file={}", e, file_path.display()))
        };

        let (block, body) = split_front_matter(&content_file.raw_content).map_err(with_file)?;
        let front_matter = match block {
            Some(block) => FrontMatter::parse(block).map_err(with_file)?,
            None => {
                debug!("No front-matter in {}, deriving metadata", file_path.display());
                FrontMatter::default()
            }
        };

        let date = match (&front_matter.date, content_file.file_name.date) {
            (Some(date), _) => parse_date_time(date)
                .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))
                .map_err(with_file)?,
            (None, Some(date)) => date.and_time(NaiveTime::default()),
            (None, None) => {
                return Err(with_file(io::Error::new(ErrorKind::InvalidData, "Post has no date")));
            }
        };

        let slug = content_file.file_name.slug.clone();
        let title = front_matter.title
            .or_else(|| parse_title_markdown(body))
            .unwrap_or_else(|| title_from_slug(&slug));

        Ok(Post {
            file_name: file_path.clone(),
            slug,
            layout: front_matter.layout,
            title,
            tags: front_matter.tags,
            categories: front_matter.categories,
            date,
            body: body.to_string(),
            has_front_matter: block.is_some(),
        })
    }

    pub fn word_count(&self) -> usize {
        words_count::count(&self.body).words
    }

    /// Minutes to read the post, never less than one
    pub fn read_time(&self) -> usize {
        let words = self.word_count();
        ((words + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE).max(1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::test_data::{POST_JSON_MD, POST_NO_FRONT_MATTER_MD};

    use super::*;

    fn content_file(name: &str, raw: &str) -> ContentFile {
        ContentFile::from_string(PathBuf::from(name), raw.to_string()).unwrap()
    }

    #[test]
    fn test_post_with_front_matter() {
        let post = Post::parse(&content_file("_posts/2024-12-02-json-serializer-vs-json-convert.md", POST_JSON_MD)).unwrap();
        assert_eq!(post.title, ".NET Performance Analysis: Newtonsoft.Json vs System.Text.Json in .NET 9");
        assert_eq!(post.tags, BTreeSet::from(["json".to_string(), "parsing".to_string(), "performance".to_string()]));
        assert_eq!(post.date.date(), NaiveDate::from_ymd_opt(2024, 12, 2).unwrap());
        assert_eq!(post.slug, "json-serializer-vs-json-convert");
        assert_eq!(post.layout.as_deref(), Some("post"));
        assert!(post.has_front_matter);
        assert!(!post.body.contains("layout: post"));
        println!("{}", post);
    }

    #[test]
    fn test_post_without_front_matter() {
        let post = Post::parse(&content_file("2024-10-20-net8-performance-optimisation.md", POST_NO_FRONT_MATTER_MD)).unwrap();
        assert_eq!(post.title, "Performance Optimization Techniques for .NET 8");
        assert_eq!(post.body, POST_NO_FRONT_MATTER_MD);
        assert_eq!(post.date.date(), NaiveDate::from_ymd_opt(2024, 10, 20).unwrap());
        assert!(post.tags.is_empty());
        assert!(!post.has_front_matter);
    }

    #[test]
    fn test_title_falls_back_to_slug() {
        let post = Post::parse(&content_file("2024-01-05-azure-cost-comparison.md", "Plain text only.\n")).unwrap();
        assert_eq!(post.title, "Azure Cost Comparison");
    }

    #[test]
    fn test_post_without_any_date() {
        let err = Post::parse(&content_file("about.md", "# About\n\nHello\n")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().contains("about.md"));
    }

    #[test]
    fn test_post_with_invalid_date() {
        let raw = "---\ntitle: Broken\ndate: 2024-02-31\n---\nBody\n";
        let err = Post::parse(&content_file("2024-02-28-broken.md", raw)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_time() {
        let mut post = Post::parse(&content_file("2024-01-05-short.md", "Few words here.\n")).unwrap();
        assert_eq!(post.word_count(), 3);
        assert_eq!(post.read_time(), 1);

        post.body = "word ".repeat(401);
        assert_eq!(post.read_time(), 3);
    }
}
