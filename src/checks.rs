use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use spdlog::{debug, info};

use crate::collection::PostCollection;
use crate::config::CheckConfig;
use crate::content::code_blocks::{extract_code_blocks, CodeBlock};
use crate::content::content_file::ContentFile;
use crate::content::file_name::PostFileName;
use crate::content::front_matter::{split_front_matter, FrontMatter};
use crate::content::parsing_utils::remove_comments_outside;
use crate::content::Post;
use crate::post_list::PostList;
use crate::text_utils::parse_date_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueKind {
    Unreadable,
    FrontMatterUnterminated,
    FrontMatterMalformed,
    MissingDate,
    InvalidDate,
    InvalidFileDate,
    DateMismatch,
    NoDate,
    EmptyBody,
    UnbalancedFence,
    UnterminatedComment,
    MissingFrontMatter,
    UnrecognizedKey,
    UndatedFileName,
    MissingLanguage,
    UnknownLanguage,
    TagCaseConflict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub message: String,
    /// 1-based line in the file, when the issue points to one
    pub line: Option<usize>,
}

impl Issue {
    fn error(kind: IssueKind, message: String) -> Self {
        Issue { severity: Severity::Error, kind, message, line: None }
    }

    fn warning(kind: IssueKind, message: String) -> Self {
        Issue { severity: Severity::Warning, kind, message, line: None }
    }

    fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match self.line {
            Some(line) => write!(f, "{}[{:?}] line {}: {}", severity, self.kind, line, self.message),
            None => write!(f, "{}[{:?}]: {}", severity, self.kind, self.message),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub strict: bool,
    pub require_front_matter: bool,
    /// When set, fenced code languages outside this list are reported
    pub languages: Option<Vec<String>>,
}

impl From<&CheckConfig> for CheckOptions {
    fn from(value: &CheckConfig) -> Self {
        CheckOptions {
            strict: value.strict,
            require_front_matter: value.require_front_matter,
            languages: value.languages.clone(),
        }
    }
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub post: Option<Post>,
    pub issues: Vec<Issue>,
}

impl FileReport {
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Warning).count()
    }

    pub fn failed(&self, strict: bool) -> bool {
        self.error_count() > 0 || (strict && self.warning_count() > 0)
    }
}

pub fn check_file(path: &Path, options: &CheckOptions) -> FileReport {
    debug!("Checking {}", path.display());
    let (issues, post) = match fs::read_to_string(path) {
        Ok(raw) => {
            let issues = check_content(path, &raw, options);
            // Only posts passing every error level check are parsed
            let post = if issues.iter().any(|i| i.severity == Severity::Error) {
                None
            } else {
                ContentFile::from_string(path.to_path_buf(), raw)
                    .and_then(|content_file| Post::parse(&content_file))
                    .ok()
            };
            (issues, post)
        }
        Err(e) => (vec![Issue::error(IssueKind::Unreadable, format!("Error reading file: {}", e))], None),
    };

    FileReport {
        path: path.to_path_buf(),
        post,
        issues,
    }
}

/// Runs every per-file property over a post file content.
pub fn check_content(path: &Path, raw: &str, options: &CheckOptions) -> Vec<Issue> {
    let mut issues = vec![];

    let file_date = match PostFileName::parse(path) {
        Ok(PostFileName { date: Some(date), .. }) => Some(date),
        Ok(PostFileName { date: None, .. }) => {
            issues.push(Issue::warning(
                IssueKind::UndatedFileName,
                "File name is not prefixed with YYYY-MM-DD-".to_string(),
            ));
            None
        }
        Err(e) => {
            issues.push(Issue::error(IssueKind::InvalidFileDate, e.to_string()));
            None
        }
    };

    let (block, body) = match split_front_matter(raw) {
        Ok(split) => split,
        Err(e) => {
            issues.push(Issue::error(IssueKind::FrontMatterUnterminated, e.to_string()).at_line(1));
            return issues;
        }
    };

    let mut fm_date = None;
    match block {
        Some(block) => {
            let front_matter = match FrontMatter::parse(block) {
                Ok(front_matter) => Some(front_matter),
                Err(e) => {
                    issues.push(Issue::error(IssueKind::FrontMatterMalformed, e.to_string()).at_line(2));
                    None
                }
            };
            if let Some(front_matter) = front_matter {
                for key in front_matter.unrecognized.iter() {
                    issues.push(Issue::warning(
                        IssueKind::UnrecognizedKey,
                        format!("Unrecognized front-matter key '{}'", key),
                    ));
                }
                match front_matter.date {
                    None => issues.push(Issue::error(
                        IssueKind::MissingDate,
                        "Front-matter has no date".to_string(),
                    )),
                    Some(ref date) => match parse_date_time(date) {
                        Ok(date) => fm_date = Some(date.date()),
                        Err(e) => issues.push(Issue::error(IssueKind::InvalidDate, e)),
                    },
                }
            }
        }
        None => {
            let message = "No front-matter block, metadata is derived from the file".to_string();
            if options.require_front_matter {
                issues.push(Issue::error(IssueKind::MissingFrontMatter, message));
            } else {
                issues.push(Issue::warning(IssueKind::MissingFrontMatter, message));
            }
            if file_date.is_none() && !issues.iter().any(|i| i.kind == IssueKind::InvalidFileDate) {
                issues.push(Issue::error(
                    IssueKind::NoDate,
                    "Neither front-matter nor file name provide a date".to_string(),
                ));
            }
        }
    }

    if let (Some(file_date), Some(fm_date)) = (file_date, fm_date) {
        if file_date != fm_date {
            issues.push(Issue::error(
                IssueKind::DateMismatch,
                format!("File name date {} differs from front-matter date {}", file_date, fm_date),
            ));
        }
    }

    if body.trim().is_empty() {
        issues.push(Issue::error(IssueKind::EmptyBody, "Post body is empty".to_string()));
    }

    // Body line numbers are shifted by the front-matter lines
    let body_offset = raw.len() - body.len();
    let first_body_line = raw[..body_offset].matches('\n').count();

    match extract_code_blocks(body) {
        Ok(blocks) => {
            check_languages(&blocks, options, first_body_line, &mut issues);
            if let Err(unterminated) = remove_comments_outside(body, &blocks) {
                issues.push(Issue::error(IssueKind::UnterminatedComment, unterminated.to_string())
                    .at_line(first_body_line + unterminated.line));
            }
        }
        Err(unclosed) => {
            issues.push(Issue::error(IssueKind::UnbalancedFence, unclosed.to_string())
                .at_line(first_body_line + unclosed.line));
        }
    }

    issues
}

fn check_languages(blocks: &[CodeBlock], options: &CheckOptions, first_body_line: usize, issues: &mut Vec<Issue>) {
    for block in blocks {
        let line = first_body_line + block.line;
        match (&block.lang, &options.languages) {
            (None, _) => issues.push(Issue::warning(
                IssueKind::MissingLanguage,
                "Code block has no language tag".to_string(),
            ).at_line(line)),
            (Some(lang), Some(languages)) if !languages.iter().any(|l| l.eq_ignore_ascii_case(lang)) => {
                issues.push(Issue::warning(
                    IssueKind::UnknownLanguage,
                    format!("Code block language '{}' is not one of {}", lang, languages.join(", ")),
                ).at_line(line))
            }
            _ => {}
        }
    }
}

/// Checks every post of a directory, plus the tag taxonomy across the posts that parsed.
pub fn check_dir(dir: &Path, options: &CheckOptions) -> std::io::Result<(Vec<FileReport>, Vec<Issue>)> {
    let post_list = PostList { root_dir: dir.to_path_buf() };
    let files = post_list.retrieve_files()?;
    info!("Checking {} post files in {}", files.len(), dir.display());

    let reports: Vec<FileReport> = files.iter()
        .map(|file| check_file(file, options))
        .collect();

    let mut collection = PostCollection::new();
    for post in reports.iter().filter_map(|r| r.post.clone()) {
        if let Err(e) = collection.add(post) {
            debug!("Skipping post from taxonomy check: {}", e);
        }
    }

    let taxonomy_issues = collection.similar_terms().into_iter()
        .map(|terms| Issue::warning(
            IssueKind::TagCaseConflict,
            format!("Terms differ only by case or separators: {}", terms.join(", ")),
        ))
        .collect();

    Ok((reports, taxonomy_issues))
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;

    use crate::test_data::{POST_BROKEN_MD, POST_JSON_MD, POST_NO_FRONT_MATTER_MD};

    use super::*;

    fn kinds(issues: &[Issue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_valid_post() {
        let path = PathBuf::from("2024-12-02-json-serializer-vs-json-convert.md");
        let issues = check_content(&path, POST_JSON_MD, &CheckOptions::default());
        assert!(issues.is_empty(), "{:?}", issues);
    }

    #[test]
    fn test_post_without_front_matter() {
        let path = PathBuf::from("2024-10-20-net8-performance-optimisation.md");
        let issues = check_content(&path, POST_NO_FRONT_MATTER_MD, &CheckOptions::default());
        assert_eq!(kinds(&issues), vec![IssueKind::MissingFrontMatter]);
        assert_eq!(issues[0].severity, Severity::Warning);

        let options = CheckOptions { require_front_matter: true, ..Default::default() };
        let issues = check_content(&path, POST_NO_FRONT_MATTER_MD, &options);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_broken_post() {
        let path = PathBuf::from("2024-11-04-central-package-management.md");
        let issues = check_content(&path, POST_BROKEN_MD, &CheckOptions::default());
        assert_eq!(kinds(&issues), vec![
            IssueKind::UnrecognizedKey,
            IssueKind::DateMismatch,
            IssueKind::UnbalancedFence,
        ]);
        // The fence opens on the 11th line of the file
        assert_eq!(issues[2].line, Some(11));
    }

    #[test]
    fn test_front_matter_errors() {
        let path = PathBuf::from("2024-11-04-post.md");
        let issues = check_content(&path, "---\ntitle: x\nBody\n", &CheckOptions::default());
        assert_eq!(kinds(&issues), vec![IssueKind::FrontMatterUnterminated]);

        let issues = check_content(&path, "---\ntitle: [x\n---\nBody\n", &CheckOptions::default());
        assert_eq!(kinds(&issues), vec![IssueKind::FrontMatterMalformed]);

        let issues = check_content(&path, "---\ntitle: x\n---\nBody\n", &CheckOptions::default());
        assert_eq!(kinds(&issues), vec![IssueKind::MissingDate]);

        let issues = check_content(&path, "---\ndate: yesterday\n---\nBody\n", &CheckOptions::default());
        assert_eq!(kinds(&issues), vec![IssueKind::InvalidDate]);

        let issues = check_content(&path, "---\ndate: 2024-11-04\n---\n\n  \n", &CheckOptions::default());
        assert_eq!(kinds(&issues), vec![IssueKind::EmptyBody]);
    }

    #[test]
    fn test_file_name_errors() {
        let issues = check_content(Path::new("2024-02-30-post.md"), "---\ndate: 2024-02-28\n---\nBody\n", &CheckOptions::default());
        assert_eq!(kinds(&issues), vec![IssueKind::InvalidFileDate]);

        let issues = check_content(Path::new("about.md"), "# About\n", &CheckOptions::default());
        assert_eq!(kinds(&issues), vec![IssueKind::UndatedFileName, IssueKind::MissingFrontMatter, IssueKind::NoDate]);
    }

    #[test]
    fn test_languages() {
        let path = PathBuf::from("2024-11-04-post.md");
        let raw = "---\ndate: 2024-11-04\n---\n```\nplain\n```\n\n```Rust\nfn main() {}\n```\n\n```csharp\nvar x = 1;\n```\n";
        let options = CheckOptions { languages: Some(vec!["csharp".to_string(), "rust".to_string()]), ..Default::default() };
        let issues = check_content(&path, raw, &options);
        assert_eq!(kinds(&issues), vec![IssueKind::MissingLanguage]);
        assert_eq!(issues[0].line, Some(4));

        let options = CheckOptions { languages: Some(vec!["csharp".to_string()]), ..Default::default() };
        let issues = check_content(&path, raw, &options);
        assert_eq!(kinds(&issues), vec![IssueKind::MissingLanguage, IssueKind::UnknownLanguage]);
    }

    #[test]
    fn test_unterminated_comment() {
        let path = PathBuf::from("2024-11-04-post.md");
        let issues = check_content(&path, "---\ndate: 2024-11-04\n---\nText\nMore <!-- oops\n", &CheckOptions::default());
        assert_eq!(kinds(&issues), vec![IssueKind::UnterminatedComment]);
        assert_eq!(issues[0].line, Some(5));
    }

    #[test]
    fn test_comment_markers_in_code() {
        let path = PathBuf::from("2024-11-04-post.md");
        let raw = "---\ndate: 2024-11-04\n---\nXML comments start with `<!--` and end later.\n";
        assert!(check_content(&path, raw, &CheckOptions::default()).is_empty());

        let raw = "---\ndate: 2024-11-04\n---\nIntro\n\n```xml\n<!-- more -->\n<Project />\n```\n\nRest\n";
        assert!(check_content(&path, raw, &CheckOptions::default()).is_empty());
    }

    #[test]
    fn test_check_file_parses_post() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("2024-12-02-json-serializer-vs-json-convert.md");
        File::create(&path)?.write_all(POST_JSON_MD.as_bytes())?;

        let report = check_file(&path, &CheckOptions::default());
        assert!(report.issues.is_empty());
        let post = report.post.unwrap();
        assert_eq!(post.slug, "json-serializer-vs-json-convert");

        let report = check_file(&dir.path().join("2024-12-03-missing.md"), &CheckOptions::default());
        assert_eq!(kinds(&report.issues), vec![IssueKind::Unreadable]);
        assert!(report.post.is_none());
        Ok(())
    }

    #[test]
    fn test_report_failure() {
        let report = FileReport {
            path: PathBuf::from("x.md"),
            post: None,
            issues: vec![Issue::warning(IssueKind::MissingLanguage, "".to_string())],
        };
        assert!(!report.failed(false));
        assert!(report.failed(true));
    }

    #[test]
    fn test_check_dir() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let write = |name: &str, content: &str| -> std::io::Result<()> {
            let mut file = File::create(dir.path().join(name))?;
            file.write_all(content.as_bytes())
        };
        write("2024-12-02-json-serializer-vs-json-convert.md", POST_JSON_MD)?;
        write("2024-10-20-net8-performance-optimisation.md", POST_NO_FRONT_MATTER_MD)?;
        write("2024-11-04-central-package-management.md", POST_BROKEN_MD)?;
        write("2024-11-05-tags.md", "---\ntags: Performance\ndate: 2024-11-05\n---\nBody\n")?;
        write("notes.txt", "ignored")?;

        let (reports, taxonomy) = check_dir(dir.path(), &CheckOptions::default())?;
        assert_eq!(reports.len(), 4);
        assert_eq!(reports.iter().filter(|r| r.failed(false)).count(), 1);
        assert_eq!(reports.iter().filter(|r| r.post.is_some()).count(), 3);
        assert_eq!(kinds(&taxonomy), vec![IssueKind::TagCaseConflict]);
        assert!(taxonomy[0].message.contains("Performance, performance"));
        Ok(())
    }
}
