use std::{fs, io};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::content::file_name::PostFileName;

pub const POST_EXTENSIONS: [&str; 2] = ["md", "markdown"];

pub struct ContentFile {
    pub file_path: PathBuf,
    pub file_name: PostFileName,
    pub raw_content: String,
}

impl ContentFile {
    pub fn from_file(file_path: PathBuf) -> io::Result<ContentFile> {
        if !Self::is_post_file(&file_path) {
            return Err(io::Error::new(
                ErrorKind::Unsupported,
                format!("Not a markdown post file {}", file_path.display()),
            ));
        }

        let raw_content = fs::read_to_string(&file_path).map_err(|e| {
            io::Error::new(e.kind(), format!("Error reading {}: {}", file_path.display(), e))
        })?;

        Self::from_string(file_path, raw_content)
    }

    pub fn from_string(file_path: PathBuf, raw_content: String) -> io::Result<ContentFile> {
        let file_name = PostFileName::parse(&file_path)?;
        Ok(ContentFile {
            file_path,
            file_name,
            raw_content,
        })
    }

    pub fn is_post_file(file_path: &Path) -> bool {
        match file_path.extension().and_then(|e| e.to_str()) {
            Some(ext) => POST_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_post_file() {
        assert!(ContentFile::is_post_file(Path::new("_posts/2024-12-02-a.md")));
        assert!(ContentFile::is_post_file(Path::new("2024-12-02-a.Markdown")));
        assert!(!ContentFile::is_post_file(Path::new("2024-12-02-a.html")));
        assert!(!ContentFile::is_post_file(Path::new("README")));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = ContentFile::from_file(PathBuf::from("notes.txt")).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_missing_file() {
        let err = ContentFile::from_file(PathBuf::from("does/not/exist.md")).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
