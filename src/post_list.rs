use std::{fs, io};
use std::path::PathBuf;

use crate::content::content_file::ContentFile;

pub struct PostList {
    pub root_dir: PathBuf,
}

impl PostList {
    /// Post files directly under the root dir, sorted by file name (oldest first for dated names).
    pub fn retrieve_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut posts = vec![];
        let entries = fs::read_dir(self.root_dir.as_path()).map_err(|e| {
            io::Error::new(e.kind(), format!("Error listing posts in {}: {}", self.root_dir.display(), e))
        })?;
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if ContentFile::is_post_file(&path) {
                posts.push(path);
            }
        }
        posts.sort();
        Ok(posts)
    }
}
