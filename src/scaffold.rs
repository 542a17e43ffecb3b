use std::fmt::Write;
use std::fs::OpenOptions;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use spdlog::info;

use crate::view::page_renderer::DEFAULT_LAYOUT;

/// `2024-12-02`, `.NET 9: JSON é rápido!` -> `2024-12-02-net-9-json-e-rapido.md`
///
/// A title without any letter or digit has no slug and is rejected.
pub fn post_file_name(title: &str, date: &NaiveDate) -> io::Result<String> {
    let ascii_title = unidecode::unidecode(title);
    let alpha_chars: String = ascii_title.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();

    let mut slug = String::new();
    let mut prev_char = None;

    for c in alpha_chars.chars() {
        if c != '-' || (prev_char != Some('-') && prev_char.is_some()) {
            slug.push(c);
        }
        prev_char = Some(c);
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        return Err(io::Error::new(
            ErrorKind::InvalidInput,
            format!("Title '{}' has no letters or digits to build a file name from", title),
        ));
    }

    Ok(format!("{}-{}.md", date.format("%Y-%m-%d"), slug))
}

fn quote_yaml(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

pub fn render_new_post(title: &str, date: &NaiveDate) -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf, "layout: {}", DEFAULT_LAYOUT);
    let _ = writeln!(&mut buf, "title: {}", quote_yaml(title));
    let _ = writeln!(&mut buf, "tags:");
    let _ = writeln!(&mut buf, "categories:");
    let _ = writeln!(&mut buf, "date: {}", date.format("%Y-%m-%d"));
    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "This is a body example");
    let _ = writeln!(&mut buf, "Please remove it and replace with your content");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "<!-- more -->");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "And this is the rest of your post");

    buf
}

/// Creates the post file in `out_dir`, failing if it already exists.
pub fn write_new_post(out_dir: &Path, title: &str, date: &NaiveDate) -> io::Result<PathBuf> {
    use std::io::Write;

    let full_path = out_dir.join(post_file_name(title, date)?);
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&full_path)
        .map_err(|e| io::Error::new(e.kind(), format!("Error creating {}: {}", full_path.display(), e)))?;
    file.write_all(render_new_post(title, date).as_bytes())?;
    info!("Created post {}", full_path.display());

    Ok(full_path)
}
