use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use serde_json::json;

use posted::collection::PostCollection;
use posted::config::Config;
use posted::content::code_blocks::extract_code_blocks;
use posted::content::Post;
use posted::post_list::PostList;

#[derive(Parser, Debug)]
pub(crate) struct ShowArgs {
    /// Post file, or the slug of a post in the configured posts dir
    post: String,

    /// Print as JSON
    #[arg(short, long)]
    json: bool,
}

fn find_post(config: &Config, post: &str) -> Result<Post> {
    let path = PathBuf::from(post);
    if path.is_file() {
        return Ok(Post::from_file(&path)?);
    }

    let post_list = PostList { root_dir: config.paths.posts_dir.clone() };
    let collection = PostCollection::load(&post_list)?;
    collection.from_link(post)
        .cloned()
        .ok_or_else(|| anyhow!("No post file or slug '{}' in {}", post, post_list.root_dir.display()))
}

pub(crate) fn show_cmd(config: &Config, args: ShowArgs) -> Result<bool> {
    let post = find_post(config, &args.post)?;
    let languages: Vec<String> = extract_code_blocks(&post.body)
        .map(|blocks| blocks.into_iter().filter_map(|b| b.lang).collect())
        .unwrap_or_default();

    if args.json {
        let value = json!({
            "file": post.file_name,
            "slug": post.slug,
            "layout": post.layout,
            "title": post.title,
            "tags": post.tags,
            "categories": post.categories,
            "date": post.date.format("%Y-%m-%d").to_string(),
            "has_front_matter": post.has_front_matter,
            "word_count": post.word_count(),
            "read_time": post.read_time(),
            "code_languages": languages,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", post);
        println!("words={}, read_time={} min, code={}", post.word_count(), post.read_time(), languages.join(" "));
    }

    Ok(true)
}
