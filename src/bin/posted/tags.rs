use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use spdlog::warn;

use posted::collection::PostCollection;
use posted::config::Config;
use posted::post_list::PostList;

#[derive(Parser, Debug)]
pub(crate) struct TagsArgs {
    /// Posts directory. Defaults to the configured posts dir
    dir: Option<PathBuf>,

    /// Also list every post, newest first, with its tags
    #[arg(short, long)]
    posts: bool,
}

fn print_counts(name: &str, counts: &[(String, usize)]) {
    println!("{}:", name);
    for (term, count) in counts {
        println!("  {:>4}  {}", count, term);
    }
}

pub(crate) fn tags_cmd(config: &Config, args: TagsArgs) -> Result<bool> {
    let root_dir = args.dir.unwrap_or_else(|| config.paths.posts_dir.clone());
    let post_list = PostList { root_dir };

    let mut collection = PostCollection::load(&post_list)?;

    if collection.is_empty() {
        warn!("No posts found in {}", post_list.root_dir.display());
        return Ok(true);
    }
    collection.sort();

    println!("{} posts", collection.len());
    if args.posts {
        for post in collection.posts() {
            let tags: Vec<&str> = post.tags.iter().map(|t| t.as_str()).collect();
            println!("  {}  {}  [{}]", post.date.format("%Y-%m-%d"), post.slug, tags.join(", "));
        }
    }

    print_counts("tags", &collection.tag_counts());
    print_counts("categories", &collection.category_counts());

    let similar = collection.similar_terms();
    if !similar.is_empty() {
        println!("similar terms:");
        for terms in similar {
            println!("  {}", terms.join(", "));
        }
    }

    Ok(true)
}
