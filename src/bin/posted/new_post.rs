use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;

use posted::config::Config;
use posted::scaffold::write_new_post;
use posted::text_utils::parse_date;

#[derive(Parser, Debug)]
pub(crate) struct NewArgs {
    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// Publish date as YYYY-MM-DD. Defaults to today
    #[arg(short, long)]
    date: Option<String>,

    /// Directory where the post is created. Defaults to the configured posts dir
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
}

pub(crate) fn new_cmd(config: &Config, args: NewArgs) -> Result<bool> {
    let date: NaiveDate = match args.date {
        Some(ref date) => parse_date(date).map_err(|e| anyhow!(e))?,
        None => Local::now().date_naive(),
    };
    let out_dir = args.out_dir.unwrap_or_else(|| config.paths.posts_dir.clone());

    let path = write_new_post(&out_dir, &args.title, &date)?;
    println!("Creating file {}", path.display());

    Ok(true)
}
