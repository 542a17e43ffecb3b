use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spdlog::{debug, warn};

use posted::config::LogLevel;
use posted::logger::configure_logger;

use crate::check::{check_cmd, CheckArgs};
use crate::config::open_config;
use crate::new_post::{new_cmd, NewArgs};
use crate::render::{render_cmd, RenderArgs};
use crate::show::{show_cmd, ShowArgs};
use crate::tags::{tags_cmd, TagsArgs};

mod check;
mod config;
mod new_post;
mod render;
mod show;
mod tags;

const CFG_FILE_NAME: &str = "posted.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Print debug messages when no [log] section is configured
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check front-matter, dates, body and code fences of posts
    Check(CheckArgs),
    /// Print the metadata of a post
    Show(ShowArgs),
    /// Render a post to HTML
    Render(RenderArgs),
    /// List tags and categories by frequency
    Tags(TagsArgs),
    /// Create a new dated post file
    New(NewArgs),
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{:#}", err);
            eprintln!("Please run posted --help");
            return Ok(ExitCode::FAILURE);
        }
    };

    let verbosity = if args.verbose { LogLevel::Debug } else { LogLevel::Warn };
    if let Err(err) = configure_logger(&config, verbosity) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }
    debug!("Running {:?}", args.command);

    let success = match args.command {
        Command::Check(args) => check_cmd(&config, args)?,
        Command::Show(args) => show_cmd(&config, args)?,
        Command::Render(args) => render_cmd(&config, args)?,
        Command::Tags(args) => tags_cmd(&config, args)?,
        Command::New(args) => new_cmd(&config, args)?,
    };

    Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
