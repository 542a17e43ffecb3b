use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use spdlog::info;

use posted::config::Config;
use posted::content::content_renderer::{BreakTag, ContentRenderer, MarkdownRenderer, RenderOptions};
use posted::content::Post;
use posted::view::page_renderer::{read_layout_template, PageRenderer};

#[derive(Parser, Debug)]
pub(crate) struct RenderArgs {
    /// Post file
    file: PathBuf,

    /// Render only the summary, up to the break tag
    #[arg(short, long)]
    preview: bool,

    /// Render a full page using the post layout template
    #[arg(long)]
    page: bool,

    /// Output file. Defaults to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub(crate) fn render_cmd(config: &Config, args: RenderArgs) -> Result<bool> {
    let post = Post::from_file(&args.file)?;
    let render_options = if args.preview {
        RenderOptions::PreviewOnly(BreakTag(config.check.break_tag.clone()))
    } else {
        RenderOptions::FullContent
    };

    let html = if args.page {
        let template_src = read_layout_template(config.paths.template_dir.as_deref(), &post)?;
        let page_renderer = PageRenderer::new(&template_src)?;
        page_renderer.render(&post, &render_options)?
    } else {
        MarkdownRenderer::render(&post, &render_options)?
    };

    match args.output {
        Some(output) => {
            fs::write(&output, html).with_context(|| format!("Could not write {}", output.display()))?;
            info!("Rendered {} into {}", args.file.display(), output.display());
        }
        None => print!("{}", html),
    }

    Ok(true)
}
