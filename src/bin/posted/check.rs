use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use spdlog::info;

use posted::checks::{check_dir, check_file, CheckOptions, FileReport, Issue, Severity};
use posted::config::Config;

#[derive(Parser, Debug)]
pub(crate) struct CheckArgs {
    /// Post files or directories. Defaults to the configured posts dir
    paths: Vec<PathBuf>,

    /// Warnings also fail the check
    #[arg(short, long)]
    strict: bool,

    /// Print warnings as well as errors
    #[arg(short, long)]
    warnings: bool,
}

fn print_issues(path: &PathBuf, issues: &[Issue], show_warnings: bool) {
    for issue in issues {
        if issue.severity == Severity::Warning && !show_warnings {
            continue;
        }
        println!("{}: {}", path.display(), issue);
    }
}

pub(crate) fn check_cmd(config: &Config, args: CheckArgs) -> Result<bool> {
    let mut options = CheckOptions::from(&config.check);
    options.strict |= args.strict;
    let show_warnings = args.warnings || options.strict;

    let paths = if args.paths.is_empty() {
        vec![config.paths.posts_dir.clone()]
    } else {
        args.paths
    };

    let mut reports: Vec<FileReport> = vec![];
    let mut dir_issues: Vec<(PathBuf, Vec<Issue>)> = vec![];
    for path in paths {
        if path.is_dir() {
            let (dir_reports, taxonomy) = check_dir(&path, &options)
                .with_context(|| format!("Could not check {}", path.display()))?;
            reports.extend(dir_reports);
            dir_issues.push((path, taxonomy));
        } else {
            reports.push(check_file(&path, &options));
        }
    }

    for report in reports.iter() {
        print_issues(&report.path, &report.issues, show_warnings);
    }
    for (dir, issues) in dir_issues.iter() {
        print_issues(dir, issues, show_warnings);
    }

    let errors: usize = reports.iter().map(|r| r.error_count()).sum();
    let warnings: usize = reports.iter().map(|r| r.warning_count()).sum::<usize>()
        + dir_issues.iter().map(|(_, issues)| issues.len()).sum::<usize>();
    let failed_files = reports.iter().filter(|r| r.failed(options.strict)).count();

    println!("{} files checked, {} failed, {} errors, {} warnings", reports.len(), failed_files, errors, warnings);
    info!("Check finished: files={} failed={} errors={} warnings={}", reports.len(), failed_files, errors, warnings);

    let taxonomy_failed = options.strict && dir_issues.iter().any(|(_, issues)| !issues.is_empty());
    Ok(failed_files == 0 && !taxonomy_failed)
}
