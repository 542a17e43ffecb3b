use std::io::ErrorKind;
use std::path::PathBuf;
use std::{env, fs, io};

use serde::Deserialize;

use crate::content::content_renderer::DEFAULT_BREAK_TAG;

#[derive(Deserialize, Debug)]
pub struct Paths {
    #[serde(default = "default_posts_dir")]
    pub posts_dir: PathBuf,
    pub template_dir: Option<PathBuf>,
}

fn default_posts_dir() -> PathBuf {
    PathBuf::from("_posts")
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            posts_dir: default_posts_dir(),
            template_dir: None,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct CheckConfig {
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub require_front_matter: bool,
    pub languages: Option<Vec<String>>,
    #[serde(default = "default_break_tag")]
    pub break_tag: String,
}

fn default_break_tag() -> String {
    DEFAULT_BREAK_TAG.to_string()
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            strict: false,
            require_front_matter: false,
            languages: None,
            break_tag: default_break_tag(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub check: CheckConfig,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if path.starts_with("${exe_dir}") {
        let cur_exe = env::current_exe()?;
        let exe_dir = cur_exe.parent().and_then(|p| p.to_str()).ok_or_else(|| {
            io::Error::new(ErrorKind::NotFound, "Could not find the executable directory")
        })?;
        let str_path = path.to_string_lossy();
        Ok(PathBuf::from(str_path.replace("${exe_dir}", exe_dir)))
    } else {
        Ok(path)
    }
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        posts_dir: parse_path(cfg.paths.posts_dir)?,
        template_dir: cfg.paths.template_dir.map(parse_path).transpose()?,
    };

    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path).transpose()?;
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &PathBuf) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
