//! Build configuration from `rebase.toml` and CLI flags.
//!
//! # Example
//!
//! ```toml
//! root = "src"          # source root for rooted specifiers like "/img/a.png"
//! output = "dist"       # build output directory
//! folder = "static"     # assets land in dist/static/
//! keep_name = true      # logo_3f2a9c1e.png instead of 3f2a9c1e.png
//! include = ["png", "woff2", "css"]
//! ```
//!
//! | Key         | Default        | Purpose                                    |
//! |-------------|----------------|--------------------------------------------|
//! | `root`      | config dir     | Source root for `/rooted` specifiers       |
//! | `output`    | `dist`         | Output directory                           |
//! | `folder`    | `""`           | Subfolder under `output` for all assets    |
//! | `keep_name` | `false`        | Prefix output names with the source stem   |
//! | `include`   | images, fonts, media, css | Script specifiers treated as assets |
//! | `verbose`   | `false`        | Log every emitted asset                    |

mod error;

pub use error::ConfigError;

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use crate::asset::NamingPolicy;
use crate::cli::{BuildArgs, Cli, Commands};
use crate::log;
use crate::utils::path::normalize_path;

/// Extensions treated as assets when no `include` list is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "svg", "webp", "avif", "ico", "bmp",
    // fonts
    "woff", "woff2", "ttf", "otf", "eot",
    // media
    "mp3", "mp4", "ogg", "wav", "webm",
    // stylesheets
    "css",
];

/// Root configuration structure representing rebase.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RebaseConfig {
    /// Absolute path to the config file, empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Source root for rooted specifiers
    pub root: PathBuf,

    /// Output directory
    pub output: PathBuf,

    /// Subfolder under `output` for all assets
    pub folder: String,

    /// Keep the source file stem in output names
    pub keep_name: bool,

    /// Asset extensions (without the dot) recognised in scripts
    pub include: Vec<String>,

    /// Log every emitted asset
    pub verbose: bool,
}

impl Default for RebaseConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            output: PathBuf::from("dist"),
            folder: String::new(),
            keep_name: false,
            include: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            verbose: false,
        }
    }
}

impl RebaseConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// A missing config file is not an error; defaults are used and paths are
    /// relative to the current directory. Otherwise paths are relative to the
    /// config file's directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = normalize_path(&cwd.join(&cli.config));

        let mut config = if config_path.is_file() {
            let mut config = Self::from_path(&config_path)?;
            config.config_path = config_path.clone();
            config
        } else {
            Self::default()
        };

        let base = if config.config_path.as_os_str().is_empty() {
            cwd.clone()
        } else {
            config_path.parent().map(Path::to_path_buf).unwrap_or(cwd.clone())
        };

        config.normalize(&base);

        match &cli.command {
            Commands::Build { args } => config.apply_build_args(args, &cwd),
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            log!("warning"; "unknown config fields ignored: {}", ignored.join(", "));
        }
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Make `root` and `output` absolute against `base`, and canonicalize
    /// the extension list (lowercase, no leading dot).
    pub fn normalize(&mut self, base: &Path) {
        self.root = normalize_path(&base.join(&self.root));
        self.output = normalize_path(&base.join(&self.output));
        self.folder = self.folder.trim_matches('/').to_string();
        for ext in &mut self.include {
            *ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        }
    }

    /// Apply build arguments from CLI. CLI paths are relative to cwd.
    fn apply_build_args(&mut self, args: &BuildArgs, cwd: &Path) {
        if let Some(output) = &args.output {
            self.output = normalize_path(&cwd.join(output));
        }
        if let Some(root) = &args.root {
            self.root = normalize_path(&cwd.join(root));
        }
        if let Some(folder) = &args.folder {
            self.folder = folder.trim_matches('/').to_string();
        }
        Self::update_option(&mut self.keep_name, args.keep_name.as_ref());
        self.verbose |= args.verbose;
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Reject settings that would place assets outside the output directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for comp in Path::new(&self.folder).components() {
            match comp {
                Component::ParentDir => {
                    return Err(ConfigError::Validation(format!(
                        "folder '{}': parent directory '..' not allowed",
                        self.folder
                    )));
                }
                Component::Prefix(_) | Component::RootDir => {
                    return Err(ConfigError::Validation(format!(
                        "folder '{}': absolute paths not allowed",
                        self.folder
                    )));
                }
                _ => {}
            }
        }

        if let Some(idx) = self.include.iter().position(|e| e.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "include[{idx}]: empty extension"
            )));
        }

        Ok(())
    }

    /// Naming policy selected by `keep_name`.
    pub fn naming(&self) -> NamingPolicy {
        if self.keep_name {
            NamingPolicy::KeepName
        } else {
            NamingPolicy::HashOnly
        }
    }

    /// Set of asset extensions for script scanning.
    pub fn extensions(&self) -> FxHashSet<String> {
        self.include.iter().cloned().collect()
    }

    /// Default config rooted at `root`, writing to `output`. Used by hosts
    /// that embed the engine without a config file.
    pub fn with_dirs(root: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        let mut config = Self {
            root: root.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            ..Self::default()
        };
        let cwd = std::env::current_dir().unwrap_or_default();
        config.normalize(&cwd);
        config
    }
}
