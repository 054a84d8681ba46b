use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    cache::DEFAULT_CACHE_DIR,
    llm::Provider,
    search::Platform,
    writers::{CommentMode, DEFAULT_CONTEXT_PREFIX, OutputFormat, swift::DEFAULT_SWIFT_FUNCTIONS},
};

pub const CONFIG_FILE_NAME: &str = ".txcontextrc.json";

pub const DEFAULT_OUTPUT_PATH: &str = "translation-context.csv";

pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "**/node_modules/**",
    "**/vendor/**",
    "**/.git/**",
    "**/build/**",
    "**/dist/**",
    "**/Pods/**",
    "**/*.min.js",
    "**/*.test.*",
    "**/*.spec.*",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Translation files to read entries from.
    #[serde(default)]
    pub translations: Vec<String>,
    #[serde(default = "default_source_paths")]
    pub source_paths: Vec<String>,
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,
    #[serde(default = "default_max_matches_per_key")]
    pub max_matches_per_key: usize,
    /// Detected from the source paths when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub write_back: bool,
    #[serde(default)]
    pub write_back_to_code: bool,
    #[serde(default = "default_swift_functions")]
    pub swift_functions: Vec<String>,
    #[serde(default = "default_context_prefix")]
    pub context_prefix: String,
    #[serde(default)]
    pub context_mode: CommentMode,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

fn default_source_paths() -> Vec<String> {
    vec![".".to_string()]
}

fn default_ignore_patterns() -> Vec<String> {
    DEFAULT_IGNORE_PATTERNS.iter().map(|p| p.to_string()).collect()
}

fn default_concurrency() -> usize {
    5
}

fn default_context_lines() -> usize {
    20
}

fn default_max_matches_per_key() -> usize {
    3
}

fn default_output() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_swift_functions() -> Vec<String> {
    DEFAULT_SWIFT_FUNCTIONS.iter().map(|f| f.to_string()).collect()
}

fn default_context_prefix() -> String {
    DEFAULT_CONTEXT_PREFIX.to_string()
}

fn default_cache_dir() -> String {
    DEFAULT_CACHE_DIR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translations: Vec::new(),
            source_paths: default_source_paths(),
            ignore_patterns: default_ignore_patterns(),
            concurrency: default_concurrency(),
            context_lines: default_context_lines(),
            max_matches_per_key: default_max_matches_per_key(),
            platform: None,
            provider: Provider::default(),
            model: None,
            output: default_output(),
            format: OutputFormat::default(),
            write_back: false,
            write_back_to_code: false,
            swift_functions: default_swift_functions(),
            context_prefix: default_context_prefix(),
            context_mode: CommentMode::default(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Rejects invalid ignore globs and zero concurrency or match limits.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignore_patterns {
            Pattern::new(pattern).with_context(|| {
                format!("Invalid glob pattern in 'ignorePatterns': \"{}\"", pattern)
            })?;
        }

        if self.concurrency == 0 {
            bail!("'concurrency' must be at least 1");
        }
        if self.max_matches_per_key == 0 {
            bail!("'maxMatchesPerKey' must be at least 1");
        }

        Ok(())
    }

    pub fn translation_paths(&self) -> Vec<PathBuf> {
        self.translations.iter().map(PathBuf::from).collect()
    }

    pub fn source_path_bufs(&self) -> Vec<PathBuf> {
        self.source_paths.iter().map(PathBuf::from).collect()
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config {
        translations: vec!["ios/MyApp/Resources/en.lproj/Localizable.strings".to_string()],
        ..Default::default()
    };
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the file the config was read from, `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }
}

/// Load `explicit` if given, otherwise search upward from `start_dir`.
///
/// An explicit path that does not exist is an error.
pub fn load_config(start_dir: &Path, explicit: Option<&Path>) -> Result<ConfigLoadResult> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            Some(path.to_path_buf())
        }
        None => find_config_file(start_dir),
    };

    match path {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
