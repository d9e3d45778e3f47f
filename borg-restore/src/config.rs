use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use borg_restore_db::{DB_FILE_NAME, SCHEMA_SUBDIR};

fn default_cache_size_mb() -> u32 {
    100
}

/// One `regex → replacement` pair applied to the absolute lookup path.
#[derive(Deserialize, Debug, Clone)]
pub struct RewriteRule {
    pub pattern: String,
    pub replacement: String,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Repository in borg's location syntax; empty defers to $BORG_REPO.
    #[serde(default)]
    pub repository: String,

    /// Override of the cache base directory (default: XDG cache dir).
    #[serde(default)]
    pub cache_base: Option<PathBuf>,

    /// Build each archive's path table in RAM before flushing, instead
    /// of writing through to SQLite. Faster for huge archives, costs
    /// memory proportional to the number of paths.
    #[serde(default)]
    pub prepare_data_in_memory: bool,

    /// SQLite page cache size in MiB.
    #[serde(default = "default_cache_size_mb")]
    pub sqlite_cache_size_mb: u32,

    /// Lookup path rewrites, first matching pattern wins.
    #[serde(default)]
    pub rewrite: Vec<RewriteRule>,

    #[serde(skip, default)]
    compiled_rewrites: Vec<(Regex, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repository: String::new(),
            cache_base: None,
            prepare_data_in_memory: false,
            sqlite_cache_size_mb: default_cache_size_mb(),
            rewrite: Vec::new(),
            compiled_rewrites: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_file(settings_file: &Path) -> Result<Config> {
        let mut config: Config = toml::from_str(
            &read_to_string(settings_file).with_context(|| {
                format!("Couldn't read config file '{}'", settings_file.display())
            })?,
        )
        .with_context(|| format!("Couldn't parse config file '{}'", settings_file.display()))?;
        config.compile_rewrites()?;
        Ok(config)
    }

    fn compile_rewrites(&mut self) -> Result<()> {
        for rule in &self.rewrite {
            let regex = Regex::new(&rule.pattern).with_context(|| {
                format!("Couldn't compile rewrite pattern '{}'", rule.pattern)
            })?;
            self.compiled_rewrites
                .push((regex, rule.replacement.clone()));
        }
        Ok(())
    }

    /// Apply the configured rewrite rules to an absolute path. The first
    /// matching rule substitutes once; later rules are not consulted.
    pub fn apply_rewrites(&self, path: &str) -> String {
        for (regex, replacement) in &self.compiled_rewrites {
            if regex.is_match(path) {
                return regex.replace(path, replacement.as_str()).into_owned();
            }
        }
        path.to_string()
    }

    /// Base directory for the index, `<XDG cache dir>/borg-restore`
    /// unless overridden.
    pub fn cache_base(&self) -> Result<PathBuf> {
        if let Some(base) = &self.cache_base {
            return Ok(base.clone());
        }
        let base = dirs::cache_dir().context("Couldn't determine the user cache directory")?;
        Ok(base.join("borg-restore"))
    }

    /// Path of the index database, `<cache base>/v2/archives.db`.
    pub fn database_path(&self) -> Result<PathBuf> {
        Ok(self
            .cache_base()?
            .join(SCHEMA_SUBDIR)
            .join(DB_FILE_NAME))
    }
}

/// Load the configuration from `$BORG_RESTORE_CONFIG`, falling back to
/// `<XDG config dir>/borg-restore/config.toml`, falling back to defaults.
pub fn load() -> Result<Config> {
    if let Some(path) = std::env::var_os("BORG_RESTORE_CONFIG") {
        return Config::from_file(Path::new(&path));
    }
    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("borg-restore").join("config.toml");
        if path.exists() {
            return Config::from_file(&path);
        }
    }
    Ok(Config::default())
}
