use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Default)]
#[command(name = "bookshelf")]
#[command(about = "Runs the bookshelf search and favorites service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,

    /// Where favorites are persisted: a local store file or the REST endpoint.
    #[arg(long = "mode", value_enum)]
    pub mode: Option<FavoritesMode>,

    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bookshelf")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FavoritesMode {
    Local,
    #[default]
    Server,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct App {
    port: u16,
}

impl Default for App {
    fn default() -> Self {
        App { port: 8080 }
    }
}

impl App {
    pub fn get_port(&self) -> u16 {
        self.port
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Search {
    pub endpoint: String,
    pub max_results: u32,
    pub print_type: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for Search {
    fn default() -> Self {
        Search {
            endpoint: "https://www.googleapis.com/books/v1/volumes".to_string(),
            max_results: 10,
            print_type: None,
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Favorites {
    pub mode: FavoritesMode,
    /// REST endpoint used in server mode. Defaults to this service's own
    /// `/api/favorites`.
    pub url: Option<String>,
    pub database: String,
    pub store_file: String,
}

impl Default for Favorites {
    fn default() -> Self {
        Favorites {
            mode: FavoritesMode::default(),
            url: None,
            database: "favorites.db".to_string(),
            store_file: "store.json".to_string(),
        }
    }
}

impl Favorites {
    pub fn endpoint_url(&self, port: u16) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("http://127.0.0.1:{}/api/favorites", port),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub app: App,
    pub search: Search,
    pub favorites: Favorites,
}

impl Config {
    /// Loads the config at `path`. A missing file yields the defaults.
    pub fn new(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(path = ?path, "config file not found, using defaults");
            return Ok(Config::default());
        }
        let yaml_str = fs::read_to_string(path)?;
        Config::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        if yaml_with_env.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(mode) = cli.mode {
            self.favorites.mode = mode;
        }
        if let Some(port) = cli.port {
            self.app.port = port;
        }
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find("}") {
                let var_name = &result[actual_start + 2..actual_start + end];

                // ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!("environment variable '{}' not found", var_name);
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}
