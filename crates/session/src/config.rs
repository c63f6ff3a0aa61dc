use std::path::{Path, PathBuf};
use std::time::Duration;

use snafu::{ResultExt, Snafu};

/// Default simulated-reply delay.
pub const DEFAULT_REPLY_DELAY_MS: u64 = 2_500;
/// Canned text the simulated counterpart replies with.
pub const DEFAULT_REPLY_TEXT: &str = "This is Gale's reply 😊";
/// Display name for the counterpart participant.
pub const DEFAULT_COUNTERPART_NAME: &str = "John Doe";
/// Character cap for the composer draft.
pub const DEFAULT_MAX_COMPOSER_CHARS: usize = 500;
/// Visible-line cap for the growing composer input.
pub const DEFAULT_MAX_COMPOSER_LINES: usize = 4;

const DEFAULT_CONFIG_RELATIVE_PATH: &str = ".palaver/session.conf";

/// Injectable knobs for one chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub reply_delay: Duration,
    pub reply_text: String,
    pub counterpart_name: String,
    /// Suggested replies offered before the first local send.
    pub quick_options: Vec<String>,
    /// Emoji set offered by the reaction picker.
    pub reaction_palette: Vec<String>,
    pub max_composer_chars: usize,
    pub max_composer_lines: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_millis(DEFAULT_REPLY_DELAY_MS),
            reply_text: DEFAULT_REPLY_TEXT.to_string(),
            counterpart_name: DEFAULT_COUNTERPART_NAME.to_string(),
            quick_options: default_quick_options(),
            reaction_palette: default_reaction_palette(),
            max_composer_chars: DEFAULT_MAX_COMPOSER_CHARS,
            max_composer_lines: DEFAULT_MAX_COMPOSER_LINES,
        }
    }
}

fn default_quick_options() -> Vec<String> {
    ["Sounds good! 👍", "On my way", "Can I call you later?"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_reaction_palette() -> Vec<String> {
    ["👍", "❤️", "😂", "😮", "😢", "👏"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Loads and persists session configuration as a key=value file.
pub struct ConfigStore {
    config: SessionConfig,
    config_path: PathBuf,
}

impl ConfigStore {
    /// Returns the default config file path, relative to the working
    /// directory.
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_RELATIVE_PATH)
    }

    /// Creates a store backed by `config_path`, reading it if present.
    pub fn new(config_path: PathBuf) -> Self {
        let config = Self::load_from_disk(&config_path);
        Self {
            config,
            config_path,
        }
    }

    /// Loads from the default path.
    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Updates the configuration and persists it to disk.
    pub fn update(&mut self, config: SessionConfig) -> ConfigResult<()> {
        self.persist(&config)?;
        self.config = config;
        Ok(())
    }

    fn load_from_disk(path: &Path) -> SessionConfig {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                tracing::info!("config file not found at {:?}, using defaults", path);
                return SessionConfig::default();
            }
        };

        Self::parse_config(&content)
    }

    /// Parses key=value lines, keeping defaults for anything missing or
    /// malformed. List values are pipe-separated.
    fn parse_config(content: &str) -> SessionConfig {
        let mut config = SessionConfig::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                match key {
                    "reply_delay_ms" => {
                        if let Ok(millis) = value.parse() {
                            config.reply_delay = Duration::from_millis(millis);
                        }
                    }
                    "reply_text" => config.reply_text = value.to_string(),
                    "counterpart_name" => config.counterpart_name = value.to_string(),
                    "quick_options" => config.quick_options = parse_list(value),
                    "reaction_palette" => config.reaction_palette = parse_list(value),
                    "max_composer_chars" => {
                        if let Ok(chars) = value.parse() {
                            config.max_composer_chars = chars;
                        }
                    }
                    "max_composer_lines" => {
                        if let Ok(lines) = value.parse() {
                            config.max_composer_lines = lines;
                        }
                    }
                    _ => {}
                }
            }
        }

        config
    }

    fn format_config(config: &SessionConfig) -> String {
        format!(
            "# Palaver session settings\n\
             reply_delay_ms={}\n\
             reply_text={}\n\
             counterpart_name={}\n\
             quick_options={}\n\
             reaction_palette={}\n\
             max_composer_chars={}\n\
             max_composer_lines={}\n",
            config.reply_delay.as_millis(),
            config.reply_text,
            config.counterpart_name,
            format_list(&config.quick_options),
            format_list(&config.reaction_palette),
            config.max_composer_chars,
            config.max_composer_lines,
        )
    }

    fn persist(&self, config: &SessionConfig) -> ConfigResult<()> {
        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).context(CreateConfigDirectorySnafu {
                stage: "create-config-directory",
                path: display_path(parent),
            })?;
        }

        std::fs::write(&self.config_path, Self::format_config(config)).context(
            WriteConfigSnafu {
                stage: "write-config",
                path: display_path(&self.config_path),
            },
        )?;

        tracing::info!("saved session config to {:?}", self.config_path);
        Ok(())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("failed to create config directory at {path}"))]
    CreateConfigDirectory {
        stage: &'static str,
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("failed to write config file to {path}"))]
    WriteConfig {
        stage: &'static str,
        path: String,
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn parse_list(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn format_list(items: &[String]) -> String {
    items.join("|")
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
