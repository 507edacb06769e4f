//! Portfolio configuration.
//!
//! Every field has a default, a config file only needs to name what it changes.

use crate::{calendar::CalendarOptions, nav::NavSettings};
use directories_next::ProjectDirs;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

const DEFAULT_USERNAME: &str = "maximiliancw";
const DEFAULT_API_BASE_URL: &str = "https://api.github.com/";
const DEFAULT_LANGUAGE_COLOR: &str = "#8b949e";

const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#3178c6"),
    ("Python", "#3572A5"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("Shell", "#89e051"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("Java", "#b07219"),
    ("C++", "#f34b7d"),
    ("C", "#555555"),
    ("Ruby", "#701516"),
    ("PHP", "#4F5D95"),
    ("Swift", "#F05138"),
    ("Kotlin", "#A97BFF"),
    ("Vue", "#41b883"),
    ("Jupyter", "#DA5B0B"),
    ("Jupyter Notebook", "#DA5B0B"),
    ("Dockerfile", "#384d54"),
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file `{}`", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Language name to badge colour lookup.
#[derive(PartialEq, Clone, Debug)]
pub struct LanguageColors {
    colors: BTreeMap<String, String>,
    default_color: String,
}

impl LanguageColors {
    pub fn color_of(&self, language: &str) -> &str {
        self.colors.get(language).map(String::as_str).unwrap_or(&self.default_color)
    }

    fn extend(&mut self, colors: BTreeMap<String, String>) {
        self.colors.extend(colors);
    }
}

impl Default for LanguageColors {
    fn default() -> Self {
        let colors =
            LANGUAGE_COLORS.iter().map(|(lang, color)| (lang.to_string(), color.to_string())).collect();
        Self { colors, default_color: DEFAULT_LANGUAGE_COLOR.to_owned() }
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct FolioConfig {
    pub username: String,
    pub api_base_url: Url,
    pub language_colors: LanguageColors,
    pub calendar: CalendarOptions,
    pub nav: NavSettings,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_owned(),
            api_base_url: default_api_base_url(),
            language_colors: Default::default(),
            calendar: Default::default(),
            nav: Default::default(),
        }
    }
}

fn default_api_base_url() -> Url {
    match DEFAULT_API_BASE_URL.parse() {
        Ok(x) => x,
        Err(err) => unreachable!("default API base URL is malformed: {err}"),
    }
}

/// On-disk shape of the config file.
#[derive(Deserialize, Default, Debug)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    username: Option<String>,
    api_base_url: Option<Url>,
    language_colors: BTreeMap<String, String>,
    default_language_color: Option<String>,
    calendar: Option<CalendarOptions>,
    nav: Option<NavSettings>,
}

impl From<ConfigFile> for FolioConfig {
    fn from(file: ConfigFile) -> Self {
        let mut config = FolioConfig::default();
        if let Some(username) = file.username {
            config.username = username;
        }
        if let Some(url) = file.api_base_url {
            config.api_base_url = url;
        }
        config.language_colors.extend(file.language_colors);
        if let Some(color) = file.default_language_color {
            config.language_colors.default_color = color;
        }
        if let Some(calendar) = file.calendar {
            config.calendar = calendar;
        }
        if let Some(nav) = file.nav {
            config.nav = nav;
        }
        config
    }
}

impl FolioConfig {
    pub fn from_toml(s: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(s)
            .map_err(|source| ConfigError::Toml { path: path.to_owned(), source })?;
        Ok(file.into())
    }

    /// Loads the config from `path`, or from the default location when no path is given.
    ///
    /// A missing file at the default location yields the default config.
    #[tracing::instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(x) => x.to_owned(),
            None => match default_config_path() {
                Some(x) if x.exists() => x,
                _ => {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        let s = fs::read_to_string(&path)
            .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
        let config = Self::from_toml(&s, &path)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

/// `<config dir>/folio/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", env!("CARGO_PKG_NAME")).map(|x| x.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_language_colors() {
        let colors = LanguageColors::default();
        assert_eq!(colors.color_of("Rust"), "#dea584");
        assert_eq!(colors.color_of("Jupyter Notebook"), "#DA5B0B");
        assert_eq!(colors.color_of("COBOL"), "#8b949e");
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = FolioConfig::from_toml("", Path::new("config.toml")).unwrap();
        assert_eq!(config, FolioConfig::default());
    }

    #[test]
    fn test_config_overrides() {
        let s = r##"
            username = "kafji"
            api_base_url = "http://localhost:8080/"
            default_language_color = "#000000"

            [language_colors]
            Zig = "#ec915c"
            Rust = "#ffffff"

            [calendar]
            responsive = false
            tooltips = true
            global_stats = true

            [nav]
            mobile_breakpoint = 600.0
        "##;
        let config = FolioConfig::from_toml(s, Path::new("config.toml")).unwrap();
        assert_eq!(config.username, "kafji");
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.language_colors.color_of("Zig"), "#ec915c");
        assert_eq!(config.language_colors.color_of("Rust"), "#ffffff");
        assert_eq!(config.language_colors.color_of("Go"), "#00ADD8");
        assert_eq!(config.language_colors.color_of("COBOL"), "#000000");
        assert!(!config.calendar.responsive);
        assert!(config.calendar.global_stats);
        assert_eq!(config.nav.mobile_breakpoint, 600.0);
        assert_eq!(config.nav.scrolled_threshold, NavSettings::default().scrolled_threshold);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = FolioConfig::from_toml("usernme = \"kafji\"", Path::new("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
        assert_eq!(err.to_string(), "invalid config file `config.toml`");
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "username = \"kafji\"").unwrap();
        let config = FolioConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.username, "kafji");
    }

    #[test]
    fn test_load_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = FolioConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
