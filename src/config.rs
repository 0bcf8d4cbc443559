use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) api_url: Option<String>,
    #[serde(default)]
    pub(crate) token: Option<String>,
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) sort_children: bool,
    #[serde(default)]
    pub(crate) expand_all: bool,
}

impl Config {
    pub(crate) fn load() -> Self {
        // Try config locations in order of priority
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "loaded config");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/pxstats/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("pxstats").join("config.toml"));
        }

        // 2. Platform config dir, e.g. ~/Library/Application Support/pxstats/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("pxstats").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.pxstats.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".pxstats.toml"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_paths_end_with_home_dotfile() {
        let paths = Config::get_config_paths();
        if dirs::home_dir().is_some() {
            assert!(paths.last().is_some_and(|p| p.ends_with(".pxstats.toml")));
        }
    }

    #[test]
    fn parses_all_keys() {
        let config: Config = toml::from_str(
            r#"
api_url = "https://admin.example.com/api/"
token = "abc"
timeout_secs = 5
timezone = "Asia/Tokyo"
color = "never"
no_color = true
sort_children = true
expand_all = true
"#,
        )
        .unwrap();
        assert_eq!(config.api_url.as_deref(), Some("https://admin.example.com/api/"));
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout_secs, Some(5));
        assert_eq!(config.color, Some(ConfigColorMode::Never));
        assert!(config.no_color && config.sort_children && config.expand_all);
    }

    #[test]
    fn empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.api_url.is_none());
        assert!(!config.expand_all);
    }

    #[test]
    fn unknown_color_is_rejected() {
        assert!(toml::from_str::<Config>(r#"color = "sometimes""#).is_err());
    }
}
