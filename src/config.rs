//! Server configuration file and per-request card options.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{self, ApiVersion};
use crate::card::CardConfig;
use crate::color::{self, Rgba8};
use crate::error::CardError;
use crate::font_storage::FontChoice;

/// Contents of `config.json`. Every field is optional.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
    #[serde(default = "ServerConfig::default_bind_address")]
    pub bind_address: String,
    #[serde(default = "ServerConfig::default_api_base_url")]
    pub api_base_url: String,
    /// Directory scanned for `.ttf`/`.otf` faces at startup.
    #[serde(default = "ServerConfig::default_fonts_dir")]
    pub fonts_dir: PathBuf,
    /// Also load the fonts installed on the host.
    #[serde(default)]
    pub system_fonts: bool,
    #[serde(default = "ServerConfig::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Serve over TLS with the PEM files below.
    #[serde(default)]
    pub use_https: bool,
    #[serde(default)]
    pub cert_path: Option<PathBuf>,
    #[serde(default)]
    pub key_path: Option<PathBuf>,
}

impl ServerConfig {
    fn default_port() -> u16 {
        8005
    }

    fn default_bind_address() -> String {
        "0.0.0.0".to_string()
    }

    fn default_api_base_url() -> String {
        api::DEFAULT_BASE_URL.to_string()
    }

    fn default_fonts_dir() -> PathBuf {
        PathBuf::from("fonts")
    }

    fn default_request_timeout_secs() -> u64 {
        api::DEFAULT_TIMEOUT.as_secs()
    }

    /// Reads the config at `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}; using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }
        if self.use_https {
            self.tls_paths()?;
        }
        Ok(())
    }

    /// Certificate and key paths, both required once `use_https` is set.
    pub fn tls_paths(&self) -> Result<(&Path, &Path)> {
        match (non_empty(&self.cert_path), non_empty(&self.key_path)) {
            (Some(cert), Some(key)) => Ok((cert, key)),
            _ => anyhow::bail!("cert_path and key_path are required when use_https is set"),
        }
    }

    /// `host:port` the server listens on.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: Self::default_port(),
            bind_address: Self::default_bind_address(),
            api_base_url: Self::default_api_base_url(),
            fonts_dir: Self::default_fonts_dir(),
            system_fonts: false,
            request_timeout_secs: Self::default_request_timeout_secs(),
            use_https: false,
            cert_path: None,
            key_path: None,
        }
    }
}

/// Query string of a card request, before validation.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CardQuery {
    pub steamid64: Option<String>,
    pub modname: Option<String>,
    pub text_color: Option<String>,
    pub bg_color: Option<String>,
    pub border_color: Option<String>,
    pub border_width: Option<String>,
    pub corner_radius: Option<String>,
    pub font: Option<String>,
    pub v: Option<String>,
    pub outline: Option<String>,
}

/// Which card a request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardTarget {
    Author { steam_id: String },
    Mod { name: String },
}

impl CardQuery {
    /// `steamid64` wins when both identifiers are present.
    pub fn target(&self) -> Result<CardTarget, CardError> {
        match (&self.steamid64, &self.modname) {
            (Some(steam_id), _) => Ok(CardTarget::Author {
                steam_id: steam_id.clone(),
            }),
            (None, Some(name)) => Ok(CardTarget::Mod { name: name.clone() }),
            (None, None) => Err(CardError::InvalidInput(
                "expected a steamid64 or modname parameter".to_string(),
            )),
        }
    }

    /// Resolves the look of the card. Values that don't parse fall back to
    /// their defaults.
    pub fn card_config(&self) -> CardConfig {
        let defaults = CardConfig::default();

        CardConfig {
            text_color: color_or(&self.text_color, defaults.text_color),
            bg_color: color_or(&self.bg_color, defaults.bg_color),
            border_color: color_or(&self.border_color, defaults.border_color),
            border_width: number_or(&self.border_width, defaults.border_width)
                .min(CardConfig::MAX_BORDER_WIDTH),
            corner_radius: number_or(&self.corner_radius, defaults.corner_radius),
            version: self
                .v
                .as_deref()
                .and_then(ApiVersion::from_name)
                .unwrap_or(defaults.version),
            font: self
                .font
                .as_deref()
                .and_then(FontChoice::from_name)
                .unwrap_or(defaults.font),
            outline: self.outline.as_deref().map_or(defaults.outline, flag),
        }
    }
}

fn non_empty(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|path| !path.as_os_str().is_empty())
}

fn color_or(value: &Option<String>, default: Rgba8) -> Rgba8 {
    value
        .as_deref()
        .and_then(color::parse_hex)
        .unwrap_or(default)
}

fn number_or(value: &Option<String>, default: u32) -> u32 {
    value
        .as_deref()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn query(pairs: &str) -> CardQuery {
        serde_json::from_str(pairs).unwrap()
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.listen_address(), "0.0.0.0:8005");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "port": 9000, "fonts_dir": "/srv/fonts" }}"#).unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.fonts_dir, PathBuf::from("/srv/fonts"));
        assert_eq!(config.request_timeout_secs, 20);
        assert_eq!(config.api_base_url, api::DEFAULT_BASE_URL);
    }

    #[test]
    fn invalid_files_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "port": "eighty" }}"#).unwrap();
        assert!(ServerConfig::load(file.path()).is_err());

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "request_timeout_secs": 0 }}"#).unwrap();
        let err = ServerConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn https_needs_both_pem_files() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "use_https": true, "cert_path": "/etc/card/cert.pem" }}"#).unwrap();
        let err = ServerConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("key_path"));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "use_https": true, "cert_path": "", "key_path": "k.pem" }}"#).unwrap();
        assert!(ServerConfig::load(file.path()).is_err());

        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "use_https": true, "cert_path": "c.pem", "key_path": "k.pem" }}"#
        )
        .unwrap();
        let config = ServerConfig::load(file.path()).unwrap();
        let (cert, key) = config.tls_paths().unwrap();
        assert_eq!((cert, key), (Path::new("c.pem"), Path::new("k.pem")));
    }

    #[test]
    fn paths_are_ignored_without_https() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "cert_path": "c.pem" }}"#).unwrap();
        let config = ServerConfig::load(file.path()).unwrap();
        assert!(!config.use_https);
    }

    #[test]
    fn empty_query_gives_defaults() {
        assert_eq!(CardQuery::default().card_config(), CardConfig::default());
    }

    #[test]
    fn query_overrides_each_option() {
        let config = query(
            r##"{
                "text_color": "ff0000",
                "bg_color": "000000",
                "border_color": "#00ff00",
                "border_width": "7",
                "corner_radius": "0",
                "font": "Sans",
                "v": "1.3",
                "outline": "true"
            }"##,
        )
        .card_config();

        assert_eq!(config.text_color, rgb(255, 0, 0));
        assert_eq!(config.bg_color, rgb(0, 0, 0));
        assert_eq!(config.border_color, rgb(0, 255, 0));
        assert_eq!(config.border_width, 7);
        assert_eq!(config.corner_radius, 0);
        assert_eq!(config.font, FontChoice::Sans);
        assert_eq!(config.version, ApiVersion::V1_3);
        assert!(config.outline);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = query(
            r#"{
                "text_color": "nothex",
                "border_width": "-3",
                "corner_radius": "wide",
                "v": "0.9",
                "outline": "maybe"
            }"#,
        )
        .card_config();

        let defaults = CardConfig::default();
        assert_eq!(config.text_color, defaults.text_color);
        assert_eq!(config.border_width, defaults.border_width);
        assert_eq!(config.corner_radius, defaults.corner_radius);
        assert_eq!(config.version, defaults.version);
        assert!(!config.outline);
    }

    #[test]
    fn border_width_is_capped() {
        let config = query(r#"{ "border_width": "4000000000" }"#).card_config();
        assert_eq!(config.border_width, CardConfig::MAX_BORDER_WIDTH);
    }

    #[test]
    fn target_prefers_author() {
        let both = query(r#"{ "steamid64": "765", "modname": "Magic" }"#);
        assert_eq!(
            both.target().unwrap(),
            CardTarget::Author {
                steam_id: "765".to_string()
            }
        );

        let only_mod = query(r#"{ "modname": "Magic" }"#);
        assert_eq!(
            only_mod.target().unwrap(),
            CardTarget::Mod {
                name: "Magic".to_string()
            }
        );

        assert!(matches!(
            CardQuery::default().target(),
            Err(CardError::InvalidInput(_))
        ));
    }
}
