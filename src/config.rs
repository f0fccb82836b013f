// Runtime configuration.
//
// Settings are layered: built-in defaults, then a TOML file, then
// `LPIX_*` environment variables, then command-line flags. Credentials
// live here and nowhere else.

use crate::cli::Args;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://lpix.org/api";
pub const DEFAULT_GALLERY: &str = "Default";
pub const MEGABYTE: u64 = 1024 * 1024;
/// Most accounts have a 2 MB limit; boosted accounts can raise it.
pub const DEFAULT_LIMIT_MB: u64 = 2;

/// One configuration layer. Every key is optional so layers can be
/// merged field by field.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct Layer {
    pub username: Option<String>,
    pub password: Option<String>,
    pub limit_mb: Option<u64>,
    pub endpoint: Option<String>,
    pub gallery: Option<String>,
    pub timeout_secs: Option<u64>,
    pub unknown_code_fatal: Option<bool>,
}

impl Layer {
    /// Read a TOML layer from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Build a layer from `LPIX_*` variables. `lookup` is
    /// `std::env::var(..).ok()` outside of tests.
    pub fn from_env<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let limit_mb = match lookup("LPIX_LIMIT_MB") {
            Some(v) => Some(
                v.trim()
                    .parse()
                    .with_context(|| format!("LPIX_LIMIT_MB is not a number: {:?}", v))?,
            ),
            None => None,
        };
        Ok(Layer {
            username: lookup("LPIX_USERNAME"),
            password: lookup("LPIX_PASSWORD"),
            limit_mb,
            endpoint: lookup("LPIX_ENDPOINT"),
            ..Layer::default()
        })
    }

    fn from_args(args: &Args) -> Self {
        Layer {
            username: args.username.clone(),
            limit_mb: args.limit_mb,
            endpoint: args.endpoint.clone(),
            gallery: args.gallery.clone(),
            ..Layer::default()
        }
    }

    /// Overlay `other` on top of `self`.
    fn merge(self, other: Layer) -> Layer {
        Layer {
            username: other.username.or(self.username),
            password: other.password.or(self.password),
            limit_mb: other.limit_mb.or(self.limit_mb),
            endpoint: other.endpoint.or(self.endpoint),
            gallery: other.gallery.or(self.gallery),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            unknown_code_fatal: other.unknown_code_fatal.or(self.unknown_code_fatal),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub username: String,
    pub password: String,
    pub endpoint: String,
    pub gallery: String,
    /// Largest accepted file size, in bytes.
    pub limit_bytes: u64,
    /// `None` leaves requests without a deadline.
    pub timeout: Option<Duration>,
    pub unknown_code_fatal: bool,
}

impl Settings {
    /// Resolve settings for the CLI: config file, process environment,
    /// flags, and an interactive prompt if no password was configured.
    pub fn load(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => Layer::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => {
                    log::debug!("using config file {}", path.display());
                    Layer::from_file(&path)?
                }
                _ => Layer::default(),
            },
        };
        let env = Layer::from_env(|key| std::env::var(key).ok())?;
        let merged = file.merge(env).merge(Layer::from_args(args));
        Self::resolve(merged, crate::ui::prompt_password)
    }

    /// Apply defaults to a merged layer. `prompt` is asked for the
    /// password when none was configured.
    pub fn resolve<P>(layer: Layer, prompt: P) -> Result<Self>
    where
        P: FnOnce(&str) -> Result<String>,
    {
        let username = match layer.username {
            Some(u) if !u.trim().is_empty() => u,
            _ => bail!(
                "No username configured. Set `username` in the config file, \
                 LPIX_USERNAME, or pass --username"
            ),
        };
        let password = match layer.password {
            Some(p) => p,
            None => prompt(&username)?,
        };
        let limit_mb = layer.limit_mb.unwrap_or(DEFAULT_LIMIT_MB);
        if limit_mb == 0 {
            bail!("The upload limit must be at least 1 MB");
        }
        let limit_bytes = match limit_mb.checked_mul(MEGABYTE) {
            Some(bytes) => bytes,
            None => bail!("The upload limit of {} MB is out of range", limit_mb),
        };

        Ok(Settings {
            username,
            password,
            endpoint: layer.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.into()),
            gallery: layer.gallery.unwrap_or_else(|| DEFAULT_GALLERY.into()),
            limit_bytes,
            timeout: layer.timeout_secs.map(Duration::from_secs),
            unknown_code_fatal: layer.unknown_code_fatal.unwrap_or(true),
        })
    }
}

/// `<config dir>/lpix-send/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lpix-send").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_prompt(_: &str) -> Result<String> {
        panic!("password prompt should not be reached")
    }

    #[test]
    fn defaults_apply() {
        let layer = Layer {
            username: Some("cat".into()),
            password: Some("pw".into()),
            ..Layer::default()
        };
        let s = Settings::resolve(layer, no_prompt).unwrap();
        assert_eq!(s.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(s.gallery, "Default");
        assert_eq!(s.limit_bytes, 2 * 1024 * 1024);
        assert!(s.timeout.is_none());
        assert!(s.unknown_code_fatal);
    }

    #[test]
    fn later_layers_win() {
        let file = Layer {
            username: Some("from-file".into()),
            password: Some("pw".into()),
            limit_mb: Some(5),
            gallery: Some("Cats".into()),
            ..Layer::default()
        };
        let vars: HashMap<&str, &str> =
            [("LPIX_USERNAME", "from-env"), ("LPIX_LIMIT_MB", "8")].into_iter().collect();
        let env = Layer::from_env(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        let args = Args { gallery: Some("Dogs".into()), ..Args::default() };

        let merged = file.merge(env).merge(Layer::from_args(&args));
        let s = Settings::resolve(merged, no_prompt).unwrap();
        assert_eq!(s.username, "from-env");
        assert_eq!(s.limit_bytes, 8 * MEGABYTE);
        assert_eq!(s.gallery, "Dogs");
    }

    #[test]
    fn missing_username_is_an_error() {
        assert!(Settings::resolve(Layer::default(), no_prompt).is_err());
    }

    #[test]
    fn missing_password_is_prompted() {
        let layer = Layer { username: Some("cat".into()), ..Layer::default() };
        let s = Settings::resolve(layer, |user| {
            assert_eq!(user, "cat");
            Ok("typed".into())
        })
        .unwrap();
        assert_eq!(s.password, "typed");
    }

    #[test]
    fn zero_limit_rejected() {
        let layer = Layer {
            username: Some("cat".into()),
            password: Some("pw".into()),
            limit_mb: Some(0),
            ..Layer::default()
        };
        assert!(Settings::resolve(layer, no_prompt).is_err());
    }

    #[test]
    fn overflowing_limit_rejected() {
        let layer = Layer {
            username: Some("cat".into()),
            password: Some("pw".into()),
            limit_mb: Some(1 << 44),
            ..Layer::default()
        };
        let err = Settings::resolve(layer, no_prompt).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{}", err);

        let layer = Layer {
            username: Some("cat".into()),
            password: Some("pw".into()),
            limit_mb: Some(u64::MAX / MEGABYTE),
            ..Layer::default()
        };
        assert!(Settings::resolve(layer, no_prompt).is_ok());
    }

    #[test]
    fn bad_env_limit() {
        let err = Layer::from_env(|k| (k == "LPIX_LIMIT_MB").then(|| "two".to_string()));
        assert!(err.is_err());
    }

    #[test]
    fn reads_toml_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            "username = \"cat\"\npassword = \"pw\"\nlimit_mb = 4\ntimeout_secs = 30\nunknown_code_fatal = false"
        )
        .unwrap();
        let layer = Layer::from_file(f.path()).unwrap();
        let s = Settings::resolve(layer, no_prompt).unwrap();
        assert_eq!(s.limit_bytes, 4 * MEGABYTE);
        assert_eq!(s.timeout, Some(Duration::from_secs(30)));
        assert!(!s.unknown_code_fatal);
    }

    #[test]
    fn unknown_keys_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "usernmae = \"cat\"").unwrap();
        assert!(Layer::from_file(f.path()).is_err());
    }
}
