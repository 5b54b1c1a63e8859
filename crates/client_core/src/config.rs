use std::{fs, io, path::Path};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://d8927acef3f1.ngrok-free.app/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const SETTINGS_FILE: &str = "support_client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: Url,
    pub request_timeout_secs: u64,
    pub skip_tunnel_warning: bool,
    pub log_level: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            skip_tunnel_warning: true,
            log_level: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    skip_tunnel_warning: Option<bool>,
    log_level: Option<String>,
}

/// Defaults, then `support_client.toml` in the working directory, then env.
pub fn load_settings() -> anyhow::Result<ClientSettings> {
    load_settings_with(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    let raw = match fs::read_to_string(file) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", file.display()))
        }
    };

    if let Some(raw) = raw {
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", file.display()))?;
        if let Some(v) = file_cfg.base_url {
            settings.base_url = parse_base_url(&v)
                .with_context(|| format!("invalid base_url in '{}'", file.display()))?;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = check_timeout_secs(v)
                .with_context(|| format!("invalid request_timeout_secs in '{}'", file.display()))?;
        }
        if let Some(v) = file_cfg.skip_tunnel_warning {
            settings.skip_tunnel_warning = v;
        }
        if let Some(v) = file_cfg.log_level {
            settings.log_level = Some(v);
        }
    }

    if let Some(v) = env("SUPPORT_BASE_URL") {
        settings.base_url = parse_base_url(&v).context("invalid SUPPORT_BASE_URL")?;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = parse_base_url(&v).context("invalid APP__BASE_URL")?;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs =
            parse_timeout_secs(&v).context("invalid APP__REQUEST_TIMEOUT_SECS")?;
    }

    if let Some(v) = env("APP__LOG_LEVEL") {
        settings.log_level = Some(v);
    }

    Ok(settings)
}

pub fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("'{raw}' is not a valid url"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("unsupported scheme '{}' in '{raw}'", url.scheme());
    }
    Ok(normalize_base_url(url))
}

pub fn parse_timeout_secs(raw: &str) -> anyhow::Result<u64> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("'{raw}' is not a whole number of seconds"))?;
    check_timeout_secs(secs)
}

fn check_timeout_secs(secs: u64) -> anyhow::Result<u64> {
    if secs == 0 {
        anyhow::bail!("request timeout must be at least one second");
    }
    Ok(secs)
}

/// Endpoint paths are joined onto the base, so it must end in a slash.
pub fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_settings_file(label: &str, contents: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("support_client_{label}_{suffix}.toml"));
        fs::write(&path, contents).expect("write settings");
        path
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let settings =
            load_settings_with(Path::new("/nonexistent/support_client.toml"), |_| None)
                .expect("load");
        assert_eq!(settings, ClientSettings::default());
        assert_eq!(settings.base_url.as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn env_overrides_file() {
        let path = temp_settings_file(
            "env_overrides",
            "base_url = \"http://file.example/api\"\nrequest_timeout_secs = 5\nlog_level = \"debug\"\n",
        );
        let env_vars: HashMap<&str, &str> = [("APP__BASE_URL", "http://env.example:8080")].into();

        let settings =
            load_settings_with(&path, |key| env_vars.get(key).map(|v| v.to_string()))
                .expect("load");
        fs::remove_file(&path).expect("cleanup");

        assert_eq!(settings.base_url.as_str(), "http://env.example:8080/");
        assert_eq!(settings.request_timeout_secs, 5);
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn file_base_url_gains_trailing_slash() {
        let path = temp_settings_file("trailing_slash", "base_url = \"http://file.example/api\"\n");
        let settings = load_settings_with(&path, |_| None).expect("load");
        fs::remove_file(&path).expect("cleanup");

        assert_eq!(settings.base_url.as_str(), "http://file.example/api/");
        assert_eq!(
            settings.base_url.join("query").expect("join").as_str(),
            "http://file.example/api/query"
        );
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
        let err = load_settings_with(Path::new("/nonexistent.toml"), |key| {
            (key == "SUPPORT_BASE_URL").then(|| "::".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("SUPPORT_BASE_URL"));
    }

    #[test]
    fn rejects_unparseable_env_timeout() {
        let err = load_settings_with(Path::new("/nonexistent.toml"), |key| {
            (key == "APP__REQUEST_TIMEOUT_SECS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("APP__REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn rejects_zero_timeout_from_env_and_file() {
        let err = load_settings_with(Path::new("/nonexistent.toml"), |key| {
            (key == "APP__REQUEST_TIMEOUT_SECS").then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("APP__REQUEST_TIMEOUT_SECS"));

        let path = temp_settings_file("zero_timeout", "request_timeout_secs = 0\n");
        let result = load_settings_with(&path, |_| None);
        fs::remove_file(&path).expect("cleanup");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn env_timeout_is_trimmed() {
        let settings = load_settings_with(Path::new("/nonexistent.toml"), |key| {
            (key == "APP__REQUEST_TIMEOUT_SECS").then(|| " 12 ".to_string())
        })
        .expect("load");
        assert_eq!(settings.request_timeout_secs, 12);
    }

    #[test]
    fn unreadable_settings_file_is_an_error() {
        // A directory exists but cannot be read as a file.
        let dir = env::temp_dir();
        let err = load_settings_with(&dir, |_| None).unwrap_err();
        assert!(err.to_string().contains("failed to read settings file"));
    }
}
