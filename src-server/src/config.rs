//! Command-line and environment configuration

use std::path::{Path, PathBuf};

use clap::Parser;

pub const DEFAULT_API_BASE: &str = "https://api.todoist.com/rest/v2";

/// Todoissimus proxy and static file server
#[derive(Debug, Clone, Parser)]
#[command(name = "todoissimus-server", version, about)]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5173)]
    pub port: u16,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Todoist REST API base URL
    #[arg(long, env = "TODOIST_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Server-side API token; overrides any token sent by the browser
    #[arg(long, env = "TODOIST_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory holding the built front-end
    #[arg(long, env = "STATIC_DIR", default_value = "dist")]
    pub static_dir: PathBuf,

    /// Directory for rotated log files
    #[arg(long, env = "LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Do not open a browser at start-up
    #[arg(long, env = "NO_OPEN")]
    pub no_open: bool,

    /// Browser preference; `none` disables opening one
    #[arg(long, env = "BROWSER")]
    pub browser: Option<String>,

    /// PEM certificate chain; together with `--tls-key` enables HTTPS
    #[arg(long, env = "SSL_CERT_PATH")]
    pub tls_cert: Option<PathBuf>,

    /// PEM private key for `--tls-cert`
    #[arg(long, env = "SSL_KEY_PATH")]
    pub tls_key: Option<PathBuf>,

    /// Port for the HTTPS listener
    #[arg(long, env = "HTTPS_PORT", default_value_t = 5443)]
    pub https_port: u16,
}

/// Load `KEY=value` lines from `path`, or from the nearest `.env` when
/// `path` is `None`. Variables already set in the environment win.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

impl Config {
    /// Server token, if one is configured and non-blank
    pub fn server_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn should_open_browser(&self) -> bool {
        if self.no_open {
            return false;
        }
        !matches!(self.browser.as_deref(), Some(b) if b.eq_ignore_ascii_case("none"))
    }

    /// Certificate and key, when both are configured
    pub fn tls_files(&self) -> Option<(&Path, &Path)> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Some((cert.as_path(), key.as_path())),
            _ => None,
        }
    }

    /// URL printed at start-up and opened in the browser
    pub fn local_url(&self) -> String {
        let host = match self.host.as_str() {
            "0.0.0.0" | "::" => "localhost",
            other => other,
        };
        format!("http://{}:{}", host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["todoissimus-server"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&["--port", "8080", "--host", "0.0.0.0", "--static-dir", "public"]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.local_url(), "http://localhost:8080");
    }

    #[test]
    fn test_blank_token_is_not_a_token() {
        let config = parse(&["--token", "   "]);
        assert_eq!(config.server_token(), None);

        let config = parse(&["--token", " abc "]);
        assert_eq!(config.server_token(), Some("abc"));
    }

    #[test]
    fn test_browser_none_disables_open() {
        assert!(!parse(&["--browser", "none"]).should_open_browser());
        assert!(!parse(&["--browser", "NONE"]).should_open_browser());
        assert!(!parse(&["--no-open"]).should_open_browser());
        assert!(parse(&["--browser", "firefox"]).should_open_browser());
    }

    #[test]
    fn test_tls_needs_cert_and_key() {
        let config = parse(&["--tls-cert", "cert.pem"]);
        assert!(config.tls_files().is_none());

        let config = parse(&["--tls-cert", "cert.pem", "--tls-key", "key.pem", "--https-port", "8443"]);
        let (cert, key) = config.tls_files().unwrap();
        assert_eq!(cert, Path::new("cert.pem"));
        assert_eq!(key, Path::new("key.pem"));
        assert_eq!(config.https_port, 8443);
    }

    #[test]
    fn test_env_file_is_loaded() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".env");
        std::fs::write(&path, "TODOISSIMUS_ENV_FILE_CHECK=loaded\n").unwrap();

        assert_eq!(load_env_file(Some(&path)), Some(path.clone()));
        assert_eq!(std::env::var("TODOISSIMUS_ENV_FILE_CHECK").unwrap(), "loaded");
        assert_eq!(load_env_file(Some(&tmp.path().join("missing.env"))), None);
    }
}
