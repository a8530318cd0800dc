//! Connection settings for the driver.
//!
//! `DriverOptions` deserializes from any serde format with per-field
//! defaults, so a config file only has to name the host.

use serde::{Deserialize, Serialize};

/// Where the server lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverOptions {
    /// Host name without scheme, e.g. `chat.example.com`.
    pub url: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_basepath")]
    pub basepath: String,
    /// Personal access token or session token, sent as a bearer token.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Log every request line at info level instead of debug.
    #[serde(default)]
    pub debug: bool,
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_port() -> u16 {
    8065
}

fn default_basepath() -> String {
    "/api/v4".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl DriverOptions {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            scheme: default_scheme(),
            port: default_port(),
            basepath: default_basepath(),
            token: None,
            timeout_secs: default_timeout_secs(),
            debug: false,
        }
    }

    pub fn scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn basepath(mut self, basepath: &str) -> Self {
        self.basepath = basepath.to_string();
        self
    }

    pub fn token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// `scheme://url:port/basepath` with no trailing slash.
    pub fn base_url(&self) -> String {
        let host = self.url.trim_end_matches('/');
        let basepath = self.basepath.trim_matches('/');
        if basepath.is_empty() {
            format!("{}://{}:{}", self.scheme, host, self.port)
        } else {
            format!("{}://{}:{}/{}", self.scheme, host, self.port, basepath)
        }
    }
}
