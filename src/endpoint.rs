use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8000;
pub const SHUFFLE_PATH: &str = "/shuffle";

/// Address of the shuffle service. Compiled in; nothing reads it from the
/// environment or the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            path: SHUFFLE_PATH.to_string(),
        }
    }
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn url(&self) -> String {
        if self.path.starts_with('/') {
            format!("http://{}:{}{}", self.host, self.port, self.path)
        } else {
            format!("http://{}:{}/{}", self.host, self.port, self.path)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SenderConfig {
    pub endpoint: Endpoint,
    /// Per-request timeout. `None` leaves it to the HTTP client.
    pub timeout: Option<Duration>,
}

impl SenderConfig {
    pub fn with_endpoint(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
