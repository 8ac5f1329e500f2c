//! Common types for fan control operations

/// Fan controller mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanMode {
    /// Duty is set explicitly per fan
    Manual,
    /// The firmware's own thermal curve drives the fans
    Auto,
}

impl std::fmt::Display for FanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FanMode::Manual => write!(f, "manual"),
            FanMode::Auto => write!(f, "auto"),
        }
    }
}

impl std::str::FromStr for FanMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manual" => Ok(FanMode::Manual),
            "auto" => Ok(FanMode::Auto),
            other => Err(format!("unknown fan mode: {other} (expected manual or auto)")),
        }
    }
}

/// Connection settings for one BMC
#[derive(Debug, Clone)]
pub struct BmcConfig {
    /// BMC host or IP; the firmware only serves HTTPS
    pub host: String,
    /// Username
    pub username: String,
    /// Password
    pub password: String,
    /// Skip TLS verification (BMCs ship self-signed certs)
    pub insecure: bool,
}

impl BmcConfig {
    /// Create a new BMC config
    ///
    /// Certificate verification is off by default; see [`with_insecure`]
    /// to turn it back on.
    ///
    /// [`with_insecure`]: BmcConfig::with_insecure
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            insecure: true,
        }
    }

    /// Set whether to accept self-signed certificates
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }
}
