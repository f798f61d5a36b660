use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Success model artifact; none means heuristics only.
    pub model_path: Option<PathBuf>,
    /// Log a digest of each feature vector.
    pub log_predictions: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            model_path: None,
            log_predictions: false,
        }
    }
}

impl ServiceConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("config file not found at {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("invalid config JSON in {}", path.display()))
    }

    /// `CONFIG_PATH` file (if set), then `HOST`, `PORT`, `MODEL_PATH` and
    /// `LOG_PRED` on top.
    pub fn from_env() -> Result<Self> {
        let mut cfg = match std::env::var_os("CONFIG_PATH") {
            Some(p) => Self::load(Path::new(&p))?,
            None => Self::default(),
        };
        cfg.apply_overrides(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("HOST") {
            self.host = host.parse().with_context(|| format!("HOST={:?} is not an IP address", host))?;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port.parse().with_context(|| format!("PORT={:?} is not a port number", port))?;
        }
        if let Some(path) = lookup("MODEL_PATH").filter(|p| !p.is_empty()) {
            self.model_path = Some(PathBuf::from(path));
        }
        if let Some(flag) = lookup("LOG_PRED") {
            self.log_predictions = flag == "1";
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
