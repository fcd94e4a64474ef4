//! Runtime configuration.
//!
//! Layered from built-in defaults, then `config.toml` (optional), then
//! `MEDICHANNEL_*` environment variables, e.g. `MEDICHANNEL_DEMO_MODE=true`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  /// Honour client-chosen `demo_role` overrides on the dashboard.
  pub demo_mode:         bool,
  pub session_ttl_hours: u32,
}

impl ServerConfig {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "~/.local/share/medichannel/medichannel.db")?
      .set_default("demo_mode", false)?
      .set_default("session_ttl_hours", 12)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("MEDICHANNEL"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_uses_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/medichannel.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.session_ttl_hours, 12);
    assert!(!cfg.demo_mode);
  }

  #[test]
  fn file_values_override_defaults() {
    let path = std::env::temp_dir().join(format!("medichannel-{}.toml", std::process::id()));
    std::fs::write(&path, "port = 9090\ndemo_mode = true\nstore_path = \":memory:\"\n").unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.port, 9090);
    assert!(cfg.demo_mode);
    assert_eq!(cfg.store_path, PathBuf::from(":memory:"));
    assert_eq!(cfg.address(), "127.0.0.1:9090");
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/db.sqlite")), PathBuf::from(home).join("db.sqlite"));
    assert_eq!(expand_tilde(Path::new("/abs/db.sqlite")), PathBuf::from("/abs/db.sqlite"));
  }
}
