//! Runtime configuration.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Runtime server configuration, layered from defaults, an optional TOML
/// file and `DOCKET_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 4000)?
      .set_default("store_path", "~/.local/share/docket/docket.db")?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("DOCKET"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
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
  fn defaults_apply_without_a_file() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/docket.toml")).unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:4000");
    assert!(cfg.store_path.ends_with("docket.db"));
  }

  #[test]
  fn plain_paths_are_untouched() {
    let p = Path::new("/var/lib/docket.db");
    assert_eq!(expand_tilde(p), p);
  }
}
