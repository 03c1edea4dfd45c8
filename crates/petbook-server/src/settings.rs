//! Server configuration, layered from an optional TOML file and `PETBOOK_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  /// Load from `path` (missing file is fine) with environment overrides,
  /// falling back to built-in defaults for anything left unset.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "petbook.sqlite3")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PETBOOK"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
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
    let cfg = ServerConfig::load(Path::new("/nonexistent/petbook.toml")).unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.store_path, PathBuf::from("petbook.sqlite3"));
  }

  #[test]
  fn file_values_override_defaults() {
    let path = std::env::temp_dir().join("petbook-server-config-test.toml");
    std::fs::write(&path, "port = 9999\nstore_path = \"/var/lib/petbook.db\"\n").unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 9999);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/petbook.db"));

    let _ = std::fs::remove_file(&path);
  }

  #[test]
  fn tilde_is_expanded_only_at_the_start() {
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/pets.db")), PathBuf::from(home).join("pets.db"));
    }
    assert_eq!(expand_tilde(Path::new("/tmp/~/pets.db")), PathBuf::from("/tmp/~/pets.db"));
  }
}
