//! Configuration loading from `.env` files.

use std::env;

use anyhow::{Context, Result};

use crate::{event::ReferencedId, post::TEXT_NOTE};

/// Composer settings derived from environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Author public key (hex) stamped on composed events.
    pub pubkey: Option<String>,
    /// Kind number for composed events.
    pub kind: u32,
    /// References added to the tag table of every composed note.
    pub default_refs: Vec<ReferencedId>,
}

impl Settings {
    /// Load settings from the specified `.env` file.
    pub fn from_env(path: &str) -> Result<Self> {
        dotenvy::from_filename(path).context("reading env file")?;
        let pubkey = env::var("PUBKEY").ok().filter(|s| !s.is_empty());
        let kind = match env::var("KIND").ok().filter(|s| !s.trim().is_empty()) {
            Some(k) => k
                .trim()
                .parse()
                .with_context(|| format!("invalid KIND: {k}"))?,
            None => TEXT_NOTE,
        };
        let default_refs = csv_strings(env::var("DEFAULT_REFS").unwrap_or_default())
            .iter()
            .map(|s| {
                s.parse::<ReferencedId>()
                    .with_context(|| format!("invalid DEFAULT_REFS entry: {s}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            pubkey,
            kind,
            default_refs,
        })
    }
}

/// Split a comma-separated string into trimmed string values.
pub fn csv_strings(input: impl AsRef<str>) -> Vec<String> {
    let s = input.as_ref();
    s.split(',')
        .filter_map(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs, sync::Mutex};
    use tempfile::tempdir;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 3] = ["PUBKEY", "KIND", "DEFAULT_REFS"];

    fn clear_vars() {
        for v in VARS {
            env::remove_var(v);
        }
    }

    #[test]
    fn loads_env() {
        let _g = ENV_MUTEX.lock().unwrap();
        clear_vars();
        let dir = tempdir().unwrap();
        let env_path = dir.path().join(".env");
        fs::write(
            &env_path,
            concat!(
                "PUBKEY=f7234bd4c1394dda46d09f35bd384dd30cc552ad5541990f98844fb06676e9ca\n",
                "KIND=42\n",
                "DEFAULT_REFS=p:abc,e:ff:wss://relay.example\n",
            ),
        )
        .unwrap();
        let cfg = Settings::from_env(env_path.to_str().unwrap()).unwrap();
        assert_eq!(
            cfg.pubkey.as_deref(),
            Some("f7234bd4c1394dda46d09f35bd384dd30cc552ad5541990f98844fb06676e9ca")
        );
        assert_eq!(cfg.kind, 42);
        assert_eq!(
            cfg.default_refs,
            vec![
                ReferencedId::pubkey("abc"),
                ReferencedId::event("ff").with_relay("wss://relay.example"),
            ]
        );
    }

    #[test]
    fn defaults_when_optional_absent() {
        let _g = ENV_MUTEX.lock().unwrap();
        clear_vars();
        let dir = tempdir().unwrap();
        let env_path = dir.path().join(".env");
        fs::write(&env_path, "PUBKEY=\nKIND=\n").unwrap();
        let cfg = Settings::from_env(env_path.to_str().unwrap()).unwrap();
        assert!(cfg.pubkey.is_none());
        assert_eq!(cfg.kind, TEXT_NOTE);
        assert!(cfg.default_refs.is_empty());
    }

    #[test]
    fn invalid_kind_errors() {
        let _g = ENV_MUTEX.lock().unwrap();
        clear_vars();
        let dir = tempdir().unwrap();
        let env_path = dir.path().join(".env");
        fs::write(&env_path, "KIND=note\n").unwrap();
        assert!(Settings::from_env(env_path.to_str().unwrap()).is_err());
    }

    #[test]
    fn invalid_default_ref_errors() {
        let _g = ENV_MUTEX.lock().unwrap();
        clear_vars();
        let dir = tempdir().unwrap();
        let env_path = dir.path().join(".env");
        fs::write(&env_path, "DEFAULT_REFS=p:abc,nokey\n").unwrap();
        let err = Settings::from_env(env_path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("nokey"));
    }

    #[test]
    fn missing_file_errors() {
        let _g = ENV_MUTEX.lock().unwrap();
        let dir = tempdir().unwrap();
        let env_path = dir.path().join("absent.env");
        assert!(Settings::from_env(env_path.to_str().unwrap()).is_err());
    }

    #[test]
    fn csv_helpers() {
        assert_eq!(csv_strings("a, b , ,c"), vec!["a", "b", "c"]);
        assert!(csv_strings("").is_empty());
    }
}
