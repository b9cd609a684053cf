/*
 *  config.rs
 *  (c) 2025 Teodor Potancok
 *
 *  This Source Code Form is subject to the terms of the Mozilla Public
 *  License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub timeout: Option<u64>,
    pub service: Option<Vec<String>>,
    pub version: Option<String>,
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub shell: ShellConfig,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Error reading file: {0}")]
    ReadFile(std::io::Error),
    #[error("Error deserializing file: {}", .0.message())]
    Deserialize(toml::de::Error),
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        log::debug!("Reading config file {}", path.display());

        let file = match std::fs::read_to_string(path) {
            Ok(f) => f,
            Err(e) => return Err(LoadError::ReadFile(e)),
        };

        Self::parse(&file)
    }

    pub fn parse(text: &str) -> Result<Self, LoadError> {
        match toml::from_str::<Config>(text) {
            Ok(cfg) => Ok(cfg),
            Err(e) => Err(LoadError::Deserialize(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::parse("").expect("valid config"), Config::default());
    }

    #[test]
    fn load_shell_table() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
[shell]
host = "192.0.2.1"
port = 8001
service = ["dhcp4", "dhcp6"]
"#
        )
        .expect("write config");

        let cfg = Config::load(file.path()).expect("valid config");
        assert_eq!(cfg.shell.host.as_deref(), Some("192.0.2.1"));
        assert_eq!(cfg.shell.port, Some(8001));
        assert_eq!(
            cfg.shell.service,
            Some(vec!["dhcp4".to_string(), "dhcp6".to_string()])
        );
        assert_eq!(cfg.shell.path, None);
        assert_eq!(cfg.shell.timeout, None);
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(matches!(
            Config::parse("[shell]\nhots = \"x\"\n"),
            Err(LoadError::Deserialize(_))
        ));
    }

    #[test]
    fn unknown_table_is_rejected() {
        assert!(matches!(
            Config::parse("[shel]\nhost = \"x\"\n"),
            Err(LoadError::Deserialize(_))
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(matches!(
            Config::load(dir.path().join("missing.toml")),
            Err(LoadError::ReadFile(_))
        ));
    }
}
