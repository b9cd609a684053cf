/*
 *  target.rs
 *  (c) 2025 Teodor Potancok
 *
 *  This Source Code Form is subject to the terms of the Mozilla Public
 *  License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_PATH: &str = "/";
pub const DEFAULT_TIMEOUT: u64 = 10;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Invalid control agent URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Location of the control agent a request is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub timeout_secs: u64,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT,
        }
    }
}

impl Target {
    /// `host:port` as it goes in the Host header. IPv6 literals get brackets.
    pub fn host_header(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn url(&self) -> Result<Url, TargetError> {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        let raw = format!("http://{}{}", self.host_header(), path);
        log::debug!("Control agent URL {raw}");

        Url::parse(&raw).map_err(|e| TargetError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
