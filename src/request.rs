/*
 *  request.rs
 *  (c) 2025 Teodor Potancok
 *
 *  This Source Code Form is subject to the terms of the Mozilla Public
 *  License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, InvalidHeaderName, InvalidHeaderValue,
};
use std::collections::HashMap;
use thiserror::Error;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const USER_AGENT: &str = "User-Agent";

pub type Headers = HashMap<String, String>;

/// Builds the JSON body sent to the control agent.
///
/// `command` and `args` are inserted verbatim, `args` being the inside of a
/// JSON object without its braces. Empty service names are skipped and the
/// `service` member is left out when none remain.
pub fn generate_body(command: &str, service: &[String], args: &str) -> String {
    let mut members = vec![format!("\"command\": \"{command}\"")];

    let service = service
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| format!("\"{s}\""))
        .collect::<Vec<_>>();

    if !service.is_empty() {
        members.push(format!("\"service\": [{}]", service.join(",")));
    }

    if !args.is_empty() {
        members.push(format!("\"arguments\": {{ {args} }}"));
    }

    format!("{{ {} }}", members.join(", "))
}

/// Headers that go with `content`. Content-Length is counted in bytes.
pub fn generate_headers(content: &str, version: &str) -> Headers {
    HashMap::from([
        (CONTENT_TYPE.to_string(), "application/json".to_string()),
        (ACCEPT.to_string(), "*/*".to_string()),
        (CONTENT_LENGTH.to_string(), content.len().to_string()),
        (USER_AGENT.to_string(), format!("Kea-shell/{version}")),
    ])
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid header name: {0}")]
    HeaderName(#[from] InvalidHeaderName),
    #[error("Invalid value for header {0}")]
    HeaderValue(String, #[source] InvalidHeaderValue),
}

/// Transport-ready headers, inserted in name order.
pub fn to_header_map(headers: &Headers) -> Result<HeaderMap, RequestError> {
    let mut entries = headers.iter().collect::<Vec<_>>();
    entries.sort();

    let mut map = HeaderMap::with_capacity(entries.len());
    for (name, value) in entries {
        let value = HeaderValue::from_str(value)
            .map_err(|e| RequestError::HeaderValue(name.clone(), e))?;
        map.insert(HeaderName::from_bytes(name.as_bytes())?, value);
    }

    log::debug!("Built {} request headers", map.len());

    Ok(map)
}

/// Parameters of a single command sent to the control agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaRequest {
    pub command: String,
    pub service: Vec<String>,
    pub args: String,
    pub version: String,
}

impl CaRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn with_service(mut self, service: Vec<String>) -> Self {
        self.service = service;
        self
    }

    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = args.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn body(&self) -> String {
        generate_body(&self.command, &self.service, &self.args)
    }

    pub fn headers(&self) -> Headers {
        generate_headers(&self.body(), &self.version)
    }
}
