/*
 *  main.rs
 *  (c) 2025 Teodor Potancok
 *
 *  This Source Code Form is subject to the terms of the Mozilla Public
 *  License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::config::{Config, LoadError, ShellConfig};
use crate::request::{CaRequest, RequestError, to_header_map};
use crate::target::{Target, TargetError};
use clap::Parser;
use log::LevelFilter;
use std::io::{IsTerminal, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

mod config;
mod request;
mod target;

#[derive(Parser, Debug)]
#[command(
    name = "kea-shell",
    version,
    disable_version_flag = true,
    arg(
        clap::Arg::new("version")
            .short('v')
            .long("version")
            .action(clap::ArgAction::Version)
            .help("Print version")
    ),
    about = "Sends commands to the Kea control agent",
    after_help = "Command arguments, if any, are read from stdin as the inside of a JSON object."
)]
struct Cli {
    /// Control agent host
    #[arg(long)]
    host: Option<String>,

    /// Control agent port
    #[arg(long)]
    port: Option<u16>,

    /// URL path of the control agent
    #[arg(long)]
    path: Option<String>,

    /// Timeout in seconds when connecting to the control agent
    #[arg(long)]
    timeout: Option<u64>,

    /// Target service(s), comma separated or repeated
    #[arg(short, long, value_delimiter = ',')]
    service: Vec<String>,

    /// TOML file with default connection settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Command to send
    #[arg(default_value = "list-commands")]
    command: String,
}

#[derive(Debug, Error)]
enum ShellError {
    #[error("Failed to load config: {0}")]
    Config(#[from] LoadError),
    #[error("Failed to read arguments from stdin: {0}")]
    Stdin(std::io::Error),
    #[error("Failed to write request: {0}")]
    Stdout(std::io::Error),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Target(#[from] TargetError),
}

fn main() {
    // Setup logger
    let filter =
        LevelFilter::from_str(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned()))
            .unwrap_or(LevelFilter::Info);

    env_logger::Builder::new()
        .filter_level(filter)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                chrono::Local::now().format("%T%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ShellError> {
    let file = match &cli.config {
        Some(path) => {
            log::debug!("Loading config from {}", path.display());
            Config::load(path)?.shell
        }
        None => ShellConfig::default(),
    };

    let args = read_args()?;
    let (target, request) = resolve(cli, file, args);

    log::debug!(
        "Sending '{}' to {} (timeout {:?})",
        request.command,
        target.host_header(),
        target.timeout()
    );

    let rendered = render_request(&target, &request)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(ShellError::Stdout)
}

fn read_args() -> Result<String, ShellError> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }

    let mut args = String::new();
    stdin.read_to_string(&mut args).map_err(ShellError::Stdin)?;

    Ok(args.trim().to_string())
}

/// Flags win over the config file, the config file wins over defaults.
fn resolve(cli: Cli, file: ShellConfig, args: String) -> (Target, CaRequest) {
    let defaults = Target::default();

    let target = Target {
        host: cli.host.or(file.host).unwrap_or(defaults.host),
        port: cli.port.or(file.port).unwrap_or(defaults.port),
        path: cli.path.or(file.path).unwrap_or(defaults.path),
        timeout_secs: cli.timeout.or(file.timeout).unwrap_or(defaults.timeout_secs),
    };

    let service = if cli.service.is_empty() {
        file.service.unwrap_or_default()
    } else {
        cli.service
    };

    let version = file
        .version
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    let request = CaRequest::new(cli.command)
        .with_service(service)
        .with_args(args)
        .with_version(version);

    (target, request)
}

/// The HTTP request as a transport would put it on the wire.
fn render_request(target: &Target, request: &CaRequest) -> Result<String, ShellError> {
    let url = target.url()?;
    let body = request.body();
    let headers = request.headers();

    let headers = to_header_map(&headers)?;

    let mut out = format!("POST {} HTTP/1.1\r\nHost: {}\r\n", url.path(), target.host_header());
    for (name, value) in &headers {
        out.push_str(&format!(
            "{}: {}\r\n",
            name,
            String::from_utf8_lossy(value.as_bytes())
        ));
    }
    out.push_str("\r\n");
    out.push_str(&body);
    out.push('\n');

    Ok(out)
}
