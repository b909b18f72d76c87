// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `prequest`: run a request for the described application
//!
//! Makes an artificial request to an application defined in a YAML config
//! file. `prequest config.yaml /path` requests `/path`;
//! `prequest config.yaml /path --method=post < data` POSTs the given body.
//!
//! Relative paths are interpreted as relative to `/`. The request carries a
//! `GatewayEnviron` extension with `command_request` set, so the application
//! can tell these calls from normal requests. Extra trailing arguments are
//! folded into the query string.

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::Method;
use axum::Router;
use clap::{Parser, ValueEnum};
use std::fmt::Display;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tower::ServiceExt;
use tracing::{debug, info};

use aegis_guard::domain::app_config::{AppConfigError, DEFAULT_APP_NAME};
use aegis_guard::presentation::{load_app, url_quote, GatewayEnviron};

/// Exit status for usage errors.
pub const EXIT_USAGE: u8 = 2;

/// Builds the application named in the config file.
pub type AppLoader = fn(&Path, &str) -> Result<Router, AppConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RequestMethod {
    Get,
    Head,
    Post,
    Delete,
}

impl From<RequestMethod> for Method {
    fn from(method: RequestMethod) -> Self {
        match method {
            RequestMethod::Get => Method::GET,
            RequestMethod::Head => Method::HEAD,
            RequestMethod::Post => Method::POST,
            RequestMethod::Delete => Method::DELETE,
        }
    }
}

/// Run a request for the described application
#[derive(Parser, Debug, Clone)]
#[command(name = "prequest")]
#[command(version, about, long_about = None)]
#[command(override_usage = "prequest config_file path_info [args/options]")]
pub struct PRequestArgs {
    /// Configuration file defining the application
    #[arg(value_name = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Path to request; relative paths are taken relative to "/"
    #[arg(value_name = "PATH_INFO")]
    pub path_info: Option<String>,

    /// `key=value` pairs or bare tokens added to the query string
    #[arg(value_name = "ARGS")]
    pub query_args: Vec<String>,

    /// Load the named application from the config file
    #[arg(short = 'n', long = "app-name", value_name = "NAME", default_value = DEFAULT_APP_NAME)]
    pub app_name: String,

    /// Header to add to request (you can use this option multiple times)
    #[arg(long = "header", value_name = "NAME:VALUE")]
    pub headers: Vec<String>,

    /// Display status and headers before the response body
    #[arg(short = 'd', long = "display-headers")]
    pub display_headers: bool,

    /// Request method type
    #[arg(short = 'm', long, value_enum, ignore_case = true)]
    pub method: Option<RequestMethod>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PREQUEST_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

pub struct PRequestCommand {
    args: PRequestArgs,
    quiet: bool,
    stdin: Box<dyn Read + Send>,
    loader: AppLoader,
}

impl PRequestCommand {
    pub fn new(args: PRequestArgs) -> Self {
        Self {
            args,
            quiet: false,
            stdin: Box::new(std::io::stdin()),
            loader: default_loader,
        }
    }

    /// Parse an argv (program name first).
    pub fn from_argv<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::new(PRequestArgs::try_parse_from(argv)?))
    }

    /// Suppress all output.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Read POST bodies from `stdin` instead of the process stdin.
    pub fn with_stdin(mut self, stdin: impl Read + Send + 'static) -> Self {
        self.stdin = Box::new(stdin);
        self
    }

    pub fn with_loader(mut self, loader: AppLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn args(&self) -> &PRequestArgs {
        &self.args
    }

    fn out<W: Write>(&self, writer: &mut W, msg: impl Display) -> Result<()> {
        if !self.quiet {
            writeln!(writer, "{}", msg).context("Failed to write output")?;
        }
        Ok(())
    }

    /// Headers from `--header NAME:VALUE`; `Err` holds the malformed value.
    fn parse_headers(&self) -> Result<Vec<(String, String)>, String> {
        self.args
            .headers
            .iter()
            .map(|item| match item.split_once(':') {
                Some((name, value)) => Ok((name.to_string(), value.trim().to_string())),
                None => Err(item.clone()),
            })
            .collect()
    }

    /// Query string built from the trailing arguments.
    pub fn query_string(&self) -> String {
        self.args
            .query_args
            .iter()
            .map(|item| match item.split_once('=') {
                Some((key, value)) => format!("{}={}", url_quote(key), url_quote(value)),
                None => url_quote(item),
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Run the request and print the response; returns the process exit status.
    pub async fn run<W: Write>(mut self, writer: &mut W) -> Result<u8> {
        let (Some(config_file), Some(path_info)) =
            (self.args.config_file.clone(), self.args.path_info.clone())
        else {
            self.out(writer, "You must provide at least two arguments")?;
            return Ok(EXIT_USAGE);
        };

        let path_info = if path_info.starts_with('/') {
            path_info
        } else {
            format!("/{}", path_info)
        };

        let headers = match self.parse_headers() {
            Ok(headers) => headers,
            Err(item) => {
                self.out(
                    writer,
                    format!(
                        "Bad --header={} option, value must be in the form 'name:value'",
                        item
                    ),
                )?;
                return Ok(EXIT_USAGE);
            }
        };

        let app = (self.loader)(&config_file, &self.args.app_name).with_context(|| {
            format!(
                "Failed to load application '{}' from {:?}",
                self.args.app_name, config_file
            )
        })?;

        let method: Method = self.args.method.unwrap_or(RequestMethod::Get).into();
        let mut environ =
            GatewayEnviron::for_command(method.clone(), path_info, self.query_string());
        for (name, value) in &headers {
            environ.set_header(name, value.as_str());
        }

        let mut body = Vec::new();
        if method == Method::POST {
            self.stdin
                .read_to_end(&mut body)
                .context("Failed to read request body from stdin")?;
            environ.content_length = Some(-1);
        }

        info!("{} {}", environ.request_method, environ.uri());
        debug!("Gateway environment: {:?}", environ);

        let request = environ
            .into_request(Body::from(body))
            .context("Failed to build request")?;
        let response = app.oneshot(request).await?;

        if self.args.display_headers {
            let status = response.status();
            self.out(
                writer,
                format!(
                    "{} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                ),
            )?;
            for (name, value) in response.headers() {
                self.out(
                    writer,
                    format!("{}: {}", name, String::from_utf8_lossy(value.as_bytes())),
                )?;
            }
        }

        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .context("Failed to read response body")?;
        self.out(writer, String::from_utf8_lossy(&body))?;

        Ok(0)
    }
}

fn default_loader(path: &Path, name: &str) -> Result<Router, AppConfigError> {
    load_app(path, name)
}
