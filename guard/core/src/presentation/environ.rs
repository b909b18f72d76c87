// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Gateway Request Environment
//!
//! CGI-style description of a synthesized request, as `prequest` builds it.
//! [`GatewayEnviron::into_request`] turns it into an `http::Request` and
//! attaches the environment itself as a request extension, so handlers can
//! tell command-line requests apart (`command_request`).

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

/// Characters left unescaped by [`url_quote`].
const QUOTE_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

pub const DEFAULT_ACCEPT: &str = "text/plain;q=1.0, */*;q=0.1";

/// Percent-encode `value`, leaving unreserved characters and `/` alone.
pub fn url_quote(value: &str) -> String {
    utf8_percent_encode(value, QUOTE_SAFE).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayEnviron {
    pub request_method: Method,
    pub script_name: String,
    pub path_info: String,
    pub server_name: String,
    pub server_port: u16,
    pub server_protocol: String,
    pub content_type: String,
    /// `Some(-1)` marks a body of unknown length
    pub content_length: Option<i64>,
    pub query_string: String,
    pub url_scheme: String,
    pub run_once: bool,
    pub multithread: bool,
    pub multiprocess: bool,
    /// Set on requests synthesized from the command line
    pub command_request: bool,
    /// `HTTP_*` entries
    pub http_headers: BTreeMap<String, String>,
}

impl GatewayEnviron {
    /// Environment of a one-shot command-line request.
    pub fn for_command(
        method: Method,
        path_info: impl Into<String>,
        query_string: impl Into<String>,
    ) -> Self {
        let mut http_headers = BTreeMap::new();
        http_headers.insert("HTTP_ACCEPT".to_string(), DEFAULT_ACCEPT.to_string());
        Self {
            request_method: method,
            script_name: String::new(),
            path_info: path_info.into(),
            server_name: "localhost".to_string(),
            server_port: 80,
            server_protocol: "HTTP/1.0".to_string(),
            content_type: "text/plain".to_string(),
            content_length: None,
            query_string: query_string.into(),
            url_scheme: "http".to_string(),
            run_once: true,
            multithread: false,
            multiprocess: false,
            command_request: true,
            http_headers,
        }
    }

    /// Store a request header under its environment key:
    /// `Content-Type` → `CONTENT_TYPE`, anything else → `HTTP_<NAME>`.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        if name.eq_ignore_ascii_case("content-type") {
            self.content_type = value.into();
        } else {
            self.http_headers.insert(environ_key(name), value.into());
        }
    }

    /// Look up an environment entry by its CGI key.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "REQUEST_METHOD" => self.request_method.to_string(),
            "SCRIPT_NAME" => self.script_name.clone(),
            "PATH_INFO" => self.path_info.clone(),
            "SERVER_NAME" => self.server_name.clone(),
            "SERVER_PORT" => self.server_port.to_string(),
            "SERVER_PROTOCOL" => self.server_protocol.clone(),
            "CONTENT_TYPE" => self.content_type.clone(),
            "CONTENT_LENGTH" => return self.content_length.map(|len| len.to_string()),
            "QUERY_STRING" => self.query_string.clone(),
            "URL_SCHEME" => self.url_scheme.clone(),
            _ => return self.http_headers.get(key).cloned(),
        };
        Some(value)
    }

    /// Request URI: script name and quoted path info, plus the query string.
    pub fn uri(&self) -> String {
        let mut uri = format!("{}{}", url_quote(&self.script_name), url_quote(&self.path_info));
        if uri.is_empty() {
            uri.push('/');
        }
        if !self.query_string.is_empty() {
            uri.push('?');
            uri.push_str(&self.query_string);
        }
        uri
    }

    pub fn into_request(self, body: Body) -> Result<Request<Body>, axum::http::Error> {
        let mut builder = Request::builder()
            .method(self.request_method.clone())
            .uri(self.uri())
            .header(header::HOST, format!("{}:{}", self.server_name, self.server_port))
            .header(header::CONTENT_TYPE, HeaderValue::from_str(&self.content_type)?);

        for (key, value) in &self.http_headers {
            if let Some(name) = key.strip_prefix("HTTP_") {
                let name = name.to_ascii_lowercase().replace('_', "-");
                builder = builder.header(name, HeaderValue::from_str(value)?);
            }
        }

        builder.extension(self).body(body)
    }
}

fn environ_key(name: &str) -> String {
    format!("HTTP_{}", name.trim().to_ascii_uppercase().replace('-', "_"))
}
