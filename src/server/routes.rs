// src/server/routes.rs
// =============================================================================
// Request routing for the HTTP service.
//
// route() only looks at the method and path and returns a status code plus a
// JSON body, so it can be tested without opening a socket.
//
//   GET /status   -> health check for probes and CI
//   GET /info     -> what the docs tooling is built on
//   GET /orphans  -> OrphanReport for the configured site directory
// =============================================================================

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{json, Value};
use tiny_http::Method;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::site::find_orphans;

/// Body of GET /status
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub service_name: String,
    pub version: String,
    pub timestamp: DateTime<Local>,
}

/// Body of GET /info
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub docs_system: String,
    pub cli_library: String,
    pub devops_tools: Vec<String>,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            docs_system: "Jekyll (Markdown source)".to_string(),
            cli_library: "clap".to_string(),
            devops_tools: ["GitHub Actions", "Kubernetes", "Docker"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// A status code and the JSON to send with it
#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    fn ok(body: impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::detail(500, &format!("Failed to serialize response: {}", e)),
        }
    }

    fn detail(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "detail": message }),
        }
    }
}

pub async fn route(method: &Method, url: &str, config: &ServiceConfig) -> Reply {
    // The query string never changes which endpoint we hit
    let path = url.split('?').next().unwrap_or_default();
    debug!(method = %method, path, "handling request");

    if !matches!(path, "/status" | "/info" | "/orphans") {
        return Reply::detail(404, "Not Found");
    }
    if !matches!(method, Method::Get | Method::Head) {
        return Reply::detail(405, "Method Not Allowed");
    }

    match path {
        "/status" => Reply::ok(HealthStatus {
            status: "ok".to_string(),
            service_name: config.service_name.clone(),
            version: config.version.clone(),
            timestamp: Local::now(),
        }),
        "/info" => Reply::ok(ServiceInfo::default()),
        _ => Reply::ok(find_orphans(&config.site_dir, &config.analyzer).await),
    }
}
