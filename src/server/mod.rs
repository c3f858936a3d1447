// src/server/mod.rs
// =============================================================================
// A small HTTP service in front of the orphan analyzer.
//
// tiny_http is blocking, so main.rs runs serve() on a blocking thread and
// hands it the runtime handle. Each request is routed on that thread and the
// async analyzer is driven with Handle::block_on. Requests are handled one at
// a time, which is plenty for health checks and the occasional report.
// =============================================================================

mod routes;

use anyhow::{anyhow, Result};
use tiny_http::{Header, Request, Response, Server};
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::config::ServiceConfig;

// Binds `addr` and answers requests until the process is stopped
pub fn serve(addr: &str, config: ServiceConfig, runtime: Handle) -> Result<()> {
    let server = Server::http(addr).map_err(|e| anyhow!("Failed to bind {}: {}", addr, e))?;

    info!(
        addr,
        site_dir = %config.site_dir.display(),
        version = %config.version,
        "serving"
    );

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &config, &runtime) {
            warn!(error = %e, "request failed");
        }
    }

    Ok(())
}

fn handle_request(request: Request, config: &ServiceConfig, runtime: &Handle) -> Result<()> {
    let reply = runtime.block_on(routes::route(request.method(), request.url(), config));

    let body = serde_json::to_vec(&reply.body)?;
    let content_type = Header::from_bytes("Content-Type", "application/json")
        .map_err(|_| anyhow!("invalid Content-Type header"))?;

    let response = Response::from_data(body)
        .with_status_code(reply.status)
        .with_header(content_type);

    request.respond(response)?;
    Ok(())
}
