// src/checker/http.rs
// =============================================================================
// This module checks whether a single URL is reachable.
//
// Key functionality:
// - Validates the URL first (only http:// and https:// are checked)
// - Makes one HTTP HEAD request (lightweight, no body download)
// - Follows redirects, like a browser would
// - Detects the various failure modes (404, timeout, SSL errors, etc.)
//
// This has nothing to do with orphan detection. It backs the `check-url`
// command, which CI jobs use as a quick "is this page up?" gate.
//
// Rust concepts:
// - async/await: For network I/O
// - Enums: To represent different link states
// - Builder pattern: reqwest::Client::builder()
// =============================================================================

use anyhow::{Context, Result};
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "DevEx Docs Validator CLI/1.0";

// Represents the status of a link after checking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "target", rename_all = "snake_case")]
pub enum LinkStatus {
    /// Link is working (2xx)
    Ok,
    /// Link answered with a redirect we didn't follow (3xx)
    Redirect(String), // Holds the redirect target URL
    /// Link is broken (404, 410)
    Broken,
    /// Request timed out
    Timeout,
    /// SSL/TLS certificate error
    SslError,
    /// Too many redirects (redirect loop)
    TooManyRedirects,
    /// Could not resolve hostname
    DnsError,
    /// Anything else: other status codes, refused connections, bad URLs
    Error,
}

// Represents the result of checking one URL
#[derive(Debug, Clone, Serialize)]
pub struct LinkCheckResult {
    /// The URL that was checked
    pub url: String,
    /// The status of the link
    #[serde(flatten)] // This merges the LinkStatus fields into LinkCheckResult
    pub status: LinkStatus,
    /// Optional message with more details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LinkCheckResult {
    /// Returns true for Ok and Redirect statuses
    pub fn is_ok(&self) -> bool {
        matches!(self.status, LinkStatus::Ok | LinkStatus::Redirect(_))
    }

    /// Process exit code for this result: 0 = reachable, 1 = broken or failed
    pub fn exit_code(&self) -> i32 {
        if self.is_ok() {
            0
        } else {
            1
        }
    }
}

// Settings for one check, straight from the command line
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// Checks a single URL
//
// Parameters:
//   url: the URL to check, exactly as the user typed it
//   options: timeout and User-Agent
//
// Returns: Ok(LinkCheckResult) for every outcome of the check itself,
//          including invalid URLs. Err only if the HTTP client can't be built.
pub async fn check_url(url: &str, options: &CheckOptions) -> Result<LinkCheckResult> {
    let parsed = match parse_checkable_url(url) {
        Ok(parsed) => parsed,
        Err(reason) => {
            return Ok(LinkCheckResult {
                url: url.to_string(),
                status: LinkStatus::Error,
                message: Some(reason),
            });
        }
    };

    let client = Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .context("Failed to create HTTP client")?;

    debug!(url = %parsed, timeout = ?options.timeout, "sending HEAD request");

    let result = match client.head(parsed.as_str()).send().await {
        Ok(response) => analyze_response(url.to_string(), &response),
        Err(e) => categorize_error(url.to_string(), e),
    };

    Ok(result)
}

// Makes sure the URL parses and uses a scheme we can check
fn parse_checkable_url(url: &str) -> std::result::Result<Url, String> {
    let parsed = Url::parse(url).map_err(|e| format!("Invalid URL: {}", e))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(format!("Unsupported URL scheme: {}", other)),
    }
}

// Analyzes an HTTP response to determine link status
//
// HTTP status codes:
// - 200-299: Success
// - 300-399: Redirect
// - 400-499: Client error (404 not found, etc.)
// - 500-599: Server error
fn analyze_response(url: String, response: &reqwest::Response) -> LinkCheckResult {
    let status_code = response.status();

    if status_code.is_success() {
        LinkCheckResult {
            url,
            status: LinkStatus::Ok,
            message: Some(format!("HTTP {}", status_code.as_u16())),
        }
    } else if status_code.is_redirection() {
        // Only reached when the server gave us a 3xx without a usable Location,
        // since the client follows real redirects itself
        let redirect_target = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        LinkCheckResult {
            url,
            message: Some(format!(
                "HTTP {} -> {}",
                status_code.as_u16(),
                redirect_target
            )),
            status: LinkStatus::Redirect(redirect_target),
        }
    } else if matches!(status_code, StatusCode::NOT_FOUND | StatusCode::GONE) {
        LinkCheckResult {
            url,
            status: LinkStatus::Broken,
            message: Some(format!("HTTP {}", status_code.as_u16())),
        }
    } else {
        // Other status codes (e.g., 500 server errors)
        LinkCheckResult {
            url,
            status: LinkStatus::Error,
            message: Some(format!("HTTP {}", status_code.as_u16())),
        }
    }
}

// Categorizes different error types from reqwest
fn categorize_error(url: String, error: reqwest::Error) -> LinkCheckResult {
    let error_string = error.to_string().to_lowercase();

    let (status, message) = if error.is_timeout() {
        (LinkStatus::Timeout, "Request timed out".to_string())
    } else if error.is_redirect() {
        (LinkStatus::TooManyRedirects, "Too many redirects".to_string())
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        (LinkStatus::SslError, "SSL certificate error".to_string())
    } else if error.is_connect() {
        // Connection errors often mean DNS issues or host unreachable
        if error_string.contains("dns") {
            (LinkStatus::DnsError, "Could not resolve hostname".to_string())
        } else {
            (LinkStatus::Error, format!("Connection failed ({})", error))
        }
    } else {
        (LinkStatus::Error, error.to_string())
    };

    LinkCheckResult {
        url,
        status,
        message: Some(message),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why HEAD instead of GET?
//    - HEAD asks for the headers only, so no page body is downloaded
//    - The status code is all we need to know if the link works
//
// 2. Why does an invalid URL return Ok(...)?
//    - From the user's point of view, "not a URL" is just another broken link
//    - It gets exit code 1 like any other failure
//    - Err is reserved for problems with our own setup (exit code 2)
//
// 3. What is #[serde(tag = "status", content = "target")]?
//    - It controls how the enum looks in JSON
//    - LinkStatus::Ok becomes {"status": "ok"}
//    - LinkStatus::Redirect(url) becomes {"status": "redirect", "target": url}
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    // Starts a one-shot HTTP server on localhost that answers with `status_line`
    //
    // Returns the URL to hit and a receiver for the raw request it saw.
    async fn serve_once(status_line: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&buf[..n]).to_string());

            let response = format!(
                "{}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                status_line
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        (format!("http://{}/page/", addr), rx)
    }

    #[tokio::test]
    async fn test_reachable_url() {
        let (url, request) = serve_once("HTTP/1.1 200 OK").await;

        let result = check_url(&url, &CheckOptions::default()).await.unwrap();
        assert_eq!(result.status, LinkStatus::Ok);
        assert_eq!(result.exit_code(), 0);

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("head /page/"));
        assert!(request.contains("user-agent: devex docs validator cli/1.0"));
    }

    #[tokio::test]
    async fn test_custom_user_agent() {
        let (url, request) = serve_once("HTTP/1.1 204 No Content").await;
        let options = CheckOptions {
            user_agent: "ci-bot/2".to_string(),
            ..CheckOptions::default()
        };

        let result = check_url(&url, &options).await.unwrap();
        assert!(result.is_ok());
        assert!(request.await.unwrap().to_lowercase().contains("user-agent: ci-bot/2"));
    }

    #[tokio::test]
    async fn test_not_found_is_broken() {
        let (url, _request) = serve_once("HTTP/1.1 404 Not Found").await;

        let result = check_url(&url, &CheckOptions::default()).await.unwrap();
        assert_eq!(result.status, LinkStatus::Broken);
        assert_eq!(result.message.as_deref(), Some("HTTP 404"));
        assert_eq!(result.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_server_error_fails() {
        let (url, _request) = serve_once("HTTP/1.1 500 Internal Server Error").await;

        let result = check_url(&url, &CheckOptions::default()).await.unwrap();
        assert_eq!(result.status, LinkStatus::Error);
        assert_eq!(result.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_refused_connection_fails() {
        // Grab a free port, then close it again so nothing is listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = check_url(&format!("http://{}/", addr), &CheckOptions::default())
            .await
            .unwrap();
        assert!(!result.is_ok());
        assert_eq!(result.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_invalid_url_fails_without_request() {
        let result = check_url("not a url", &CheckOptions::default()).await.unwrap();
        assert_eq!(result.status, LinkStatus::Error);
        assert!(result.message.unwrap().starts_with("Invalid URL"));

        let result = check_url("ftp://example.com/file", &CheckOptions::default())
            .await
            .unwrap();
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn test_link_result_is_ok() {
        let redirect = LinkCheckResult {
            url: "https://example.com".to_string(),
            status: LinkStatus::Redirect("https://example.com/new".to_string()),
            message: None,
        };
        assert!(redirect.is_ok());

        let broken = LinkCheckResult {
            url: "https://example.com".to_string(),
            status: LinkStatus::Broken,
            message: None,
        };
        assert!(!broken.is_ok());
    }

    #[test]
    fn test_result_json_shape() {
        let result = LinkCheckResult {
            url: "https://example.com".to_string(),
            status: LinkStatus::Redirect("https://example.com/new".to_string()),
            message: Some("HTTP 301 -> https://example.com/new".to_string()),
        };
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["status"], "redirect");
        assert_eq!(json["target"], "https://example.com/new");
        assert_eq!(json["url"], "https://example.com");
    }
}
