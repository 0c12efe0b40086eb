use axum::{
    extract::{Request, State},
    http::header::HOST,
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, state::AppState};

pub async fn enforce_trusted_hosts(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok());

    if !host_is_trusted(&state.config.trusted_hosts, host) {
        tracing::warn!(host = host.unwrap_or_default(), "Rejected untrusted host");
        return Err(AppError::BadRequest("Invalid host header.".to_string()));
    }
    Ok(next.run(request).await)
}

/// `*` (or an empty list) trusts everything; `*.example.com` trusts subdomains.
fn host_is_trusted(trusted_hosts: &[String], host: Option<&str>) -> bool {
    if trusted_hosts.is_empty() || trusted_hosts.iter().any(|pattern| pattern == "*") {
        return true;
    }
    let Some(hostname) = host.map(strip_port).filter(|value| !value.is_empty()) else {
        return false;
    };
    let hostname = hostname.to_ascii_lowercase();

    trusted_hosts.iter().any(|pattern| {
        let pattern = pattern.trim().to_ascii_lowercase();
        match pattern.strip_prefix("*.") {
            Some(suffix) => hostname.ends_with(&format!(".{suffix}")),
            None => hostname == pattern,
        }
    })
}

fn strip_port(host: &str) -> &str {
    let host = host.trim();
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or_default();
    }
    host.split(':').next().unwrap_or_default()
}
