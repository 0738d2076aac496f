//! Shared HTTP plumbing for the external-service clients.

use std::borrow::Cow;
use std::time::Duration;

use reqwest::Client;

const MAX_API_ERROR_CHARS: usize = 200;

/// Connection-pooled client tuned for long-running completion and search
/// calls. Falls back to a default client if the builder is rejected.
pub fn build_service_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

/// Key/token forms these APIs echo back in error bodies.
const SECRET_MARKERS: [&str; 8] = [
    "sk-",
    "Bearer ",
    "bearer ",
    "api_key=",
    "access_token=",
    "\"api_key\":\"",
    "\"access_token\":\"",
    "\"token\":\"",
];

/// Redact secret-looking tokens from service error text.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    if !SECRET_MARKERS.iter().any(|m| input.contains(m)) {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in SECRET_MARKERS {
        let mut from = 0;
        while let Some(rel) = scrubbed[from..].find(marker) {
            let start = from + rel;
            let token_start = start + marker.len();
            let token_len = scrubbed[token_start..]
                .chars()
                .take_while(|c| is_token_char(*c))
                .map(char::len_utf8)
                .sum::<usize>();

            // Bare marker with no token value attached.
            if token_len == 0 {
                from = token_start;
                continue;
            }

            scrubbed.replace_range(start..token_start + token_len, "[REDACTED]");
            from = start + "[REDACTED]".len();
        }
    }

    Cow::Owned(scrubbed)
}

/// Sanitize API error text by scrubbing secrets and truncating length.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);
    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }
    let truncated: String = scrubbed.chars().take(MAX_API_ERROR_CHARS).collect();
    format!("{truncated}...")
}

/// Build a sanitized error from a failed service response.
pub async fn api_error(service: &str, response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());
    anyhow::anyhow!("{service} API error ({status}): {}", sanitize_api_error(&body))
}
