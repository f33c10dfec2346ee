use axum::http::{header, HeaderMap};

use checkin_domain::RuntimeConfig;

pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config(token: Option<&str>) -> RuntimeConfig {
        RuntimeConfig {
            api_token: token.map(ToString::to_string),
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn open_when_no_token_configured() {
        assert!(authorize(&config(None), &HeaderMap::new()));
    }

    #[test]
    fn bearer_token_must_match() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer door-42"));
        assert!(authorize(&config(Some("door-42")), &headers));
        assert!(!authorize(&config(Some("other")), &headers));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic door-42"));
        assert!(!authorize(&config(Some("door-42")), &headers));
        assert!(!authorize(&config(Some("door-42")), &HeaderMap::new()));
    }
}
