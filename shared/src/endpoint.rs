//! Server URL handling shared by the connect screen and the dashboard.

/// Reduces a user-entered server URL to `scheme://host[:port]`.
/// Paths, fragments and trailing slashes are dropped.
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    let url = url.split('#').next().unwrap_or(url);
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split('/').next().unwrap_or(rest);
            format!("{scheme}://{host}")
        }
        None => url.trim_end_matches('/').to_string(),
    }
}

/// Websocket origin for an HTTP base: `http` maps to `ws`, `https` to `wss`.
/// A bare `host[:port]` is assumed to be plain `ws`.
pub fn ws_origin(base_http: &str) -> String {
    let base = normalize_base_url(base_http);
    if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base
    } else {
        format!("ws://{base}")
    }
}

/// Joins an absolute path onto a base. An empty base keeps the path relative.
pub fn join(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if base.is_empty() {
        format!("/{path}")
    } else {
        format!("{}/{path}", base.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_path_fragment_and_slash() {
        assert_eq!(normalize_base_url(" http://pi.local:3000/dash/#x "), "http://pi.local:3000");
        assert_eq!(normalize_base_url("https://example.org/"), "https://example.org");
        assert_eq!(normalize_base_url("10.0.0.2:3000/"), "10.0.0.2:3000");
    }

    #[test]
    fn ws_origin_follows_tls() {
        assert_eq!(ws_origin("http://localhost:3000"), "ws://localhost:3000");
        assert_eq!(ws_origin("https://example.org/app"), "wss://example.org");
        assert_eq!(ws_origin("wss://example.org"), "wss://example.org");
        assert_eq!(ws_origin("10.0.0.2:3000"), "ws://10.0.0.2:3000");
    }

    #[test]
    fn join_keeps_relative_paths_without_base() {
        assert_eq!(join("", "api/nodes"), "/api/nodes");
        assert_eq!(join("http://h:1/", "/stream?node_id=1"), "http://h:1/stream?node_id=1");
    }
}
