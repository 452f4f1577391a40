//! HTTP server settings consumed by the transport layer.

/// Settings for the HTTP listener and its routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on (0 picks an ephemeral port).
    pub port: u16,
    /// Prefix shared by all routes, e.g. `/api`.
    pub route_prefix: String,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7071,
            route_prefix: "/api".to_string(),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

impl HttpServerConfig {
    /// Returns the `host:port` bind address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Joins the route prefix and an endpoint name into a path.
    ///
    /// ```rust,ignore
    /// assert_eq!(config.route("health"), "/api/health");
    /// ```
    pub fn route(&self, endpoint: &str) -> String {
        let prefix = self.route_prefix.trim_end_matches('/');
        let prefix = if prefix.is_empty() || prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{prefix}")
        };
        format!("{prefix}/{endpoint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_prefix(prefix: &str) -> HttpServerConfig {
        HttpServerConfig {
            route_prefix: prefix.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_route_joining() {
        assert_eq!(with_prefix("/api").route("health"), "/api/health");
        assert_eq!(with_prefix("/api/").route("health"), "/api/health");
        assert_eq!(with_prefix("api").route("health"), "/api/health");
        assert_eq!(with_prefix("").route("health"), "/health");
        assert_eq!(with_prefix("/").route("health"), "/health");
    }

    #[test]
    fn test_addr() {
        let config = HttpServerConfig {
            host: "127.0.0.1".into(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }
}
