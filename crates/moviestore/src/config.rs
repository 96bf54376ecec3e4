use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Table holding the movie items (default: "Movies")
    pub table_name: String,
    /// Deadline for each store call in milliseconds (default: 5,000)
    pub store_timeout_ms: u64,
    /// Deadline for a whole HTTP request in seconds (default: 10)
    pub request_timeout_secs: u64,
    /// Custom store endpoint, e.g. local DynamoDB at "http://localhost:8000".
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[allow(dead_code)]
    pub aws_endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[allow(dead_code)]
    pub aws_region: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MOVIES_TABLE_NAME` - Table name (default: "Movies")
    /// - `STORE_TIMEOUT_MS` - Per store call deadline (default: 5000)
    /// - `REQUEST_TIMEOUT_SECS` - Per request deadline (default: 10)
    /// - `AWS_ENDPOINT_URL` - Custom store endpoint (optional)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Unparseable numbers fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            table_name: lookup("MOVIES_TABLE_NAME")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "Movies".to_string()),
            store_timeout_ms: lookup("STORE_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            aws_endpoint_url: lookup("AWS_ENDPOINT_URL"),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        }
    }

    /// Get the store call deadline as a Duration.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Get the request deadline as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
