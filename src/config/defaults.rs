//! Default values for configuration

/// Default backend base URL for local development
pub fn default_api_url() -> String {
    std::env::var("DOCHAT_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string())
}

/// Default request timeout in seconds
pub fn default_request_timeout() -> u64 {
    30
}

/// Default maximum upload size per file (10 MiB)
pub fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
}

/// Default number of prior turns sent as context with a query
pub fn default_history_window() -> usize {
    10
}
