//! URL helpers for building dialogue service endpoints.

/// Strip trailing slashes so endpoint paths can be appended safely.
///
/// ```
/// use colloquy::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://dialogue.example.com/"), "https://dialogue.example.com");
/// assert_eq!(normalize_base_url("https://dialogue.example.com"), "https://dialogue.example.com");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path without doubling slashes.
///
/// ```
/// use colloquy::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://dialogue.example.com/", "/state/user/sam-1/interact"),
///     "https://dialogue.example.com/state/user/sam-1/interact"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}
