use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use futures_util::StreamExt;
use serde::Serialize;
use std::{
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
    sync::Arc,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};
use tower_http::services::{ServeDir, ServeFile};
use url::Url;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATIC_DIR: &str = "dist";
const DEFAULT_PROXY_REQUEST_TIMEOUT_MS: u64 = 6_000;
const DEFAULT_PROXY_CONNECT_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_PROXY_RESPONSE_MAX_BYTES: usize = 2 * 1024 * 1024;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const PROXY_REQUEST_TIMEOUT_MS_BOUNDS: (u64, u64) = (100, 120_000);
const PROXY_CONNECT_TIMEOUT_MS_BOUNDS: (u64, u64) = (100, 30_000);
const PROXY_RESPONSE_MAX_BYTES_BOUNDS: (usize, usize) = (1_024, 20 * 1024 * 1024);
const USER_AGENT: &str = "blog-front-proxy/1.0";
const REQUEST_ID_HEADER: &str = "x-request-id";
const REQUEST_ID_MAX_LEN: usize = 64;

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

// Variants are ordered by severity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

#[derive(Clone)]
struct HostConfig {
    port: u16,
    static_dir: PathBuf,
    api_upstream: Option<Url>,
    request_timeout: Duration,
    connect_timeout: Duration,
    response_max_bytes: usize,
    log_level: LogLevel,
}

impl HostConfig {
    fn from_env() -> Self {
        let port = parse_env_non_empty_string("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let static_dir = parse_env_non_empty_string("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));
        let api_upstream = parse_env_non_empty_string("BLOG_API_UPSTREAM")
            .and_then(|value| parse_upstream_base(&value));
        let request_timeout_ms = parse_env_u64_with_bounds(
            "PROXY_REQUEST_TIMEOUT_MS",
            DEFAULT_PROXY_REQUEST_TIMEOUT_MS,
            PROXY_REQUEST_TIMEOUT_MS_BOUNDS,
        );
        let connect_timeout_ms = parse_env_u64_with_bounds(
            "PROXY_CONNECT_TIMEOUT_MS",
            DEFAULT_PROXY_CONNECT_TIMEOUT_MS,
            PROXY_CONNECT_TIMEOUT_MS_BOUNDS,
        );
        let response_max_bytes = parse_env_usize_with_bounds(
            "PROXY_RESPONSE_MAX_BYTES",
            DEFAULT_PROXY_RESPONSE_MAX_BYTES,
            PROXY_RESPONSE_MAX_BYTES_BOUNDS,
        );
        let log_level = parse_env_non_empty_string("LOG_LEVEL")
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            port,
            static_dir,
            api_upstream,
            request_timeout: Duration::from_millis(request_timeout_ms),
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            response_max_bytes,
            log_level,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    client: reqwest::Client,
    config: Arc<HostConfig>,
}

#[derive(Serialize)]
struct ProxyErrorPayload {
    ok: bool,
    error: &'static str,
}

impl ProxyErrorPayload {
    fn new(error: &'static str) -> Self {
        Self { ok: false, error }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = HostConfig::from_env();
    let bind_address = format!("0.0.0.0:{}", config.port);
    let client = build_proxy_client(&config)?;

    if config.api_upstream.is_none() {
        log_event(
            &config,
            LogLevel::Info,
            "api_upstream_unset",
            serde_json::json!({ "hint": "set BLOG_API_UPSTREAM to forward /api requests" }),
        );
    }

    let index_file = config.static_dir.join("index.html");
    let static_service = ServeDir::new(&config.static_dir).not_found_service(ServeFile::new(index_file));
    let port = config.port;

    let state = AppState {
        client,
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/api/{*path}", get(proxy_api))
        .fallback_service(static_service)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    println!("server listening on http://127.0.0.1:{port}");
    axum::serve(listener, app).await?;
    Ok(())
}

// One forwarded API call: its id, its clock and the config it logs against.
struct ProxyTrace<'a> {
    config: &'a HostConfig,
    request_id: String,
    started_at: Instant,
}

impl<'a> ProxyTrace<'a> {
    fn begin(config: &'a HostConfig, headers: &HeaderMap) -> Self {
        Self {
            config,
            request_id: resolve_request_id(headers),
            started_at: Instant::now(),
        }
    }

    fn log(&self, level: LogLevel, event: &str, fields: serde_json::Value) {
        let mut fields = fields;
        if let serde_json::Value::Object(map) = &mut fields {
            map.insert("request_id".to_string(), self.request_id.clone().into());
            map.insert(
                "duration_ms".to_string(),
                serde_json::Value::from(self.started_at.elapsed().as_millis() as u64),
            );
        }
        log_event(self.config, level, event, fields);
    }

    fn fail(&self, status: StatusCode, error_class: &str, message: &'static str) -> axum::response::Response {
        self.log(
            LogLevel::Info,
            "api_proxy_failed",
            serde_json::json!({
                "status": status.as_u16(),
                "error_class": error_class,
                "message": message,
            }),
        );

        self.respond(status, HeaderMap::new(), Json(ProxyErrorPayload::new(message)))
    }

    // API answers are never cached by the host, and always echo the id.
    fn respond(
        &self,
        status: StatusCode,
        mut headers: HeaderMap,
        payload: impl IntoResponse,
    ) -> axum::response::Response {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        if let Ok(request_id) = HeaderValue::from_str(&self.request_id) {
            headers.insert(REQUEST_ID_HEADER, request_id);
        }
        (status, headers, payload).into_response()
    }
}

async fn proxy_api(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(path): Path<String>,
) -> axum::response::Response {
    let config = state.config.as_ref();
    let trace = ProxyTrace::begin(config, &headers);

    trace.log(
        LogLevel::Debug,
        "api_proxy_start",
        serde_json::json!({ "method": method.as_str(), "path": uri.path() }),
    );

    let Some(upstream_base) = config.api_upstream.as_ref() else {
        return trace.fail(
            StatusCode::SERVICE_UNAVAILABLE,
            "upstream_unset",
            "api upstream is not configured",
        );
    };

    let target = match build_upstream_url(upstream_base, &path, uri.query()) {
        Ok(target) => target,
        Err(message) => return trace.fail(StatusCode::BAD_REQUEST, "invalid_path", message),
    };

    let mut request = state
        .client
        .get(target.clone())
        .header(REQUEST_ID_HEADER, trace.request_id.as_str());
    if let Some(accept) = headers.get(header::ACCEPT) {
        request = request.header(header::ACCEPT, accept.clone());
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(error) => {
            let error_class = if error.is_timeout() { "timeout" } else { "upstream" };
            return trace.fail(StatusCode::BAD_GATEWAY, error_class, "api upstream unreachable");
        }
    };

    let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = response.headers().get(header::CONTENT_TYPE).cloned();

    let body = match read_limited_body(response, config.response_max_bytes).await {
        Ok(body) => body,
        Err(message) => return trace.fail(StatusCode::BAD_GATEWAY, "body", message),
    };

    trace.log(
        LogLevel::Info,
        "api_proxy_complete",
        serde_json::json!({
            "upstream_path": target.path(),
            "status": status.as_u16(),
            "bytes": body.len(),
        }),
    );

    let mut response_headers = HeaderMap::new();
    if let Some(content_type) = content_type {
        response_headers.insert(header::CONTENT_TYPE, content_type);
    }
    trace.respond(status, response_headers, Body::from(body))
}

fn build_proxy_client(config: &HostConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(USER_AGENT)
        .build()
}

// Keeps a trailing slash so API paths join beneath the base path.
fn parse_upstream_base(value: &str) -> Option<Url> {
    let mut parsed = Url::parse(value.trim()).ok()?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }

    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }
    parsed.set_query(None);
    parsed.set_fragment(None);

    Some(parsed)
}

fn build_upstream_url(base: &Url, path: &str, query: Option<&str>) -> Result<Url, &'static str> {
    let relative = path.trim_start_matches('/');

    if relative.split('/').any(|segment| segment == ".." || segment == ".") {
        return Err("relative path segments are not allowed");
    }

    let mut target = base.join(relative).map_err(|_| "invalid api path")?;
    if !target.as_str().starts_with(base.as_str()) {
        return Err("api path escapes upstream base");
    }

    target.set_query(query.filter(|value| !value.is_empty()));
    Ok(target)
}

const BODY_TOO_LARGE: &str = "upstream body too large";

// A declared length over the cap fails before any byte is read; chunked
// bodies are checked as they stream.
async fn read_limited_body(response: reqwest::Response, max_bytes: usize) -> Result<Vec<u8>, &'static str> {
    let declared = response.content_length();
    if declared.is_some_and(|length| length > max_bytes as u64) {
        return Err(BODY_TOO_LARGE);
    }

    let capacity = declared.map_or(0, |length| length as usize);
    let mut body = Vec::with_capacity(capacity);
    let mut chunks = response.bytes_stream();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(|_| "failed reading upstream body")?;
        if body.len() + chunk.len() > max_bytes {
            return Err(BODY_TOO_LARGE);
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

fn bounded<T: PartialOrd + Copy>(value: Option<T>, default: T, bounds: (T, T)) -> T {
    value
        .filter(|value| *value >= bounds.0 && *value <= bounds.1)
        .unwrap_or(default)
}

fn parse_env_u64_with_bounds(name: &str, default: u64, bounds: (u64, u64)) -> u64 {
    let value = parse_env_non_empty_string(name).and_then(|value| value.parse::<u64>().ok());
    bounded(value, default, bounds)
}

fn parse_env_usize_with_bounds(name: &str, default: usize, bounds: (usize, usize)) -> usize {
    let value = parse_env_non_empty_string(name).and_then(|value| value.parse::<usize>().ok());
    bounded(value, default, bounds)
}

fn parse_env_non_empty_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn unix_time() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

fn generate_request_id() -> String {
    let sequence = REQUEST_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    format!("blog-{:x}-{sequence}", unix_time().as_millis())
}

// Inbound ids are echoed into headers and logs, so only short printable
// ones are trusted.
fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| {
            !value.is_empty()
                && value.len() <= REQUEST_ID_MAX_LEN
                && value.bytes().all(|byte| byte.is_ascii_graphic())
        })
        .map_or_else(generate_request_id, ToString::to_string)
}

fn log_event(config: &HostConfig, level: LogLevel, event: &str, fields: serde_json::Value) {
    if level < config.log_level {
        return;
    }

    let mut line = serde_json::json!({
        "ts": unix_time().as_secs(),
        "level": level.as_str(),
        "event": event,
    });
    if let (serde_json::Value::Object(line), serde_json::Value::Object(fields)) = (&mut line, fields) {
        line.extend(fields);
    }

    println!("{line}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(api_upstream: Option<Url>) -> HostConfig {
        HostConfig {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            api_upstream,
            request_timeout: Duration::from_millis(500),
            connect_timeout: Duration::from_millis(200),
            response_max_bytes: DEFAULT_PROXY_RESPONSE_MAX_BYTES,
            log_level: LogLevel::Info,
        }
    }

    fn test_state(api_upstream: Option<Url>) -> AppState {
        let config = test_config(api_upstream);
        AppState {
            client: build_proxy_client(&config).expect("client builds"),
            config: Arc::new(config),
        }
    }

    #[test]
    fn upstream_base_gains_trailing_slash() {
        let base = parse_upstream_base("http://127.0.0.1:9000/api?x=1").expect("valid base");
        assert_eq!(base.as_str(), "http://127.0.0.1:9000/api/");
        assert!(parse_upstream_base("ftp://example.com/api").is_none());
        assert!(parse_upstream_base("not a url").is_none());
    }

    #[test]
    fn api_paths_join_beneath_base_with_query() {
        let base = parse_upstream_base("http://127.0.0.1:9000/api").expect("valid base");

        let target = build_upstream_url(&base, "blogs", Some("page=2&size=8")).expect("joins");
        assert_eq!(target.as_str(), "http://127.0.0.1:9000/api/blogs?page=2&size=8");

        let nested = build_upstream_url(&base, "/categories/blog-count", Some("")).expect("joins");
        assert_eq!(nested.as_str(), "http://127.0.0.1:9000/api/categories/blog-count");
    }

    #[test]
    fn api_paths_cannot_escape_base() {
        let base = parse_upstream_base("http://127.0.0.1:9000/api/").expect("valid base");

        assert!(build_upstream_url(&base, "../admin", None).is_err());
        assert!(build_upstream_url(&base, "blogs/./x", None).is_err());
        assert!(build_upstream_url(&base, "//evil.example.com/x", None).is_ok_and(|url| url.host_str() == Some("127.0.0.1")));
        assert!(build_upstream_url(&base, "http://evil.example.com/", None).is_err());
    }

    #[test]
    fn bounded_values_fall_back_to_default() {
        assert_eq!(bounded(Some(50), 6_000, PROXY_REQUEST_TIMEOUT_MS_BOUNDS), 6_000);
        assert_eq!(bounded(Some(2_500), 6_000, PROXY_REQUEST_TIMEOUT_MS_BOUNDS), 2_500);
        assert_eq!(bounded(None, 6_000, PROXY_REQUEST_TIMEOUT_MS_BOUNDS), 6_000);
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!(LogLevel::parse(" DEBUG "), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("trace"), None);
        assert!(LogLevel::Debug < LogLevel::Info);
    }

    #[test]
    fn request_id_is_reused_or_generated() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(" abc-123 "));
        assert_eq!(resolve_request_id(&headers), "abc-123");

        let generated = resolve_request_id(&HeaderMap::new());
        assert!(generated.starts_with("blog-"));
        assert_ne!(generated, resolve_request_id(&HeaderMap::new()));
    }

    #[test]
    fn oversized_or_unprintable_request_ids_are_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(&"x".repeat(65)).expect("valid header"));
        assert!(resolve_request_id(&headers).starts_with("blog-"));

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("has space"));
        assert!(resolve_request_id(&headers).starts_with("blog-"));
    }

    #[tokio::test]
    async fn missing_upstream_answers_service_unavailable() {
        let response = proxy_api(
            State(test_state(None)),
            Method::GET,
            Uri::from_static("/api/announcement"),
            HeaderMap::new(),
            Path("announcement".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );
    }

    #[tokio::test]
    async fn traversal_path_is_rejected_before_forwarding() {
        let upstream = parse_upstream_base("http://127.0.0.1:9/api/");
        let response = proxy_api(
            State(test_state(upstream)),
            Method::GET,
            Uri::from_static("/api/x"),
            HeaderMap::new(),
            Path("../secrets".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unreachable_upstream_maps_to_bad_gateway() {
        // Nothing listens on the discard port locally, so the connect fails fast.
        let upstream = parse_upstream_base("http://127.0.0.1:9/api/");
        let response = proxy_api(
            State(test_state(upstream)),
            Method::GET,
            Uri::from_static("/api/announcement"),
            HeaderMap::new(),
            Path("announcement".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
