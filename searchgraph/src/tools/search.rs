//! Tavily web search tool (feature `tavily`).
//!
//! Posts the query to `{base}/search` and returns the results shaped to
//! `{title, url, content, score}`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{search_spec, Tool, ToolCallContent, ToolCategory, ToolSourceError, ToolSpec};
use super::TOOL_TAVILY_SEARCH;

/// Default Tavily API base URL.
pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";

/// Default number of results per query.
pub const DEFAULT_MAX_RESULTS: u32 = 4;

/// Fields kept from each Tavily result.
const RESULT_FIELDS: [&str; 4] = ["title", "url", "content", "score"];

/// Web search tool backed by the Tavily search API.
///
/// Wraps reqwest::Client and exposes `POST {base}/search` as the
/// `tavily_search_results_json` tool. The result is a JSON array of
/// `{title, url, content, score}` objects.
///
/// # Examples
///
/// ```no_run
/// use searchgraph::tools::{TavilySearchTool, Tool};
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() {
/// let tool = TavilySearchTool::new("tvly-...");
/// let result = tool.call(json!({ "query": "weather in Paris" })).await.unwrap();
/// assert!(result.structured.is_some());
/// # }
/// ```
///
/// # Interaction
///
/// - **reqwest::Client**: Performs the HTTP POST
/// - **ToolRegistry**: Registers this tool by name "tavily_search_results_json"
/// - **ToolSourceError**: Maps HTTP and decode errors to tool error types
pub struct TavilySearchTool {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<Value>,
}

impl TavilySearchTool {
    /// Creates a tool with a default HTTP client and the public API base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_key)
    }

    /// Creates a tool with a custom HTTP client (timeouts, proxies, etc.).
    pub fn with_client(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Overrides the API base URL (trailing slash trimmed).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    fn request_body(&self, query: &str) -> Value {
        json!({
            "query": query,
            "max_results": self.max_results,
            "search_depth": "advanced",
            "include_answer": false,
            "include_raw_content": false,
            "include_images": false,
        })
    }
}

/// Keeps only the result fields the model and the URL extractor need.
fn shape_results(results: Vec<Value>) -> Value {
    Value::Array(
        results
            .into_iter()
            .map(|r| match r {
                Value::Object(map) => {
                    let kept: Map<String, Value> = map
                        .into_iter()
                        .filter(|(k, _)| RESULT_FIELDS.contains(&k.as_str()))
                        .collect();
                    Value::Object(kept)
                }
                other => other,
            })
            .collect(),
    )
}

#[async_trait]
impl Tool for TavilySearchTool {
    fn name(&self) -> &str {
        TOOL_TAVILY_SEARCH
    }

    fn spec(&self) -> ToolSpec {
        search_spec()
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Search
    }

    /// Runs one search for `args.query`.
    ///
    /// # Errors
    ///
    /// - Missing or non-string "query" (InvalidInput)
    /// - Request failure, non-success status or undecodable body (Transport)
    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing query".to_string()))?;

        tracing::debug!(query, max_results = self.max_results, "tavily search");
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(query))
            .send()
            .await
            .map_err(|e| ToolSourceError::Transport(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ToolSourceError::Transport(format!(
                "request failed with status: {}",
                response.status()
            )));
        }

        let body: TavilyResponse = response
            .json()
            .await
            .map_err(|e| ToolSourceError::Transport(format!("failed to read response: {}", e)))?;

        Ok(ToolCallContent::json(shape_results(body.results)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Builder options land in the request body; base URL loses its trailing slash.
    #[test]
    fn builder_and_request_body() {
        let tool = TavilySearchTool::new("k")
            .with_base_url("http://localhost:9/")
            .with_max_results(2);
        assert_eq!(tool.base_url, "http://localhost:9");
        let body = tool.request_body("paris");
        assert_eq!(body["query"], "paris");
        assert_eq!(body["max_results"], 2);
    }

    /// **Scenario**: shape_results keeps title/url/content/score and leaves non-objects alone.
    #[test]
    fn shape_results_keeps_known_fields() {
        let shaped = shape_results(vec![
            json!({"title": "t", "url": "https://a", "content": "c", "score": 0.9, "raw_content": "x"}),
            json!("stray"),
        ]);
        assert_eq!(
            shaped,
            json!([
                {"title": "t", "url": "https://a", "content": "c", "score": 0.9},
                "stray"
            ])
        );
    }

    /// **Scenario**: Missing query fails before any network call.
    #[tokio::test]
    async fn call_without_query_is_invalid_input() {
        let tool = TavilySearchTool::new("k").with_base_url("http://127.0.0.1:1");
        let err = tool.call(json!({"q": "x"})).await.unwrap_err();
        assert!(matches!(err, ToolSourceError::InvalidInput(_)));
    }

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one HTTP request with `status` and a JSON `body`; yields the raw request text.
    async fn serve_once(status: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let length = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            let (k, v) = l.split_once(':')?;
                            k.eq_ignore_ascii_case("content-length")
                                .then(|| v.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + length {
                        break;
                    }
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (base, handle)
    }

    /// **Scenario**: A 200 response is decoded and shaped; the request carries path, auth and query.
    #[tokio::test]
    async fn call_decodes_and_shapes_results() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"query":"paris","results":[{"title":"Paris","url":"https://w.example/paris","content":"sunny","score":0.8,"raw_content":null}]}"#,
        )
        .await;
        let tool = TavilySearchTool::new("tvly-test")
            .with_base_url(base)
            .with_max_results(3);

        let out = tool.call(json!({"query": "paris weather"})).await.unwrap();
        assert_eq!(
            out.structured,
            Some(json!([
                {"title": "Paris", "url": "https://w.example/paris", "content": "sunny", "score": 0.8}
            ]))
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /search "));
        assert!(request
            .to_ascii_lowercase()
            .contains("authorization: bearer tvly-test"));
        assert!(request.contains(r#""query":"paris weather""#));
        assert!(request.contains(r#""max_results":3"#));
    }

    /// **Scenario**: A non-success status maps to Transport.
    #[tokio::test]
    async fn call_with_server_error_is_transport() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#).await;
        let tool = TavilySearchTool::new("k").with_base_url(base);

        let err = tool.call(json!({"query": "x"})).await.unwrap_err();
        match err {
            ToolSourceError::Transport(m) => assert!(m.contains("500"), "{}", m),
            other => panic!("expected Transport, got {:?}", other),
        }
        server.await.unwrap();
    }

    /// **Scenario**: Spec and category identify the tool as web search.
    #[test]
    fn spec_and_category() {
        let tool = TavilySearchTool::new("k");
        assert_eq!(tool.spec().name, TOOL_TAVILY_SEARCH);
        assert_eq!(tool.category(), ToolCategory::Search);
    }
}
