//! # Search Tools
//!
//! Web search for the research agent. Serper is used when `SERPER_API_KEY`
//! is set; otherwise SearXNG instances are tried in order.

use radkit::macros::tool;
use radkit::tools::ToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const SERPER_URL: &str = "https://google.serper.dev/search";

/// Arguments for web search
#[derive(Deserialize, JsonSchema)]
pub struct SearchWebArgs {
    /// Search query
    pub query: String,
    /// Maximum number of results (default: 5)
    pub max_results: Option<u32>,
}

/// Search the web for information
#[tool(
    description = "Search the web for information. Returns search results with titles, URLs and snippets."
)]
pub async fn search_web(args: SearchWebArgs) -> ToolResult {
    let max_results = args.max_results.unwrap_or(5).max(1) as usize;

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent("revisor-agent/0.1")
        .build()
    {
        Ok(c) => c,
        Err(e) => return ToolResult::error(format!("Failed to create HTTP client: {}", e)),
    };

    if let Ok(api_key) = std::env::var("SERPER_API_KEY") {
        match try_serper(&client, &api_key, &args.query, max_results).await {
            Ok(results) => {
                return ToolResult::success(json!({
                    "query": args.query,
                    "source": "serper",
                    "results": results
                }));
            }
            Err(e) => tracing::warn!("Serper search failed, trying SearXNG: {}", e),
        }
    }

    if let Some(results) = try_searxng(&client, &args.query, max_results).await {
        return ToolResult::success(json!({
            "query": args.query,
            "source": "searxng",
            "results": results
        }));
    }

    ToolResult::success(json!({
        "query": args.query,
        "source": "none",
        "results": [],
        "message": "No search backend available. Set SERPER_API_KEY or SEARXNG_URL."
    }))
}

async fn try_serper(
    client: &reqwest::Client,
    api_key: &str,
    query: &str,
    max_results: usize,
) -> anyhow::Result<Vec<Value>> {
    let response = client
        .post(SERPER_URL)
        .header("X-API-KEY", api_key)
        .json(&json!({ "q": query, "num": max_results }))
        .send()
        .await?
        .error_for_status()?;
    let body: Value = response.json().await?;
    Ok(serper_results(&body, max_results))
}

async fn try_searxng(
    client: &reqwest::Client,
    query: &str,
    max_results: usize,
) -> Option<Vec<Value>> {
    for endpoint in searxng_endpoints() {
        let url = format!("{}?q={}&format=json", endpoint, urlencoding::encode(query));

        if let Ok(response) = client.get(&url).send().await {
            if let Ok(body) = response.json::<Value>().await {
                if let Some(results) = searxng_results(&body, max_results) {
                    return Some(results);
                }
            }
        }
    }

    None
}

/// `SEARXNG_URL` first, then a few public instances, then a local one.
fn searxng_endpoints() -> Vec<String> {
    let mut endpoints = Vec::new();
    if let Ok(custom_url) = std::env::var("SEARXNG_URL") {
        endpoints.push(format!("{}/search", custom_url.trim_end_matches('/')));
    }
    endpoints.extend([
        "https://searx.be/search".to_string(),
        "https://search.sapti.me/search".to_string(),
        "http://localhost:8888/search".to_string(),
    ]);
    endpoints
}

fn text_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn serper_results(body: &Value, max_results: usize) -> Vec<Value> {
    body.get("organic")
        .and_then(|o| o.as_array())
        .map(|items| {
            items
                .iter()
                .take(max_results)
                .map(|r| {
                    json!({
                        "title": text_field(r, "title"),
                        "url": text_field(r, "link"),
                        "snippet": text_field(r, "snippet")
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn searxng_results(body: &Value, max_results: usize) -> Option<Vec<Value>> {
    let results = body.get("results")?.as_array()?;
    Some(
        results
            .iter()
            .take(max_results)
            .map(|r| {
                json!({
                    "title": text_field(r, "title"),
                    "url": text_field(r, "url"),
                    "snippet": text_field(r, "content")
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serper_results_are_normalized() {
        let body = json!({
            "organic": [
                {"title": "A", "link": "https://a.example", "snippet": "first"},
                {"title": "B", "link": "https://b.example"},
                {"title": "C", "link": "https://c.example", "snippet": "third"}
            ]
        });
        let results = serper_results(&body, 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["url"], "https://a.example");
        assert_eq!(results[1]["snippet"], "");
    }

    #[test]
    fn test_serper_without_organic_results() {
        assert!(serper_results(&json!({"answerBox": {}}), 5).is_empty());
    }

    #[test]
    fn test_searxng_results_are_normalized() {
        let body = json!({"results": [{"title": "T", "url": "https://t.example", "content": "c"}]});
        let results = searxng_results(&body, 5).unwrap();
        assert_eq!(results[0]["snippet"], "c");
        assert!(searxng_results(&json!({"error": "rate limited"}), 5).is_none());
    }

    #[test]
    fn test_custom_searxng_endpoint_comes_first() {
        std::env::set_var("SEARXNG_URL", "http://search.internal/");
        let endpoints = searxng_endpoints();
        std::env::remove_var("SEARXNG_URL");
        assert_eq!(endpoints[0], "http://search.internal/search");
        assert!(endpoints.len() > 1);
    }
}
