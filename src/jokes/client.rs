use crate::config::ApiConfig;
use crate::jokes::types::PageResult;
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// icanhazdadjoke search API client
#[derive(Clone)]
pub struct JokesClient {
  client: reqwest::Client,
  search_url: Url,
  limit: Option<u32>,
  term: Option<String>,
  strict_status: bool,
}

impl JokesClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut builder = reqwest::Client::builder()
      .default_headers(headers)
      .user_agent(config.user_agent.clone());
    if let Some(secs) = config.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      client,
      search_url: search_url(&config.base_url)?,
      limit: config.limit,
      term: config.term.clone(),
      strict_status: config.strict_status,
    })
  }

  /// URL for one page of search results
  pub fn page_url(&self, page: u32) -> Url {
    let mut url = self.search_url.clone();
    {
      let mut query = url.query_pairs_mut();
      if let Some(term) = &self.term {
        query.append_pair("term", term);
      }
      if let Some(limit) = self.limit {
        query.append_pair("limit", &limit.to_string());
      }
      query.append_pair("page", &page.to_string());
    }
    url
  }

  /// Fetch one page of jokes
  pub async fn fetch_page(&self, page: u32) -> Result<PageResult> {
    let url = self.page_url(page);
    debug!(%url, "requesting jokes page");

    let response = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| eyre!("Request failed: {}", e))?;

    let status = response.status().as_u16();
    let body = response
      .text()
      .await
      .map_err(|e| eyre!("Failed to read response body: {}", e))?;

    parse_page(status, &body, self.strict_status)
  }
}

fn search_url(base_url: &str) -> Result<Url> {
  let raw = format!("{}/search", base_url.trim_end_matches('/'));
  Url::parse(&raw).map_err(|e| eyre!("Invalid API base URL {}: {}", base_url, e))
}

/// Turn an HTTP status and body into a page.
///
/// Outside strict mode the status is ignored entirely: any body that parses
/// as JSON is the result, even an error payload.
fn parse_page(status: u16, body: &str, strict_status: bool) -> Result<PageResult> {
  if strict_status && !(200..300).contains(&status) {
    return Err(eyre!("Unexpected status {}", status));
  }

  let page: PageResult =
    serde_json::from_str(body).map_err(|e| eyre!("Failed to parse jokes page: {}", e))?;

  if strict_status && !page.reports_success() {
    return Err(eyre!(
      "Unexpected status {} in response body",
      page.status.unwrap_or_default()
    ));
  }

  Ok(page)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client(config: ApiConfig) -> JokesClient {
    JokesClient::new(&config).unwrap()
  }

  #[test]
  fn test_page_url_default() {
    let client = client(ApiConfig::default());
    assert_eq!(
      client.page_url(3).as_str(),
      "https://icanhazdadjoke.com/search?page=3"
    );
  }

  #[test]
  fn test_page_url_with_term_and_limit() {
    let client = client(ApiConfig {
      base_url: "http://localhost:8080/".to_string(),
      term: Some("hipster cat".to_string()),
      limit: Some(30),
      ..ApiConfig::default()
    });
    assert_eq!(
      client.page_url(1).as_str(),
      "http://localhost:8080/search?term=hipster+cat&limit=30&page=1"
    );
  }

  #[test]
  fn test_invalid_base_url() {
    let config = ApiConfig {
      base_url: "not a url".to_string(),
      ..ApiConfig::default()
    };
    assert!(JokesClient::new(&config).is_err());
  }

  #[test]
  fn test_parse_page_loose_accepts_error_payload() {
    let page = parse_page(404, r#"{"status": 404, "message": "nope"}"#, false).unwrap();
    assert!(page.results.is_empty());
  }

  #[test]
  fn test_parse_page_malformed_json() {
    let err = parse_page(200, "<html>", false).unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse jokes page"));
  }

  #[test]
  fn test_parse_page_strict_rejects_http_status() {
    let err = parse_page(502, "{}", true).unwrap_err();
    assert_eq!(err.to_string(), "Unexpected status 502");
  }

  #[test]
  fn test_parse_page_strict_rejects_body_status() {
    let err = parse_page(200, r#"{"status": 404}"#, true).unwrap_err();
    assert_eq!(err.to_string(), "Unexpected status 404 in response body");
  }

  /// Serve a single canned HTTP response, returning the request it received.
  async fn serve_once(response: String) -> (String, tokio::task::JoinHandle<String>) {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
      let (mut stream, _) = listener.accept().await.unwrap();
      let mut request = Vec::new();
      let mut buf = [0u8; 1024];
      while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await.unwrap();
        if n == 0 {
          break;
        }
        request.extend_from_slice(&buf[..n]);
      }
      stream.write_all(response.as_bytes()).await.unwrap();
      stream.shutdown().await.unwrap();
      String::from_utf8_lossy(&request).into_owned()
    });
    (base_url, handle)
  }

  fn http_response(status_line: &str, body: &str) -> String {
    format!(
      "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
      status_line,
      body.len(),
      body
    )
  }

  #[tokio::test]
  async fn test_fetch_page_sends_json_request() {
    let body = r#"{"current_page": 2, "total_pages": 3, "previous_page": 1, "next_page": 3, "status": 200, "results": [{"id": "a", "joke": "Hi"}]}"#;
    let (base_url, server) = serve_once(http_response("200 OK", body)).await;
    let client = client(ApiConfig {
      base_url,
      ..ApiConfig::default()
    });

    let page = client.fetch_page(2).await.unwrap();
    assert_eq!(page.current_page, 2);
    assert_eq!(page.results.len(), 1);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /search?page=2 HTTP/1.1\r\n"), "{}", request);
    let request = request.to_lowercase();
    assert!(request.contains("accept: application/json\r\n"), "{}", request);
    assert!(request.contains("user-agent: dadjokes"), "{}", request);
  }

  #[tokio::test]
  async fn test_fetch_page_error_status() {
    let response = http_response("404 Not Found", r#"{"status": 404}"#);

    // Loose mode takes the JSON body as the page
    let (base_url, server) = serve_once(response.clone()).await;
    let loose = client(ApiConfig {
      base_url,
      ..ApiConfig::default()
    });
    let page = loose.fetch_page(2).await.unwrap();
    assert!(page.results.is_empty());
    server.await.unwrap();

    let (base_url, server) = serve_once(response).await;
    let strict = client(ApiConfig {
      base_url,
      strict_status: true,
      ..ApiConfig::default()
    });
    let err = strict.fetch_page(2).await.unwrap_err();
    assert_eq!(err.to_string(), "Unexpected status 404");
    server.await.unwrap();
  }

  #[test]
  fn test_parse_page_strict_success() {
    let body = r#"{"current_page": 2, "total_pages": 4, "status": 200, "results": []}"#;
    let page = parse_page(200, body, true).unwrap();
    assert_eq!(page.current_page, 2);
  }
}
