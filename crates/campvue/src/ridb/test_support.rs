use axum::Router;

use super::{RidbClient, RidbConfig};

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

pub fn client_for(base_url: &str) -> RidbClient {
    RidbClient::new(&RidbConfig::new(base_url, "test-key")).unwrap()
}

/// A RIDB-shaped list body
pub fn envelope(records: Vec<serde_json::Value>, total: Option<u64>) -> serde_json::Value {
    let mut body = serde_json::json!({ "RECDATA": records });
    if let Some(total) = total {
        body["METADATA"] = serde_json::json!({ "RESULTS": { "TOTAL_COUNT": total } });
    }
    body
}
