//! Shared fixtures for tests that need a fake content API.

use crate::upstream::UpstreamClient;
use axum::Router;

/// Two apps, one with a single link object and one with a link array
pub const CATALOG_FIXTURE: &str = r#"{
  "feed": {
    "author": {"name": {"label": "iTunes Store"}},
    "entry": [
      {
        "im:name": {"label": "Test App 1"},
        "im:image": [
          {"label": "https://example.com/app1/53x53.png", "attributes": {"height": "53"}},
          {"label": "https://example.com/app1/75x75.png", "attributes": {"height": "75"}}
        ],
        "summary": {"label": "The first test app"},
        "im:price": {"label": "Get", "attributes": {"amount": "0.00000", "currency": "USD"}},
        "im:contentType": {"attributes": {"term": "Application", "label": "Application"}},
        "rights": {"label": "© 2023 Test Company 1"},
        "title": {"label": "Test App 1 - Test Company 1"},
        "link": {"attributes": {"rel": "alternate", "type": "text/html", "href": "https://example.com/app1"}},
        "id": {"label": "https://example.com/app1", "attributes": {"im:id": "1001", "im:bundleId": "com.test.app1"}},
        "im:artist": {"label": "Test Company 1", "attributes": {"href": "https://example.com/dev1"}},
        "category": {"attributes": {"im:id": "6000", "term": "Business", "scheme": "https://example.com/genre/6000", "label": "Business"}},
        "im:releaseDate": {"label": "2023-01-01T00:00:00-07:00", "attributes": {"label": "January 1, 2023"}}
      },
      {
        "im:name": {"label": "Test App 2"},
        "im:image": [
          {"label": "https://example.com/app2/53x53.png", "attributes": {"height": "53"}}
        ],
        "summary": {"label": "The second test app"},
        "im:price": {"label": "Get", "attributes": {"amount": "0.00000", "currency": "USD"}},
        "rights": {"label": "© 2023 Test Company 2"},
        "title": {"label": "Test App 2 - Test Company 2"},
        "link": [
          {"attributes": {"rel": "alternate", "type": "text/html", "href": "https://example.com/app2"}},
          {"attributes": {"title": "Preview", "rel": "enclosure", "type": "image/jpeg", "href": "https://example.com/app2/preview.jpg", "im:assetType": "preview"}}
        ],
        "id": {"label": "https://example.com/app2", "attributes": {"im:id": "1002", "im:bundleId": "com.test.app2"}},
        "im:artist": {"label": "Test Company 2", "attributes": {"href": "https://example.com/dev2"}},
        "category": {"attributes": {"im:id": "6007", "term": "Productivity", "scheme": "https://example.com/genre/6007", "label": "Productivity"}},
        "im:releaseDate": {"label": "2023-02-02T00:00:00-07:00", "attributes": {"label": "February 2, 2023"}}
      }
    ]
  }
}"#;

/// Serves `router` on an ephemeral local port and returns its base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake upstream");
    let addr = listener.local_addr().expect("Fake upstream has no address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Fake upstream stopped");
    });

    format!("http://{}", addr)
}

/// Client pointed at a fake upstream at `base`, bypassing any system proxy
pub fn test_client(base: &str) -> UpstreamClient {
    let http = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to build test HTTP client");

    UpstreamClient::with_client(http, format!("{}/apps", base), format!("{}/reviews", base))
}

/// One review entry as the upstream emits it
pub fn review_json(id: &str, rating: &str, updated: &str) -> String {
    format!(
        r#"{{"id": {{"label": "{id}"}}, "author": {{"name": {{"label": "User{id}"}}}},
            "content": {{"label": "Review {id}"}}, "im:rating": {{"label": "{rating}"}},
            "updated": {{"label": "{updated}"}}}}"#
    )
}

/// A reviews feed wrapping `entries`
pub fn reviews_feed(entries: &[String]) -> String {
    format!(r#"{{"feed": {{"entry": [{}]}}}}"#, entries.join(","))
}
