use std::time::Duration;

use culler_engine::{ApiFailure, ApiSettings, Credential, PhotosApi, ReqwestPhotosClient};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestPhotosClient {
    ReqwestPhotosClient::new(ApiSettings {
        base_url: format!("{}/v1", server.uri()),
        ..ApiSettings::default()
    })
    .expect("client")
}

fn credential() -> Credential {
    Credential::bearer("secret").unwrap()
}

#[test]
fn blank_tokens_are_not_credentials() {
    assert!(Credential::bearer("").is_none());
    assert!(Credential::bearer("   ").is_none());
    let credential = Credential::bearer("abc").unwrap();
    assert!(!format!("{credential:?}").contains("abc"));
}

#[test]
fn rejects_unparsable_base_url() {
    let err = ReqwestPhotosClient::new(ApiSettings {
        base_url: "not a url".to_string(),
        ..ApiSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, ApiFailure::InvalidUrl);
}

#[tokio::test]
async fn search_posts_photo_filter_and_parses_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/mediaItems:search"))
        .and(header("authorization", "Bearer secret"))
        .and(body_json(json!({
            "pageSize": 50,
            "filters": { "mediaTypeFilter": { "mediaTypes": ["PHOTO"] } },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "mediaItems": [
                { "id": "a", "filename": "20230101_120000.jpg", "baseUrl": "https://lh3/a" },
                { "id": "b", "filename": "IMG_001.jpg", "baseUrl": "https://lh3/b" }
            ],
            "nextPageToken": "next"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .search(&credential(), 50, None)
        .await
        .expect("search ok");
    let ids: Vec<_> = page.media_items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(page.next_page_token.as_deref(), Some("next"));
}

#[tokio::test]
async fn search_forwards_page_token_and_handles_empty_library() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/mediaItems:search"))
        .and(body_json(json!({
            "pageSize": 10,
            "filters": { "mediaTypeFilter": { "mediaTypes": ["PHOTO"] } },
            "pageToken": "tok-2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let page = client_for(&server)
        .search(&credential(), 10, Some("tok-2"))
        .await
        .expect("search ok");
    assert!(page.media_items.is_empty());
    assert_eq!(page.next_page_token, None);
}

#[tokio::test]
async fn unauthorized_and_forbidden_map_to_unauthorized() {
    for status in [401u16, 403] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/mediaItems:search"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .search(&credential(), 50, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiFailure::Unauthorized);
    }
}

#[tokio::test]
async fn get_fetches_detail_with_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/mediaItems/abc"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "filename": "20230101_120000.jpg",
            "baseUrl": "https://lh3/abc",
            "mediaMetadata": {
                "width": "4032",
                "height": "3024",
                "photo": { "cameraMake": "samsung" }
            }
        })))
        .mount(&server)
        .await;

    let item = client_for(&server)
        .get(&credential(), "abc")
        .await
        .expect("get ok");
    assert_eq!(item.camera_make(), Some("samsung"));
    assert_eq!(item.media_metadata.unwrap().width, Some(4032));
}

#[tokio::test]
async fn get_reports_http_status_and_bad_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/mediaItems/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/mediaItems/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get(&credential(), "missing").await.unwrap_err();
    assert_eq!(err.kind, ApiFailure::HttpStatus(404));

    let err = client.get(&credential(), "garbled").await.unwrap_err();
    assert_eq!(err.kind, ApiFailure::Decode);
}

#[tokio::test]
async fn batch_add_posts_album_and_item_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/mediaItems:batchCreate"))
        .and(body_json(json!({
            "albumId": "album-1",
            "mediaItems": [{ "mediaItemId": "abc" }],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .batch_add(&credential(), "album-1", &["abc".to_string()])
        .await
        .expect("batch ok");
    assert_eq!(response, json!({ "ok": true }));
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/mediaItems/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "id": "slow" })),
        )
        .mount(&server)
        .await;

    let client = ReqwestPhotosClient::new(ApiSettings {
        base_url: format!("{}/v1", server.uri()),
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::default()
    })
    .unwrap();
    let err = client.get(&credential(), "slow").await.unwrap_err();
    assert_eq!(err.kind, ApiFailure::Timeout);
}
