//! Integration tests for infrastructure crate
//!
//! Tests cover:
//! - Auth adapter session handling against a mocked auth API
//! - Auth store persistence through the file store
//! - The full locate, search, select and route flow on a headless map

use std::sync::Arc;
use std::time::Duration;

use application::{
    AUTH_STORAGE_KEY, AuthEvent, AuthProviderPort, AuthStore, KeyValueStorePort, LocationService,
    MapAdapter, MapAdapterConfig, MapSurface, PlaceFinder, PositionOptions, SearchOutcome,
};
use domain::{Coordinate, EmailAddress, Password};
use infrastructure::{
    FileKeyValueStore, HeadlessMapSdk, NaverDirectionsAdapter, NaverGeocodingAdapter,
    NaverSearchAdapter, SESSION_STORAGE_KEY, StaticGeolocation, SupabaseAuthAdapter,
};
use integration_naver::NaverConfig;
use integration_supabase::SupabaseConfig;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_ID: &str = "8d0fd2b3-9ca7-4d9e-a95f-9e13dded2e67";

// ============================================================================
// Auth adapter
// ============================================================================

mod auth_adapter_tests {
    use super::*;

    fn session_json(access: &str, expires_at: i64) -> serde_json::Value {
        serde_json::json!({
            "access_token": access,
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": expires_at,
            "refresh_token": format!("refresh-for-{access}"),
            "user": { "id": USER_ID, "email": "foodie@example.com" }
        })
    }

    fn adapter(server: &MockServer, dir: &TempDir) -> (SupabaseAuthAdapter, Arc<FileKeyValueStore>) {
        let store = Arc::new(FileKeyValueStore::new(dir.path()));
        let adapter =
            SupabaseAuthAdapter::new(&SupabaseConfig::for_testing(&server.uri()), store.clone())
                .unwrap();
        (adapter, store)
    }

    fn email() -> EmailAddress {
        EmailAddress::new("foodie@example.com").unwrap()
    }

    fn password() -> Password {
        Password::new("password1").unwrap()
    }

    #[tokio::test]
    async fn sign_in_persists_session_and_publishes_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(session_json("access-1", 4_102_444_800)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let (adapter, store) = adapter(&server, &dir);
        let mut events = adapter.subscribe();

        let user = adapter.sign_in_with_password(&email(), &password()).await.unwrap();
        assert_eq!(user.id.to_string(), USER_ID);
        assert_eq!(user.email, Some(email()));

        let persisted = store.get(SESSION_STORAGE_KEY).await.unwrap().unwrap();
        assert!(persisted.contains("access-1"));
        assert!(matches!(events.recv().await.unwrap(), AuthEvent::SignedIn(_)));
    }

    #[tokio::test]
    async fn persisted_session_is_restored_without_network() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let (adapter, store) = adapter(&server, &dir);
        store
            .set(
                SESSION_STORAGE_KEY,
                &session_json("access-1", 4_102_444_800).to_string(),
            )
            .await
            .unwrap();

        let user = adapter.current_user().await.unwrap().unwrap();
        assert_eq!(user.id.to_string(), USER_ID);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn expired_session_is_refreshed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "refresh_token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(session_json("access-2", 4_102_444_800)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let (adapter, store) = adapter(&server, &dir);
        store
            .set(
                SESSION_STORAGE_KEY,
                &session_json("access-1", 1_000_000_000).to_string(),
            )
            .await
            .unwrap();
        let mut events = adapter.subscribe();

        assert!(adapter.current_user().await.unwrap().is_some());
        assert!(matches!(events.recv().await.unwrap(), AuthEvent::TokenRefreshed(_)));

        let persisted = store.get(SESSION_STORAGE_KEY).await.unwrap().unwrap();
        assert!(persisted.contains("access-2"));
    }

    #[tokio::test]
    async fn rejected_refresh_signs_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Invalid Refresh Token: Already Used"
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let (adapter, store) = adapter(&server, &dir);
        store
            .set(
                SESSION_STORAGE_KEY,
                &session_json("access-1", 1_000_000_000).to_string(),
            )
            .await
            .unwrap();

        assert!(adapter.current_user().await.unwrap().is_none());
        assert!(store.get(SESSION_STORAGE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_up_with_confirmation_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": USER_ID,
                "email": "foodie@example.com",
                "confirmation_sent_at": "2026-10-18T03:00:00Z"
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let (adapter, store) = adapter(&server, &dir);

        assert!(adapter.sign_up(&email(), &password()).await.unwrap().is_none());
        assert!(store.get(SESSION_STORAGE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_out_revokes_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("Authorization", "Bearer access-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let (adapter, store) = adapter(&server, &dir);
        store
            .set(
                SESSION_STORAGE_KEY,
                &session_json("access-1", 4_102_444_800).to_string(),
            )
            .await
            .unwrap();

        adapter.sign_out().await.unwrap();
        assert!(store.get(SESSION_STORAGE_KEY).await.unwrap().is_none());
        assert!(adapter.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn oauth_url_carries_provider_and_redirect() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let (adapter, _) = adapter(&server, &dir);

        let url = adapter
            .oauth_authorize_url(application::OAuthProvider::Kakao)
            .unwrap();
        assert!(url.contains("/auth/v1/authorize"));
        assert!(url.contains("provider=kakao"));
    }
}

// ============================================================================
// Auth store over the real adapter
// ============================================================================

mod auth_store_tests {
    use super::*;

    #[tokio::test]
    async fn sign_in_writes_persisted_flag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access-1",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "refresh-1",
                "user": { "id": USER_ID, "email": "foodie@example.com" }
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let storage = Arc::new(FileKeyValueStore::new(dir.path()));
        let provider = Arc::new(
            SupabaseAuthAdapter::new(&SupabaseConfig::for_testing(&server.uri()), storage.clone())
                .unwrap(),
        );
        let store = AuthStore::new(provider, storage.clone());

        store.sign_in("foodie@example.com", "password1").await.unwrap();
        assert!(store.is_authenticated());

        let raw = storage.get(AUTH_STORAGE_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["email"], "foodie@example.com");
        assert_eq!(value["isAuthenticated"], true);
    }

    #[tokio::test]
    async fn bad_credentials_message_reaches_caller() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let storage = Arc::new(FileKeyValueStore::new(dir.path()));
        let provider = Arc::new(
            SupabaseAuthAdapter::new(&SupabaseConfig::for_testing(&server.uri()), storage.clone())
                .unwrap(),
        );
        let store = AuthStore::new(provider, storage);

        let message = store
            .sign_in("foodie@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert_eq!(message, "Invalid login credentials");
        assert!(!store.is_authenticated());
    }
}

mod password_reset_tests {
    use secrecy::SecretString;

    use super::*;

    #[tokio::test]
    async fn reset_confirm_does_not_sign_in() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/auth/v1/user"))
            .and(header("Authorization", "Bearer recovery-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": USER_ID,
                "email": "foodie@example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let storage = Arc::new(FileKeyValueStore::new(dir.path()));
        let provider = Arc::new(
            SupabaseAuthAdapter::new(&SupabaseConfig::for_testing(&server.uri()), storage.clone())
                .unwrap(),
        );
        let store = Arc::new(AuthStore::new(provider, storage.clone()));
        let listener = store.spawn_event_listener();

        store
            .reset_password_confirm(
                &SecretString::from("recovery-token".to_string()),
                "new-password1",
                "new-password1",
            )
            .await
            .unwrap();
        tokio::task::yield_now().await;

        assert!(!store.is_authenticated());
        assert!(storage.get(AUTH_STORAGE_KEY).await.unwrap().is_none());
        listener.abort();
    }

    #[tokio::test]
    async fn reset_confirm_rejects_mismatch_before_network() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(FileKeyValueStore::new(dir.path()));
        let provider = Arc::new(
            SupabaseAuthAdapter::new(&SupabaseConfig::for_testing(&server.uri()), storage.clone())
                .unwrap(),
        );
        let store = AuthStore::new(provider, storage);

        let message = store
            .reset_password_confirm(&SecretString::from("t".to_string()), "password1", "password2")
            .await
            .unwrap_err();
        assert!(message.contains("do not match"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

// ============================================================================
// Place finder over the Naver adapters and a headless map
// ============================================================================

mod place_finder_tests {
    use super::*;

    const LOCAL_SEARCH: &str = r#"{
        "total": 1, "start": 1, "display": 1,
        "items": [{
            "title": "<b>강남구청</b>",
            "link": "https://www.gangnam.go.kr",
            "category": "공공,사회기관>구청",
            "description": "",
            "telephone": "02-3423-5114",
            "address": "서울특별시 강남구 삼성동 16-1",
            "roadAddress": "서울특별시 강남구 학동로 426",
            "mapx": "1270473159",
            "mapy": "375174118"
        }]
    }"#;

    const DIRECTIONS: &str = r#"{
        "code": 0,
        "message": "길찾기를 성공하였습니다.",
        "route": {
            "traoptimal": [{
                "summary": { "distance": 5000, "duration": 600 },
                "path": [[126.978, 37.5665], [127.01, 37.54], [127.0473159, 37.5174118]]
            }]
        }
    }"#;

    fn finder(server: &MockServer, sdk: &Arc<HeadlessMapSdk>) -> (PlaceFinder, MapAdapter) {
        let config = NaverConfig::for_testing().with_base_url(&server.uri());
        let search = Arc::new(NaverSearchAdapter::new(&config).unwrap());
        let geocoder = Arc::new(NaverGeocodingAdapter::new(&config).unwrap());
        let directions = Arc::new(NaverDirectionsAdapter::new(&config).unwrap());

        let map = MapAdapter::new(
            directions,
            MapAdapterConfig {
                poll_interval: Duration::from_millis(10),
                ..MapAdapterConfig::default()
            },
        );
        map.initialize(sdk.clone());

        let location = Arc::new(LocationService::new(
            Arc::new(StaticGeolocation::new(Coordinate::seoul_city_hall(), None)),
            PositionOptions::default(),
        ));
        let finder = PlaceFinder::new(map.controller(), search.clone(), geocoder, search, location);
        (finder, map)
    }

    #[tokio::test]
    async fn locate_search_select_and_route() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search/local.json"))
            .and(query_param("query", "강남구청"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOCAL_SEARCH))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/map-direction/v1/driving"))
            .and(query_param("start", "126.978,37.5665"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DIRECTIONS))
            .expect(1)
            .mount(&server)
            .await;

        let sdk = Arc::new(HeadlessMapSdk::new(false));
        let (finder, map) = finder(&server, &sdk);
        let _loader = sdk.load_after(Duration::from_millis(30));

        let position = finder.locate_me().await.unwrap();
        assert_eq!(position.coordinate, Coordinate::seoul_city_hall());

        assert_eq!(finder.search("강남구청").await.unwrap(), SearchOutcome::Found(1));
        let destination = finder.select_place(0).await.unwrap();
        assert!((destination.lat() - 37.517_411_8).abs() < 1e-6);

        let summary = finder.request_route().await.unwrap();
        assert_eq!(summary.distance_meters, 5000);
        assert_eq!(summary.duration_seconds, 600);

        let drawn = sdk.last_map().unwrap();
        assert_eq!(drawn.polylines().len(), 1);
        assert_eq!(drawn.polylines()[0].path.len(), 3);
        assert_eq!(drawn.center(), destination);

        map.shutdown();
    }

    #[tokio::test]
    async fn missing_route_surfaces_provider_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search/local.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOCAL_SEARCH))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/map-direction/v1/driving"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"code":1,"message":"출발지와 도착지가 동일합니다."}"#,
            ))
            .mount(&server)
            .await;

        let sdk = Arc::new(HeadlessMapSdk::new(true));
        let (finder, map) = finder(&server, &sdk);

        finder.locate_me().await.unwrap();
        finder.search("강남구청").await.unwrap();
        finder.select_place(0).await.unwrap();

        let err = finder.request_route().await.unwrap_err();
        assert!(matches!(err, application::ApplicationError::NoRoute { code: 1 }));
        assert!(sdk.last_map().unwrap().polylines().is_empty());

        map.shutdown();
    }
}
