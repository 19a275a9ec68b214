use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use stonewalker::core::map::Viewport;
use stonewalker::domain::model::{Category, Role};
use stonewalker::{ApiClient, ChatSession};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server.base_url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_chat_round_trip_against_backend() {
    let server = MockServer::start_async().await;
    let search_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/underfoot/search")
                .json_body(json!({"chat_input": "abandoned mines near Norton", "force": false}));
            then.status(200).json_body(json!({
                "user_intent": "find abandoned mines",
                "user_location": "Norton, VA",
                "response": "Beneath Norton lie old coal seams...",
                "places": [
                    {
                        "place_id": "mine-1",
                        "name": "Stonega Coke Ovens",
                        "editorial_summary": {"overview": "Ruined coke ovens in the hollow"},
                        "geometry": {"location": {"lat": 36.95, "lng": -82.78}},
                        "category": "underground",
                        "rating": 4.5,
                        "vicinity": "Stonega, VA"
                    },
                    {
                        "name": "Unnamed shaft",
                        "lat": "36.9",
                        "lng": "-82.7",
                        "category": "haunted"
                    }
                ],
                "debug": {
                    "request_id": "req-42",
                    "execution_time_ms": 1234,
                    "confidence": 0.7,
                    "keywords": ["mines", "coal"],
                    "data_sources": ["Supabase", "Geocoder"]
                }
            }));
        })
        .await;

    let client = client_for(&server);
    let mut session = ChatSession::new(Viewport::default());

    let reply = session
        .send_message(&client, "  abandoned mines near Norton ")
        .await
        .unwrap()
        .unwrap()
        .clone();

    search_mock.assert_async().await;

    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(
        reply.content,
        "Found 2 locations. Stonega Coke Ovens shows strongest resonance."
    );

    let first = &reply.places[0];
    assert_eq!(first.id, "mine-1");
    assert_eq!(first.description, "Ruined coke ovens in the hollow");
    assert_eq!(first.category, Category::Underground);
    assert!((first.confidence - 0.9).abs() < 1e-9);
    assert_eq!(first.address.as_deref(), Some("Stonega, VA"));

    let second = &reply.places[1];
    assert!(!second.id.is_empty());
    assert_eq!(second.category, Category::Mystical);
    assert_eq!(second.latitude, 36.9);
    assert_eq!(second.confidence, 0.5);

    let debug = session.current_debug().unwrap();
    assert_eq!(debug.search_query, "abandoned mines near Norton");
    assert_eq!(debug.processing_time, 1234.0);
    assert_eq!(debug.keywords, vec!["mines".to_string(), "coal".to_string()]);
    assert_eq!(
        debug.data_source,
        vec!["Supabase".to_string(), "Geocoder".to_string()]
    );

    assert!(!session.is_loading());
    assert_eq!(session.selected_place_id(), Some("mine-1"));

    let view = session.map_view();
    assert_eq!(view.viewport.center, (36.95, -82.78));
    assert_eq!(view.viewport.zoom, 15);
    assert_eq!(view.markers.len(), 2);
    assert_eq!(view.selected_marker().unwrap().place_id, "mine-1");
}

#[tokio::test]
async fn test_backend_failure_becomes_error_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/underfoot/search");
            then.status(500).json_body(json!({
                "error": "UNDERFOOT_ERROR",
                "message": "Vector store unavailable"
            }));
        })
        .await;

    let client = client_for(&server);
    let mut session = ChatSession::default().with_debug_mode(true);

    let reply = session
        .send_message(&client, "forgotten chapels")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(reply.content, "Error: Vector store unavailable");
    assert!(reply.places.is_empty());
    let debug = reply.debug_data.as_ref().unwrap();
    assert_eq!(debug.confidence, 0.0);
    assert_eq!(debug.llm_reasoning, "Error occurred during search");

    assert!(!session.is_loading());
    assert!(session.current_debug().is_none());
    assert!(session.selected_place_id().is_none());
    assert_eq!(session.messages().len(), 2);
}

#[tokio::test]
async fn test_empty_result_and_force_flag() {
    let server = MockServer::start_async().await;
    let search_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/underfoot/search")
                .json_body(json!({"chat_input": "dragons", "force": true}));
            then.status(200).json_body(json!({
                "user_intent": "",
                "user_location": "",
                "response": "",
                "places": null
            }));
        })
        .await;

    let client = client_for(&server);
    let mut session = ChatSession::default().with_force(true);

    let reply = session.send_message(&client, "dragons").await.unwrap().unwrap();
    assert_eq!(reply.content, "No locations found matching your query.");
    search_mock.assert_async().await;

    let debug = session.current_debug().unwrap();
    assert_eq!(debug.confidence, 0.8);
    assert_eq!(debug.llm_reasoning, "Search completed");
    assert_eq!(session.map_view().viewport, Viewport::default());
}

#[tokio::test]
async fn test_blank_input_never_hits_backend() {
    let server = MockServer::start_async().await;
    let search_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/underfoot/search");
            then.status(200).json_body(json!({"places": []}));
        })
        .await;

    let client = client_for(&server);
    let mut session = ChatSession::default();

    assert!(session.send_message(&client, "   ").await.unwrap().is_none());
    assert!(session.messages().is_empty());
    search_mock.assert_hits_async(0).await;
}
