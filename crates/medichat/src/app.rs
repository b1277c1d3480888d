use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        chat::ask,
        chat_rooms::{create_room, list_messages, list_rooms, rename_room, search_rooms},
        health::{healthz, livez},
        hospitals::{create_visit, list_visits, search_hospitals},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let chat_routes = Router::new()
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/search", get(search_rooms))
        .route("/rooms/{id}", put(rename_room))
        .route("/rooms/{id}/messages", get(list_messages))
        .route("/ask", post(ask));

    let hospital_routes = Router::new()
        .route("/search", post(search_hospitals))
        .route("/visits", get(list_visits).post(create_visit));

    let api_routes = Router::new()
        .nest("/api/chat", chat_routes)
        .nest("/api/hospitals", hospital_routes)
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state.clone());

    // Auth routes carry their own state type
    let auth_routes = medichat_auth::auth_routes().with_state(state.auth.clone());

    Router::new()
        .merge(api_routes)
        .nest("/api/auth", auth_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use chrono::Utc;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    use medichat_core::domain::Hospital;

    use crate::state::test_support::ScriptedChatClient;

    fn request(
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Registers a user and returns their session token.
    async fn register_and_login(app: &Router, login_id: &str) -> String {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/auth/register",
                None,
                Some(serde_json::json!({
                    "login_id": login_id,
                    "name": "Test User",
                    "password": "correcthorse"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/auth/login",
                None,
                Some(serde_json::json!({
                    "login_id": login_id,
                    "password": "correcthorse"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        json["data"]["token"].as_str().unwrap().to_string()
    }

    /// Creates a room for the given token, returning its ID.
    async fn create_test_room(app: &Router, token: &str) -> Uuid {
        let response = app
            .clone()
            .oneshot(request("POST", "/api/chat/rooms", Some(token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        json["data"]["chat_room_id"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap()
    }

    #[tokio::test]
    async fn livez_is_public() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(request("GET", "/livez", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn healthz_reports_storage_ok() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(request("GET", "/healthz", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn chat_routes_require_authentication() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(request("GET", "/api/chat/rooms", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn new_room_gets_the_default_title() {
        let app = create_app(AppState::default());
        let token = register_and_login(&app, "jdoe").await;

        let response = app
            .clone()
            .oneshot(request("POST", "/api/chat/rooms", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["status"], 201);
        assert_eq!(json["data"]["title"], "New chat");
        assert_eq!(json["message"], "Chat room created");
    }

    #[tokio::test]
    async fn renaming_a_room_updates_the_listing() {
        let app = create_app(AppState::default());
        let token = register_and_login(&app, "jdoe").await;
        let room_id = create_test_room(&app, &token).await;

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/chat/rooms/{room_id}"),
                Some(&token),
                Some(serde_json::json!({ "title": "Asthma questions" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(request("GET", "/api/chat/rooms", Some(&token), None))
            .await
            .unwrap();
        let json = body_json(response).await;
        let rooms = json["data"].as_array().unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0]["title"], "Asthma questions");
        assert!(rooms[0]["last_message"].is_null());
        assert!(rooms[0]["last_message_at"].is_null());
    }

    #[tokio::test]
    async fn renaming_with_a_blank_title_is_rejected() {
        let app = create_app(AppState::default());
        let token = register_and_login(&app, "jdoe").await;
        let room_id = create_test_room(&app, &token).await;

        let response = app
            .oneshot(request(
                "PUT",
                &format!("/api/chat/rooms/{room_id}"),
                Some(&token),
                Some(serde_json::json!({ "title": "   " })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn renaming_a_missing_room_is_not_found() {
        let app = create_app(AppState::default());
        let token = register_and_login(&app, "jdoe").await;

        let response = app
            .oneshot(request(
                "PUT",
                &format!("/api/chat/rooms/{}", Uuid::new_v4()),
                Some(&token),
                Some(serde_json::json!({ "title": "Anything" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn renaming_someone_elses_room_is_forbidden() {
        let app = create_app(AppState::default());
        let owner = register_and_login(&app, "owner").await;
        let intruder = register_and_login(&app, "intruder").await;
        let room_id = create_test_room(&app, &owner).await;

        let response = app
            .oneshot(request(
                "PUT",
                &format!("/api/chat/rooms/{room_id}"),
                Some(&intruder),
                Some(serde_json::json!({ "title": "Mine now" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn ask_persists_question_and_answer() {
        let app = create_app(AppState::default());
        let token = register_and_login(&app, "jdoe").await;
        let room_id = create_test_room(&app, &token).await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/chat/ask",
                Some(&token),
                Some(serde_json::json!({
                    "chat_room_id": room_id,
                    "question": "What is asthma?"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(
            json["data"]["answer"],
            "This is general guidance, see a doctor for specifics."
        );

        // Conversation history holds both sides, oldest first
        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/chat/rooms/{room_id}/messages"),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        let messages = json["data"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["sender"], "user");
        assert_eq!(messages[0]["content"], "What is asthma?");
        assert_eq!(messages[1]["sender"], "bot");
    }

    #[tokio::test]
    async fn ask_failure_maps_to_bad_gateway_but_keeps_the_question() {
        let state =
            AppState::default().with_chat_client(Arc::new(ScriptedChatClient { answer: None }));
        let app = create_app(state);
        let token = register_and_login(&app, "jdoe").await;
        let room_id = create_test_room(&app, &token).await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/chat/ask",
                Some(&token),
                Some(serde_json::json!({
                    "chat_room_id": room_id,
                    "question": "What is asthma?"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = app
            .oneshot(request(
                "GET",
                &format!("/api/chat/rooms/{room_id}/messages"),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        let messages = json["data"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["sender"], "user");
    }

    #[tokio::test]
    async fn room_listing_previews_the_latest_message() {
        let app = create_app(AppState::default());
        let token = register_and_login(&app, "jdoe").await;
        let room_id = create_test_room(&app, &token).await;

        app.clone()
            .oneshot(request(
                "POST",
                "/api/chat/ask",
                Some(&token),
                Some(serde_json::json!({
                    "chat_room_id": room_id,
                    "question": "What is asthma?"
                })),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(request("GET", "/api/chat/rooms", Some(&token), None))
            .await
            .unwrap();
        let json = body_json(response).await;
        let rooms = json["data"].as_array().unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(
            rooms[0]["last_message"],
            "This is general guidance, see a doctor for specifics."
        );
        // %Y.%m.%d %H:%M
        let at = rooms[0]["last_message_at"].as_str().unwrap();
        assert_eq!(at.len(), 16);
        assert_eq!(&at[4..5], ".");
    }

    #[tokio::test]
    async fn asking_moves_the_room_to_the_top_of_the_listing() {
        let app = create_app(AppState::default());
        let token = register_and_login(&app, "jdoe").await;

        let first = create_test_room(&app, &token).await;
        let second = create_test_room(&app, &token).await;

        let response = app
            .clone()
            .oneshot(request("GET", "/api/chat/rooms", Some(&token), None))
            .await
            .unwrap();
        let json = body_json(response).await;
        let rooms = json["data"].as_array().unwrap();
        assert_eq!(rooms[0]["chat_room_id"], second.to_string());

        app.clone()
            .oneshot(request(
                "POST",
                "/api/chat/ask",
                Some(&token),
                Some(serde_json::json!({
                    "chat_room_id": first,
                    "question": "What is asthma?"
                })),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(request("GET", "/api/chat/rooms", Some(&token), None))
            .await
            .unwrap();
        let json = body_json(response).await;
        let rooms = json["data"].as_array().unwrap();
        assert_eq!(rooms[0]["chat_room_id"], first.to_string());
        assert_eq!(rooms[1]["chat_room_id"], second.to_string());
    }

    #[tokio::test]
    async fn room_search_filters_by_title() {
        let app = create_app(AppState::default());
        let token = register_and_login(&app, "jdoe").await;

        let asthma = create_test_room(&app, &token).await;
        let allergy = create_test_room(&app, &token).await;
        for (id, title) in [(asthma, "Asthma questions"), (allergy, "Allergy advice")] {
            app.clone()
                .oneshot(request(
                    "PUT",
                    &format!("/api/chat/rooms/{id}"),
                    Some(&token),
                    Some(serde_json::json!({ "title": title })),
                ))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(request(
                "GET",
                "/api/chat/rooms/search?keyword=Asthma",
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        let rooms = json["data"].as_array().unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0]["title"], "Asthma questions");
    }

    #[tokio::test]
    async fn reading_foreign_messages_is_forbidden() {
        let app = create_app(AppState::default());
        let owner = register_and_login(&app, "owner").await;
        let intruder = register_and_login(&app, "intruder").await;
        let room_id = create_test_room(&app, &owner).await;

        let response = app
            .oneshot(request(
                "GET",
                &format!("/api/chat/rooms/{room_id}/messages"),
                Some(&intruder),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn hospital_search_returns_matches() {
        let state = AppState::default();
        state
            .hospitals
            .create_hospital(&Hospital::new("Seoul General Hospital", "02-1234", "Seoul"))
            .await
            .unwrap();
        state
            .hospitals
            .create_hospital(&Hospital::new("Eye Clinic", "02-5555", "Seoul"))
            .await
            .unwrap();
        let app = create_app(state);
        let token = register_and_login(&app, "jdoe").await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/hospitals/search",
                Some(&token),
                Some(serde_json::json!({ "keyword": "General" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let hospitals = json["data"].as_array().unwrap();
        assert_eq!(hospitals.len(), 1);
        assert_eq!(hospitals[0]["name"], "Seoul General Hospital");
        assert_eq!(hospitals[0]["phone"], "02-1234");
    }

    #[tokio::test]
    async fn hospital_search_rejects_blank_keyword() {
        let app = create_app(AppState::default());
        let token = register_and_login(&app, "jdoe").await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/hospitals/search",
                Some(&token),
                Some(serde_json::json!({ "keyword": " " })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn booking_a_visit_returns_the_week_day() {
        let state = AppState::default();
        let hospital = Hospital::new("Seoul General Hospital", "02-1234", "Seoul");
        state.hospitals.create_hospital(&hospital).await.unwrap();
        let app = create_app(state);
        let token = register_and_login(&app, "jdoe").await;

        let scheduled = Utc::now() + chrono::Duration::days(3);
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/hospitals/visits",
                Some(&token),
                Some(serde_json::json!({
                    "hospital_id": hospital.id,
                    "scheduled_at": scheduled.to_rfc3339()
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["data"]["hospital_name"], "Seoul General Hospital");
        assert!(json["data"]["week_day"].is_string());

        let response = app
            .oneshot(request("GET", "/api/hospitals/visits", Some(&token), None))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn booking_at_an_unknown_hospital_is_not_found() {
        let app = create_app(AppState::default());
        let token = register_and_login(&app, "jdoe").await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/hospitals/visits",
                Some(&token),
                Some(serde_json::json!({
                    "hospital_id": Uuid::new_v4(),
                    "scheduled_at": (Utc::now() + chrono::Duration::days(1)).to_rfc3339()
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn booking_in_the_past_is_rejected() {
        let state = AppState::default();
        let hospital = Hospital::new("Seoul General Hospital", "02-1234", "Seoul");
        state.hospitals.create_hospital(&hospital).await.unwrap();
        let app = create_app(state);
        let token = register_and_login(&app, "jdoe").await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/hospitals/visits",
                Some(&token),
                Some(serde_json::json!({
                    "hospital_id": hospital.id,
                    "scheduled_at": (Utc::now() - chrono::Duration::hours(1)).to_rfc3339()
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn visits_are_scoped_to_the_caller() {
        let state = AppState::default();
        let hospital = Hospital::new("Seoul General Hospital", "02-1234", "Seoul");
        state.hospitals.create_hospital(&hospital).await.unwrap();
        let app = create_app(state);
        let alice = register_and_login(&app, "alice").await;
        let bob = register_and_login(&app, "bob").await;

        app.clone()
            .oneshot(request(
                "POST",
                "/api/hospitals/visits",
                Some(&alice),
                Some(serde_json::json!({
                    "hospital_id": hospital.id,
                    "scheduled_at": (Utc::now() + chrono::Duration::days(1)).to_rfc3339()
                })),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(request("GET", "/api/hospitals/visits", Some(&bob), None))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }
}
