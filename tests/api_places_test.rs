//! Integration tests for the places API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    use crate::test_utils::{UNREACHABLE_LLM, body_to_string, completion_body, test_app};

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        serde_json::from_str(&body_to_string(response.into_body()).await).unwrap()
    }

    /// Tests listing every governorate
    #[tokio::test]
    async fn it_lists_governorates() {
        let (app, _dir) = test_app(UNREACHABLE_LLM).await;

        let response = app.oneshot(get("/api/places")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let governorates = body["governorates"].as_array().unwrap();
        assert_eq!(governorates.len(), 18);
        assert!(governorates.iter().any(|g| g["id"] == "luxor"));
    }

    /// Tests listing the places for a category
    #[tokio::test]
    async fn it_lists_places() {
        let (app, _dir) = test_app(UNREACHABLE_LLM).await;

        let response = app.oneshot(get("/api/places/cairo/heritage")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["governorate"], "cairo");
        assert_eq!(body["category"], "heritage");
        let places = body["places"].as_array().unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0]["id"], "cai-h-1");
        assert!(places[0]["googleMapsUrl"].as_str().is_some());
    }

    /// Tests searching places by localized name
    #[tokio::test]
    async fn it_searches_places() {
        let (app, _dir) = test_app(UNREACHABLE_LLM).await;

        let response = app
            .clone()
            .oneshot(get("/api/places/cairo/heritage?search=zzzz"))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert!(body["places"].as_array().unwrap().is_empty());

        let response = app
            .oneshot(get("/api/places/cairo/heritage?search=&language=fr"))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["places"].as_array().unwrap().len(), 2);
    }

    /// Tests unknown governorates and categories
    #[tokio::test]
    async fn it_rejects_unknown_governorate_and_category() {
        let (app, _dir) = test_app(UNREACHABLE_LLM).await;

        let response = app
            .clone()
            .oneshot(get("/api/places/atlantis/heritage"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Unknown governorate: atlantis");

        let response = app.oneshot(get("/api/places/cairo/museums")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// Tests discovering places merges them into the listing
    #[tokio::test]
    async fn it_discovers_places() {
        let mut server = mockito::Server::new_async().await;
        let discovered = json!([
            {
                "name": {"en": "Manial Palace", "fr": "Palais de Manial"},
                "shortDescription": {"en": "An ornate palace on Roda Island."},
                "longDescription": {"en": "Built for Prince Mohammed Ali Tewfik."},
                "rating": 7.5
            }
        ]);
        let mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .match_header("x-goog-api-key", "test-api-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(&format!("```json\n{}\n```", discovered)))
            .create_async()
            .await;

        let (app, _dir) = test_app(&server.url()).await;

        let response = app
            .clone()
            .oneshot(post("/api/places/cairo/heritage/discover", json!({"count": 3})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        mock.assert_async().await;

        let body = json_body(response).await;
        let found = body["discovered"].as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["rating"], 5.0);
        assert_eq!(found[0]["aiGenerated"], true);
        assert!(found[0]["id"].as_str().unwrap().starts_with("ai-"));
        assert_eq!(body["places"].as_array().unwrap().len(), 3);

        // The listing now includes the discovered place
        let response = app
            .oneshot(get("/api/places/cairo/heritage?search=manial"))
            .await
            .unwrap();
        let body = json_body(response).await;
        let places = body["places"].as_array().unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0]["name"]["en"], "Manial Palace");
    }

    /// Tests a failed discovery leaves the listing alone
    #[tokio::test]
    async fn it_reports_discovery_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let (app, _dir) = test_app(&server.url()).await;

        let response = app
            .clone()
            .oneshot(post("/api/places/giza/heritage/discover", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = app.oneshot(get("/api/places/giza/heritage")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["places"].as_array().unwrap().len(), 1);
    }
}
