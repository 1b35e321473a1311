//! HTTP front end tests (feature `server`)
#![cfg(feature = "server")]

use std::sync::Arc;

use async_trait::async_trait;
use geoqa::error::{ExecutionError, ServiceError};
use geoqa::{
    api, Category, Classification, EntityLinker, GeoClassifier, GeometryKind, LinkedCandidate,
    LinkingResult, Orchestrator, QueryEngine, SparqlResults, TemplateCatalog,
};

struct Containment;

#[async_trait]
impl GeoClassifier for Containment {
    async fn classify(&self, _question: &str) -> Result<Classification, ServiceError> {
        Ok(Classification::new([("Containment", 1.0)]))
    }
}

struct DrivingSchools;

#[async_trait]
impl EntityLinker for DrivingSchools {
    async fn link(&self, question: &str) -> Result<LinkingResult, ServiceError> {
        Ok(LinkingResult::from_candidates(
            question,
            [
                LinkedCandidate::new(Category::Class, "http://lgd/DrivingSchool", "driving school")
                    .at_positions([3]),
                LinkedCandidate::new(Category::Entity, "http://lgd/Blumenthal", "Blumenthal")
                    .with_geometry(GeometryKind::Way)
                    .at_positions([6]),
            ],
        ))
    }
}

struct AlwaysTrue;

#[async_trait]
impl QueryEngine for AlwaysTrue {
    async fn execute(&self, _query: &str) -> Result<SparqlResults, ExecutionError> {
        Ok(SparqlResults::boolean_answer(true))
    }

    fn endpoint(&self) -> &str {
        "stub"
    }
}

async fn spawn_server() -> String {
    let orchestrator = Orchestrator::new(
        Arc::new(Containment),
        Arc::new(DrivingSchools),
        Arc::new(AlwaysTrue),
        Arc::new(TemplateCatalog::builtin().unwrap()),
        2,
    );
    let app = api::router(Arc::new(orchestrator));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_health() {
    let base = spawn_server().await;
    let body: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_qa_get_and_post() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let get: SparqlResults = client
        .get(format!("{}/qa", base))
        .query(&[("core", "Are there any driving schools in Blumenthal?"), ("lang", "en")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(get, SparqlResults::boolean_answer(true));

    let post: SparqlResults = client
        .post(format!("{}/qa", base))
        .form(&[("core", "Are there any driving schools in Blumenthal?")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(post, SparqlResults::boolean_answer(true));
}

#[tokio::test]
async fn test_missing_question_is_empty_answer() {
    let base = spawn_server().await;
    let body: serde_json::Value = reqwest::get(format!("{}/qa", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        serde_json::json!({"head": {"vars": ["x"]}, "results": {"bindings": []}})
    );
}
