use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use configs::FormsConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::forms::InMemoryFormRepository;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::routes;
use server::state::AppState;

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

    async fn create(&self, body: Value) -> anyhow::Result<HttpStatusCode> {
        Ok(self.client.post(self.url("/api/forms")).json(&body).send().await?.status())
    }

    async fn list(&self, path: &str) -> anyhow::Result<Value> {
        let res = self.client.get(self.url(path)).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
        Ok(res.json().await?)
    }
}

/// Serve the real router over the in-memory store on an ephemeral port.
async fn start_server() -> anyhow::Result<TestApp> {
    let state = AppState::new(Arc::new(InMemoryFormRepository::new()), FormsConfig::default());
    let app: Router = routes::build_router(state, cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, client: reqwest::Client::new() })
}

fn pulse(value: Value) -> Value {
    json!({
        "type": "pulse",
        "units": "bpm",
        "value": value,
        "dataType": "number",
        "validations": {"min": 30, "max": 220}
    })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app.client.get(app.url("/health")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn e2e_create_then_fill_in_pending_entry() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = app.client.post(app.url("/api/forms")).json(&pulse(Value::Null)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({"message": "Entry created successfully"}));

    let pending = app.list("/api/forms/pending").await?;
    assert_eq!(pending["totalEntries"], json!(1));
    assert_eq!(pending["totalPages"], json!(1));
    assert_eq!(pending["currentPage"], json!(1));
    let entry = &pending["entries"][0];
    assert_eq!(entry["value"], Value::Null);
    assert_eq!(entry["status"], json!("pending"));
    assert_eq!(entry["type"], json!("pulse"));
    let id = entry["id"].as_str().expect("id").to_string();

    let res = app.client.put(app.url(&format!("/api/forms/{id}"))).json(&json!({"value": 72})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], json!("Entry updated successfully"));
    assert_eq!(body["updatedEntry"]["id"], json!(id));
    assert_eq!(body["updatedEntry"]["value"], json!(72));
    assert_eq!(body["updatedEntry"]["status"], json!("saved"));

    assert_eq!(app.list("/api/forms/pending").await?["totalEntries"], json!(0));
    let saved = app.list("/api/forms/saved").await?;
    assert_eq!(saved["totalEntries"], json!(1));
    assert_eq!(saved["entries"][0]["id"], json!(id));
    Ok(())
}

#[tokio::test]
async fn e2e_update_without_value_is_400_for_any_id() -> anyhow::Result<()> {
    let app = start_server().await?;
    assert_eq!(app.create(pulse(Value::Null)).await?, HttpStatusCode::CREATED);
    let id = app.list("/api/forms/pending").await?["entries"][0]["id"].as_str().unwrap().to_string();

    for target in [id.as_str(), "00000000-0000-4000-8000-000000000000", "not-a-real-id"] {
        for body in [json!({}), json!({"value": null})] {
            let res = app.client.put(app.url(&format!("/api/forms/{target}"))).json(&body).send().await?;
            assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
            let body: Value = res.json().await?;
            assert_eq!(body, json!({"message": "Value is required"}));
        }
    }

    let res = app.client.put(app.url(&format!("/api/forms/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_update_unknown_id_is_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    for target in ["00000000-0000-4000-8000-000000000000", "abc"] {
        let res = app.client.put(app.url(&format!("/api/forms/{target}"))).json(&json!({"value": 80})).send().await?;
        assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
        let body: Value = res.json().await?;
        assert_eq!(body, json!({"message": "Entry not found"}));
    }
    Ok(())
}

#[tokio::test]
async fn e2e_invalid_entries_are_generic_500() -> anyhow::Result<()> {
    let app = start_server().await?;

    // value outside the entry's own bounds
    let res = app.client.post(app.url("/api/forms")).json(&pulse(json!(999))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({"message": "Internal server error"}));

    // required field missing
    let res = app.client.post(app.url("/api/forms")).json(&json!({"units": "bpm", "dataType": "number"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(app.create(pulse(Value::Null)).await?, HttpStatusCode::CREATED);
    let id = app.list("/api/forms/pending").await?["entries"][0]["id"].as_str().unwrap().to_string();
    let res = app.client.put(app.url(&format!("/api/forms/{id}"))).json(&json!({"value": "fast"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

#[tokio::test]
async fn e2e_pagination_envelope() -> anyhow::Result<()> {
    let app = start_server().await?;
    for _ in 0..10 {
        assert_eq!(app.create(pulse(Value::Null)).await?, HttpStatusCode::CREATED);
    }

    let first = app.list("/api/forms/pending").await?;
    assert_eq!(first["totalEntries"], json!(10));
    assert_eq!(first["totalPages"], json!(2));
    assert_eq!(first["entries"].as_array().unwrap().len(), 7);

    let second = app.list("/api/forms/pending?page=2").await?;
    assert_eq!(second["currentPage"], json!(2));
    assert_eq!(second["entries"].as_array().unwrap().len(), 3);

    let small = app.list("/api/forms/pending?page=2&limit=4").await?;
    assert_eq!(small["totalPages"], json!(3));
    assert_eq!(small["entries"].as_array().unwrap().len(), 4);

    let clamped = app.list("/api/forms/pending?page=0&limit=0").await?;
    assert_eq!(clamped["currentPage"], json!(1));
    assert_eq!(clamped["totalPages"], json!(10));
    assert_eq!(clamped["entries"].as_array().unwrap().len(), 1);

    let huge = app.list("/api/forms/saved?page=100000000000000000&limit=100").await?;
    assert_eq!(huge["entries"], json!([]));
    Ok(())
}

#[tokio::test]
async fn e2e_unparseable_paging_is_json_400() -> anyhow::Result<()> {
    let app = start_server().await?;
    for path in ["/api/forms/pending?page=abc", "/api/forms/today?limit=x", "/api/forms/saved?page=1.5"] {
        let res = app.client.get(app.url(path)).send().await?;
        assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST, "{path}");
        let body: Value = res.json().await?;
        assert_eq!(body, json!({"message": "Invalid pagination parameters"}), "{path}");
    }
    Ok(())
}

#[tokio::test]
async fn e2e_today_and_delete_all() -> anyhow::Result<()> {
    let app = start_server().await?;
    assert_eq!(app.create(pulse(json!(70))).await?, HttpStatusCode::CREATED);
    let mut old = pulse(json!(65));
    old["date"] = json!("2001-01-01T12:00:00Z");
    assert_eq!(app.create(old).await?, HttpStatusCode::CREATED);

    let today = app.list("/api/forms/today").await?;
    assert_eq!(today["totalEntries"], json!(1));
    assert_eq!(today["entries"][0]["value"], json!(70));
    assert_eq!(app.list("/api/forms/saved").await?["totalEntries"], json!(2));

    let res = app.client.delete(app.url("/api/forms")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({"message": "All forms deleted successfully"}));

    for path in ["/api/forms/today", "/api/forms/pending", "/api/forms/saved"] {
        let page = app.list(path).await?;
        assert_eq!(page["totalEntries"], json!(0));
        assert_eq!(page["entries"], json!([]));
    }
    Ok(())
}
