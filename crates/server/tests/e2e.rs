use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::storage::file::FileStorage;
use tokio::net::TcpListener;
use uuid::Uuid;

use server::{routes, startup, AppState};

struct TestApp {
    base_url: String,
    data_file: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.data_file);
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Use an isolated storage file per test
    let data_file = std::env::temp_dir().join(format!("hbnb_e2e_{}.json", Uuid::new_v4()));
    let storage = FileStorage::open(&data_file).await?;
    let state = AppState { storage };

    let app = routes::build_router(state, startup::build_cors(&["*".to_string()]));
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = startup::serve(listener, app, std::future::pending()).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, data_file })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().build().expect("reqwest client")
}

async fn create_state(app: &TestApp, name: &str) -> anyhow::Result<Value> {
    let res = client()
        .post(format!("{}/states", app.base_url))
        .json(&json!({"name": name}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    Ok(res.json::<Value>().await?)
}

async fn create_city(app: &TestApp, state_id: &str, name: &str) -> anyhow::Result<Value> {
    let res = client()
        .post(format!("{}/states/{}/cities", app.base_url, state_id))
        .json(&json!({"name": name}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    Ok(res.json::<Value>().await?)
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_state_post_then_get_returns_same_fields() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create_state(&app, "California").await?;
    assert_eq!(created["name"], "California");
    assert_eq!(created["__class__"], "State");
    assert!(created["id"].as_str().is_some_and(|id| Uuid::parse_str(id).is_ok()));
    assert!(created["created_at"].is_string());
    assert!(created["updated_at"].is_string());

    let id = created["id"].as_str().unwrap_or_default();
    let res = client().get(format!("{}/states/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, created);

    let res = client().get(format!("{}/states", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let list = res.json::<Vec<Value>>().await?;
    assert_eq!(list, vec![created]);
    Ok(())
}

#[tokio::test]
async fn e2e_state_bad_requests() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // not JSON at all
    let res = c
        .post(format!("{}/states", app.base_url))
        .header("content-type", "text/plain")
        .body("name=Texas")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Not a JSON"}));

    // malformed JSON
    let res = c
        .post(format!("{}/states", app.base_url))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Not a JSON"}));

    // JSON but not an object
    let res = c.post(format!("{}/states", app.base_url)).json(&json!(["Texas"])).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    // missing required field
    let res = c.post(format!("{}/states", app.base_url)).json(&json!({"capital": "Austin"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Missing name"}));
    Ok(())
}

#[tokio::test]
async fn e2e_state_put_ignores_immutable_fields() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let created = create_state(&app, "Nevada").await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let res = c
        .put(format!("{}/states/{}", app.base_url, id))
        .json(&json!({
            "id": "hijacked",
            "created_at": "2000-01-01T00:00:00Z",
            "updated_at": "2000-01-01T00:00:00Z",
            "name": "Utah"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_ne!(updated["updated_at"], json!("2000-01-01T00:00:00Z"));
    assert_eq!(updated["name"], "Utah");

    // only immutable keys: nothing changes, not even updated_at
    let res = c
        .put(format!("{}/states/{}", app.base_url, id))
        .json(&json!({"id": "hijacked"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, updated);

    // empty object and non-JSON bodies
    let res = c.put(format!("{}/states/{}", app.base_url, id)).json(&json!({})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Not a JSON"}));

    // unknown id wins over a bad body
    let res = c
        .put(format!("{}/states/{}", app.base_url, Uuid::new_v4()))
        .body("garbage")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_state_delete_then_get_is_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let created = create_state(&app, "Oregon").await?;
    let id = created["id"].as_str().unwrap_or_default();

    let res = c.delete(format!("{}/states/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({}));

    let res = c.get(format!("{}/states/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Not found"}));

    let res = c.delete(format!("{}/states/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_city_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let ca = create_state(&app, "California").await?;
    let nv = create_state(&app, "Nevada").await?;
    let ca_id = ca["id"].as_str().unwrap_or_default();

    let sf = create_city(&app, ca_id, "San Francisco").await?;
    assert_eq!(sf["__class__"], "City");
    assert_eq!(sf["state_id"], ca["id"]);
    let sf_id = sf["id"].as_str().unwrap_or_default();

    let res = c.get(format!("{}/states/{}/cities", app.base_url, ca_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Vec<Value>>().await?, vec![sf.clone()]);

    let res = c.get(format!("{}/cities/{}", app.base_url, sf_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, sf);

    // foreign key and identity stay put
    let res = c
        .put(format!("{}/cities/{}", app.base_url, sf_id))
        .json(&json!({"name": "Oakland", "state_id": nv["id"], "id": "x"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["name"], "Oakland");
    assert_eq!(updated["state_id"], ca["id"]);
    assert_eq!(updated["id"], sf["id"]);

    let res = c.delete(format!("{}/cities/{}", app.base_url, sf_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.get(format!("{}/cities/{}", app.base_url, sf_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_city_requires_existing_state() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let missing = Uuid::new_v4();

    let res = c.get(format!("{}/states/{}/cities", app.base_url, missing)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c
        .post(format!("{}/states/{}/cities", app.base_url, missing))
        .json(&json!({"name": "Nowhere"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Not found"}));

    let st = create_state(&app, "Utah").await?;
    let res = c
        .post(format!("{}/states/{}/cities", app.base_url, st["id"].as_str().unwrap_or_default()))
        .json(&json!({"population": 1}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Missing name"}));
    Ok(())
}

#[tokio::test]
async fn e2e_deleting_state_removes_its_cities() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let st = create_state(&app, "Texas").await?;
    let st_id = st["id"].as_str().unwrap_or_default();
    let austin = create_city(&app, st_id, "Austin").await?;

    let res = c.delete(format!("{}/states/{}", app.base_url, st_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c
        .get(format!("{}/cities/{}", app.base_url, austin["id"].as_str().unwrap_or_default()))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_routing_details() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // unmatched route
    let res = c.get(format!("{}/nowhere", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Not found"}));

    // trailing slash and versioned prefix
    let res = c.get(format!("{}/states/", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.get(format!("{}/api/v1/states", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.get(format!("{}/api/v1/nowhere", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_persists_to_storage_file() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create_state(&app, "Ohio").await?;

    let raw: Value = serde_json::from_slice(&tokio::fs::read(&app.data_file).await?)?;
    let key = format!("State.{}", created["id"].as_str().unwrap_or_default());
    assert_eq!(raw[key.as_str()], created);
    Ok(())
}

#[tokio::test]
async fn e2e_metrics_and_openapi() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let _ = c.get(format!("{}/states", app.base_url)).send().await?;

    let res = c.get(format!("{}/metrics", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.text().await?.contains("hbnb_http_requests_total"));

    let res = c.get(format!("{}/api-docs/openapi.json", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let doc = res.json::<Value>().await?;
    assert!(doc["paths"]["/states/{state_id}/cities"].is_object());
    Ok(())
}
