use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn cfaq_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    path.pop();
    path.push("cfaq");
    path
}

/// Kills the server process when the test ends, pass or fail.
struct ServerGuard {
    child: Child,
    _tmp: TempDir,
    base_url: String,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn free_port() -> u16 {
    // Bind to port 0, take the assigned port, and release it for the server.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn start_server() -> ServerGuard {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    let port = free_port();

    let config_content = format!(
        r#"[db]
path = "{}/data/cfaq.sqlite"

[server]
bind = "127.0.0.1:{}"

[translation]
timeout_secs = 1
cache_ttl_secs = 60
libretranslate_url = "http://127.0.0.1:9/translate"
mymemory_url = "http://127.0.0.1:9/get"
"#,
        root.display(),
        port
    );

    let config_path = root.join("cfaq.toml");
    fs::write(&config_path, config_content).unwrap();

    let init = Command::new(cfaq_binary())
        .arg("--config")
        .arg(&config_path)
        .arg("init")
        .output()
        .unwrap();
    assert!(init.status.success(), "init failed: {:?}", init);

    let child = Command::new(cfaq_binary())
        .arg("--config")
        .arg(&config_path)
        .args(["serve", "http"])
        .spawn()
        .unwrap();

    let base_url = format!("http://127.0.0.1:{}", port);
    let guard = ServerGuard {
        child,
        _tmp: tmp,
        base_url,
    };

    // Wait for /health to come up.
    let client = reqwest::blocking::Client::new();
    let deadline = Instant::now() + Duration::from_secs(15);
    loop {
        if let Ok(resp) = client.get(format!("{}/health", guard.base_url)).send() {
            if resp.status().is_success() {
                break;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become healthy in time");
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    guard
}

fn client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap()
}

#[test]
fn test_health() {
    let server = start_server();
    let resp: serde_json::Value = client()
        .get(format!("{}/health", server.base_url))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(resp["status"], "ok");
    assert!(resp["version"].is_string());
    assert!(resp["cache_entries"].is_number());
}

#[test]
fn test_query_answers_from_corpus() {
    let server = start_server();
    let resp = client()
        .post(format!("{}/query", server.base_url))
        .json(&serde_json::json!({ "query": "library hours" }))
        .send()
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["success"], true);
    assert!(body["answer"].as_str().unwrap().contains("9:00 AM to 5:00 PM"));
    assert_eq!(body["matchedQuestion"], "What are the library hours?");
    assert_eq!(body["language"], "en");
    assert_eq!(body["detectedLanguage"], "en");
    assert_eq!(body["translated"], false);
}

#[test]
fn test_query_blank_is_bad_request() {
    let server = start_server();
    let resp = client()
        .post(format!("{}/query", server.base_url))
        .json(&serde_json::json!({ "query": "   " }))
        .send()
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[test]
fn test_query_escalates_and_resolve_publishes() {
    let server = start_server();
    let c = client();

    // Unmatched query: deferred response, record lands in the open queue.
    let body: serde_json::Value = c
        .post(format!("{}/query", server.base_url))
        .json(&serde_json::json!({
            "query": "zzqq unmatched question text",
            "userEmail": "s@example.edu"
        }))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(body["success"], true);
    assert!(body["answer"].as_str().unwrap().contains("sent to the admin team"));
    assert_eq!(body["matchedQuestion"], serde_json::Value::Null);

    let list: serde_json::Value = c
        .get(format!("{}/admin/queries?status=open", server.base_url))
        .send()
        .unwrap()
        .json()
        .unwrap();
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["question"], "zzqq unmatched question text");
    assert_eq!(items[0]["status"], "open");
    assert_eq!(items[0]["published"], false);
    assert_eq!(items[0]["user_email"], "s@example.edu");
    let id = items[0]["id"].as_str().unwrap().to_string();

    // Blank response text is rejected.
    let resp = c
        .post(format!("{}/admin/queries/{}/resolve", server.base_url, id))
        .json(&serde_json::json!({ "response": "  " }))
        .send()
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Unknown id is a 404.
    let resp = c
        .post(format!("{}/admin/queries/{}/resolve", server.base_url, "no-such-id"))
        .json(&serde_json::json!({ "response": "ok" }))
        .send()
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Proper resolve publishes the record.
    let body: serde_json::Value = c
        .post(format!("{}/admin/queries/{}/resolve", server.base_url, id))
        .json(&serde_json::json!({ "response": "The office opens at 9." }))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["item"]["status"], "resolved");
    assert_eq!(body["item"]["published"], true);
    assert_eq!(body["item"]["response"], "The office opens at 9.");

    let published: serde_json::Value = c
        .get(format!("{}/admin/queries/published", server.base_url))
        .send()
        .unwrap()
        .json()
        .unwrap();
    let items = published["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["question"], "zzqq unmatched question text");
}

#[test]
fn test_query_with_language_hint_degrades_offline() {
    let server = start_server();

    // Translation providers are unreachable in the test config; the
    // answer degrades to English but the call still succeeds.
    let body: serde_json::Value = client()
        .post(format!("{}/query", server.base_url))
        .json(&serde_json::json!({ "query": "library hours", "language": "es" }))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["language"], "es");
    assert_eq!(body["translated"], true);
    assert!(body["answer"].as_str().unwrap().contains("9:00 AM to 5:00 PM"));
    assert_eq!(body["answer"], body["originalAnswer"]);
}

#[test]
fn test_detect_language_endpoint() {
    let server = start_server();
    let c = client();

    let body: serde_json::Value = c
        .post(format!("{}/detect-language", server.base_url))
        .json(&serde_json::json!({ "text": "hola gracias" }))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(body["language"], "es");
    assert_eq!(body["languageName"], "Spanish");

    let resp = c
        .post(format!("{}/detect-language", server.base_url))
        .json(&serde_json::json!({ "text": "" }))
        .send()
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Unknown language hints are rejected up front.
    let resp = c
        .post(format!("{}/query", server.base_url))
        .json(&serde_json::json!({ "query": "library hours", "language": "xx" }))
        .send()
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[test]
fn test_languages_and_corpus_endpoints() {
    let server = start_server();
    let c = client();

    let body: serde_json::Value = c
        .get(format!("{}/languages", server.base_url))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["languages"]["en"], "English");
    assert_eq!(body["languages"]["hi"], "Hindi");

    let body: serde_json::Value = c
        .get(format!("{}/corpus", server.base_url))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 30);

    let status_filter: serde_json::Value = c
        .get(format!("{}/admin/queries?status=bogus", server.base_url))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(status_filter["error"]["code"], "bad_request");
}
