//! End-to-end runs of the `electron-probe` binary against an in-process mock
//! inspector serving `/json/list` and per-target WebSocket sessions.

use std::net::SocketAddr;
use std::process::Output;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

type Reply = dyn Fn(&str, &Value) -> Value + Send + Sync;

struct MockState {
	targets: Vec<Value>,
	reply: Box<Reply>,
	list_hits: AtomicUsize,
	sessions: Mutex<Vec<String>>,
	requests: Mutex<Vec<Value>>,
}

struct MockInspector {
	address: String,
	state: Arc<MockState>,
}

impl MockInspector {
	/// Starts a listener. `targets` are `(id, kind, title, url)`; `reply` maps
	/// the session's target id and request params to the `result` payload.
	async fn start<F>(targets: &[(&str, &str, &str, &str)], reply: F) -> Result<Self>
	where
		F: Fn(&str, &Value) -> Value + Send + Sync + 'static,
	{
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr: SocketAddr = listener.local_addr()?;

		let targets = targets
			.iter()
			.map(|(id, kind, title, url)| {
				json!({
					"id": id,
					"type": kind,
					"title": title,
					"url": url,
					"webSocketDebuggerUrl": format!("ws://{addr}/devtools/{kind}/{id}"),
				})
			})
			.collect();

		let state = Arc::new(MockState {
			targets,
			reply: Box::new(reply),
			list_hits: AtomicUsize::new(0),
			sessions: Mutex::new(Vec::new()),
			requests: Mutex::new(Vec::new()),
		});

		let app = Router::new()
			.route("/json/list", get(list))
			.route(
				"/devtools/{kind}/{id}",
				get(
					|Path((_kind, id)): Path<(String, String)>, ws: WebSocketUpgrade, State(state): State<Arc<MockState>>| async move {
						ws.on_upgrade(move |socket| session(socket, id, state))
					},
				),
			)
			.with_state(state.clone());

		tokio::spawn(async move {
			let _ = axum::serve(listener, app.into_make_service()).await;
		});

		Ok(Self {
			address: format!("http://{addr}"),
			state,
		})
	}

	fn list_hits(&self) -> usize {
		self.state.list_hits.load(Ordering::SeqCst)
	}

	fn sessions(&self) -> Vec<String> {
		self.state.sessions.lock().unwrap().clone()
	}

	fn requests(&self) -> Vec<Value> {
		self.state.requests.lock().unwrap().clone()
	}
}

async fn list(State(state): State<Arc<MockState>>) -> Json<Vec<Value>> {
	state.list_hits.fetch_add(1, Ordering::SeqCst);
	Json(state.targets.clone())
}

async fn session(mut socket: WebSocket, id: String, state: Arc<MockState>) {
	state.sessions.lock().unwrap().push(id.clone());

	while let Some(Ok(message)) = socket.recv().await {
		let text = match message {
			Message::Text(text) => text,
			Message::Close(_) => break,
			_ => continue,
		};
		let Ok(request) = serde_json::from_str::<Value>(text.as_str()) else {
			continue;
		};
		let result = (state.reply)(&id, &request["params"]);
		state.requests.lock().unwrap().push(request.clone());

		let response = json!({"id": request["id"], "result": result});
		if socket.send(Message::Text(response.to_string().into())).await.is_err() {
			break;
		}
	}
}

/// Reply with the evaluating target's id as a string value.
fn echo_target_id(id: &str, _params: &Value) -> Value {
	json!({"result": {"type": "string", "value": id}})
}

async fn probe(args: &[&str]) -> Result<Output> {
	tokio::process::Command::new(env!("CARGO_BIN_EXE_electron-probe"))
		.args(args)
		.env_remove("RUST_LOG")
		.output()
		.await
		.context("failed to run electron-probe")
}

fn stdout(output: &Output) -> String {
	String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
	String::from_utf8_lossy(&output.stderr).into_owned()
}

const SLACK: &[(&str, &str, &str, &str)] = &[
	("n1", "node", "main.js", "file:///usr/lib/slack/resources/app.asar/dist/main.js"),
	("p1", "page", "Slack", "https://app.slack.com/client"),
	("p2", "page", "Example", "https://example.com/home"),
];

#[tokio::test]
async fn node_expression_prints_value() -> Result<()> {
	let mock = MockInspector::start(SLACK, |_, _| json!({"result": {"type": "number", "value": 2, "description": "2"}})).await?;

	let output = probe(&["-inspect-target", &mock.address, "-target-type", "node", "-eval", "1+1"]).await?;

	assert!(output.status.success(), "stderr: {}", stderr(&output));
	assert_eq!(stdout(&output), "2\n");
	assert!(stderr(&output).contains("Target: main.js (file:///usr/lib/slack/resources/app.asar/dist/main.js)"));
	assert_eq!(mock.sessions(), ["n1"]);

	let requests = mock.requests();
	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0]["method"], "Runtime.evaluate");
	assert_eq!(requests[0]["params"], json!({"expression": "1+1", "awaitPromise": true, "replMode": true}));
	Ok(())
}

#[tokio::test]
async fn auto_prefers_node_target() -> Result<()> {
	let mock = MockInspector::start(SLACK, echo_target_id).await?;

	let output = probe(&["-inspect-target", &mock.address, "-eval", "1"]).await?;

	assert!(output.status.success(), "stderr: {}", stderr(&output));
	assert_eq!(stdout(&output), "n1\n");
	Ok(())
}

#[tokio::test]
async fn auto_falls_back_to_first_page() -> Result<()> {
	let targets = &[
		("p1", "page", "Slack", "https://app.slack.com/client"),
		("p2", "page", "Example", "https://example.com/home"),
	];
	let mock = MockInspector::start(targets, echo_target_id).await?;

	let output = probe(&["-inspect-target", &mock.address, "-eval", "1"]).await?;

	assert!(output.status.success(), "stderr: {}", stderr(&output));
	assert_eq!(stdout(&output), "p1\n");
	Ok(())
}

#[tokio::test]
async fn page_filter_selects_first_match() -> Result<()> {
	let targets = &[
		("n1", "node", "main.js", "file:///app/main.js"),
		("p1", "page", "Docs", "https://example.com/docs"),
		("p2", "page", "Home", "https://example.com/home"),
	];
	let mock = MockInspector::start(targets, echo_target_id).await?;

	let output = probe(&["-inspect-target", &mock.address, "-target-type", "page", "-url-filter", "example.com", "-eval", "document.title"]).await?;

	assert!(output.status.success(), "stderr: {}", stderr(&output));
	assert_eq!(stdout(&output), "p1\n");
	assert_eq!(mock.sessions(), ["p1"]);
	Ok(())
}

#[tokio::test]
async fn unmatched_page_filter_fails_without_session() -> Result<()> {
	let mock = MockInspector::start(SLACK, echo_target_id).await?;

	let output = probe(&["-inspect-target", &mock.address, "-target-type", "page", "-url-filter", "nowhere.invalid", "-eval", "1"]).await?;

	assert!(!output.status.success());
	assert!(stderr(&output).contains("no page target matching URL filter"), "stderr: {}", stderr(&output));
	assert_eq!(stdout(&output), "");
	assert!(mock.sessions().is_empty());
	Ok(())
}

#[tokio::test]
async fn script_exception_reports_position() -> Result<()> {
	let mock = MockInspector::start(SLACK, |_, _| {
		json!({
			"result": {"type": "object", "subtype": "error", "className": "ReferenceError", "description": "ReferenceError: x is not defined\n    at <anonymous>:3:5"},
			"exceptionDetails": {
				"exceptionId": 1,
				"text": "Uncaught",
				"lineNumber": 3,
				"columnNumber": 5,
				"exception": {"type": "object", "subtype": "error", "className": "ReferenceError", "description": "ReferenceError: x is not defined"}
			}
		})
	})
	.await?;

	let output = probe(&["-inspect-target", &mock.address, "-eval", "x"]).await?;

	assert!(!output.status.success());
	assert_eq!(stdout(&output), "");
	let err = stderr(&output);
	assert!(err.contains("Exception(line 3, col 5): ReferenceError: x is not defined"), "stderr: {err}");
	Ok(())
}

#[tokio::test]
async fn list_prints_every_target_without_evaluating() -> Result<()> {
	let mock = MockInspector::start(SLACK, echo_target_id).await?;

	let output = probe(&["-inspect-target", &mock.address, "-list"]).await?;

	assert!(output.status.success(), "stderr: {}", stderr(&output));
	assert_eq!(
		stdout(&output),
		"Available targets:\n\
		 \x20 [0] main.js (node)\n\
		 \x20     URL: file:///usr/lib/slack/resources/app.asar/dist/main.js\n\
		 \x20 [1] Slack (page)\n\
		 \x20     URL: https://app.slack.com/client\n\
		 \x20 [2] Example (page)\n\
		 \x20     URL: https://example.com/home\n"
	);
	assert_eq!(mock.list_hits(), 1);
	assert!(mock.sessions().is_empty());
	Ok(())
}

#[tokio::test]
async fn list_as_json() -> Result<()> {
	let mock = MockInspector::start(SLACK, echo_target_id).await?;

	let output = probe(&["-inspect-target", &mock.address, "-list", "-f", "json"]).await?;

	assert!(output.status.success(), "stderr: {}", stderr(&output));
	let listed: Value = serde_json::from_str(&stdout(&output))?;
	let ids: Vec<_> = listed.as_array().context("expected array")?.iter().map(|t| t["id"].clone()).collect();
	assert_eq!(ids, [json!("n1"), json!("p1"), json!("p2")]);
	Ok(())
}

#[tokio::test]
async fn unknown_target_type_never_contacts_listener() -> Result<()> {
	let mock = MockInspector::start(SLACK, echo_target_id).await?;

	let output = probe(&["-inspect-target", &mock.address, "-target-type", "worker", "-eval", "1"]).await?;

	assert!(!output.status.success());
	assert!(stderr(&output).contains("unknown target type: worker"), "stderr: {}", stderr(&output));
	assert_eq!(mock.list_hits(), 0);
	Ok(())
}

#[tokio::test]
async fn missing_inspect_target_is_fatal() -> Result<()> {
	let output = probe(&["-eval", "1"]).await?;

	assert!(!output.status.success());
	assert!(stderr(&output).contains("Must specify -inspect-target"));
	assert_eq!(stdout(&output), "");
	Ok(())
}

#[tokio::test]
async fn missing_script_and_eval_is_fatal() -> Result<()> {
	let mock = MockInspector::start(SLACK, echo_target_id).await?;

	let output = probe(&["-inspect-target", &mock.address]).await?;

	assert!(!output.status.success());
	assert!(stderr(&output).contains("Must specify -script or -eval"));
	assert_eq!(mock.list_hits(), 0);
	Ok(())
}

#[tokio::test]
async fn script_file_is_sent_verbatim() -> Result<()> {
	let mock = MockInspector::start(SLACK, |_, _| json!({"result": {"type": "string", "value": "hello\nworld"}})).await?;
	let dir = tempfile::tempdir()?;
	let script = dir.path().join("greet.js");
	std::fs::write(&script, "'hello\\nworld'\n")?;
	let script = script.to_str().context("non-utf8 temp path")?;

	let output = probe(&["-inspect-target", &mock.address, "-target-type", "node", "-script", script]).await?;

	assert!(output.status.success(), "stderr: {}", stderr(&output));
	assert_eq!(stdout(&output), "hello\nworld\n");
	assert_eq!(mock.requests()[0]["params"]["expression"], "'hello\\nworld'\n");
	Ok(())
}

#[tokio::test]
async fn missing_script_file_is_fatal() -> Result<()> {
	let mock = MockInspector::start(SLACK, echo_target_id).await?;
	let dir = tempfile::tempdir()?;
	let missing = dir.path().join("absent.js");
	let missing = missing.to_str().context("non-utf8 temp path")?;

	let output = probe(&["-inspect-target", &mock.address, "-script", missing]).await?;

	assert!(!output.status.success());
	assert!(stderr(&output).contains("absent.js"), "stderr: {}", stderr(&output));
	assert_eq!(mock.list_hits(), 0);
	Ok(())
}

#[tokio::test]
async fn double_dash_flags_and_json_output() -> Result<()> {
	let mock = MockInspector::start(SLACK, |_, _| json!({"result": {"type": "object", "value": {"ok": true}}})).await?;

	let output = probe(&["--inspect-target", &mock.address, "--target-type=node", "--eval", "({ok: true})", "--format", "json"]).await?;

	assert!(output.status.success(), "stderr: {}", stderr(&output));
	let record: Value = serde_json::from_str(&stdout(&output))?;
	assert_eq!(record["value"], r#"{"ok":true}"#);
	assert_eq!(record["target"]["id"], "n1");
	Ok(())
}

#[tokio::test]
async fn embedded_scripts_are_listed() -> Result<()> {
	let output = probe(&["-scripts"]).await?;

	assert!(output.status.success(), "stderr: {}", stderr(&output));
	assert!(stdout(&output).lines().any(|l| l == "scripts/page_info.js"));
	Ok(())
}

#[tokio::test]
async fn unreachable_listener_is_fatal() -> Result<()> {
	let listener = TcpListener::bind("127.0.0.1:0").await?;
	let address = format!("http://{}", listener.local_addr()?);
	drop(listener);

	let output = probe(&["-inspect-target", &address, "-eval", "1", "-timeout-ms", "2000"]).await?;

	assert!(!output.status.success());
	assert!(stderr(&output).contains("Error [DISCOVERY]"), "stderr: {}", stderr(&output));
	Ok(())
}
