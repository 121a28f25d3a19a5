//! Fake collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use serde_json::json;
use tableview_lib::error::Error;
use tableview_lib::error::TransportError;
use tableview_lib::form::Form;
use tableview_lib::form::FormPayload;
use tableview_lib::grid::Column;
use tableview_lib::grid::GridEvents;
use tableview_lib::grid::GridView;
use tableview_lib::grid::GridViewModel;
use tableview_lib::modal::ModalPresenter;
use tableview_lib::modal::ShellId;
use tableview_lib::report::ErrorSink;
use tableview_lib::report::GridOperation;
use tableview_lib::transport::Params;
use tableview_lib::transport::Transport;
use tokio::sync::oneshot;

pub const BASE: &str = "http://grid.test/users";

pub fn endpoint(action: &str) -> String {
    format!("{}/{}/", BASE, action)
}

/// A list response body.
pub fn list_body(page: u32, total_pages: u32, ids: &[u64]) -> Value {
    let rows: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "data": {"name": format!("user {}", id)}}))
        .collect();
    json!({"rows": rows, "page": page, "total_pages": total_pages})
}

pub const USER_FORM: &str = r#"
    <form>
      <input type="hidden" name="id" value="">
      <label for="f-name">Name</label><input id="f-name" name="name" value="">
      <input name="email" value="">
    </form>
"#;

// =============================================================================
// Transport
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// A request seen by [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub url: String,
    pub params: Vec<(String, String)>,
    pub payload: Option<FormPayload>,
}

impl Call {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// What a scripted request answers with.
#[derive(Debug, Clone)]
pub enum Body {
    Json(Value),
    Text(String),
    Status(u16),
}

struct Reply {
    body: Body,
    gate: Option<oneshot::Receiver<()>>,
}

/// Transport answering from per-endpoint queues of scripted replies.
///
/// Requests without a scripted reply fail with HTTP 404.
#[derive(Default)]
pub struct ScriptedTransport {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, method: Method, url: impl Into<String>, body: Body) {
        self.push(method, url.into(), body, None);
    }

    /// Scripts a reply that is held back until the returned sender fires.
    pub fn reply_gated(
        &self,
        method: Method,
        url: impl Into<String>,
        body: Body,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(method, url.into(), body, Some(rx));
        tx
    }

    fn push(&self, method: Method, url: String, body: Body, gate: Option<oneshot::Receiver<()>>) {
        self.replies
            .lock()
            .unwrap()
            .entry((method, url))
            .or_default()
            .push_back(Reply { body, gate });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.method == method && call.url == url)
            .count()
    }

    pub fn last(&self, method: Method, url: &str) -> Option<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|call| call.method == method && call.url == url)
            .cloned()
    }

    async fn answer(&self, call: Call) -> Result<Body, TransportError> {
        let key = (call.method, call.url.clone());
        let reply = {
            self.calls.lock().unwrap().push(call);
            self.replies
                .lock()
                .unwrap()
                .get_mut(&key)
                .and_then(VecDeque::pop_front)
        };

        let Some(reply) = reply else {
            return Err(TransportError::http(404, format!("no reply for {}", key.1)));
        };
        if let Some(gate) = reply.gate {
            let _ = gate.await;
        }
        match reply.body {
            Body::Status(status) => Err(TransportError::http(status, "scripted failure")),
            body => Ok(body),
        }
    }
}

fn call(method: Method, url: &str, params: &Params, payload: Option<FormPayload>) -> Call {
    Call {
        method,
        url: url.to_string(),
        params: params.to_vec(),
        payload,
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get_json(&self, url: &str, query: &Params) -> Result<Value, TransportError> {
        match self.answer(call(Method::Get, url, query, None)).await? {
            Body::Json(value) => Ok(value),
            other => Err(TransportError::parse(format!("expected JSON, got {:?}", other))),
        }
    }

    async fn get_text(&self, url: &str, query: &Params) -> Result<String, TransportError> {
        match self.answer(call(Method::Get, url, query, None)).await? {
            Body::Text(text) => Ok(text),
            Body::Json(value) => Ok(value.to_string()),
            Body::Status(_) => unreachable!("statuses are answered as errors"),
        }
    }

    async fn post_multipart(
        &self,
        url: &str,
        payload: FormPayload,
    ) -> Result<Value, TransportError> {
        match self.answer(call(Method::Post, url, &[], Some(payload))).await? {
            Body::Json(value) => Ok(value),
            other => Err(TransportError::parse(format!("expected JSON, got {:?}", other))),
        }
    }

    async fn post_form(&self, url: &str, fields: &Params) -> Result<(), TransportError> {
        self.answer(call(Method::Post, url, fields, None)).await?;
        Ok(())
    }
}

// =============================================================================
// View
// =============================================================================

/// View recording every render and the event channel it was given.
pub struct RecordingView {
    columns: Vec<Column>,
    renders: Mutex<Vec<GridViewModel>>,
    events: Mutex<Vec<GridEvents>>,
}

impl RecordingView {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            renders: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn renders(&self) -> Vec<GridViewModel> {
        self.renders.lock().unwrap().clone()
    }

    pub fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }

    pub fn last_render(&self) -> Option<GridViewModel> {
        self.renders.lock().unwrap().last().cloned()
    }

    pub fn attach_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Takes the event channel away from the view.
    pub fn take_events(&self) -> Option<GridEvents> {
        self.events.lock().unwrap().pop()
    }
}

impl GridView for RecordingView {
    fn columns(&self) -> Vec<Column> {
        self.columns.clone()
    }

    fn render(&self, model: &GridViewModel) {
        self.renders.lock().unwrap().push(model.clone());
    }

    fn attach(&self, events: GridEvents) {
        self.events.lock().unwrap().push(events);
    }
}

// =============================================================================
// Presenter
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Shown {
    Create(ShellId, String),
    SetBody(ShellId, Form),
    Reveal(ShellId),
    Hide(ShellId),
}

/// Presenter recording every call.
#[derive(Default)]
pub struct RecordingPresenter {
    log: Mutex<Vec<Shown>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Vec<Shown> {
        self.log.lock().unwrap().clone()
    }

    pub fn created(&self) -> usize {
        self.log()
            .iter()
            .filter(|shown| matches!(shown, Shown::Create(..)))
            .count()
    }

    pub fn bodies(&self) -> Vec<Form> {
        self.log()
            .into_iter()
            .filter_map(|shown| match shown {
                Shown::SetBody(_, form) => Some(form),
                _ => None,
            })
            .collect()
    }

    pub fn hidden(&self) -> usize {
        self.log()
            .iter()
            .filter(|shown| matches!(shown, Shown::Hide(_)))
            .count()
    }
}

impl ModalPresenter for RecordingPresenter {
    fn create_shell(&self, id: ShellId, title: &str) {
        self.log
            .lock()
            .unwrap()
            .push(Shown::Create(id, title.to_string()));
    }

    fn set_body(&self, id: ShellId, form: &Form) {
        self.log.lock().unwrap().push(Shown::SetBody(id, form.clone()));
    }

    fn reveal(&self, id: ShellId) {
        self.log.lock().unwrap().push(Shown::Reveal(id));
    }

    fn hide(&self, id: ShellId) {
        self.log.lock().unwrap().push(Shown::Hide(id));
    }
}

// =============================================================================
// Error sink
// =============================================================================

/// Sink remembering every report.
#[derive(Default)]
pub struct CountingSink {
    reports: Mutex<Vec<(GridOperation, String)>>,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<(GridOperation, String)> {
        self.reports.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

impl ErrorSink for CountingSink {
    fn report(&self, operation: GridOperation, error: &Error) {
        self.reports
            .lock()
            .unwrap()
            .push((operation, error.to_string()));
    }
}

/// Yields to the runtime until `done` holds.
pub async fn settle(mut done: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}
