//! Wire format of the reqwest transport, checked against a local server.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;

use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tableview_lib::error::TransportError;
use tableview_lib::form::FileUpload;
use tableview_lib::form::FormPayload;
use tableview_lib::transport::HttpTransport;
use tableview_lib::transport::Transport;
use tableview_lib::transport::params;
use tokio::net::TcpListener;

/// A request as the server saw it.
#[derive(Debug, Clone)]
struct Seen {
    method: String,
    path: String,
    query: Option<String>,
    content_type: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Seen>>>;

fn route(method: &str, path: &str) -> (StatusCode, &'static str) {
    match (method, path) {
        ("GET", "/users/list/") => (
            StatusCode::OK,
            r#"{"rows":[{"id":1,"data":{"name":"Ada"}}],"page":2,"total_pages":4,"total_rows":31}"#,
        ),
        ("GET", "/users/add/") => (StatusCode::OK, r#"<input name="name">"#),
        ("POST", "/users/add/") => (StatusCode::OK, r#"{"success":true}"#),
        ("POST", "/users/delete/") => (StatusCode::NO_CONTENT, ""),
        ("GET", "/users/broken/") => (StatusCode::OK, "not json"),
        ("POST", "/users/locked/") => (StatusCode::CONFLICT, ""),
        _ => (StatusCode::NOT_FOUND, "no such endpoint"),
    }
}

async fn handle(req: Request<Incoming>, log: Log) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let content_type = req
        .headers()
        .get(hyper::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = match req.into_body().collect().await {
        Ok(collected) => String::from_utf8_lossy(&collected.to_bytes()).into_owned(),
        Err(_) => String::new(),
    };

    let (status, reply) = route(&method, &path);
    log.lock().unwrap().push(Seen {
        method,
        path,
        query,
        content_type,
        body,
    });

    Ok(Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(reply)))
        .unwrap())
}

async fn serve() -> (String, Log) {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let server_log = Arc::clone(&log);
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let log = Arc::clone(&server_log);
            tokio::spawn(async move {
                let service = service_fn(move |req| handle(req, Arc::clone(&log)));
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    (format!("http://{}/users/", addr), log)
}

fn transport() -> HttpTransport {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpTransport::builder().http_client(client).build().unwrap()
}

fn last(log: &Log) -> Seen {
    log.lock().unwrap().last().cloned().unwrap()
}

#[tokio::test]
async fn test_get_json_sends_query() {
    let (base, log) = serve().await;
    let transport = transport();

    let body = transport
        .get_json(
            &format!("{}list/", base),
            &params([("page", "2"), ("total", "25")]),
        )
        .await
        .unwrap();

    assert_eq!(body["total_pages"], 4);
    let seen = last(&log);
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.path, "/users/list/");
    assert_eq!(seen.query.as_deref(), Some("page=2&total=25"));
}

#[tokio::test]
async fn test_get_text_returns_fragment() {
    let (base, log) = serve().await;
    let transport = transport();

    let body = transport
        .get_text(&format!("{}add/", base), &[])
        .await
        .unwrap();

    assert_eq!(body, r#"<input name="name">"#);
    assert_eq!(last(&log).query, None);
}

#[tokio::test]
async fn test_post_multipart_sends_parts() {
    let (base, log) = serve().await;
    let transport = transport();
    let mut payload = FormPayload::new();
    payload.push_text("name", "Ada Lovelace");
    payload.push_file("notes", FileUpload::new("notes.txt", b"engine".to_vec()));

    let body = transport
        .post_multipart(&format!("{}add/", base), payload)
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    let seen = last(&log);
    assert_eq!(seen.method, "POST");
    assert!(
        seen.content_type
            .as_deref()
            .is_some_and(|value| value.starts_with("multipart/form-data; boundary="))
    );
    assert!(seen.body.contains(r#"name="name""#));
    assert!(seen.body.contains("Ada Lovelace"));
    assert!(seen.body.contains(r#"filename="notes.txt""#));
    assert!(seen.body.contains("Content-Type: text/plain"));
    assert!(seen.body.contains("engine"));
}

#[tokio::test]
async fn test_post_form_is_urlencoded() {
    let (base, log) = serve().await;
    let transport = transport();

    transport
        .post_form(&format!("{}delete/", base), &params([("id", "a 7")]))
        .await
        .unwrap();

    let seen = last(&log);
    assert_eq!(
        seen.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(seen.body, "id=a+7");
}

#[tokio::test]
async fn test_error_status_maps_to_http_error() {
    let (base, _log) = serve().await;
    let transport = transport();

    let err = transport
        .get_json(&format!("{}missing/", base), &[])
        .await
        .unwrap_err();
    match err {
        TransportError::Http { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "no such endpoint");
        }
        other => panic!("expected an HTTP error, got {:?}", other),
    }

    let err = transport
        .post_form(&format!("{}locked/", base), &[])
        .await
        .unwrap_err();
    match err {
        TransportError::Http { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "Conflict");
        }
        other => panic!("expected an HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unparseable_body_keeps_raw_text() {
    let (base, _log) = serve().await;
    let transport = transport();

    let err = transport
        .get_json(&format!("{}broken/", base), &[])
        .await
        .unwrap_err();

    match err {
        TransportError::Parse { body, .. } => assert_eq!(body.as_deref(), Some("not json")),
        other => panic!("expected a parse error, got {:?}", other),
    }
}
