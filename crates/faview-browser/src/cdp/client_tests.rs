use super::*;

fn page(id: &str, url: &str) -> PageInfo {
    PageInfo {
        id: id.to_string(),
        page_type: "page".to_string(),
        title: String::new(),
        url: url.to_string(),
    }
}

#[test]
fn test_request_id_increment() {
    let id = AtomicU64::new(1);
    assert_eq!(id.fetch_add(1, Ordering::SeqCst), 1);
    assert_eq!(id.fetch_add(1, Ordering::SeqCst), 2);
    assert_eq!(id.load(Ordering::SeqCst), 3);
}

#[test]
fn test_select_page_by_prefix() {
    let pages = vec![
        page("a", "https://example.com/"),
        page("b", "https://www.pixiv.net/users/1"),
        page("c", "https://www.pixiv.net/"),
    ];
    let selected = select_page(pages, "https://www.pixiv.net/").unwrap();
    assert_eq!(selected.id, "b");
}

#[test]
fn test_select_page_none() {
    let pages = vec![page("a", "about:blank")];
    assert!(select_page(pages, "https://www.pixiv.net/").is_none());
}

#[tokio::test]
async fn test_dispatch_routes_response() {
    let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
    let (tx, rx) = oneshot::channel();
    pending.lock().insert(7, tx);

    let resp: CdpResponse = serde_json::from_str(r#"{"id": 7, "result": {"ok": true}}"#).unwrap();
    CdpClient::dispatch(resp, &pending);

    let value = rx.await.unwrap().unwrap();
    assert_eq!(value["ok"], true);
    assert!(pending.lock().is_empty());
}

#[tokio::test]
async fn test_dispatch_routes_protocol_error() {
    let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
    let (tx, rx) = oneshot::channel();
    pending.lock().insert(3, tx);

    let resp: CdpResponse =
        serde_json::from_str(r#"{"id": 3, "error": {"code": -32000, "message": "No target"}}"#).unwrap();
    CdpClient::dispatch(resp, &pending);

    let err = rx.await.unwrap().unwrap_err();
    assert!(matches!(err, CdpError::Protocol { code: -32000, .. }));
}

#[test]
fn test_dispatch_ignores_events() {
    let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
    let (tx, _rx) = oneshot::channel();
    pending.lock().insert(1, tx);

    let resp: CdpResponse = serde_json::from_str(r#"{"method": "Page.loadEventFired", "params": {}}"#).unwrap();
    CdpClient::dispatch(resp, &pending);
    assert_eq!(pending.lock().len(), 1);
}

#[tokio::test]
async fn test_connect_unreachable() {
    let result = CdpClient::connect("http://127.0.0.1:1", Duration::from_secs(1)).await;
    assert!(matches!(result, Err(CdpError::ChromeNotAvailable(_))));
}

#[tokio::test]
async fn test_connect_rejects_malformed_endpoint() {
    match CdpClient::connect("localhost-9222", Duration::from_secs(1)).await {
        Err(CdpError::ConnectionFailed(msg)) => assert!(msg.contains("Invalid URL")),
        _ => panic!("expected ConnectionFailed"),
    }

    match CdpClient::connect("ws://localhost:9222", Duration::from_secs(1)).await {
        Err(CdpError::ConnectionFailed(msg)) => assert!(msg.contains("scheme")),
        _ => panic!("expected ConnectionFailed"),
    }
}
