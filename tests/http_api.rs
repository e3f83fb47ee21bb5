// HttpApplianceApi against a local server that answers a single request

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use dnsfilter_console::core::{Collection, CollectionKind, Device, Site};
use dnsfilter_console::operations::{
    execute, ApiRequest, ApplianceApi, HttpApplianceApi, Outcome, SyncError,
};

/// Serve one canned response; the task resolves to the raw request text
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });

    (format!("http://{addr}"), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn body_of(request: &str) -> &str {
    request.split("\r\n\r\n").nth(1).unwrap_or("")
}

#[tokio::test]
async fn fetch_sites_decodes_json_records() {
    let (base, server) = serve_once("200 OK", r#"[{"name":"news.example.org"},"docs.rs"]"#).await;
    let api = HttpApplianceApi::new(&base).unwrap();

    let sites = api.fetch(CollectionKind::Sites).await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("GET /sites HTTP/1.1"));
    assert_eq!(
        sites,
        Collection::Sites(vec![
            Site {
                name: "news.example.org".to_string()
            },
            Site {
                name: "docs.rs".to_string()
            },
        ])
    );
}

#[tokio::test]
async fn fetch_domains_accepts_plain_text_listing() {
    let (base, server) = serve_once("200 OK", "ads.com\ntracker.net\n").await;
    let api = HttpApplianceApi::new(&base).unwrap();

    let domains = api.fetch(CollectionKind::Domains).await.unwrap();
    server.await.unwrap();

    assert_eq!(domains.names(), vec!["ads.com", "tracker.net", ""]);
}

#[tokio::test]
async fn add_posts_the_kind_specific_form_field() {
    let (base, server) = serve_once("200 OK", "").await;
    let api = HttpApplianceApi::new(&base).unwrap();

    api.add(CollectionKind::Domains, "ads.com").await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("POST /domains HTTP/1.1"));
    assert!(request
        .to_ascii_lowercase()
        .contains("content-type: application/x-www-form-urlencoded"));
    assert_eq!(body_of(&request), "domain=ads.com");
}

#[tokio::test]
async fn remove_escapes_the_entry_name() {
    let (base, server) = serve_once("204 No Content", "").await;
    let api = HttpApplianceApi::new(&base).unwrap();

    api.remove(CollectionKind::Sites, "a b.org").await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("DELETE /sites/a%20b.org HTTP/1.1"));
}

#[tokio::test]
async fn toggle_posts_capitalised_flag() {
    let (base, server) = serve_once("200 OK", "").await;
    let api = HttpApplianceApi::new(&base).unwrap();

    let outcome = execute(
        &api,
        &ApiRequest::SetFiltered {
            device: "d1".to_string(),
            value: false,
        },
    )
    .await
    .unwrap();
    let request = server.await.unwrap();

    assert_eq!(outcome, Outcome::Applied);
    assert!(request.starts_with("POST /devices/d1/is_filtered HTTP/1.1"));
    assert_eq!(body_of(&request), "value=False");
}

#[tokio::test]
async fn rename_posts_display_name() {
    let (base, server) = serve_once("200 OK", "").await;
    let api = HttpApplianceApi::new(&base).unwrap();

    api.rename_device("d1", "Kids Tablet").await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("POST /devices/d1/display_name HTTP/1.1"));
    assert_eq!(body_of(&request), "value=Kids+Tablet");
}

#[tokio::test]
async fn error_status_is_reported_with_code() {
    let (base, server) = serve_once("500 Internal Server Error", "boom").await;
    let api = HttpApplianceApi::new(&base).unwrap();

    let err = api.fetch(CollectionKind::Devices).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, SyncError::Status { status: 500, .. }));
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn device_listing_normalizes_flags() {
    let body = r#"[{"name":"d1","display_name":"Laptop","is_filtered":"True"},{"name":"d2","is_filtered":false}]"#;
    let (base, server) = serve_once("200 OK", body).await;
    let api = HttpApplianceApi::new(&base).unwrap();

    let devices = api.fetch(CollectionKind::Devices).await.unwrap();
    server.await.unwrap();

    assert_eq!(
        devices,
        Collection::Devices(vec![
            Device {
                name: "d1".to_string(),
                display_name: "Laptop".to_string(),
                is_filtered: true,
            },
            Device {
                name: "d2".to_string(),
                display_name: String::new(),
                is_filtered: false,
            },
        ])
    );
}
