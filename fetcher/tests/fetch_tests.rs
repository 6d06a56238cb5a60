use fetcher::{build_client, fetch_all, parse_url};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Minimal HTTP/1.1 server: `/missing` is a 404, everything else returns a page naming its path.
async fn serve() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let (mut sock, _) = match listener.accept().await {
                Ok(s) => s,
                Err(_) => return,
            };
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match sock.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let req = String::from_utf8_lossy(&buf);
                let path = req.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = if path == "/missing" {
                    ("404 Not Found", String::from("gone"))
                } else {
                    ("200 OK", format!("<html><head><script>secret()</script></head><body><h1>{path}</h1></body></html>"))
                };
                let resp = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = sock.write_all(resp.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn fetches_in_input_order_and_reports_failures() {
    let base = serve().await;
    let urls: Vec<_> = ["/b", "/missing", "/a"].iter().map(|p| parse_url(&format!("{base}{p}")).unwrap()).collect();
    let client = build_client("test", Duration::from_secs(5)).unwrap();

    let results = fetch_all(&client, &urls, 2).await;
    assert_eq!(results.len(), 3);

    let first = results[0].as_ref().unwrap();
    assert!(first.html.contains("<h1>/b</h1>"));
    assert!(!first.html.contains("secret"));
    assert!(first.url.ends_with("/b"));
    assert!(results[1].is_err());
    assert!(results[2].as_ref().unwrap().html.contains("<h1>/a</h1>"));
}
