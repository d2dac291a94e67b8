use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves one canned reply per connection, in order, and returns the request
/// heads it received once every reply has been sent.
pub async fn start_server(
    replies: Vec<(&'static str, String)>,
) -> (SocketAddr, tokio::task::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let mut heads = Vec::new();
        for (status_line, body) in replies {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            // Drain the whole request so closing the socket does not reset it.
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 {
                    break;
                }
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    if request.len() >= end + 4 + content_length(&request[..end]) {
                        break;
                    }
                }
            }
            heads.push(String::from_utf8_lossy(&request).into_owned());
            let headers = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(headers.as_bytes()).await.unwrap();
            stream.write_all(body.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        }
        heads
    });
    (addr, handle)
}

pub fn api_base(addr: SocketAddr) -> String {
    format!("http://{addr}/v1beta")
}

fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}
