//! A throwaway HTTP server that plays the role of the events webhook in tests

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the fake webhook answers
#[derive(Clone, Debug)]
pub enum Reply {
    Json(u16, String),
    /// Accept the request, but never answer it
    Hang,
}

/// A running fake webhook
pub struct Webhook {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Webhook {
    /// Serve `replies` to successive connections. The last reply is repeated forever.
    pub async fn serve(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/workflows/events/invoke?sig=secret", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            let mut index = 0;
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let reply = replies[index.min(replies.len() - 1)].clone();
                index += 1;

                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    let _ = handle(stream, reply, recorded).await;
                });
            }
        });

        Self { url, requests }
    }

    pub async fn json(status: u16, body: &str) -> Self {
        Self::serve(vec![Reply::Json(status, body.to_string())]).await
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The raw HTTP requests received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// A URL nothing listens on
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/events", listener.local_addr().unwrap());
    drop(listener);
    url
}

async fn handle(mut stream: TcpStream, reply: Reply, recorded: Arc<Mutex<Vec<String>>>) -> std::io::Result<()> {
    let request = read_request(&mut stream).await?;
    recorded.lock().unwrap().push(request);

    match reply {
        Reply::Json(status, body) => {
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status, if status < 400 { "OK" } else { "Error" }, body.len(), body
            );
            stream.write_all(response.as_bytes()).await?;
            stream.flush().await?;
        },
        Reply::Hang => {
            // Returns once the client gives up and closes the connection
            let mut byte = [0u8; 1];
            let _ = stream.read(&mut byte).await;
        },
    }
    Ok(())
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);

        if let Some(end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buffer[..end]).to_lowercase();
            let body_len = head.lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|len| len.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buffer.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    Ok(String::from_utf8_lossy(&buffer).to_string())
}
