// src/app/fetch.rs
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use reqwest::Client;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::debug;

use super::error::FetchError;
use super::types::{FetchCompletion, RequestId};

/// Upper bound on establishing a connection. The response itself has no
/// limit unless one is configured.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Network side of the pipeline. Completions are pulled, not pushed, so all
/// pipeline state stays on the caller's thread.
pub trait Transport {
    fn fetch(&mut self, id: RequestId, url: &str);

    /// Abort an outstanding request. Its completion must not be delivered.
    fn abort(&mut self, id: RequestId);

    fn poll_completion(&mut self) -> Option<FetchCompletion>;
}

/// `reqwest` transport. Requests run as tasks on a private runtime and report
/// back over a channel. Aborting a request drops its future, which closes the
/// connection.
pub struct HttpTransport {
    runtime: Runtime,
    client: Client,
    done_tx: Sender<FetchCompletion>,
    done_rx: Receiver<FetchCompletion>,
    running: HashMap<RequestId, JoinHandle<()>>,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .user_agent(user_agent.to_string())
            .connect_timeout(CONNECT_TIMEOUT)
            .default_headers({
                use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
                let mut h = HeaderMap::new();
                h.insert(
                    ACCEPT,
                    HeaderValue::from_static("image/avif,image/webp,image/*;q=0.8,*/*;q=0.5"),
                );
                h
            });
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Transport(format!("http client build: {e}")))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("artpick-fetch")
            .enable_all()
            .build()
            .map_err(|e| FetchError::Transport(format!("fetch runtime: {e}")))?;

        let (done_tx, done_rx) = mpsc::channel();
        Ok(Self {
            runtime,
            client,
            done_tx,
            done_rx,
            running: HashMap::new(),
        })
    }
}

impl Transport for HttpTransport {
    fn fetch(&mut self, id: RequestId, url: &str) {
        let client = self.client.clone();
        let done_tx = self.done_tx.clone();
        let url = url.to_string();

        let handle = self.runtime.spawn(async move {
            let result = fetch_bytes(&client, &url).await;
            let _ = done_tx.send(FetchCompletion { id, result });
        });
        self.running.insert(id, handle);
    }

    fn abort(&mut self, id: RequestId) {
        if let Some(handle) = self.running.remove(&id) {
            debug!(?id, "aborting request");
            handle.abort();
        }
    }

    fn poll_completion(&mut self) -> Option<FetchCompletion> {
        loop {
            match self.done_rx.try_recv() {
                Ok(done) => {
                    // Finished just before abort() reached it.
                    if self.running.remove(&done.id).is_none() {
                        continue;
                    }
                    return Some(done);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return None,
            }
        }
    }
}

async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    if let Some(path) = file_url_to_path(url) {
        return tokio::fs::read(&path)
            .await
            .map_err(|e| FetchError::Io(format!("{}: {e}", path.display())));
    }

    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Transport(format!("GET {url}: {e}")))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    resp.bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| FetchError::Transport(format!("read body: {e}")))
}

/// `file:///a%20b.png` and `file://localhost/a%20b.png` → `/a b.png`.
/// `None` for anything that is not a local file URL.
pub fn file_url_to_path(url: &str) -> Option<PathBuf> {
    let rest = url.strip_prefix("file://")?;
    // Only an empty or `localhost` authority names this machine.
    let rest = if rest.starts_with('/') {
        rest
    } else {
        let after = rest.get(..10).filter(|h| h.eq_ignore_ascii_case("localhost/"))?;
        &rest[after.len() - 1..]
    };
    let decoded = urlencoding::decode(rest).ok()?;
    // file:///C:/x on Windows
    let trimmed = if cfg!(windows) {
        decoded.trim_start_matches('/').to_string()
    } else {
        decoded.into_owned()
    };
    if trimmed.trim_matches('/').is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::VecDeque;

    use super::*;

    /// Records requests; tests deliver completions by hand.
    #[derive(Debug, Default)]
    pub struct FakeTransport {
        pub started: Vec<(RequestId, String)>,
        pub aborted: Vec<RequestId>,
        pub ready: VecDeque<FetchCompletion>,
    }

    impl FakeTransport {
        pub fn last(&self) -> Option<&(RequestId, String)> {
            self.started.last()
        }
    }

    impl Transport for FakeTransport {
        fn fetch(&mut self, id: RequestId, url: &str) {
            self.started.push((id, url.to_string()));
        }

        fn abort(&mut self, id: RequestId) {
            self.aborted.push(id);
        }

        fn poll_completion(&mut self) -> Option<FetchCompletion> {
            self.ready.pop_front()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{ErrorKind, Read};
    use std::net::TcpListener;
    use std::time::Instant;

    use super::*;

    #[test]
    fn file_urls_are_decoded() {
        assert_eq!(
            file_url_to_path("file:///tmp/My%20Poster.jpg"),
            Some(PathBuf::from("/tmp/My Poster.jpg"))
        );
        assert_eq!(file_url_to_path("https://example.org/a.jpg"), None);
        assert_eq!(file_url_to_path("file://"), None);
    }

    #[cfg(unix)]
    #[test]
    fn localhost_authority_is_a_local_file() {
        assert_eq!(
            file_url_to_path("file://localhost/tmp/a.png"),
            Some(PathBuf::from("/tmp/a.png"))
        );
        assert_eq!(
            file_url_to_path("file://LOCALHOST/tmp/b%20c.png"),
            Some(PathBuf::from("/tmp/b c.png"))
        );
        assert_eq!(file_url_to_path("file://fileserver/share/a.png"), None);
        assert_eq!(file_url_to_path("file://localhost"), None);
    }

    fn wait_for(t: &mut HttpTransport) -> Option<FetchCompletion> {
        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(5) {
            if let Some(done) = t.poll_completion() {
                return Some(done);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn http_transport_reads_file_urls() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("thumb.png");
        std::fs::write(&p, b"payload").unwrap();

        let mut t = HttpTransport::new("artpick/test", None).unwrap();
        t.fetch(RequestId(1), &format!("file://{}", p.display()));
        let done = wait_for(&mut t).expect("completion");
        assert_eq!(done.id, RequestId(1));
        assert_eq!(done.result.unwrap(), b"payload".to_vec());

        t.fetch(RequestId(2), &format!("file://{}", dir.path().join("nope").display()));
        let done = wait_for(&mut t).expect("completion");
        assert!(matches!(done.result, Err(FetchError::Io(_))));
    }

    #[test]
    fn aborted_requests_never_complete() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("thumb.png");
        std::fs::write(&p, b"payload").unwrap();

        let mut t = HttpTransport::new("artpick/test", None).unwrap();
        t.fetch(RequestId(7), &format!("file://{}", p.display()));
        t.abort(RequestId(7));
        std::thread::sleep(Duration::from_millis(100));
        assert!(t.poll_completion().is_none());
    }

    #[test]
    fn non_success_status_is_reported_as_status() {
        use std::io::Write;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = conn.read(&mut buf);
            conn.write_all(b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .unwrap();
        });

        let mut t = HttpTransport::new("artpick/test", None).unwrap();
        t.fetch(RequestId(4), &format!("http://{addr}/missing.png"));
        let done = wait_for(&mut t).expect("completion");
        assert_eq!(done.result, Err(FetchError::Status(404)));
        server.join().unwrap();
    }

    #[test]
    fn abort_hangs_up_on_a_server_that_never_answers() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let mut t = HttpTransport::new("artpick/test", None).unwrap();
        t.fetch(RequestId(3), &format!("http://{addr}/slow.png"));

        let (mut conn, _) = listener.accept().unwrap();
        conn.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 512];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = conn.read(&mut buf).unwrap();
            assert!(n > 0, "client hung up before sending a request");
            request.extend_from_slice(&buf[..n]);
        }
        assert!(t.poll_completion().is_none());

        t.abort(RequestId(3));

        // No response was ever sent, so the only way this read ends is the
        // client closing its side.
        match conn.read(&mut buf) {
            Ok(0) => {}
            Err(e) if e.kind() == ErrorKind::ConnectionReset => {}
            other => panic!("connection still open after abort: {other:?}"),
        }
        std::thread::sleep(Duration::from_millis(50));
        assert!(t.poll_completion().is_none());
    }
}
