// Shared helpers for integration tests
#![allow(dead_code)]

use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use index_fetch::{FetchError, FetchResult, ObjectBody, ObjectFetcher, ObjectLocation};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, ReadBuf};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Body wrapper recording how many times it is released
pub struct CountingBody<R> {
    inner: R,
    closes: Arc<AtomicUsize>,
}

impl<R: AsyncRead + Unpin> AsyncRead for CountingBody<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl<R> Drop for CountingBody<R> {
    fn drop(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Reader that never yields data
pub struct StalledReader;

impl AsyncRead for StalledReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Pending
    }
}

/// What a [`ScriptedFetcher`] does when opened
#[derive(Debug, Clone)]
pub enum Script {
    Body(Vec<u8>),
    FailAfter(Vec<u8>, io::ErrorKind),
    Stall,
    NotFound,
}

/// Fetcher replaying a fixed script and counting opens and releases
pub struct ScriptedFetcher {
    script: Script,
    pub opens: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
}

impl ScriptedFetcher {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            opens: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn wrap<R: AsyncRead + Unpin + Send + 'static>(&self, inner: R) -> ObjectBody {
        Box::pin(CountingBody {
            inner,
            closes: self.closes.clone(),
        })
    }
}

#[async_trait]
impl ObjectFetcher for ScriptedFetcher {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn open(&self, location: &ObjectLocation) -> FetchResult<ObjectBody> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Body(data) => Ok(self.wrap(io::Cursor::new(data.clone()))),
            Script::FailAfter(prefix, kind) => {
                let mock = tokio_test::io::Builder::new()
                    .read(prefix)
                    .read_error(io::Error::new(*kind, "stream interrupted"))
                    .build();
                Ok(self.wrap(mock))
            }
            Script::Stall => Ok(self.wrap(StalledReader)),
            Script::NotFound => Err(FetchError::not_found(location.clone())),
        }
    }
}

/// Canned response served by [`StubS3`]
#[derive(Debug, Clone)]
pub enum StubResponse {
    Object(Vec<u8>),
    Error {
        status: u16,
        reason: &'static str,
        code: &'static str,
    },
    Truncated {
        declared: usize,
        sent: Vec<u8>,
    },
    Hang,
}

/// Minimal HTTP/1.1 server answering every request with one canned response
pub struct StubS3 {
    endpoint: String,
    requests: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl StubS3 {
    pub async fn start(response: StubResponse) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let response = Arc::new(response);

        let recorded = requests.clone();
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, response.clone(), recorded.clone()));
            }
        });

        Self {
            endpoint,
            requests,
            task,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request lines received so far, e.g. `GET /bucket/key?x-id=GetObject HTTP/1.1`
    pub fn request_lines(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Client pointed at this stub with static credentials and path-style addressing
    #[cfg(feature = "s3")]
    pub fn client(&self) -> aws_sdk_s3::Client {
        use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url(&self.endpoint)
            .credentials_provider(Credentials::new("test-key", "test-secret", None, None, "stub"))
            .force_path_style(true)
            .build();
        aws_sdk_s3::Client::from_conf(config)
    }
}

impl Drop for StubS3 {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(
    mut stream: TcpStream,
    response: Arc<StubResponse>,
    requests: Arc<Mutex<Vec<String>>>,
) {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&chunk[..n]),
        }
    }

    let request_line = String::from_utf8_lossy(&head)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string();
    requests.lock().unwrap().push(request_line);

    match response.as_ref() {
        StubResponse::Object(body) => {
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes()).await;
            let _ = stream.write_all(body).await;
        }
        StubResponse::Error {
            status,
            reason,
            code,
        } => {
            let body = format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Error><Code>{code}</Code><Message>{reason}</Message><RequestId>stub</RequestId></Error>"
            );
            let header = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes()).await;
            let _ = stream.write_all(body.as_bytes()).await;
        }
        StubResponse::Truncated { declared, sent } => {
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {declared}\r\nConnection: close\r\n\r\n"
            );
            let _ = stream.write_all(header.as_bytes()).await;
            let _ = stream.write_all(sent).await;
        }
        StubResponse::Hang => {
            std::future::pending::<()>().await;
        }
    }

    let _ = stream.shutdown().await;
}
