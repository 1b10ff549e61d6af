use crate::database::SourceError;
use crate::MiningError;
use serde::Deserialize;
use serde::Serialize;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::io::Lines;
use tokio::io::ReadHalf;
use tokio::io::WriteHalf;

/// One typed value on the wire, framed as a single line of JSON:
/// `{"type":"int","value":1}`, `{"type":"float","value":0.5}`, `{"type":"text","value":"OK"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Message {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Message {
    pub fn int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }
    /// Integers widen to floats.
    pub fn float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            Self::Int(n) => Some(*n as f64),
            Self::Text(_) => None,
        }
    }
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("serialize message")
    }
    pub fn decode(line: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(line).map_err(|_| ProtocolError::InvalidRequest)
    }
}

impl From<i64> for Message {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}
impl From<f64> for Message {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}
impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}
impl From<String> for Message {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Everything a session can answer with in place of "OK".
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    InvalidRequest,
    InvalidCommand(i64),
    Payload(&'static str),
    NoTable,
    NoClusters,
    Radius(f64),
    NotFound(String),
    Source(SourceError),
    Mining(MiningError),
    Io(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "invalid request"),
            Self::InvalidCommand(_) => write!(f, "invalid command"),
            Self::Payload(expected) => write!(f, "expected {}", expected),
            Self::NoTable => write!(f, "no table selected"),
            Self::NoClusters => write!(f, "no clusters to save"),
            Self::Radius(r) => write!(f, "radius must be positive, got {}", r),
            Self::NotFound(file) => write!(f, "cluster file {} not found", file),
            Self::Source(e) => write!(f, "{}", e),
            Self::Mining(e) => write!(f, "{}", e),
            Self::Io(s) => write!(f, "{}", s),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<SourceError> for ProtocolError {
    fn from(e: SourceError) -> Self {
        Self::Source(e)
    }
}
impl From<MiningError> for ProtocolError {
    fn from(e: MiningError) -> Self {
        Self::Mining(e)
    }
}
impl From<std::io::Error> for ProtocolError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Line-framed duplex of [`Message`]s over any byte stream.
pub struct Channel<T> {
    lines: Lines<BufReader<ReadHalf<T>>>,
    writer: WriteHalf<T>,
}

impl<T> Channel<T>
where
    T: AsyncRead + AsyncWrite,
{
    pub fn new(stream: T) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }
    /// Next raw frame, or None once the peer has hung up.
    pub async fn recv(&mut self) -> std::io::Result<Option<String>> {
        self.lines.next_line().await
    }
    pub async fn send(&mut self, message: &Message) -> std::io::Result<()> {
        self.writer.write_all(message.encode().as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }
    pub async fn send_all(&mut self, messages: &[Message]) -> std::io::Result<()> {
        for message in messages {
            self.send(message).await?;
        }
        Ok(())
    }
}
