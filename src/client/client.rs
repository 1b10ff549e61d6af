use crate::REPLY_OK;
use crate::server::Channel;
use crate::server::Message;
use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;
use tokio::net::TcpStream;

/// A reply from the server other than "OK".
/// The connection stays usable after one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected(pub String);

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Rejected {}

/// Typed requests against a clustering server.
pub struct Client<T> {
    channel: Channel<T>,
}

impl Client<TcpStream> {
    pub async fn connect(addr: &str) -> anyhow::Result<Self> {
        log::info!("connecting to {}", addr);
        Ok(Self::new(TcpStream::connect(addr).await?))
    }
}

impl<T> Client<T>
where
    T: AsyncRead + AsyncWrite,
{
    pub fn new(stream: T) -> Self {
        Self {
            channel: Channel::new(stream),
        }
    }

    /// Selects a table and returns its dump.
    pub async fn select(&mut self, table: &str) -> anyhow::Result<String> {
        self.request(0, Message::from(table)).await?;
        self.text().await
    }
    /// Clusters the selected table; returns the count and the report.
    pub async fn cluster(&mut self, radius: f64) -> anyhow::Result<(usize, String)> {
        self.request(1, Message::from(radius)).await?;
        let n = self
            .next()
            .await?
            .int()
            .ok_or_else(|| anyhow::anyhow!("cluster count is not an integer"))?;
        Ok((usize::try_from(n)?, self.text().await?))
    }
    pub async fn save(&mut self, file: &str) -> anyhow::Result<()> {
        self.request(2, Message::from(file)).await
    }
    /// Loads clusters from a file on the server; returns their summary.
    pub async fn load(&mut self, file: &str) -> anyhow::Result<String> {
        self.request(3, Message::from(file)).await?;
        self.text().await
    }

    async fn request(&mut self, code: i64, payload: Message) -> anyhow::Result<()> {
        self.channel
            .send_all(&[Message::Int(code), payload])
            .await?;
        match self.text().await? {
            status if status == REPLY_OK => Ok(()),
            status => Err(Rejected(status).into()),
        }
    }
    async fn next(&mut self) -> anyhow::Result<Message> {
        let line = self
            .channel
            .recv()
            .await?
            .ok_or_else(|| anyhow::anyhow!("server closed the connection"))?;
        Ok(Message::decode(&line)?)
    }
    async fn text(&mut self) -> anyhow::Result<String> {
        match self.next().await? {
            Message::Text(s) => Ok(s),
            other => Err(anyhow::anyhow!("expected text, received {}", other)),
        }
    }
}
