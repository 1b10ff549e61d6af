use super::*;
use crate::REPLY_OK;
use crate::database::Source;
use crate::mining::*;
use crate::save::Disk;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;

const SELECT: i64 = 0;
const CLUSTER: i64 = 1;
const SAVE: i64 = 2;
const LOAD: i64 = 3;

/// Per-connection state: the selected table and the last miner that
/// produced clusters, either by computing or by loading from a file.
/// Commands are handled strictly one at a time, and every failure
/// becomes a textual reply with the connection left open.
pub struct Session {
    source: Arc<dyn Source>,
    archive: PathBuf,
    table: Option<String>,
    miner: Option<QTMiner>,
}

impl Session {
    pub fn new(source: Arc<dyn Source>, archive: impl Into<PathBuf>) -> Self {
        Self {
            source,
            archive: archive.into(),
            table: None,
            miner: None,
        }
    }

    /// Runs the request loop until the peer hangs up.
    pub async fn serve<T>(mut self, stream: T) -> anyhow::Result<()>
    where
        T: AsyncRead + AsyncWrite,
    {
        let mut channel = Channel::new(stream);
        while let Some(line) = channel.recv().await? {
            let reply = match Message::decode(&line) {
                Ok(Message::Int(code @ SELECT..=LOAD)) => match channel.recv().await? {
                    Some(payload) => self.execute(code, Message::decode(&payload)).await,
                    None => break,
                },
                Ok(Message::Int(code)) => Err(ProtocolError::InvalidCommand(code)),
                _ => Err(ProtocolError::InvalidRequest),
            };
            match reply {
                Ok(messages) => channel.send_all(&messages).await?,
                Err(e) => {
                    log::warn!("request failed: {}", e);
                    channel.send(&Message::from(e.to_string())).await?
                }
            }
        }
        Ok(())
    }

    async fn execute(
        &mut self,
        code: i64,
        payload: Result<Message, ProtocolError>,
    ) -> Result<Vec<Message>, ProtocolError> {
        let payload = payload?;
        match code {
            SELECT => {
                let table = payload.text().ok_or(ProtocolError::Payload("table name"))?;
                self.select(table).await
            }
            CLUSTER => {
                let radius = payload.float().ok_or(ProtocolError::Payload("radius"))?;
                self.cluster(radius).await
            }
            SAVE => {
                let file = payload.text().ok_or(ProtocolError::Payload("file name"))?;
                self.save(file)
            }
            LOAD => {
                let file = payload.text().ok_or(ProtocolError::Payload("file name"))?;
                self.load(file)
            }
            code => Err(ProtocolError::InvalidCommand(code)),
        }
    }

    async fn select(&mut self, table: &str) -> Result<Vec<Message>, ProtocolError> {
        log::info!("selecting table {}", table);
        let data = self.source.load(table).await?;
        log::info!("loaded {} records from {}", data.len(), table);
        self.table = Some(table.to_string());
        Ok(vec![Message::from(REPLY_OK), Message::from(data.to_string())])
    }

    async fn cluster(&mut self, radius: f64) -> Result<Vec<Message>, ProtocolError> {
        let table = self.table.as_deref().ok_or(ProtocolError::NoTable)?;
        if !(radius > 0.) {
            return Err(ProtocolError::Radius(radius));
        }
        log::info!("clustering {} with radius {}", table, radius);
        let data = self.source.load(table).await?;
        let mut miner = QTMiner::new(radius)?;
        let (miner, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = miner
                .compute(&data)
                .and_then(|n| miner.clusters().report(&data).map(|report| (n, report)));
            (miner, outcome)
        })
        .await
        .map_err(|e| ProtocolError::Io(e.to_string()))?;
        let (n, report) = outcome?;
        log::info!("found {} clusters in {}", n, table);
        self.miner = Some(miner);
        Ok(vec![
            Message::from(REPLY_OK),
            Message::from(n as i64),
            Message::from(report),
        ])
    }

    fn save(&self, file: &str) -> Result<Vec<Message>, ProtocolError> {
        let miner = self.miner.as_ref().ok_or(ProtocolError::NoClusters)?;
        let path = ClusterSet::path(&self.archive, file)?;
        log::info!(
            "saving {} {} to {}",
            miner.clusters().len(),
            ClusterSet::name(),
            path.display()
        );
        miner.save(&path)?;
        Ok(vec![Message::from(REPLY_OK)])
    }

    fn load(&mut self, file: &str) -> Result<Vec<Message>, ProtocolError> {
        let path = ClusterSet::path(&self.archive, file)?;
        log::info!("loading {} from {}", ClusterSet::name(), path.display());
        let miner = QTMiner::load(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ProtocolError::NotFound(file.to_string()),
            _ => ProtocolError::from(e),
        })?;
        let summary = miner.clusters().to_string();
        self.miner = Some(miner);
        Ok(vec![Message::from(REPLY_OK), Message::from(summary)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Memory;
    use tokio::io::DuplexStream;

    struct Peer(Channel<DuplexStream>);

    impl Peer {
        async fn send(&mut self, messages: &[Message]) {
            self.0.send_all(messages).await.unwrap();
        }
        async fn next(&mut self) -> Message {
            let line = self.0.recv().await.unwrap().expect("reply");
            Message::decode(&line).unwrap()
        }
    }

    fn archive() -> PathBuf {
        use rand::Rng;
        std::env::temp_dir().join(format!(
            "qtcluster-session-{}-{}",
            std::process::id(),
            rand::rng().random::<u32>()
        ))
    }
    fn connect(archive: &PathBuf) -> Peer {
        let (client, server) = tokio::io::duplex(1 << 16);
        let session = Session::new(Arc::new(Memory::demo()), archive.clone());
        tokio::spawn(session.serve(server));
        Peer(Channel::new(client))
    }

    #[tokio::test]
    async fn select_dumps_the_table() {
        let mut peer = connect(&archive());
        peer.send(&[Message::Int(SELECT), Message::from("line")]).await;
        assert_eq!(peer.next().await, Message::from("OK"));
        assert_eq!(peer.next().await, Message::from("x\n1:0\n2:1\n3:2\n4:10\n5:11\n"));
    }
    #[tokio::test]
    async fn cluster_reports_count_and_clusters() {
        let mut peer = connect(&archive());
        peer.send(&[Message::Int(SELECT), Message::from("line")]).await;
        peer.next().await;
        peer.next().await;
        peer.send(&[Message::Int(CLUSTER), Message::Float(0.1)]).await;
        assert_eq!(peer.next().await, Message::from("OK"));
        assert_eq!(peer.next().await, Message::Int(2));
        let report = peer.next().await;
        let report = report.text().unwrap();
        assert!(report.starts_with("1: Centroid=(10)\nExamples:\n[10] dist=0\n"));
        assert!(report.contains("2: Centroid=(1)\n"));
    }
    #[tokio::test]
    async fn integer_radius_is_accepted() {
        let mut peer = connect(&archive());
        peer.send(&[Message::Int(SELECT), Message::from("line")]).await;
        peer.next().await;
        peer.next().await;
        peer.send(&[Message::Int(CLUSTER), Message::Int(1)]).await;
        assert_eq!(peer.next().await, Message::from("5 tuples in one cluster"));
    }
    #[tokio::test]
    async fn cluster_before_select_fails() {
        let mut peer = connect(&archive());
        peer.send(&[Message::Int(CLUSTER), Message::Float(0.1)]).await;
        assert_eq!(peer.next().await, Message::from("no table selected"));
    }
    #[tokio::test]
    async fn non_positive_radius_fails() {
        let mut peer = connect(&archive());
        peer.send(&[Message::Int(SELECT), Message::from("line")]).await;
        peer.next().await;
        peer.next().await;
        peer.send(&[Message::Int(CLUSTER), Message::Float(0.0)]).await;
        assert_eq!(
            peer.next().await,
            Message::from("radius must be positive, got 0")
        );
    }
    #[tokio::test]
    async fn unknown_table_keeps_the_session_alive() {
        let mut peer = connect(&archive());
        peer.send(&[Message::Int(SELECT), Message::from("nowhere")]).await;
        assert_eq!(peer.next().await, Message::from("no data in table nowhere"));
        peer.send(&[Message::Int(SELECT), Message::from("line")]).await;
        assert_eq!(peer.next().await, Message::from("OK"));
    }
    #[tokio::test]
    async fn unknown_command_and_bad_requests() {
        let mut peer = connect(&archive());
        peer.send(&[Message::Int(7)]).await;
        assert_eq!(peer.next().await, Message::from("invalid command"));
        peer.send(&[Message::from("hello")]).await;
        assert_eq!(peer.next().await, Message::from("invalid request"));
        peer.send(&[Message::Int(SELECT), Message::Float(1.5)]).await;
        assert_eq!(peer.next().await, Message::from("expected table name"));
    }
    #[tokio::test]
    async fn unparseable_line_is_an_invalid_request() {
        use tokio::io::AsyncBufReadExt;
        use tokio::io::AsyncWriteExt;
        let (mut client, server) = tokio::io::duplex(1 << 10);
        let session = Session::new(Arc::new(Memory::demo()), archive());
        tokio::spawn(session.serve(server));
        client.write_all(b"definitely not json\n").await.unwrap();
        let mut reply = String::new();
        tokio::io::BufReader::new(&mut client)
            .read_line(&mut reply)
            .await
            .unwrap();
        assert_eq!(reply, "{\"type\":\"text\",\"value\":\"invalid request\"}\n");
    }
    #[tokio::test]
    async fn save_requires_clusters() {
        let mut peer = connect(&archive());
        peer.send(&[Message::Int(SAVE), Message::from("line.dmp")]).await;
        assert_eq!(peer.next().await, Message::from("no clusters to save"));
    }
    #[tokio::test]
    async fn save_then_load_in_a_fresh_session() {
        let ref dir = archive();
        let mut first = connect(dir);
        first.send(&[Message::Int(SELECT), Message::from("line")]).await;
        first.next().await;
        first.next().await;
        first.send(&[Message::Int(CLUSTER), Message::Float(0.1)]).await;
        first.next().await;
        first.next().await;
        first.next().await;
        first.send(&[Message::Int(SAVE), Message::from("line0.1.dmp")]).await;
        assert_eq!(first.next().await, Message::from("OK"));

        let mut second = connect(dir);
        second.send(&[Message::Int(LOAD), Message::from("line0.1.dmp")]).await;
        assert_eq!(second.next().await, Message::from("OK"));
        assert_eq!(
            second.next().await,
            Message::from("1: Centroid=(10)\n2: Centroid=(1)\n")
        );
        second.send(&[Message::Int(SAVE), Message::from("copy.dmp")]).await;
        assert_eq!(second.next().await, Message::from("OK"));
        std::fs::remove_dir_all(dir).ok();
    }
    #[tokio::test]
    async fn load_of_missing_file_fails() {
        let mut peer = connect(&archive());
        peer.send(&[Message::Int(LOAD), Message::from("missing.dmp")]).await;
        assert_eq!(
            peer.next().await,
            Message::from("cluster file missing.dmp not found")
        );
    }
    #[tokio::test]
    async fn file_names_must_stay_in_the_archive() {
        let mut peer = connect(&archive());
        peer.send(&[Message::Int(LOAD), Message::from("../escape.dmp")]).await;
        assert_eq!(
            peer.next().await,
            Message::from("../escape.dmp is not a plain file name")
        );
    }
}
