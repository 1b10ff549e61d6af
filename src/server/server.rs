use super::*;
use crate::database::Source;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Accepts connections and hands each one its own [`Session`].
/// Sessions share the record source and the archive directory, nothing else.
pub struct Server {
    source: Arc<dyn Source>,
    archive: PathBuf,
}

impl Server {
    pub fn new(source: Arc<dyn Source>, archive: impl Into<PathBuf>) -> Self {
        Self {
            source,
            archive: archive.into(),
        }
    }

    pub async fn run(self, bind: &str) -> anyhow::Result<()> {
        let listener = TcpListener::bind(bind).await?;
        self.serve(listener).await
    }

    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        log::info!("listening on {}", listener.local_addr()?);
        log::info!("cluster files live in {}", self.archive.display());
        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    log::warn!("accept failed: {}", e);
                    continue;
                }
            };
            log::info!("client connected {}", peer);
            let session = Session::new(self.source.clone(), self.archive.clone());
            tokio::spawn(async move {
                match session.serve(stream).await {
                    Ok(()) => log::info!("client disconnected {}", peer),
                    Err(e) => log::warn!("client {} dropped: {}", peer, e),
                }
            });
        }
    }
}
