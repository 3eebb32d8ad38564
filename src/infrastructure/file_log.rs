// Append-only sample log on disk
use crate::application::sample_log::SampleLog;
use anyhow::Context;
use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

/// Flat text log, one report line per append. Concurrent appenders rely on
/// O_APPEND line atomicity only; readers tolerate interleaved or truncated
/// lines because the parser skips anything malformed.
pub struct FileSampleLog {
    path: PathBuf,
}

impl FileSampleLog {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("uptime.log"),
        }
    }
}

#[async_trait]
impl SampleLog for FileSampleLog {
    async fn read_full(&self) -> anyhow::Result<String> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", self.path.display())),
        }
    }

    async fn read_tail(&self, max_bytes: u64) -> anyhow::Result<String> {
        let mut file = match tokio::fs::File::open(&self.path).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(String::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to open {}", self.path.display()))
            }
        };
        let len = file.metadata().await?.len();
        if len > max_bytes {
            file.seek(SeekFrom::Start(len - max_bytes)).await?;
        }
        let mut bytes = Vec::with_capacity(len.min(max_bytes) as usize);
        file.read_to_end(&mut bytes).await?;
        // a seek may land mid-line or mid-character; lossy decode and let the
        // parser drop the partial first line
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn append(&self, line: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("failed to open {} for append", self.path.display()))?;
        file.write_all(format!("{line}\n").as_bytes()).await?;
        Ok(())
    }
}
