//! 파일 기반 로그 수집기
//!
//! 서버 로그 파일(`logs/latest.log`)을 주기적으로 폴링하여 새로 추가된
//! 라인을 읽습니다. 로그 로테이션(truncate 또는 파일 교체)을 감지하면
//! 오프셋을 리셋하고 새 파일을 처음부터 따라갑니다.
//!
//! 시작 시점에는 파일 끝으로 이동하므로 과거 라인은 다시 전달되지
//! 않습니다. 데몬 재시작 시 이미 전송된 메시지가 중복 전송되는 것을
//! 막기 위한 동작입니다.

use std::io::SeekFrom;
use std::path::PathBuf;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::sync::mpsc;

use msgpost_core::WatchConfig;

use crate::error::BridgeError;

use super::RawLine;

/// 파일 수집기 설정
#[derive(Debug, Clone)]
pub struct FileCollectorConfig {
    /// 감시할 로그 파일 경로
    pub path: PathBuf,
    /// 폴링 간격 (밀리초)
    pub poll_interval_ms: u64,
    /// 한 번의 폴링에서 읽을 최대 라인 수
    pub max_lines_per_read: usize,
    /// 라인 최대 길이 (바이트). 초과 라인은 버립니다.
    pub max_line_length: usize,
    /// true이면 파일 처음부터 읽습니다. 기본은 파일 끝부터 tail.
    pub from_start: bool,
}

impl FileCollectorConfig {
    /// 데몬 감시 설정에서 수집기 설정을 만듭니다.
    pub fn from_watch(watch: &WatchConfig) -> Self {
        Self {
            path: PathBuf::from(&watch.server_log),
            poll_interval_ms: watch.poll_interval_ms,
            max_lines_per_read: watch.max_lines_per_read,
            max_line_length: watch.max_line_length,
            from_start: false,
        }
    }
}

/// 로그 파일을 tail 방식으로 따라가는 수집기
pub struct FileCollector {
    config: FileCollectorConfig,
    tx: mpsc::Sender<RawLine>,
    source: String,
    /// 다음 읽기를 시작할 파일 오프셋
    offset: u64,
    /// 시작 오프셋을 파일 끝으로 맞췄는지 여부
    seeded: bool,
    /// 로테이션(파일 교체) 감지용 inode
    #[cfg(unix)]
    inode: Option<u64>,
}

impl FileCollector {
    pub fn new(config: FileCollectorConfig, tx: mpsc::Sender<RawLine>) -> Self {
        let source = format!("file:{}", config.path.display());
        Self {
            config,
            tx,
            source,
            offset: 0,
            seeded: false,
            #[cfg(unix)]
            inode: None,
        }
    }

    /// 수집 루프를 실행합니다. 수신 측 채널이 닫히면 종료합니다.
    pub async fn run(mut self) -> Result<(), BridgeError> {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_millis(self.config.poll_interval_ms));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tracing::info!(path = %self.config.path.display(), "file collector started");

        loop {
            interval.tick().await;
            if self.tx.is_closed() {
                tracing::info!("raw line channel closed, stopping file collector");
                return Ok(());
            }
            match self.poll_once().await {
                Ok(_) => {}
                Err(BridgeError::Channel(_)) => {
                    tracing::info!("raw line channel closed, stopping file collector");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "log file poll failed");
                }
            }
        }
    }

    /// 한 번의 폴링: 새 라인을 읽어 채널로 전달하고 읽은 라인 수를 반환합니다.
    async fn poll_once(&mut self) -> Result<usize, BridgeError> {
        let metadata = match tokio::fs::metadata(&self.config.path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // 로그 파일이 아직 없으면 생길 때까지 대기합니다.
                self.offset = 0;
                self.seeded = true;
                #[cfg(unix)]
                {
                    self.inode = None;
                }
                return Ok(0);
            }
            Err(e) => return Err(BridgeError::Io(e)),
        };

        self.detect_rotation(&metadata);

        if !self.seeded {
            // 첫 폴링에서는 파일 끝으로 이동해 과거 라인을 건너뜁니다.
            self.offset = if self.config.from_start { 0 } else { metadata.len() };
            self.seeded = true;
        }

        if metadata.len() <= self.offset {
            return Ok(0);
        }

        let file = File::open(&self.config.path).await.map_err(BridgeError::Io)?;
        let mut reader = BufReader::new(file);
        reader
            .seek(SeekFrom::Start(self.offset))
            .await
            .map_err(BridgeError::Io)?;

        let mut sent = 0usize;
        let mut buf = String::new();
        while sent < self.config.max_lines_per_read {
            buf.clear();
            let n = reader.read_line(&mut buf).await.map_err(BridgeError::Io)?;
            if n == 0 {
                break;
            }
            if !buf.ends_with('\n') {
                // 쓰기 중인 불완전한 라인은 다음 폴링에서 다시 읽습니다.
                break;
            }
            self.offset += n as u64;
            let line = buf.trim_end_matches(['\n', '\r']);
            if line.is_empty() {
                continue;
            }
            if line.len() > self.config.max_line_length {
                tracing::warn!(length = line.len(), "dropping oversized log line");
                continue;
            }
            self.tx
                .send(RawLine::new(line, self.source.clone()))
                .await
                .map_err(|e| BridgeError::Channel(e.to_string()))?;
            sent += 1;
        }

        Ok(sent)
    }

    /// truncate 또는 파일 교체를 감지하면 오프셋을 리셋합니다.
    fn detect_rotation(&mut self, metadata: &std::fs::Metadata) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            let ino = metadata.ino();
            match self.inode {
                Some(prev) if prev != ino => {
                    tracing::info!("log file replaced, following new file from start");
                    self.offset = 0;
                }
                _ => {}
            }
            self.inode = Some(ino);
        }

        if metadata.len() < self.offset {
            tracing::info!("log file truncated, resetting read offset");
            self.offset = 0;
        }
    }
}
