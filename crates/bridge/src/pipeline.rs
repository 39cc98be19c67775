//! 브리지 파이프라인 조립과 생명주기
//!
//! 수집기 → 처리 루프 → 전송 워커를 mpsc 채널로 연결하고,
//! [`Pipeline`] trait으로 시작/중지/헬스체크를 제공합니다.
//!
//! 처리 루프는 식별자 테이블과 런타임 설정을 단독 소유하는 액터입니다.
//! 모든 로그 이벤트가 순서대로 이 루프를 통과하므로 테이블 변이는
//! 이벤트 단위로 원자적이며 별도의 잠금이 필요 없습니다.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use msgpost_core::error::{MsgpostError, PipelineError};
use msgpost_core::pipeline::{HealthStatus, Pipeline};
use msgpost_core::MsgpostConfig;

use crate::classifier::{self, COMMAND_PREFIX};
use crate::collector::{FileCollector, FileCollectorConfig, RawLine};
use crate::command::{self, PlayerSource};
use crate::error::BridgeError;
use crate::notify::{format_notification, Outbound};
use crate::reconciler::Reconciler;
use crate::webhook::{spawn_delivery_worker, DeliveryJob, HttpDispatcher, DEFAULT_TIMEOUT_SECS};

/// 원시 라인 채널 용량
const RAW_CHANNEL_CAPACITY: usize = 1024;
/// 전송 작업 채널 용량
const DELIVERY_CHANNEL_CAPACITY: usize = 256;
/// 게임 내 응답 채널 용량
const TELL_CHANNEL_CAPACITY: usize = 64;

/// 파이프라인 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// 생성됨, 아직 시작 전
    Initialized,
    /// 실행 중
    Running,
    /// 중지됨
    Stopped,
}

/// 게임 서버 콘솔로 전달할 플레이어 응답
///
/// 데몬이 수신하여 `tell <player> <text>` 형태로 서버에 씁니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TellMessage {
    /// 대상 플레이어 (계정 이름)
    pub player: String,
    /// 응답 텍스트
    pub text: String,
}

/// 브리지 파이프라인 빌더
pub struct BridgePipelineBuilder {
    config: MsgpostConfig,
    config_path: Option<PathBuf>,
}

impl BridgePipelineBuilder {
    pub fn new(config: MsgpostConfig) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    /// 설정 파일 경로를 지정합니다. 지정하면 명령으로 변경된 설정이
    /// 이 경로에 저장됩니다.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// 파이프라인과 게임 내 응답 수신 채널을 만듭니다.
    ///
    /// HTTP 클라이언트 초기화 실패는 시작 시점이 아니라 여기서
    /// 드러납니다.
    pub fn build(self) -> Result<(BridgePipeline, mpsc::Receiver<TellMessage>), BridgeError> {
        let dispatcher = HttpDispatcher::new(DEFAULT_TIMEOUT_SECS)?;

        let (raw_tx, raw_rx) = mpsc::channel(RAW_CHANNEL_CAPACITY);
        let (delivery_tx, delivery_rx) = mpsc::channel(DELIVERY_CHANNEL_CAPACITY);
        let (tell_tx, tell_rx) = mpsc::channel(TELL_CHANNEL_CAPACITY);

        let collector = FileCollector::new(
            FileCollectorConfig::from_watch(&self.config.watch),
            raw_tx,
        );

        let actor = ProcessLoop {
            config: self.config,
            config_path: self.config_path,
            reconciler: Reconciler::new(),
            raw_rx,
            delivery_tx,
            tell_tx,
        };

        let pipeline = BridgePipeline {
            state: PipelineState::Initialized,
            parts: Some(PipelineParts {
                collector,
                actor,
                dispatcher: Arc::new(dispatcher),
                delivery_rx,
            }),
            handles: Vec::new(),
        };

        Ok((pipeline, tell_rx))
    }
}

/// start()에서 태스크로 옮겨지는 구성 요소
struct PipelineParts {
    collector: FileCollector,
    actor: ProcessLoop,
    dispatcher: Arc<HttpDispatcher>,
    delivery_rx: mpsc::Receiver<DeliveryJob>,
}

/// 실행 중인 브리지 파이프라인
pub struct BridgePipeline {
    state: PipelineState,
    parts: Option<PipelineParts>,
    handles: Vec<JoinHandle<()>>,
}

impl BridgePipeline {
    pub fn state(&self) -> PipelineState {
        self.state
    }
}

impl Pipeline for BridgePipeline {
    async fn start(&mut self) -> Result<(), MsgpostError> {
        if self.state == PipelineState::Running {
            return Err(MsgpostError::Pipeline(PipelineError::AlreadyRunning));
        }
        let Some(parts) = self.parts.take() else {
            return Err(MsgpostError::Pipeline(PipelineError::InitFailed(
                "pipeline cannot be restarted".to_owned(),
            )));
        };

        let collector_handle = tokio::spawn(async move {
            if let Err(e) = parts.collector.run().await {
                tracing::error!(error = %e, "file collector exited with error");
            }
        });
        let worker_handle = spawn_delivery_worker(parts.dispatcher, parts.delivery_rx);
        let actor_handle = tokio::spawn(parts.actor.run());

        self.handles = vec![collector_handle, actor_handle, worker_handle];
        self.state = PipelineState::Running;
        tracing::info!("bridge pipeline started");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), MsgpostError> {
        if self.state != PipelineState::Running {
            return Err(MsgpostError::Pipeline(PipelineError::NotRunning));
        }
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        self.state = PipelineState::Stopped;
        tracing::info!("bridge pipeline stopped");
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        match self.state {
            PipelineState::Running => {
                let finished = self.handles.iter().filter(|h| h.is_finished()).count();
                if finished == 0 {
                    HealthStatus::Healthy
                } else if finished < self.handles.len() {
                    HealthStatus::Degraded(format!("{finished} pipeline task(s) exited"))
                } else {
                    HealthStatus::Unhealthy("all pipeline tasks exited".to_owned())
                }
            }
            PipelineState::Initialized => HealthStatus::Degraded("not started".to_owned()),
            PipelineState::Stopped => HealthStatus::Unhealthy("stopped".to_owned()),
        }
    }
}

/// 처리 루프 액터
///
/// 원시 라인을 프레임 분리 → 분류 → 재조정 → 포매팅 순으로 처리하고
/// 결과를 전송/응답 채널로 내보냅니다.
struct ProcessLoop {
    config: MsgpostConfig,
    config_path: Option<PathBuf>,
    reconciler: Reconciler,
    raw_rx: mpsc::Receiver<RawLine>,
    delivery_tx: mpsc::Sender<DeliveryJob>,
    tell_tx: mpsc::Sender<TellMessage>,
}

impl ProcessLoop {
    async fn run(mut self) {
        tracing::info!("processing loop started");
        while let Some(raw) = self.raw_rx.recv().await {
            self.process(&raw.line).await;
        }
        tracing::info!("raw line channel closed, processing loop stopping");
    }

    async fn process(&mut self, line: &str) {
        let framed = classifier::frame(line);

        // 퇴장은 분류기를 거치지 않는 호스트 수준 신호입니다.
        if let Some(name) = classifier::leave_signal(framed.content) {
            let notification = self.reconciler.player_left(name);
            let outbound = format_notification(&notification, self.config.lang);
            self.emit(outbound).await;
            return;
        }

        // 명령 접두어가 붙은 채팅은 webhook으로 전달하지 않고
        // 명령 처리기로 라우팅합니다.
        if let Some((player, text)) = classifier::chat_utterance(framed.content) {
            if text.starts_with(COMMAND_PREFIX) {
                let player = player.to_owned();
                let text = text.to_owned();
                self.handle_command(&player, &text).await;
                return;
            }
        }

        let event = classifier::classify(framed.content, framed.source);
        for notification in self.reconciler.apply(&event) {
            let outbound = format_notification(&notification, self.config.lang);
            self.emit(outbound).await;
        }
    }

    async fn handle_command(&mut self, player: &str, text: &str) {
        // 다른 플러그인의 명령일 수 있으므로 파싱 실패는 무시합니다.
        let Some(parsed) = command::parse(text) else {
            return;
        };

        let mut src = PlayerSource::new(player, &self.config);
        let changed = command::handle(&mut self.config, &mut src, parsed);
        for reply in src.take_replies() {
            self.send_tell(player, reply).await;
        }
        if changed {
            self.persist_config().await;
        }
    }

    async fn persist_config(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.config.save(path).await {
            tracing::warn!(error = %e, path = %path.display(), "failed to persist config");
        }
    }

    async fn emit(&self, outbound: Outbound) {
        match outbound {
            Outbound::Webhook(payload) => {
                if self.config.webhook_url.is_empty() {
                    tracing::debug!("webhook url not set, dropping payload");
                    return;
                }
                let job = DeliveryJob {
                    url: self.config.webhook_url.clone(),
                    payload,
                };
                if self.delivery_tx.send(job).await.is_err() {
                    tracing::warn!("delivery channel closed, payload dropped");
                }
            }
            Outbound::Tell { player, text } => {
                self.send_tell(&player, text).await;
            }
        }
    }

    async fn send_tell(&self, player: &str, text: String) {
        let msg = TellMessage {
            player: player.to_owned(),
            text,
        };
        if self.tell_tx.send(msg).await.is_err() {
            tracing::debug!("tell channel closed, reply dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &std::path::Path) -> MsgpostConfig {
        let mut config = MsgpostConfig::default();
        config.watch.server_log = dir.join("latest.log").display().to_string();
        config.watch.poll_interval_ms = 10;
        config
    }

    #[tokio::test]
    async fn builder_produces_initialized_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, _tell_rx) = BridgePipelineBuilder::new(test_config(dir.path()))
            .build()
            .unwrap();
        assert_eq!(pipeline.state(), PipelineState::Initialized);
        assert!(!pipeline.health_check().await.is_healthy());
    }

    #[tokio::test]
    async fn start_and_stop_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("latest.log"), "").unwrap();
        let (mut pipeline, _tell_rx) = BridgePipelineBuilder::new(test_config(dir.path()))
            .build()
            .unwrap();

        pipeline.start().await.unwrap();
        assert_eq!(pipeline.state(), PipelineState::Running);
        assert!(pipeline.health_check().await.is_healthy());

        pipeline.stop().await.unwrap();
        assert_eq!(pipeline.state(), PipelineState::Stopped);
        assert!(pipeline.health_check().await.is_unhealthy());
    }

    #[tokio::test]
    async fn double_start_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (mut pipeline, _tell_rx) = BridgePipelineBuilder::new(test_config(dir.path()))
            .build()
            .unwrap();

        pipeline.start().await.unwrap();
        let err = pipeline.start().await.unwrap_err();
        assert!(matches!(
            err,
            MsgpostError::Pipeline(PipelineError::AlreadyRunning)
        ));
        pipeline.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_before_start_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (mut pipeline, _tell_rx) = BridgePipelineBuilder::new(test_config(dir.path()))
            .build()
            .unwrap();
        let err = pipeline.stop().await.unwrap_err();
        assert!(matches!(
            err,
            MsgpostError::Pipeline(PipelineError::NotRunning)
        ));
    }
}
