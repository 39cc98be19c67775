//! webhook 전송기 -- payload를 외부 endpoint로 전달
//!
//! 전송은 fire-and-forget입니다. 파이프라인은 전송 작업을 채널에
//! 넣고 즉시 반환하며, 느리거나 닿지 않는 endpoint가 로그 처리
//! 경로를 멈추는 일은 없습니다. 실패는 로깅만 하고 재시도하지
//! 않으며, 테이블 상태에 영향을 주지 않습니다.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use msgpost_core::error::DeliveryError;
use msgpost_core::pipeline::Dispatcher;
use msgpost_core::types::WebhookPayload;

use crate::error::BridgeError;

/// 기본 전송 타임아웃 (초)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// 전송 작업 하나
///
/// URL 스냅샷을 함께 보관하므로 런타임에 webhook URL이 바뀌어도
/// 이미 큐에 들어간 작업은 당시 설정으로 전송됩니다.
#[derive(Debug, Clone)]
pub struct DeliveryJob {
    /// 전송 시점의 webhook endpoint
    pub url: String,
    /// 전송할 payload
    pub payload: WebhookPayload,
}

/// HTTP webhook 전송기
///
/// [`Dispatcher`] trait의 실제 구현입니다. 타임아웃 초과는 일반
/// [`DeliveryError`]로 취급됩니다.
pub struct HttpDispatcher {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpDispatcher {
    /// 지정한 타임아웃으로 전송기를 생성합니다.
    pub fn new(timeout_secs: u64) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BridgeError::Config {
                field: "dispatcher".to_owned(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// 기본 타임아웃으로 전송기를 생성합니다.
    pub fn with_defaults() -> Result<Self, BridgeError> {
        Self::new(DEFAULT_TIMEOUT_SECS)
    }
}

impl Dispatcher for HttpDispatcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn deliver(&self, url: &str, payload: &WebhookPayload) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    DeliveryError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status {
                code: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// 전송 워커 태스크를 스폰합니다.
///
/// 채널에서 [`DeliveryJob`]을 꺼내 순서대로 전송합니다. 실패는
/// warn 레벨로 로깅하고 다음 작업으로 넘어갑니다. 채널 송신측이
/// 모두 닫히면 종료합니다.
pub fn spawn_delivery_worker<D>(
    dispatcher: Arc<D>,
    mut rx: mpsc::Receiver<DeliveryJob>,
) -> tokio::task::JoinHandle<()>
where
    D: Dispatcher + 'static,
{
    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            match dispatcher.deliver(&job.url, &job.payload).await {
                Ok(()) => {
                    tracing::debug!(dispatcher = dispatcher.name(), "payload delivered");
                }
                Err(e) => {
                    tracing::warn!(
                        dispatcher = dispatcher.name(),
                        error = %e,
                        "delivery failed, payload dropped"
                    );
                }
            }
        }
        tracing::debug!("delivery worker shutting down");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// 전송된 payload를 기록하는 테스트용 전송기
    struct RecordingDispatcher {
        delivered: Mutex<Vec<DeliveryJob>>,
        fail: bool,
    }

    impl RecordingDispatcher {
        fn new(fail: bool) -> Self {
            Self {
                delivered: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    impl Dispatcher for RecordingDispatcher {
        fn name(&self) -> &str {
            "recording"
        }

        async fn deliver(&self, url: &str, payload: &WebhookPayload) -> Result<(), DeliveryError> {
            if self.fail {
                return Err(DeliveryError::Status { code: 500 });
            }
            self.delivered.lock().unwrap().push(DeliveryJob {
                url: url.to_owned(),
                payload: payload.clone(),
            });
            Ok(())
        }
    }

    fn sample_payload() -> WebhookPayload {
        WebhookPayload::Chat {
            content: "hello".to_owned(),
            username: "Alice".to_owned(),
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn worker_delivers_queued_jobs() {
        let dispatcher = Arc::new(RecordingDispatcher::new(false));
        let (tx, rx) = mpsc::channel(8);
        let handle = spawn_delivery_worker(Arc::clone(&dispatcher), rx);

        tx.send(DeliveryJob {
            url: "https://example.com/hook".to_owned(),
            payload: sample_payload(),
        })
        .await
        .unwrap();
        drop(tx);
        handle.await.unwrap();

        let delivered = dispatcher.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].url, "https://example.com/hook");
    }

    #[tokio::test]
    async fn worker_survives_delivery_failures() {
        let dispatcher = Arc::new(RecordingDispatcher::new(true));
        let (tx, rx) = mpsc::channel(8);
        let handle = spawn_delivery_worker(Arc::clone(&dispatcher), rx);

        for _ in 0..3 {
            tx.send(DeliveryJob {
                url: "https://example.com/hook".to_owned(),
                payload: sample_payload(),
            })
            .await
            .unwrap();
        }
        drop(tx);
        // 실패해도 워커는 패닉 없이 채널을 비우고 종료
        handle.await.unwrap();
        assert!(dispatcher.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn http_dispatcher_reports_unreachable_endpoint() {
        let dispatcher = HttpDispatcher::new(1).unwrap();
        // 라우팅 불가능한 endpoint — 네트워크 수준 실패 또는 타임아웃
        let result = dispatcher
            .deliver("http://127.0.0.1:9/hook", &sample_payload())
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn http_dispatcher_builds_with_defaults() {
        let dispatcher = HttpDispatcher::with_defaults().unwrap();
        assert_eq!(dispatcher.name(), "http");
        assert_eq!(dispatcher.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
