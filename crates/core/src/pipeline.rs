//! 파이프라인 trait — 모듈 확장 포인트 정의

use crate::error::{DeliveryError, MsgpostError};
use crate::types::WebhookPayload;

/// 파이프라인 헬스 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// 정상 동작 중
    Healthy,
    /// 동작 중이나 주의 필요
    Degraded(String),
    /// 동작 불가
    Unhealthy(String),
}

impl HealthStatus {
    /// 정상 상태인지 확인합니다.
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    /// 동작 불가 상태인지 확인합니다.
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, HealthStatus::Unhealthy(_))
    }
}

/// 모듈 생명주기 trait
///
/// 데몬은 이 trait을 통해 각 모듈을 동일한 방식으로
/// 시작/정지/점검합니다.
pub trait Pipeline: Send {
    /// 백그라운드 태스크를 스폰하고 처리를 시작합니다.
    fn start(&mut self) -> impl Future<Output = Result<(), MsgpostError>> + Send;

    /// 처리를 중단하고 태스크를 정리합니다.
    fn stop(&mut self) -> impl Future<Output = Result<(), MsgpostError>> + Send;

    /// 현재 헬스 상태를 반환합니다.
    fn health_check(&self) -> impl Future<Output = HealthStatus> + Send;
}

/// webhook 전송 trait
///
/// 전송 구현을 교체할 수 있는 경계입니다. 실제 배포에서는 HTTP
/// 클라이언트가, 테스트에서는 모의 구현이 이 trait을 구현합니다.
pub trait Dispatcher: Send + Sync {
    /// 전송기 이름 (로깅용)
    fn name(&self) -> &str;

    /// payload 하나를 지정된 endpoint로 전달합니다.
    ///
    /// 실패는 [`DeliveryError`]로 반환되며 호출 측에서 로깅만 하고
    /// 재시도하지 않습니다.
    fn deliver(
        &self,
        url: &str,
        payload: &WebhookPayload,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_predicates() {
        assert!(HealthStatus::Healthy.is_healthy());
        assert!(!HealthStatus::Healthy.is_unhealthy());
        assert!(HealthStatus::Unhealthy("stopped".to_owned()).is_unhealthy());
        assert!(!HealthStatus::Degraded("slow".to_owned()).is_healthy());
    }
}
