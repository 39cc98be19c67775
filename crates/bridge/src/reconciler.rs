//! 식별자 재조정기 -- 분류된 이벤트를 테이블에 적용하고 알림을 파생
//!
//! [`Reconciler`]는 [`IdentityTable`]을 단독 소유하며, 이벤트를
//! 도착 순서대로 하나씩 적용합니다. 플레이어 식별자는 개념적으로
//! **Unknown → Resolved → [Renamed]\* → Gone** 상태를 거치며,
//! 닉네임 해제는 Resolved로 복귀하고 퇴장은 모든 상태에서 테이블을
//! 비웁니다 (종단, 기억 없음).
//!
//! 닉네임 이벤트가 식별자 해석보다 먼저 도착하는 경합은 버퍼링하지
//! 않고 진단 가능한 [`UnknownIdentity`](BridgeError::UnknownIdentity)
//! 결과로 드롭합니다. 실패한 적용은 테이블을 변경하지 않습니다.

use msgpost_core::types::{Notification, PlayerMessage};

use crate::classifier::LogEvent;
use crate::error::BridgeError;
use crate::identity::IdentityTable;

/// 이벤트를 식별자 테이블에 적용하는 재조정기
#[derive(Debug, Default)]
pub struct Reconciler {
    table: IdentityTable,
    /// 순서 경합 등으로 건너뛴 이벤트 수
    skipped: u64,
}

impl Reconciler {
    /// 빈 테이블로 재조정기를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 테이블에 대한 불변 참조를 반환합니다.
    pub fn table(&self) -> &IdentityTable {
        &self.table
    }

    /// 건너뛴 이벤트 수를 반환합니다.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// 분류된 이벤트 하나를 적용하고 파생 알림을 반환합니다.
    ///
    /// 적용은 이벤트 단위로 원자적입니다. 조회 실패로 건너뛴
    /// 이벤트는 알림을 내지 않습니다.
    pub fn apply(&mut self, event: &LogEvent) -> Vec<Notification> {
        match event {
            LogEvent::IdentityResolved {
                original_name,
                identity,
            } => {
                let display_name = self.table.resolve(original_name, identity.clone());
                tracing::debug!(player = %original_name, display = %display_name, "identity resolved");
                vec![Notification::PlayerJoined {
                    display_name,
                    identity: identity.clone(),
                }]
            }

            LogEvent::NicknameSet {
                original_name,
                new_nickname,
            } => match self.table.rename(original_name, new_nickname.clone()) {
                Ok(()) => vec![Notification::TellPlayer {
                    player: original_name.clone(),
                    message: PlayerMessage::NicknameUpdated {
                        nickname: new_nickname.clone(),
                    },
                }],
                Err(BridgeError::UnknownIdentity { player }) => {
                    self.skip(&player, "nickname set before identity resolution");
                    Vec::new()
                }
                Err(e) => {
                    tracing::warn!(error = %e, "unexpected rename failure");
                    Vec::new()
                }
            },

            LogEvent::NicknameCleared { original_name } => {
                match self.table.clear_nickname(original_name) {
                    Ok(()) => vec![Notification::TellPlayer {
                        player: original_name.clone(),
                        message: PlayerMessage::NicknameRemoved,
                    }],
                    Err(BridgeError::UnknownIdentity { player }) => {
                        self.skip(&player, "nickname cleared with no tracked nickname");
                        Vec::new()
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "unexpected clear failure");
                        Vec::new()
                    }
                }
            }

            LogEvent::PlainChat { player_name, text } => {
                let identity = self.table.identity_of(player_name).map(str::to_owned);
                vec![Notification::Chat {
                    display_name: player_name.clone(),
                    text: text.clone(),
                    identity,
                }]
            }

            LogEvent::Unrecognized => Vec::new(),
        }
    }

    /// 호스트 수준 퇴장 신호를 적용합니다.
    ///
    /// 테이블에서 해당 플레이어를 멱등하게 제거합니다. 추적 중이
    /// 아니었더라도 퇴장 알림은 발생합니다 (아바타 없이).
    pub fn player_left(&mut self, name: &str) -> Notification {
        match self.table.remove(name) {
            Some((display_name, identity)) => Notification::PlayerLeft {
                display_name,
                identity: Some(identity),
            },
            None => Notification::PlayerLeft {
                display_name: name.to_owned(),
                identity: None,
            },
        }
    }

    fn skip(&mut self, player: &str, reason: &str) {
        self.skipped += 1;
        tracing::debug!(player = %player, reason, "skipping event with unknown identity");
    }
}
