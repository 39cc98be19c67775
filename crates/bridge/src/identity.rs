//! 식별자 테이블 -- 표시 이름과 안정 식별자의 라이브 매핑
//!
//! [`IdentityTable`]은 프로세스 전역 상태로, 시작 시 비어 있고
//! 플레이어가 접속하여 식별자가 해석되면 채워지며, 퇴장 시 함께
//! 제거됩니다. 재시작하면 모든 연관이 사라집니다 (영속화 없음).
//!
//! # 불변식
//! - `nickname_of_original`의 값으로 존재하는 표시 이름은 반드시
//!   `current_identity`의 키로도 존재한다.
//! - 원래 이름 하나당 라이브 닉네임은 최대 하나.
//! - 두 매핑의 엔트리는 항상 함께 제거된다 (유령 엔트리 없음).

use std::collections::HashMap;

use crate::error::BridgeError;

/// 표시 이름 ↔ 식별자 라이브 테이블
///
/// 모든 변경 연산은 이벤트 단위로 원자적입니다. 조회가 실패하면
/// 테이블은 변경 이전 상태 그대로 남습니다.
#[derive(Debug, Default)]
pub struct IdentityTable {
    /// 현재 표시 이름 -> 안정 식별자
    current_identity: HashMap<String, String>,
    /// 원래 계정 이름 -> 현재 닉네임
    nickname_of_original: HashMap<String, String>,
}

impl IdentityTable {
    /// 빈 테이블을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 추적 중인 표시 이름 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.current_identity.len()
    }

    /// 테이블이 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.current_identity.is_empty()
    }

    /// 표시 이름으로 식별자를 조회합니다.
    pub fn identity_of(&self, display_name: &str) -> Option<&str> {
        self.current_identity.get(display_name).map(String::as_str)
    }

    /// 원래 이름에 추적 중인 닉네임을 조회합니다.
    pub fn nickname_of(&self, original_name: &str) -> Option<&str> {
        self.nickname_of_original
            .get(original_name)
            .map(String::as_str)
    }

    /// 원래 이름의 현재 표시 이름을 반환합니다.
    ///
    /// 닉네임이 추적 중이면 닉네임, 아니면 원래 이름 그대로입니다.
    pub fn display_name_of<'a>(&'a self, original_name: &'a str) -> &'a str {
        self.nickname_of(original_name).unwrap_or(original_name)
    }

    /// 해석된 식별자를 테이블에 바인딩합니다.
    ///
    /// `original_name`에 닉네임이 이미 추적 중이면 닉네임 아래에,
    /// 아니면 원래 이름 아래에 바인딩합니다. 실제로 바인딩된 표시
    /// 이름을 반환합니다.
    pub fn resolve(&mut self, original_name: &str, identity: impl Into<String>) -> String {
        let display_name = self.display_name_of(original_name).to_owned();
        self.current_identity
            .insert(display_name.clone(), identity.into());
        display_name
    }

    /// 플레이어의 표시 이름을 새 닉네임으로 변경합니다.
    ///
    /// 기존 표시 이름(추적 중인 닉네임 또는 원래 이름)에 바인딩된
    /// 식별자를 새 닉네임으로 옮깁니다. 추적 중인 식별자가 없으면
    /// [`BridgeError::UnknownIdentity`]를 반환하고 테이블은 변경되지
    /// 않습니다.
    pub fn rename(
        &mut self,
        original_name: &str,
        new_nickname: impl Into<String>,
    ) -> Result<(), BridgeError> {
        let old_display = self.display_name_of(original_name).to_owned();
        let identity = match self.current_identity.get(&old_display) {
            Some(identity) => identity.clone(),
            None => {
                return Err(BridgeError::UnknownIdentity {
                    player: original_name.to_owned(),
                });
            }
        };

        let new_nickname = new_nickname.into();
        self.current_identity.remove(&old_display);
        self.current_identity.insert(new_nickname.clone(), identity);
        self.nickname_of_original
            .insert(original_name.to_owned(), new_nickname);
        Ok(())
    }

    /// 닉네임을 해제하고 식별자를 원래 이름 아래로 되돌립니다.
    ///
    /// 추적 중인 닉네임이 없거나 닉네임 아래 식별자가 없으면
    /// [`BridgeError::UnknownIdentity`]를 반환하고 테이블은 변경되지
    /// 않습니다.
    pub fn clear_nickname(&mut self, original_name: &str) -> Result<(), BridgeError> {
        let nickname = match self.nickname_of(original_name) {
            Some(nickname) => nickname.to_owned(),
            None => {
                return Err(BridgeError::UnknownIdentity {
                    player: original_name.to_owned(),
                });
            }
        };
        let identity = match self.current_identity.get(&nickname) {
            Some(identity) => identity.clone(),
            None => {
                return Err(BridgeError::UnknownIdentity {
                    player: original_name.to_owned(),
                });
            }
        };

        self.current_identity.remove(&nickname);
        self.current_identity
            .insert(original_name.to_owned(), identity);
        self.nickname_of_original.remove(original_name);
        Ok(())
    }

    /// 플레이어를 테이블에서 제거합니다 (멱등).
    ///
    /// `name`이 원래 이름이면 닉네임 매핑을 경유하여 현재 표시 이름의
    /// 엔트리를 제거합니다. 제거된 `(표시 이름, 식별자)`를 반환하며,
    /// 추적 중이 아니었으면 `None`을 반환합니다 (no-op).
    pub fn remove(&mut self, name: &str) -> Option<(String, String)> {
        let display_name = self.display_name_of(name).to_owned();
        let identity = self.current_identity.remove(&display_name);
        self.nickname_of_original.remove(name);
        // `name`이 닉네임 쪽일 수도 있으므로 역방향 엔트리도 정리합니다.
        self.nickname_of_original
            .retain(|_, nickname| nickname != &display_name);
        identity.map(|identity| (display_name, identity))
    }

    /// 테이블 불변식을 검사합니다.
    ///
    /// 닉네임 매핑의 모든 값이 `current_identity`의 키인지 확인합니다.
    #[cfg(test)]
    fn invariants_hold(&self) -> bool {
        self.nickname_of_original
            .values()
            .all(|nickname| self.current_identity.contains_key(nickname))
    }
}
