//! UseCase: 接続終了処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - Registry からの削除と、残りの接続への退出通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：退出通知と totalClients の更新
//! - エッジケース：最後の接続の切断（通知対象なし）
//! - エッジケース：既に削除済みの接続（冪等、通知しない）

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, Envelope, Timestamp};

use super::{
    broadcaster::{BroadcastReport, Broadcaster},
    error::DisconnectError,
};

/// 接続終了のユースケース
pub struct DisconnectClientUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    broadcaster: Broadcaster,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        let broadcaster = Broadcaster::new(registry.clone());
        Self {
            registry,
            broadcaster,
        }
    }

    /// 接続終了を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(BroadcastReport))` - 削除し、残りの接続に退出を通知した
    /// * `Ok(None)` - 既に削除済みだった（何もしない）
    /// * `Err(DisconnectError)` - 通知の送信に失敗
    pub async fn execute(
        &self,
        id: &ConnectionId,
    ) -> Result<Option<BroadcastReport>, DisconnectError> {
        if !self.registry.remove(id).await {
            return Ok(None);
        }

        let total_clients = self.registry.size().await;
        let report = self
            .broadcaster
            .broadcast(&Envelope::left(total_clients, Timestamp::now()), None)
            .await?;

        Ok(Some(report))
    }

    /// 残りの接続数を取得
    pub async fn count_remaining_clients(&self) -> usize {
        self.registry.size().await
    }
}
