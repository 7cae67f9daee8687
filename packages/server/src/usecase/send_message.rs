//! UseCase: メッセージ中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute_text() / execute_binary() メソッド
//! - 送信者への echo と、送信者以外へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 不正なペイロードでは送信者にだけ error が返り、他の接続には何も届かないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：echo とブロードキャスト
//! - 異常系：JSON でない、text が無い
//! - エッジケース：非常に長い text もそのまま中継される
//! - エッジケース：送信者のみが接続している場合

use std::sync::Arc;

use crate::{
    domain::{
        ConnectionId, ConnectionRegistry, Envelope, MessageText, Timestamp,
        entity::INVALID_FORMAT_MESSAGE,
    },
    infrastructure::dto::websocket::{InboundMessage, InboundParseError},
};

use super::{
    broadcaster::{BroadcastReport, Broadcaster},
    error::SendMessageError,
};

/// メッセージ中継のユースケース
pub struct SendMessageUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    broadcaster: Broadcaster,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        let broadcaster = Broadcaster::new(registry.clone());
        Self {
            registry,
            broadcaster,
        }
    }

    /// テキストフレームを中継
    pub async fn execute_text(
        &self,
        from: &ConnectionId,
        raw: &str,
    ) -> Result<BroadcastReport, SendMessageError> {
        self.relay(from, InboundMessage::parse(raw)).await
    }

    /// バイナリフレームを中継（UTF-8 の JSON として解釈）
    pub async fn execute_binary(
        &self,
        from: &ConnectionId,
        raw: &[u8],
    ) -> Result<BroadcastReport, SendMessageError> {
        self.relay(from, InboundMessage::parse_bytes(raw)).await
    }

    /// # Returns
    ///
    /// * `Ok(BroadcastReport)` - echo を返し、他の接続へ配信した結果
    /// * `Err(SendMessageError)` - 不正なペイロード（送信者には error を送信済み）、または送信者が既に閉じている
    async fn relay(
        &self,
        from: &ConnectionId,
        parsed: Result<InboundMessage, InboundParseError>,
    ) -> Result<BroadcastReport, SendMessageError> {
        let inbound = match parsed {
            Ok(inbound) => inbound,
            Err(e) => {
                self.reject(from, INVALID_FORMAT_MESSAGE).await;
                return Err(SendMessageError::InvalidFormat(e));
            }
        };

        let text = MessageText::new(inbound.text);

        // 1. 送信者に echo（送信者が閉じていればブロードキャストしない）
        let now = Timestamp::now();
        self.broadcaster
            .send_to(from, &Envelope::echo(&text, now))
            .await?;

        // 2. 送信者以外の全員にブロードキャスト
        let total_clients = self.registry.size().await;
        let report = self
            .broadcaster
            .broadcast(&Envelope::broadcast(&text, total_clients, now), Some(from))
            .await?;

        Ok(report)
    }

    async fn reject(&self, to: &ConnectionId, reason: &str) {
        if let Err(e) = self
            .broadcaster
            .send_to(to, &Envelope::error(reason, Timestamp::now()))
            .await
        {
            tracing::warn!(connection_id = %to, "Failed to send error envelope: {}", e);
        }
    }
}
