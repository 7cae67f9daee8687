//! UseCase: 接続開始処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - Registry への登録、welcome の直接送信、参加通知のブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の接続、二人目の接続
//! - 異常系：同じ接続の二重登録
//! - 並行性：同時に接続しても、各接続の最初のフレームは welcome

use std::sync::Arc;

use crate::{
    domain::{Connection, ConnectionRegistry, Envelope, Greeting, OutboundSender, Timestamp},
    infrastructure::dto::websocket::encode_envelope,
};

use super::{
    broadcaster::{BroadcastReport, Broadcaster},
    error::ConnectError,
};

/// Result of a successful connect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOutcome {
    /// Membership count right after registration
    pub total_clients: usize,
    /// Fan-out of the join announcement
    pub join_report: BroadcastReport,
}

/// 接続開始のユースケース
pub struct ConnectClientUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    broadcaster: Broadcaster,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        let broadcaster = Broadcaster::new(registry.clone());
        Self {
            registry,
            broadcaster,
        }
    }

    /// 接続開始を実行
    ///
    /// 1. Registry に登録し、同じロックの中で本人に welcome を積む
    /// 2. 他の全員に参加を通知
    ///
    /// The welcome is always the first frame a connection receives.
    ///
    /// Delivery failures are logged and do not fail the connect; the
    /// connection's own close event cleans up.
    pub async fn execute(
        &self,
        connection: Connection,
        sender: OutboundSender,
    ) -> Result<ConnectOutcome, ConnectError> {
        let id = connection.id;
        let now = Timestamp::now();
        let welcome: Greeting = Box::new(move |total_clients| {
            match encode_envelope(&Envelope::welcome(total_clients, now)) {
                Ok(payload) => Some(payload),
                Err(e) => {
                    tracing::warn!(connection_id = %id, "Failed to encode welcome: {}", e);
                    None
                }
            }
        });
        let total_clients = self.registry.admit(connection, sender, welcome).await?;

        let join_report = match self
            .broadcaster
            .broadcast(&Envelope::joined(total_clients, now), Some(&id))
            .await
        {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(connection_id = %id, "Failed to announce join: {}", e);
                BroadcastReport::default()
            }
        };

        Ok(ConnectOutcome {
            total_clients,
            join_report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionIdFactory, RegistryError},
        infrastructure::repository::InMemoryConnectionRegistry,
    };
    use tokio::sync::mpsc;

    fn test_connection() -> Connection {
        Connection::new(
            ConnectionIdFactory::generate(),
            "127.0.0.1:40000".parse().unwrap(),
            Timestamp::new(1000),
        )
    }

    fn next_json(rx: &mut mpsc::UnboundedReceiver<String>) -> serde_json::Value {
        let payload = rx.try_recv().expect("expected a queued envelope");
        serde_json::from_str(&payload).unwrap()
    }

    #[tokio::test]
    async fn test_first_connection_receives_welcome() {
        // テスト項目: 最初の接続は totalClients=1 の welcome を 1 件だけ受け取る
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = ConnectClientUseCase::new(registry.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let outcome = usecase.execute(test_connection(), tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.total_clients, 1);
        assert_eq!(outcome.join_report.delivered, 0);

        let welcome = next_json(&mut rx);
        assert_eq!(welcome["type"], "system");
        assert_eq!(welcome["message"], "Welcome to the WebSocket server!");
        assert_eq!(welcome["totalClients"], 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_second_connection_announced_to_first() {
        // テスト項目: 二人目の接続で一人目に参加通知が届き、二人目の welcome は totalClients=2
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = ConnectClientUseCase::new(registry.clone());
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        usecase.execute(test_connection(), tx_a).await.unwrap();
        next_json(&mut rx_a); // welcome

        // when (操作):
        let outcome = usecase.execute(test_connection(), tx_b).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.total_clients, 2);
        assert_eq!(outcome.join_report.delivered, 1);

        let joined = next_json(&mut rx_a);
        assert_eq!(joined["type"], "system");
        assert_eq!(joined["message"], "A new user has joined the chat");
        assert_eq!(joined["totalClients"], 2);

        let welcome = next_json(&mut rx_b);
        assert_eq!(welcome["message"], "Welcome to the WebSocket server!");
        assert_eq!(welcome["totalClients"], 2);
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_duplicate_connection_rejected() {
        // テスト項目: 同じ接続の二重登録はエラーになり、件数は増えない
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = ConnectClientUseCase::new(registry.clone());
        let connection = test_connection();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        usecase.execute(connection.clone(), tx1).await.unwrap();

        let result = usecase.execute(connection.clone(), tx2).await;

        assert_eq!(
            result,
            Err(ConnectError::Registry(RegistryError::DuplicateConnection(
                connection.id
            )))
        );
        assert_eq!(registry.size().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_welcome_is_first_frame_under_concurrent_connects() {
        // テスト項目: 同時に接続しても、各接続が最初に受け取るのは自分の welcome
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = Arc::new(ConnectClientUseCase::new(registry.clone()));
        let mut receivers = Vec::new();
        let mut tasks = Vec::new();

        // when (操作):
        for _ in 0..32 {
            let (tx, rx) = mpsc::unbounded_channel();
            receivers.push(rx);
            let usecase = usecase.clone();
            tasks.push(tokio::spawn(async move {
                usecase.execute(test_connection(), tx).await.unwrap()
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // then (期待する結果):
        assert_eq!(registry.size().await, 32);
        for rx in receivers.iter_mut() {
            let first = next_json(rx);
            assert_eq!(first["message"], "Welcome to the WebSocket server!");
        }
    }
}
