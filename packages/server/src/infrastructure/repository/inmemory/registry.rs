//! InMemory Connection Registry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。状態はプロセス再起動で失われます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, ConnectionRegistry, Greeting, OutboundSender, Recipient,
    RegistryError, RegistrySnapshot,
};

/// Registry entry: the connection and its outbound channel
struct RegistryEntry {
    connection: Connection,
    sender: OutboundSender,
}

/// インメモリ Connection Registry 実装
///
/// 全ての変更は 1 つの Mutex で直列化されます。
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    entries: Mutex<HashMap<ConnectionId, RegistryEntry>>,
}

impl InMemoryConnectionRegistry {
    /// 新しい InMemoryConnectionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }

    async fn insert(
        &self,
        connection: Connection,
        sender: OutboundSender,
        greeting: Option<Greeting>,
    ) -> Result<usize, RegistryError> {
        if sender.is_closed() {
            return Err(RegistryError::ConnectionClosed(connection.id));
        }

        let mut entries = self.entries.lock().await;
        if entries.contains_key(&connection.id) {
            return Err(RegistryError::DuplicateConnection(connection.id));
        }

        // 登録前に送信キューへ積むので、以降のブロードキャストより必ず先に届く
        if let Some(payload) = greeting.and_then(|greet| greet(entries.len() + 1)) {
            sender
                .send(payload)
                .map_err(|_| RegistryError::ConnectionClosed(connection.id))?;
        }

        entries.insert(connection.id, RegistryEntry { connection, sender });
        Ok(entries.len())
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn add(
        &self,
        connection: Connection,
        sender: OutboundSender,
    ) -> Result<usize, RegistryError> {
        self.insert(connection, sender, None).await
    }

    async fn admit(
        &self,
        connection: Connection,
        sender: OutboundSender,
        greeting: Greeting,
    ) -> Result<usize, RegistryError> {
        self.insert(connection, sender, Some(greeting)).await
    }

    async fn remove(&self, id: &ConnectionId) -> bool {
        let mut entries = self.entries.lock().await;
        entries.remove(id).is_some()
    }

    async fn size(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.len()
    }

    async fn snapshot(&self) -> RegistrySnapshot {
        let entries = self.entries.lock().await;
        let recipients = entries
            .iter()
            .map(|(id, entry)| Recipient {
                id: *id,
                sender: entry.sender.clone(),
            })
            .collect();
        RegistrySnapshot {
            recipients,
            total: entries.len(),
        }
    }

    async fn sender_of(&self, id: &ConnectionId) -> Option<OutboundSender> {
        let entries = self.entries.lock().await;
        entries.get(id).map(|entry| entry.sender.clone())
    }

    async fn connections(&self) -> Vec<Connection> {
        let entries = self.entries.lock().await;
        entries
            .values()
            .map(|entry| entry.connection.clone())
            .collect()
    }
}
