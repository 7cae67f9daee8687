//! UseCase 層
//!
//! 接続のライフサイクルとブロードキャストを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod broadcaster;
pub mod connect_client;
pub mod disconnect_client;
pub mod error;
pub mod send_message;

pub use broadcaster::{BroadcastReport, Broadcaster};
pub use connect_client::{ConnectClientUseCase, ConnectOutcome};
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{BroadcastError, ConnectError, DisconnectError, SendMessageError};
pub use send_message::SendMessageUseCase;
