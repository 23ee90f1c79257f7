use crate::protocol::ClientMessage;
use std::sync::mpsc;

/// 每條連線收件匣的容量
///
/// 收件匣滿時接收執行緒會阻塞，不再從 socket 讀取。
pub const INBOX_CAPACITY: usize = 32;

/// 接收執行緒持有，把解碼後的訊息放進收件匣
pub type InboxSender = mpsc::SyncSender<ClientMessage>;

/// 遊戲邏輯執行緒持有
pub type InboxReceiver = mpsc::Receiver<ClientMessage>;

/// 建立有界的收件匣通道
pub fn create_inbox() -> (InboxSender, InboxReceiver) {
    mpsc::sync_channel(INBOX_CAPACITY)
}
