use super::connection::ConnectionId;
use super::inbox::{InboxReceiver, InboxSender, create_inbox};
use crate::error::ConnectionError;
use crate::protocol::{ClientMessage, MessageReader, MessageWriter, ReplyKind, ServerMessage};
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::{Duration, Instant};

/// 暫存「類型不符」回覆的上限，超過時丟棄最舊的
pub const DEFERRED_CAPACITY: usize = 16;

type BoxedWriter = Box<dyn Write + Send>;

/// Connection handler - 單一連線的雙向通道
///
/// 背景接收執行緒只負責解碼並放進有界收件匣；遊戲邏輯執行緒透過
/// `send` 直接寫出，並用 `ask_and_await` 送出問題後阻塞等待指定類型的回覆。
pub struct ConnectionHandler {
    conn_id: ConnectionId,
    peer: String,
    writer: MessageWriter<BoxedWriter>,
    inbox: InboxReceiver,
    /// 類型不符的回覆，留待之後的 ask 重新判斷
    deferred: VecDeque<ClientMessage>,
    closed: Arc<AtomicBool>,
    ask_timeout: Option<Duration>,
    /// drop 時用來關閉 socket，讓接收執行緒的阻塞讀取結束
    socket: Option<TcpStream>,
}

impl ConnectionHandler {
    /// 從已接受的 TCP 連線建立 handler
    pub fn from_stream(
        conn_id: ConnectionId,
        stream: TcpStream,
        ask_timeout: Option<Duration>,
    ) -> io::Result<Self> {
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let reader = stream.try_clone()?;
        let socket = stream.try_clone()?;
        let mut handler = Self::spawn(conn_id, peer, reader, stream, ask_timeout)?;
        handler.socket = Some(socket);
        Ok(handler)
    }

    /// 建立 handler 並在新執行緒中啟動接收迴圈
    ///
    /// `ask_timeout` 為 None 時 `ask_and_await` 會無限等待。
    pub fn spawn<R, W>(
        conn_id: ConnectionId,
        peer: impl Into<String>,
        reader: R,
        writer: W,
        ask_timeout: Option<Duration>,
    ) -> io::Result<Self>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        let (inbox_tx, inbox_rx) = create_inbox();
        let closed = Arc::new(AtomicBool::new(false));

        let receiver = ReceiveLoop {
            conn_id,
            reader: MessageReader::new(reader),
            inbox: inbox_tx,
            closed: Arc::clone(&closed),
        };
        thread::Builder::new()
            .name(format!("conn-{}", conn_id.get()))
            .spawn(move || receiver.run())?;

        Ok(Self {
            conn_id,
            peer: peer.into(),
            writer: MessageWriter::new(Box::new(writer)),
            inbox: inbox_rx,
            deferred: VecDeque::with_capacity(DEFERRED_CAPACITY),
            closed,
            ask_timeout,
            socket: None,
        })
    }

    pub fn conn_id(&self) -> ConnectionId {
        self.conn_id
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// 目前暫存中的回覆數量
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// 序列化並立即送出一個訊息
    ///
    /// 寫入失敗時連線標記為關閉，之後的 send 都直接回傳 `Closed`。
    pub fn send(&mut self, msg: &ServerMessage) -> Result<(), ConnectionError> {
        if self.is_closed() {
            return Err(ConnectionError::Closed);
        }

        debug!("[CONN] {} -> {}", self.conn_id, msg.tag());
        if let Err(e) = self.writer.send_message(msg) {
            warn!("[CONN] {} send error: {}", self.conn_id, e);
            self.mark_closed();
            return Err(ConnectionError::Io(e));
        }
        Ok(())
    }

    /// 送出問題並阻塞直到收到 `expected` 類型的回覆
    ///
    /// 類型不符的訊息不會被當成答案: 記錄後移到暫存區，下一次 ask 會先重新判斷
    /// 暫存區。連線關閉或超過 ask_timeout 時回傳錯誤。
    ///
    /// 注意: 暫存區只比對類型，客戶端在問題送出前就寄來的同類型回覆也會被當成
    /// 這一次的答案。呼叫端仍需自行驗證內容。
    pub fn ask_and_await(
        &mut self,
        request: &ServerMessage,
        expected: ReplyKind,
    ) -> Result<ClientMessage, ConnectionError> {
        self.send(request)?;

        if let Some(pos) = self.deferred.iter().position(|m| m.kind() == expected) {
            if let Some(msg) = self.deferred.remove(pos) {
                debug!(
                    "[CONN] {} using deferred {} for {}",
                    self.conn_id,
                    expected,
                    request.tag()
                );
                return Ok(msg);
            }
        }

        // 逾時長到無法表示成 Instant 時視同無限等待
        let deadline = self.ask_timeout.and_then(|t| Instant::now().checked_add(t));
        loop {
            let msg = self.next_inbound(deadline)?;
            if msg.kind() == expected {
                return Ok(msg);
            }

            warn!(
                "[CONN] {} unexpected {} while waiting for {}, deferring",
                self.conn_id,
                msg.kind(),
                expected
            );
            self.defer(msg);
        }
    }

    fn next_inbound(
        &mut self,
        deadline: Option<Instant>,
    ) -> Result<ClientMessage, ConnectionError> {
        let result = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                self.inbox.recv_timeout(remaining)
            }
            None => self.inbox.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match result {
            Ok(msg) => Ok(msg),
            Err(RecvTimeoutError::Timeout) => {
                let waited = self.ask_timeout.unwrap_or_default();
                warn!("[CONN] {} no reply within {:?}", self.conn_id, waited);
                Err(ConnectionError::Timeout(waited))
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.mark_closed();
                Err(ConnectionError::Closed)
            }
        }
    }

    fn defer(&mut self, msg: ClientMessage) {
        if self.deferred.len() >= DEFERRED_CAPACITY {
            if let Some(dropped) = self.deferred.pop_front() {
                warn!(
                    "[CONN] {} deferred queue full, dropping {}",
                    self.conn_id,
                    dropped.kind()
                );
            }
        }
        self.deferred.push_back(msg);
    }

    fn mark_closed(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl Drop for ConnectionHandler {
    fn drop(&mut self) {
        if let Some(socket) = self.socket.take() {
            // 對方可能早已斷線，錯誤可忽略
            let _ = socket.shutdown(Shutdown::Both);
        }
    }
}

/// 背景接收迴圈: 只解碼、入列，不做任何遊戲決策
struct ReceiveLoop<R> {
    conn_id: ConnectionId,
    reader: MessageReader<R>,
    inbox: InboxSender,
    closed: Arc<AtomicBool>,
}

impl<R: Read> ReceiveLoop<R> {
    fn run(mut self) {
        loop {
            match self.reader.read_message::<ClientMessage>() {
                Ok(Some(msg)) => {
                    debug!("[CONN] {} <- {}", self.conn_id, msg.kind());
                    if self.inbox.send(msg).is_err() {
                        info!("[CONN] {} inbox closed", self.conn_id);
                        break;
                    }
                }
                Ok(None) => {
                    info!("[CONN] {} EOF", self.conn_id);
                    break;
                }
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    warn!("[CONN] {} dropped malformed message: {}", self.conn_id, e);
                }
                Err(e) => {
                    warn!("[CONN] {} read error: {}", self.conn_id, e);
                    break;
                }
            }
        }

        // inbox sender 在此 drop，等待中的 ask 會收到 Disconnected
        self.closed.store(true, Ordering::SeqCst);
    }
}
