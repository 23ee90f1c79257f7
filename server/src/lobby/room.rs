use crate::game::Player;
use crate::net::{ConnectionHandler, ConnectionId};
use log::{error, info, warn};
use std::io;
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

/// 等待中的牌桌: 依連線順序入座，第 i 個連上的客戶端得到 names[i]
pub struct Room {
    names: Vec<String>,
    ask_timeout: Option<Duration>,
    players: Vec<Player>,
}

impl Room {
    pub fn new(names: Vec<String>, ask_timeout: Option<Duration>) -> Self {
        Self {
            players: Vec::with_capacity(names.len()),
            names,
            ask_timeout,
        }
    }

    pub fn capacity(&self) -> usize {
        self.names.len()
    }

    pub fn seated(&self) -> usize {
        self.players.len()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.names.len()
    }

    /// 還需要幾位玩家
    pub fn players_needed(&self) -> usize {
        self.names.len().saturating_sub(self.players.len())
    }

    /// 讓一條新連線入座，回傳座位編號；牌桌已滿時回傳 None
    pub fn seat(&mut self, stream: TcpStream) -> io::Result<Option<usize>> {
        let seat = self.players.len();
        let Some(name) = self.names.get(seat) else {
            return Ok(None);
        };

        let conn_id = ConnectionId::next();
        let conn = ConnectionHandler::from_stream(conn_id, stream, self.ask_timeout)?;
        info!(
            "[LOBBY] Connection {} from {} seated as '{}' (seat {})",
            conn_id,
            conn.peer(),
            name,
            seat
        );

        self.players.push(Player::new(seat, name.clone(), conn));
        Ok(Some(seat))
    }

    /// 結束等待，交出依座位排序的玩家
    pub fn into_players(self) -> Vec<Player> {
        self.players
    }
}

/// 接受連線直到牌桌坐滿
///
/// 單一連線建立失敗只記錄並繼續等下一條；listener 本身出錯才會回傳錯誤。
pub fn accept_players(listener: &TcpListener, mut room: Room) -> io::Result<Vec<Player>> {
    info!("[LOBBY] Waiting for {} players", room.capacity());

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                error!("[ACCEPT] Accept error: {}", e);
                return Err(e);
            }
        };

        if let Err(e) = room.seat(stream) {
            warn!("[ACCEPT] Failed to set up connection: {}", e);
            continue;
        }

        if room.is_full() {
            break;
        }
        info!(
            "[LOBBY] {}/{} seated, waiting for {} more",
            room.seated(),
            room.capacity(),
            room.players_needed()
        );
    }

    info!("[LOBBY] All {} seats taken", room.seated());
    Ok(room.into_players())
}
