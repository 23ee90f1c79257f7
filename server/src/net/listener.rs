use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, TcpListener};

const DEFAULT_BACKLOG: i32 = 128;

/// 使用 socket2 建立 TCP listener
pub fn create_tcp_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;

    // 允許伺服器重啟後立即重新綁定同一個 port
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(DEFAULT_BACKLOG)?;

    Ok(socket.into())
}
