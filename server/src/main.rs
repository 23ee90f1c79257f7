use clap::Parser;
use log::{error, info};
use wizard_server::config::ServerConfig;
use wizard_server::game::Game;
use wizard_server::lobby::{Room, accept_players};
use wizard_server::net;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();
    if let Err(e) = config.validate() {
        error!("[SERVER] Invalid configuration: {}", e);
        std::process::exit(2);
    }

    let names = match config.seat_names() {
        Ok(names) => names,
        Err(e) => {
            error!("[SERVER] Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let listener = match net::create_tcp_listener(config.listen_addr()) {
        Ok(l) => l,
        Err(e) => {
            error!("[SERVER] Failed to create listener: {}", e);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(addr) => info!("[SERVER] Listening on {}", addr),
        Err(e) => info!("[SERVER] Listening (local address unavailable: {})", e),
    }

    let room = Room::new(names, config.ask_timeout());
    let players = match accept_players(&listener, room) {
        Ok(players) => players,
        Err(e) => {
            error!("[SERVER] Stopped accepting players: {}", e);
            std::process::exit(1);
        }
    };

    let game = match Game::new(config.game_config(), players) {
        Ok(game) => game,
        Err(e) => {
            error!("[SERVER] Cannot start game: {}", e);
            std::process::exit(2);
        }
    };

    match game.play() {
        Ok(standings) => {
            if let Some(winner) = standings.first() {
                info!("[SERVER] Game over, winner: {} ({} points)", winner.name, winner.score);
            }
        }
        Err(e) => {
            error!("[SERVER] Game aborted: {}", e);
            std::process::exit(1);
        }
    }
}
