use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;
use glam::Vec2;

use arena::{NetSession, SessionConfig, UdpTransport};

const FRAME_TIME: Duration = Duration::from_millis(16);
const MOVE_SPEED: f32 = 4.0;

#[derive(Parser)]
#[command(name = "arena-client")]
#[command(about = "Arena terminal client")]
struct Args {
    #[arg(short, long, default_value = "127.0.0.1")]
    server: IpAddr,

    #[arg(short, long, default_value_t = arena::DEFAULT_PORT)]
    port: u16,
}

enum Input {
    Quit,
    Move(Vec2),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = SessionConfig {
        server_addr: SocketAddr::new(args.server, args.port),
        ..Default::default()
    };

    let mut session = NetSession::new(UdpTransport::new(), config);
    session.connect()?;

    terminal::enable_raw_mode()?;
    let result = run(&mut session);
    terminal::disable_raw_mode()?;

    session.disconnect();
    log::info!(
        "session closed ({} packets sent, {} received)",
        session.stats().packets_sent,
        session.stats().packets_received
    );

    result
}

fn run(session: &mut NetSession<UdpTransport>) -> Result<()> {
    let start = Instant::now();
    let mut last_report = Instant::now();
    let mut was_connected = false;

    log::info!("move with arrows or WASD, quit with q");

    loop {
        let frame_start = Instant::now();

        match poll_input()? {
            Some(Input::Quit) => break,
            Some(Input::Move(delta)) => session.update_local_player(delta),
            None => {}
        }

        session.update(start.elapsed().as_secs_f64())?;

        if let Some(id) = session.local_player_id() {
            if !was_connected {
                log::info!("in the game as player {}", id);
            }

            if last_report.elapsed() >= Duration::from_secs(1) {
                last_report = Instant::now();
                let pos = session.player_position(id).unwrap_or(Vec2::ZERO);
                let remotes = session.players().filter(|(other, _)| *other != id).count();
                log::info!(
                    "player {} at ({:.0}, {:.0}), {} remote(s)",
                    id,
                    pos.x,
                    pos.y,
                    remotes
                );
            }
        }
        was_connected = session.is_connected();

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - elapsed);
        }
    }

    Ok(())
}

/// At most one key per frame, without blocking the loop.
fn poll_input() -> Result<Option<Input>> {
    if !event::poll(Duration::ZERO)? {
        return Ok(None);
    }

    let Event::Key(key) = event::read()? else {
        return Ok(None);
    };
    if key.kind != KeyEventKind::Press {
        return Ok(None);
    }

    let input = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
        KeyCode::Up | KeyCode::Char('w') => Input::Move(Vec2::new(0.0, -MOVE_SPEED)),
        KeyCode::Down | KeyCode::Char('s') => Input::Move(Vec2::new(0.0, MOVE_SPEED)),
        KeyCode::Left | KeyCode::Char('a') => Input::Move(Vec2::new(-MOVE_SPEED, 0.0)),
        KeyCode::Right | KeyCode::Char('d') => Input::Move(Vec2::new(MOVE_SPEED, 0.0)),
        _ => return Ok(None),
    };

    Ok(Some(input))
}
