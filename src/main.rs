use anyhow::Context;
use chess_core::engine::config::EngineConfig;
use chess_core::engine::search::AlphaBetaEngine;
use chess_core::logic::game::{GameState, GameStatus};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "chess", version, about = "Engine versus engine chess self-play")]
struct Args {
    /// Search depth in plies for white
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..))]
    white: u8,

    /// Search depth in plies for black
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..))]
    black: u8,

    /// Seed for reproducible games (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many plies
    #[arg(long, default_value_t = 200)]
    max_turns: u32,

    /// Engine tuning file, JSON with scale factors
    #[arg(long)]
    config: Option<PathBuf>,
}

fn describe(status: GameStatus) -> String {
    match status {
        GameStatus::Playing => "game still in progress".to_string(),
        GameStatus::Check(color) => format!("{color:?} is in check"),
        GameStatus::Checkmate { winner } => format!("checkmate, {winner:?} wins"),
        GameStatus::Stalemate => "stalemate".to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut engine = AlphaBetaEngine::new(Arc::new(config));
    let mut game = GameState::new(args.white, args.black);
    info!(
        "white depth {}, black depth {}, seed {:?}",
        args.white,
        args.black,
        engine.config().seed
    );

    for ply in 1..=args.max_turns {
        if game.is_finished() {
            break;
        }
        let mover = game.turn;
        let mv = game
            .play_ai_turn(&mut engine)
            .with_context(|| format!("{mover:?} failed to move at ply {ply}"))?;
        info!("{ply:>3}. {mover:?} {mv} ({})", describe(game.status));
    }

    println!("{}", game.board);
    println!("{} after {} plies", describe(game.status), game.history.len());
    Ok(())
}
