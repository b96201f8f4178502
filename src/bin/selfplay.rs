//! Local selfplay arena
//!
//! Pits two strategies against each other for a number of games on an
//! in-memory board and prints win statistics. Useful for comparing weight
//! sets and search budgets without a game server.
//!
//! Usage: selfplay <games> <board_size> <strategy_a> <strategy_b>

use std::env;

use virusbot::bot::Bot;
use virusbot::config::Config;
use virusbot::state::{Player, TurnState};
use virusbot::types::{CellState, Position};
use virusbot::Board;

/// Safety cap so stalled games terminate
const MAX_ACTIONS_PER_GAME: usize = 2000;

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment
    // variable is set, we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 5 {
        eprintln!("Usage: {} <games> <board_size> <strategy_a> <strategy_b>", args[0]);
        eprintln!("  strategies: 'heuristic' or 'mcts'");
        eprintln!("Example: {} 20 10 mcts heuristic", args[0]);
        std::process::exit(1);
    }

    let games: usize = args[1].parse().expect("games must be a number");
    let size: usize = args[2].parse().expect("board size must be a number");
    if size < 3 {
        eprintln!("Error: board size must be at least 3");
        std::process::exit(1);
    }

    let bot_a = Bot::new(arena_config(&args[3]));
    let bot_b = Bot::new(arena_config(&args[4]));

    println!("\n═══════════════════════════════════════════════════════════");
    println!("                    SELFPLAY ARENA");
    println!("═══════════════════════════════════════════════════════════");
    println!("Games:       {}", games);
    println!("Board:       {}x{}", size, size);
    println!("Player 1:    {}", bot_a.strategy_name());
    println!("Player 2:    {}", bot_b.strategy_name());
    println!("═══════════════════════════════════════════════════════════\n");

    let mut wins_a = 0;
    let mut wins_b = 0;
    let mut draws = 0;

    for game in 1..=games {
        // Alternate who opens
        let first = if game % 2 == 1 { 1 } else { 2 };
        match play_game(&bot_a, &bot_b, size, first) {
            Some(1) => wins_a += 1,
            Some(2) => wins_b += 1,
            _ => draws += 1,
        }
        println!(
            "Game {:>3}: {} {} - {} {} (draws {})",
            game,
            bot_a.strategy_name(),
            wins_a,
            bot_b.strategy_name(),
            wins_b,
            draws
        );
    }

    println!("\n═══════════════════════════════════════════════════════════");
    println!("                       RESULTS");
    println!("═══════════════════════════════════════════════════════════");
    println!(
        "Player 1 ({}):  {} ({:.1}%)",
        bot_a.strategy_name(),
        wins_a,
        100.0 * wins_a as f64 / games as f64
    );
    println!(
        "Player 2 ({}):  {} ({:.1}%)",
        bot_b.strategy_name(),
        wins_b,
        100.0 * wins_b as f64 / games as f64
    );
    println!("Draws:            {}", draws);
    println!("═══════════════════════════════════════════════════════════\n");
}

fn arena_config(strategy: &str) -> Config {
    let mut config = Config::load_or_default();
    config.engine.strategy = strategy.to_string();
    // The arena logs results itself
    config.decision_log.enabled = false;
    config
}

/// Plays one game to a sole survivor (or a draw at the action cap) and
/// returns the winner's player id
fn play_game(bot_a: &Bot, bot_b: &Bot, size: usize, first: u8) -> Option<u8> {
    let last = (size - 1) as i32;
    let mut board = Board::new(size);
    board.set_base(1, Position::new(0, 0));
    board.set_base(2, Position::new(last, last));
    board.set(Position::new(0, 0), CellState::owned(1));
    board.set(Position::new(last, last), CellState::owned(2));

    let players = vec![
        Player::new(1, bot_a.strategy_name(), Position::new(0, 0)),
        Player::new(2, bot_b.strategy_name(), Position::new(last, last)),
    ];
    let mut state = TurnState::new(board, players, first, first);

    let mut actions = 0;
    while !state.is_terminal() && actions < MAX_ACTIONS_PER_GAME {
        state.acting_player = state.current_player;
        let bot = if state.current_player == 1 { bot_a } else { bot_b };

        let moves = bot.decide_moves(&state, 1);
        match moves.first() {
            Some(mv) => state = state.apply(mv),
            // Blocked players forfeit their turn
            None => state.advance_player(),
        }
        actions += 1;
    }

    let alive = state.alive_players();
    if alive.len() == 1 {
        Some(alive[0].id)
    } else {
        None
    }
}
