mod display;
mod interactive;
mod play;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shogi_agents::{play_turn, Agent, HeuristicAgent, HeuristicConfig, RandomAgent};
use shogi_core::{perft, perft_detailed, perft_divide, GameState, Side};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shogi", about = "Shogi against a greedy heuristic opponent")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Side played by the human
    #[arg(long, value_enum, default_value_t = SideArg::Sente, global = true)]
    human: SideArg,

    /// Seed for the opponent's random choices
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of best-scoring candidates the opponent samples from
    #[arg(long, default_value_t = 3, global = true)]
    top_n: usize,

    /// Seconds per human turn before it is passed
    #[arg(long, default_value_t = 10, global = true)]
    turn_seconds: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play in line mode (default)
    Play,
    /// Play in a full-screen terminal board
    Tui,
    /// Count legal action tree nodes
    Perft {
        depth: u8,
        /// Position in SFEN, defaults to the starting position
        sfen: Option<String>,
    },
    /// Print a position given in SFEN
    Show { sfen: String },
    /// Random agent (Sente) against the heuristic agent (Gote)
    Selfplay {
        #[arg(long, default_value_t = 10)]
        games: u32,
        #[arg(long, default_value_t = 300)]
        max_plies: u32,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SideArg {
    Sente,
    Gote,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Sente => Side::Sente,
            SideArg::Gote => Side::Gote,
        }
    }
}

/// Settings shared by both play modes.
pub struct GameConfig {
    pub human: Side,
    pub turn_time: Duration,
    pub heuristic: HeuristicConfig,
    pub seed: Option<u64>,
}

impl GameConfig {
    fn from_args(args: &Args) -> Self {
        GameConfig {
            human: args.human.into(),
            turn_time: Duration::from_secs(args.turn_seconds),
            heuristic: HeuristicConfig {
                top_n: args.top_n,
                ..HeuristicConfig::default()
            },
            seed: args.seed,
        }
    }

    pub fn agent(&self) -> HeuristicAgent {
        match self.seed {
            Some(seed) => HeuristicAgent::with_seed(self.heuristic, seed),
            None => HeuristicAgent::new(self.heuristic),
        }
    }
}

fn parse_position(sfen: Option<&str>) -> Result<GameState> {
    match sfen {
        Some(sfen) => GameState::from_sfen(sfen).with_context(|| format!("invalid SFEN: {sfen}")),
        None => Ok(GameState::new()),
    }
}

fn run_perft(depth: u8, sfen: Option<&str>) -> Result<()> {
    let state = parse_position(sfen)?;

    println!("Running perft({})...", depth);
    println!("Position: {}", state.to_sfen());

    if depth <= 2 {
        // Show action breakdown for shallow depths
        let results = perft_divide(&state, depth);
        let mut total = 0;

        for (action, count) in &results {
            println!("{}: {}", action, count);
            total += count;
        }

        let details = perft_detailed(&state, depth);
        println!("\nTotal: {}", total);
        println!(
            "Captures: {} Drops: {} Promotions: {} Checks: {}",
            details.captures, details.drops, details.promotions, details.checks
        );
    } else {
        let start = Instant::now();
        let nodes = perft(&state, depth);
        let elapsed = start.elapsed();

        println!("Nodes: {}", nodes);
        println!("Time: {:.2}s", elapsed.as_secs_f64());
        println!("NPS: {:.0}", nodes as f64 / elapsed.as_secs_f64());
    }

    Ok(())
}

/// Each self-play game gets its own seed, derived from the base seed.
fn game_seed(base: Option<u64>, game: u32) -> Option<u64> {
    base.map(|seed| seed.wrapping_add(u64::from(game)))
}

fn run_selfplay(config: &GameConfig, games: u32, max_plies: u32) -> Result<()> {
    let mut wins = [0u32; 2];
    let mut unfinished = 0;

    for game in 0..games {
        let seed = game_seed(config.seed, game);
        let mut sente = match seed {
            Some(seed) => RandomAgent::with_seed(seed),
            None => RandomAgent::new(),
        };
        let mut gote = match seed {
            Some(seed) => HeuristicAgent::with_seed(config.heuristic, seed),
            None => HeuristicAgent::new(config.heuristic),
        };

        let mut state = GameState::new();
        for _ in 0..max_plies {
            if state.is_game_over() {
                break;
            }
            let agent: &mut dyn Agent = match state.turn() {
                Side::Sente => &mut sente,
                Side::Gote => &mut gote,
            };
            play_turn(agent, &mut state)?;
        }

        match state.winner() {
            Some(winner) => wins[winner.index()] += 1,
            None => unfinished += 1,
        }
        info!(
            game,
            sente = sente.name(),
            gote = gote.name(),
            winner = ?state.winner(),
            "self-play game finished"
        );
        println!(
            "Game {}: {} after {} plies ({})",
            game + 1,
            state.winner().map_or("unfinished".to_string(), |w| format!("{w} wins")),
            state.move_number() - 1,
            state.to_sfen()
        );
    }

    println!(
        "\nSente (random): {}  Gote (heuristic): {}  unfinished: {}",
        wins[Side::Sente.index()],
        wins[Side::Gote.index()],
        unfinished
    );
    Ok(())
}

fn main() -> Result<()> {
    // Logs go to stderr so they stay out of the board display.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = GameConfig::from_args(&args);

    match args.command.unwrap_or(Command::Play) {
        Command::Play => play::run(&config)?,
        Command::Tui => {
            let mut game = interactive::InteractiveGame::new(&config);
            game.run().context("terminal error")?;
        }
        Command::Perft { depth, sfen } => run_perft(depth, sfen.as_deref())?,
        Command::Show { sfen } => {
            let state = parse_position(Some(&sfen))?;
            print!("{}", display::render_board(&state));
            println!("{}", display::status_line(&state));
            println!("SFEN: {}", state.to_sfen());
        }
        Command::Selfplay { games, max_plies } => run_selfplay(&config, games, max_plies)?,
    }

    Ok(())
}
