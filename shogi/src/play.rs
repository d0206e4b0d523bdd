use crate::display::{render_board, status_line};
use crate::GameConfig;
use anyhow::Result;
use shogi_agents::AiTurn;
use shogi_core::{Action, GameState, MoveOutcome, Phase, Rejection};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;
use tracing::info;

/// What the human typed, once interpreted.
#[derive(Debug, Eq, PartialEq)]
enum Command {
    Quit,
    Help,
    New,
    Undo,
    Moves,
    Promote(bool),
    Play(Action),
    Unknown,
}

fn parse_command(input: &str, promotion_pending: bool) -> Command {
    match input {
        "quit" | "q" => Command::Quit,
        "help" | "?" => Command::Help,
        "new" => Command::New,
        "undo" => Command::Undo,
        "moves" => Command::Moves,
        "y" | "yes" if promotion_pending => Command::Promote(true),
        "n" | "no" if promotion_pending => Command::Promote(false),
        _ => Action::parse(input).map_or(Command::Unknown, Command::Play),
    }
}

fn print_help() {
    println!("Enter moves as <from><to> (e.g. 7g7f) or drops as <piece>*<to> (e.g. P*5e)");
    println!("Answer y or n when asked about promotion");
    println!("Commands: moves, undo, new, help, quit");
}

/// Stdin lines arrive on a channel so the turn clock can run while waiting.
fn spawn_input() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line.trim().to_string()).is_err() {
                break;
            }
        }
    });
    rx
}

fn describe(outcome: &MoveOutcome) -> String {
    let mut text = format!("{} plays {}", outcome.mover, outcome.action);
    if let Some(captured) = outcome.captured {
        text.push_str(&format!(", capturing {captured}"));
    }
    if outcome.promoted {
        text.push_str(&format!(", promoting to {}", outcome.piece.kind.name(true)));
    }
    text
}

/// Applies a human move or drop through the selection operations.
/// A rejected attempt leaves nothing selected.
fn play_human(state: &mut GameState, action: Action) -> Result<MoveOutcome, Rejection> {
    let result = apply_human(state, action);
    if result.is_err() {
        state.deselect();
    }
    result
}

fn apply_human(state: &mut GameState, action: Action) -> Result<MoveOutcome, Rejection> {
    let side = state.turn();
    match action {
        Action::Move { from, to } => {
            state.select(side, from)?;
            state.attempt_move(to)
        }
        Action::Drop { kind, to } => {
            let index = state
                .hand(side)
                .position(kind)
                .ok_or(Rejection::NotInHand(kind))?;
            state.select_from_hand(side, index)?;
            state.attempt_drop(to)
        }
    }
}

/// Line-mode game against the heuristic agent.
pub fn run(config: &GameConfig) -> Result<()> {
    let mut state = GameState::new();
    let mut agent = config.agent();
    let mut history: Vec<GameState> = Vec::new();
    let input = spawn_input();

    println!("Shogi - line mode, you play {}", config.human);
    print_help();

    let mut clock_started = Instant::now();
    let mut clock_move = 0;

    loop {
        println!();
        print!("{}", render_board(&state));
        println!("{}", status_line(&state));

        if state.is_game_over() {
            println!("Game over. Type new or quit.");
        } else if state.turn() != config.human {
            let side = state.turn();
            match agent.choose_ai_move(&mut state, side)? {
                AiTurn::Played(outcome) => println!("{}", describe(&outcome)),
                AiTurn::NoLegalMoves => println!("{side} has no legal moves and passes"),
            }
            continue;
        }

        if clock_move != state.move_number() {
            clock_move = state.move_number();
            clock_started = Instant::now();
        }
        let pending = matches!(state.phase(), Phase::AwaitingPromotionChoice(_));
        if pending {
            print!("Promote? [y/n] ");
        } else if state.is_game_over() {
            print!("> ");
        } else {
            print!("Your move: ");
        }
        io::stdout().flush()?;

        let line = if state.is_game_over() {
            input.recv().ok()
        } else {
            let remaining = config.turn_time.saturating_sub(clock_started.elapsed());
            match input.recv_timeout(remaining) {
                Ok(line) => Some(line),
                Err(RecvTimeoutError::Timeout) => {
                    println!();
                    println!("Time is up, your turn passes");
                    info!(side = %state.turn(), "turn clock expired");
                    state.pass_turn()?;
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => None,
            }
        };
        let Some(line) = line else { break };

        match parse_command(&line, pending) {
            Command::Quit => break,
            Command::Help => print_help(),
            Command::New => {
                state.reset();
                history.clear();
                println!("New game started!");
            }
            Command::Undo => match history.pop() {
                Some(previous) => {
                    state = previous;
                    println!("Undid last move");
                }
                None => println!("Nothing to undo"),
            },
            Command::Moves => {
                let actions = shogi_core::generate_legal_actions(&state, state.turn());
                let listed: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
                println!("{}", listed.join(" "));
            }
            Command::Promote(choice) => match state.resolve_promotion(choice) {
                Ok(outcome) => println!("{}", describe(&outcome)),
                Err(rejection) => println!("{rejection}"),
            },
            Command::Play(_) if state.is_game_over() => println!("The game is over"),
            Command::Play(action) => {
                let snapshot = state.clone();
                match play_human(&mut state, action) {
                    Ok(outcome) => {
                        history.push(snapshot);
                        if !outcome.promotion_pending {
                            println!("{}", describe(&outcome));
                        }
                    }
                    Err(rejection) => println!("Invalid move: {rejection}"),
                }
            }
            Command::Unknown => println!("Unrecognized input, type help"),
        }
    }

    Ok(())
}
