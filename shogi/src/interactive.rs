use crate::display::{cell, hand_line, status_line};
use crate::GameConfig;
use shogi_agents::{AiTurn, HeuristicAgent};
use shogi_core::{GameState, Phase, Selection, Side, Square, BOARD_SIZE};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    style::{Color as TermColor, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
    ExecutableCommand,
};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing::info;

/// Row index of the first row of the human's hand below the board.
const HAND_ROW: u8 = BOARD_SIZE;

/// Rows the hand grid needs, nine slots to a row, never fewer than one.
fn hand_rows(len: usize) -> u8 {
    let rows = len.div_ceil(BOARD_SIZE as usize);
    rows.clamp(1, usize::from(u8::MAX - HAND_ROW)) as u8
}

/// Hand index addressed by a cursor position, if it lies below the board.
fn hand_slot(x: u8, y: u8) -> Option<usize> {
    let row = y.checked_sub(HAND_ROW)?;
    Some(row as usize * BOARD_SIZE as usize + x as usize)
}

pub struct InteractiveGame {
    state: GameState,
    agent: HeuristicAgent,
    human: Side,
    turn_time: Duration,
    /// (x, y); rows from HAND_ROW down address the hand grid
    cursor_pos: (u8, u8),
    highlights: Vec<Square>,
    message: String,
    history: Vec<GameState>,
    clock_started: Instant,
    clock_move: u32,
}

impl InteractiveGame {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            state: GameState::new(),
            agent: config.agent(),
            human: config.human,
            turn_time: config.turn_time,
            cursor_pos: (4, 6),
            highlights: Vec::new(),
            message: String::from("Arrows/hjkl move, Enter selects, Esc cancels, q quits"),
            history: Vec::new(),
            clock_started: Instant::now(),
            clock_move: 0,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(Hide)?;
        stdout.execute(Clear(ClearType::All))?;

        let result = self.game_loop();

        stdout.execute(Show)?;
        terminal::disable_raw_mode()?;
        stdout.execute(Clear(ClearType::All))?;
        stdout.execute(MoveTo(0, 0))?;

        result
    }

    fn game_loop(&mut self) -> io::Result<()> {
        loop {
            if !self.state.is_game_over() && self.state.turn() != self.human {
                self.engine_move()?;
                continue;
            }

            if self.clock_move != self.state.move_number() {
                self.clock_move = self.state.move_number();
                self.clock_started = Instant::now();
            }
            self.draw_board()?;

            let timeout = if self.state.is_game_over() {
                Duration::from_millis(500)
            } else {
                let remaining = self.turn_time.saturating_sub(self.clock_started.elapsed());
                if remaining.is_zero() {
                    self.time_up();
                    continue;
                }
                remaining.min(Duration::from_millis(250))
            };

            if !event::poll(timeout)? {
                continue;
            }
            let Event::Key(KeyEvent { code, kind, .. }) = event::read()? else {
                continue;
            };
            if kind != KeyEventKind::Press {
                continue;
            }

            match code {
                KeyCode::Char('q') => break,
                KeyCode::Esc => {
                    self.state.deselect();
                    self.highlights.clear();
                }
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1, 0),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(0, 1),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(0, -1),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1, 0),
                KeyCode::Char('y') => self.resolve_promotion(true),
                KeyCode::Char('n') if self.promotion_pending() => self.resolve_promotion(false),
                KeyCode::Enter | KeyCode::Char(' ') => self.handle_selection(),
                KeyCode::Char('u') => self.undo_move(),
                KeyCode::Char('n') => self.new_game(),
                _ => {}
            }
        }

        Ok(())
    }

    fn promotion_pending(&self) -> bool {
        matches!(self.state.phase(), Phase::AwaitingPromotionChoice(_))
    }

    fn time_up(&mut self) {
        info!(side = %self.human, "turn clock expired");
        if self.state.pass_turn().is_ok() {
            self.highlights.clear();
            self.message = String::from("Time is up, your turn passed");
        }
    }

    fn move_cursor(&mut self, dx: i8, dy: i8) {
        let new_x = self.cursor_pos.0 as i16 + i16::from(dx);
        let new_y = self.cursor_pos.1 as i16 + i16::from(dy);
        let last_row = HAND_ROW + hand_rows(self.state.hand(self.human).len()) - 1;

        if (0..BOARD_SIZE as i16).contains(&new_x) && (0..=last_row as i16).contains(&new_y) {
            self.cursor_pos = (new_x as u8, new_y as u8);
        }
    }

    fn resolve_promotion(&mut self, promote: bool) {
        if let Ok(outcome) = self.state.resolve_promotion(promote) {
            self.message = if outcome.promoted {
                format!("Promoted: {}", outcome.piece)
            } else {
                String::from("Promotion declined")
            };
        }
    }

    fn handle_selection(&mut self) {
        if self.state.is_game_over() || self.promotion_pending() {
            return;
        }
        let (x, y) = self.cursor_pos;

        if let Some(index) = hand_slot(x, y) {
            match self.state.select_from_hand(self.human, index) {
                Ok(selection) => self.on_selected(selection),
                Err(rejection) => self.message = rejection.to_string(),
            }
            return;
        }
        let Some(square) = Square::new(x, y) else {
            return;
        };

        // Selecting another own piece replaces the selection.
        if self.state.board().is_side(square, self.human) {
            match self.state.select(self.human, square) {
                Ok(selection) => self.on_selected(selection),
                Err(rejection) => self.message = rejection.to_string(),
            }
            return;
        }

        let snapshot = self.state.clone();
        let result = match self.state.selection() {
            Some(Selection::Board { .. }) => self.state.attempt_move(square),
            Some(Selection::Hand { .. }) => self.state.attempt_drop(square),
            None => return,
        };

        match result {
            Ok(outcome) => {
                self.history.push(snapshot);
                self.highlights.clear();
                self.message = if outcome.promotion_pending {
                    String::from("Promote? y/n")
                } else {
                    format!("Moved: {}", outcome.action)
                };
            }
            Err(rejection) => self.message = rejection.to_string(),
        }
    }

    fn on_selected(&mut self, selection: Selection) {
        self.highlights = self.state.selected_targets();
        let piece = match selection {
            Selection::Board { piece, .. } | Selection::Hand { piece, .. } => piece,
        };
        self.message = format!("Selected {piece}");
    }

    fn engine_move(&mut self) -> io::Result<()> {
        self.message = String::from("Engine thinking...");
        self.draw_board()?;

        let side = self.state.turn();
        self.message = match self.agent.choose_ai_move(&mut self.state, side) {
            Ok(AiTurn::Played(outcome)) => format!("Engine played: {}", outcome.action),
            Ok(AiTurn::NoLegalMoves) => String::from("Engine has no legal moves and passes"),
            Err(rejection) => rejection.to_string(),
        };

        Ok(())
    }

    fn undo_move(&mut self) {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                self.state.deselect();
                self.highlights.clear();
                self.message = String::from("Undid last move");
            }
            None => self.message = String::from("Nothing to undo"),
        }
    }

    fn new_game(&mut self) {
        self.state.reset();
        self.history.clear();
        self.highlights.clear();
        self.cursor_pos = (4, 6);
        self.message = String::from("New game started!");
    }

    fn draw_board(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.execute(MoveTo(0, 0))?;
        stdout.execute(Clear(ClearType::All))?;

        println!("Shogi - Interactive Mode (vim keys: hjkl)\r");
        println!("Enter=select/move, Esc=cancel, y/n=promote, u=undo, n=new, q=quit\r");
        println!("\r");
        println!(
            "{} hand: {}\r",
            self.human.opponent(),
            hand_line(self.state.hand(self.human.opponent()))
        );

        print!("  ");
        for x in 0..BOARD_SIZE {
            print!("{:>3}", BOARD_SIZE - x);
        }
        println!("\r");

        let selected = match self.state.selection() {
            Some(Selection::Board { square, .. }) => Some(square),
            _ => None,
        };

        for y in 0..BOARD_SIZE {
            print!("  ");
            for x in 0..BOARD_SIZE {
                let Some(square) = Square::new(x, y) else {
                    continue;
                };

                if self.cursor_pos == (x, y) {
                    stdout.execute(SetBackgroundColor(TermColor::Yellow))?;
                } else if selected == Some(square) {
                    stdout.execute(SetBackgroundColor(TermColor::Green))?;
                } else if self.highlights.contains(&square) {
                    stdout.execute(SetBackgroundColor(TermColor::Blue))?;
                }

                if let Some(piece) = self.state.board().at(square) {
                    let color = if piece.side == Side::Sente {
                        TermColor::White
                    } else {
                        TermColor::Magenta
                    };
                    stdout.execute(SetForegroundColor(color))?;
                }
                print!("{}", cell(self.state.board().at(square)));
                stdout.execute(ResetColor)?;
            }
            println!("  {}\r", char::from(b'a' + y));
        }

        // Human hand, nine slots per row in capture order.
        let hand = self.state.hand(self.human);
        let held = match self.state.selection() {
            Some(Selection::Hand { index, .. }) => Some(index),
            _ => None,
        };
        for y in HAND_ROW..HAND_ROW + hand_rows(hand.len()) {
            print!("  ");
            for x in 0..BOARD_SIZE {
                let slot = hand_slot(x, y);
                if self.cursor_pos == (x, y) {
                    stdout.execute(SetBackgroundColor(TermColor::Yellow))?;
                } else if slot.is_some() && slot == held {
                    stdout.execute(SetBackgroundColor(TermColor::Green))?;
                }
                print!("{}", cell(slot.and_then(|index| hand.get(index))));
                stdout.execute(ResetColor)?;
            }
            if y == HAND_ROW {
                print!("  {} hand ({})", self.human, hand.len());
            }
            println!("\r");
        }
        println!("\r");

        println!("{}\r", status_line(&self.state));
        if !self.state.is_game_over() && self.state.turn() == self.human {
            let left = self.turn_time.saturating_sub(self.clock_started.elapsed());
            println!("Time left: {}s\r", left.as_secs());
        }
        println!("\r");
        println!("{}\r", self.message);

        stdout.flush()?;
        Ok(())
    }
}
