use anyhow::{anyhow, Result};
use crossterm::{
    style::{style, Attribute, Color as TermColor, PrintStyledContent},
    QueueableCommand,
};
use indicatif::ProgressBar;
use tracing_subscriber::EnvFilter;

use std::io::{stdin, stdout, Stdin, Write};

use network_ai::{
    board::{Board, Cell, Color, Coordinate},
    moves::Move,
    player::{MachinePlayer, Player},
    search::{SearchConfig, DEFAULT_SEARCH_DEPTH},
    BOARD_SIZE,
};

// games without a winner after this many moves are drawn
const MAX_PLIES: usize = 500;

/// A player typing moves on the terminal
struct HumanPlayer {
    color: Color,
    board: Board,
}

impl HumanPlayer {
    fn new(color: Color) -> Self {
        Self {
            color,
            board: Board::new(),
        }
    }
}

impl Player for HumanPlayer {
    fn color(&self) -> Color {
        self.color
    }

    fn choose_move(&mut self) -> Option<Move> {
        let stdin = stdin();
        loop {
            if self.board.reserve(self.color) > 0 {
                print!("{} to add a piece, 'x y' > ", self.color);
            } else {
                print!("{} to step a piece, 'x y from_x from_y' > ", self.color);
            }
            stdout().flush().expect("Failed to flush to stdout!");

            let mut input_str = String::new();
            match stdin.read_line(&mut input_str) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }

            match input_str.parse::<Move>() {
                Err(err) => println!("{}", err),
                Ok(candidate) if !self.board.is_legal(candidate, self.color) => {
                    println!("Illegal move: {}", candidate)
                }
                Ok(candidate) => {
                    self.board.apply(candidate, self.color);
                    return Some(candidate);
                }
            }
        }
    }

    fn opponent_move(&mut self, opponent_move: Move) -> bool {
        let opponent = self.color.opponent();
        if !self.board.is_legal(opponent_move, opponent) {
            return false;
        }
        self.board.apply(opponent_move, opponent);
        true
    }

    fn force_move(&mut self, forced_move: Move) -> bool {
        if !self.board.is_legal(forced_move, self.color) {
            return false;
        }
        self.board.apply(forced_move, self.color);
        true
    }
}

fn display(board: &Board) -> Result<()> {
    let mut stdout = stdout();

    let cols: String = (0..BOARD_SIZE).map(|x| x.to_string()).collect();
    stdout.queue(PrintStyledContent(style(format!("\n  {}\n", cols))))?;

    for y in 0..BOARD_SIZE {
        stdout.queue(PrintStyledContent(style(format!("{} ", y))))?;
        for x in 0..BOARD_SIZE {
            let square = Coordinate::new(x, y);
            let background = if square.is_corner() {
                TermColor::Black
            } else {
                TermColor::DarkGreen
            };
            stdout.queue(PrintStyledContent(
                style("O")
                    .attribute(Attribute::Bold)
                    .on(background)
                    .with(match board.cell(square) {
                        Cell::Black => TermColor::Black,
                        Cell::White => TermColor::White,
                        Cell::Empty => background,
                    }),
            ))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;

    println!(
        "Reserves: Black {}, White {}",
        board.reserve(Color::Black),
        board.reserve(Color::White)
    );
    Ok(())
}

fn ask_yes_no(stdin: &Stdin, question: &str) -> Result<bool> {
    loop {
        let mut buffer = String::new();
        print!("{} y/n: ", question);
        stdout().flush()?;
        if stdin.read_line(&mut buffer)? == 0 {
            return Err(anyhow!("input closed"));
        }
        match buffer.to_lowercase().chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}

fn ask_depth(stdin: &Stdin) -> Result<usize> {
    loop {
        let mut buffer = String::new();
        print!("Search depth (default {}): ", DEFAULT_SEARCH_DEPTH);
        stdout().flush()?;
        if stdin.read_line(&mut buffer)? == 0 {
            return Err(anyhow!("input closed"));
        }
        let answer = buffer.trim();
        if answer.is_empty() {
            return Ok(DEFAULT_SEARCH_DEPTH);
        }
        match answer.parse::<usize>() {
            Ok(depth @ 1..=6) => return Ok(depth),
            _ => println!("Invalid depth: {}, expected 1 to 6", answer),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "network_ai=info".into()),
        )
        .init();

    let stdin = stdin();

    println!("Welcome to Network\n");

    // White moves first
    let colors = [Color::White, Color::Black];
    let mut ai_players = [false; 2];
    for (i, color) in colors.iter().enumerate() {
        ai_players[i] = ask_yes_no(&stdin, &format!("Is {} AI controlled?", color))?;
    }

    let config = if ai_players.iter().any(|&ai| ai) {
        SearchConfig::default().with_depth(ask_depth(&stdin)?)
    } else {
        SearchConfig::default()
    };

    let mut players: Vec<Box<dyn Player>> = colors
        .iter()
        .zip(ai_players.iter())
        .map(|(&color, &ai)| -> Box<dyn Player> {
            if ai {
                Box::new(MachinePlayer::with_config(color, config))
            } else {
                Box::new(HumanPlayer::new(color))
            }
        })
        .collect();

    let mut referee = Board::new();

    // game loop
    for ply in 0..MAX_PLIES {
        display(&referee)?;

        let current = ply % 2;
        let mover = colors[current];

        let next_move = if ai_players[current] {
            let spinner = ProgressBar::new_spinner();
            spinner.set_message(&format!("{} is thinking...", mover));
            spinner.enable_steady_tick(100);
            let next_move = players[current].choose_move();
            spinner.finish_and_clear();
            next_move
        } else {
            players[current].choose_move()
        };

        let next_move = match next_move {
            Some(next_move) => next_move,
            None => {
                println!("{} has no move to make, game over", mover);
                return Ok(());
            }
        };
        if ai_players[current] {
            println!("{} plays {}", mover, next_move);
        }

        if !referee.is_legal(next_move, mover) {
            return Err(anyhow!("{} played an illegal move: {}", mover, next_move));
        }
        referee.apply(next_move, mover);
        if !players[1 - current].opponent_move(next_move) {
            return Err(anyhow!("{} rejected the move {}", colors[1 - current], next_move));
        }

        // end states
        if let Some(winner) = referee.winner(mover) {
            display(&referee)?;
            if let Some(network) = referee.find_network(winner) {
                let squares: Vec<String> = network.iter().map(|s| s.to_string()).collect();
                println!("Network: {}", squares.join(" - "));
            }
            println!("{} wins!", winner);
            return Ok(());
        }
    }

    display(&referee)?;
    println!("Draw! No network after {} moves", MAX_PLIES);
    Ok(())
}
