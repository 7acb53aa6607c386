use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use tracing::debug_span;

use crate::{prelude::*, utils::clear_screen};

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"), version = env!("CARGO_PKG_VERSION"), about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Console log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: Level,

    /// Also write debug logs to a file under /tmp/ponder_logs
    #[arg(long, global = true, default_value = "false")]
    pub log_file: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Deepest iteration to attempt
    #[arg(short, long, default_value = "4")]
    pub depth: u8,
    /// Time budget per move, in seconds
    #[arg(short, long, default_value = "5.0")]
    pub time: f64,
    /// TOML file with evaluation weights
    #[arg(short, long)]
    pub params: Option<PathBuf>,
    /// TOML file with search and move ordering tunables
    #[arg(long)]
    pub search_params: Option<PathBuf>,
}

impl SearchArgs {
    pub fn engine(&self) -> miette::Result<SearchEngine> {
        let mut engine = SearchEngine::new(self.depth, self.time)?;
        if let Some(path) = &self.params {
            engine = engine.with_params(load_params(Some(path))?);
        }
        if let Some(path) = &self.search_params {
            engine = engine.with_search_params(SearchParams::load_from_file(path)?);
        }
        Ok(engine)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play against the engine from the given FEN, or the start position
    Play {
        /// FEN string for starting position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        #[command(flatten)]
        search: SearchArgs,
        /// Side the engine plays
        #[arg(short, long, default_value = "black", value_parser = parse_side)]
        side: Side,
    },

    /// Search one position and print the chosen move
    Bestmove {
        /// FEN string for the position to search
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        #[command(flatten)]
        search: SearchArgs,
    },

    /// Print the evaluation terms of a position
    Eval {
        /// FEN string for the position to evaluate
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        /// TOML file with evaluation weights
        #[arg(short, long)]
        params: Option<PathBuf>,
    },

    /// Run perft on game with given FEN and depth, or use default fen
    Perft {
        /// FEN string for starting position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        /// set search depth
        #[arg(short, long, default_value = "5")]
        depth: u8,
        /// set divide flag
        #[arg(long, default_value = "false")]
        divide: bool,
    },

    /// Write the default evaluation weights, or search tunables, to a TOML file
    DumpParams {
        path: PathBuf,
        /// Write the search tunables instead
        #[arg(long, default_value = "false")]
        search: bool,
    },
}

fn parse_side(s: &str) -> Result<Side, String> {
    s.parse::<Side>().map_err(|e| e.to_string())
}

pub fn load_params(path: Option<&Path>) -> miette::Result<EvalParams> {
    match path {
        Some(path) => EvalParams::load_from_file(path),
        None => Ok(EvalParams::default()),
    }
}

pub fn best_move(fen: &str, search: &SearchArgs) -> miette::Result<Option<SearchResult>> {
    let mut board = Board::try_from_fen(fen)?;
    let mut engine = search.engine()?;
    let result = engine.search(&mut board);

    match result {
        Some(SearchResult {
            best_move: Some(mv),
            score,
            depth,
        }) => println!("bestmove {} (score {score}, depth {depth})", mv.uci()),
        _ => println!("bestmove (none)"),
    }
    Ok(result)
}

pub fn eval(fen: &str, params: Option<&Path>) -> miette::Result<Score> {
    let board = Board::try_from_fen(fen)?;
    let evaluator = Evaluator::with_params(load_params(params)?);

    println!("{board}");
    println!("{}", evaluator.breakdown(&board));
    let score = evaluator.evaluate(&board);
    println!("Score for {}: {score}", board.stm);
    Ok(score)
}

pub fn perft(fen: &str, depth: u8, divide: bool) -> miette::Result<PerftResult> {
    let mut board = Board::try_from_fen(fen)?;
    println!("{board}");
    if divide {
        return perft_divide(&mut board, depth);
    }

    let result = crate::utils::perft::perft(&mut board, depth, false)?;
    println!(
        "Depth {depth}: {} nodes in {} ms ({} nps)",
        result.nodes,
        result.duration.as_millis(),
        result.nps
    );
    Ok(result)
}

pub fn dump_params(path: &Path, search: bool) -> miette::Result<()> {
    if search {
        SearchParams::default().save_to_file(path)?;
        println!("Wrote default search params to {}", path.display());
    } else {
        EvalParams::default().save_to_file(path)?;
        println!("Wrote default eval params to {}", path.display());
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "game_cmd", no_binary_name = true)]
pub struct GameCommand {
    #[command(subcommand)]
    pub cmd: GameSubcommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum GameSubcommand {
    /// Make a move on the board, in UCI notation (e2e4, e7e8q)
    #[clap(visible_alias = "m")]
    Move { uci: String },

    /// Print the current board state
    #[clap(visible_alias = "p")]
    Print,

    /// Undo your last move and the engine's reply
    #[clap(visible_alias = "u")]
    Undo,

    /// Show the current evaluation of the position
    #[clap(visible_alias = "e")]
    Eval,

    /// Show the current fen of the board
    #[clap(visible_alias = "f")]
    Fen,

    /// Let the engine move for the side to move
    #[clap(visible_alias = "g")]
    Go,

    /// Clear screen
    #[clap(visible_alias = "c")]
    Clear,

    /// Restart game with same fen
    #[clap(visible_alias = "r")]
    Restart,

    /// Quit game
    #[clap(visible_alias = "q")]
    Quit,
}

impl GameSubcommand {
    pub fn parse_line(line: &str) -> miette::Result<Option<Self>> {
        let words = shell_words::split(line).into_diagnostic()?;
        if words.is_empty() {
            return Ok(None);
        }
        let cmd = GameCommand::try_parse_from(words).map_err(|e| miette::miette!("{e}"))?;
        Ok(Some(cmd.cmd))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// An interactive game between the terminal user and the engine.
#[derive(Debug)]
pub struct Game {
    start: Board,
    board: Board,
    engine: SearchEngine,
    engine_side: Side,
    played: Vec<MoveInfo>,
}

impl Game {
    pub fn new(fen: &str, engine: SearchEngine, engine_side: Side) -> miette::Result<Self> {
        let board = Board::try_from_fen(fen)?;
        Ok(Self {
            start: board.clone(),
            board,
            engine,
            engine_side,
            played: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn engine_to_move(&self) -> bool {
        self.board.stm == self.engine_side
    }

    pub fn play_move(&mut self, uci: &str) -> miette::Result<Move> {
        let mv = Move::from_uci(&self.board, uci)?;
        let info = self.board.try_move(mv)?;
        self.played.push(info);
        Ok(mv)
    }

    /// Searches for the side to move and plays the result, `None` if the
    /// engine found nothing to play.
    pub fn engine_move(&mut self) -> miette::Result<Option<Move>> {
        let Some(mv) = self.engine.get_best_move(&mut self.board) else {
            return Ok(None);
        };
        let info = self.board.make_move(mv)?;
        self.played.push(info);
        Ok(Some(mv))
    }

    /// Takes back moves until it is the user's turn again. Returns the
    /// moves taken back, most recent first.
    pub fn undo(&mut self) -> miette::Result<Vec<Move>> {
        let mut undone = Vec::new();
        while let Some(info) = self.played.pop() {
            self.board.unmake_move(&info)?;
            undone.push(info.mv);
            if !self.engine_to_move() {
                break;
            }
        }
        Ok(undone)
    }

    pub fn restart(&mut self) {
        self.board = self.start.clone();
        self.played.clear();
    }

    pub fn handle(&mut self, cmd: GameSubcommand) -> miette::Result<Flow> {
        match cmd {
            GameSubcommand::Move { uci } => {
                let mv = self.play_move(&uci)?;
                debug!("User played {mv}");
            }
            GameSubcommand::Print => println!("{}", self.board),
            GameSubcommand::Undo => {
                let undone = self.undo()?;
                if undone.is_empty() {
                    println!("Nothing to undo");
                } else {
                    for mv in undone {
                        println!("Took back {mv}");
                    }
                    println!("{}", self.board);
                }
            }
            GameSubcommand::Eval => {
                let evaluator = self.engine.evaluator();
                println!("{}", evaluator.breakdown(&self.board));
                println!(
                    "Score for {}: {}",
                    self.board.stm,
                    evaluator.evaluate(&self.board)
                );
            }
            GameSubcommand::Fen => println!("{}", self.board.to_fen()),
            GameSubcommand::Go => match self.engine_move()? {
                Some(mv) => println!("{} plays {mv}", env!("CARGO_PKG_NAME")),
                None => println!("No move found"),
            },
            GameSubcommand::Clear => clear_screen()?,
            GameSubcommand::Restart => {
                self.restart();
                println!("{}", self.board);
            }
            GameSubcommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Runs until the game ends, the user quits, or stdin closes.
    pub fn run(mut self) -> miette::Result<()> {
        let span = debug_span!("game_loop");
        let _guard = span.enter();

        println!("{}", self.board);
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            let status = self.board.status();
            if status.is_over() {
                println!("Game over: {status}");
                break;
            }

            if self.engine_to_move() {
                match self.engine_move()? {
                    Some(mv) => {
                        println!("{} plays {mv}", env!("CARGO_PKG_NAME"));
                        println!("{}", self.board);
                    }
                    None => {
                        println!("No move found, game over");
                        break;
                    }
                }
                continue;
            }

            print!("{} to move > ", self.board.stm);
            io::stdout().flush().into_diagnostic()?;
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.into_diagnostic()?;

            let cmd = match GameSubcommand::parse_line(&line) {
                Ok(Some(cmd)) => cmd,
                Ok(None) => continue,
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            };
            let played = matches!(cmd, GameSubcommand::Move { .. });
            match self.handle(cmd) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) if played => println!("{}", self.board),
                Ok(Flow::Continue) => {}
                Err(e) => println!("{e:?}"),
            }
        }
        Ok(())
    }
}
