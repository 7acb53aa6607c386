use clap::Parser;
use ponder::cli::{self, Cli, Commands, Game};
use ponder::prelude::*;
use tracing::{Level, span, trace};

fn main() -> miette::Result<()> {
    init();
    let args = Cli::parse();
    set_log_level(args.log_level)?;
    if args.log_file
        && let Some(path) = toggle_file_logging(true)?
    {
        info!("Logging to {}", path.display());
    }

    let span = span!(Level::DEBUG, "main");
    let _guard = span.enter();
    match args.command {
        Some(Commands::Play { fen, search, side }) => {
            trace!("Starting game with fen: {fen}, {search:?}, engine plays {side}");
            Game::new(&fen, search.engine()?, side)?.run()?;
        }
        Some(Commands::Bestmove { fen, search }) => {
            trace!("Searching fen: {fen}, {search:?}");
            cli::best_move(&fen, &search)?;
        }
        Some(Commands::Eval { fen, params }) => {
            cli::eval(&fen, params.as_deref())?;
        }
        Some(Commands::Perft { fen, depth, divide }) => {
            trace!("Running perft with fen: {fen}, depth: {depth}, divide: {divide}");
            cli::perft(&fen, depth, divide)?;
        }
        Some(Commands::DumpParams { path, search }) => cli::dump_params(&path, search)?,
        None => {
            println!("Starting default game");
            let search = cli::SearchArgs {
                depth: 4,
                time: 5.0,
                params: None,
                search_params: None,
            };
            Game::new(START_FEN, search.engine()?, Side::Black)?.run()?;
        }
    }
    Ok(())
}
