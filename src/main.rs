use std::io::{self, BufRead, Write};

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};

use chess_rules::game::{ClickResult, Game, Phase, UndoResult};
use chess_rules::perft::perft;
use chess_rules::types::{Outcome, Position};

#[derive(Parser, Debug)]
#[command(name = "chess_rules")]
#[command(about = "Play chess on the terminal with coordinate moves")]
struct Args {
    /// Print the perft node count from the start position and exit
    #[arg(long)]
    perft: Option<u8>,

    /// Moves to play before the prompt, e.g. "6,4-4,4 1,4-3,4"
    #[arg(long, default_value = "")]
    moves: String,

    /// Exit after the scripted moves instead of prompting
    #[arg(long)]
    no_prompt: bool,
}

const HELP: &str = "commands: select r c | move r c r c | click r c | undo | moves | board | new | quit";

fn parse_coord(s: &str) -> Result<u8> {
    let n: u8 = s
        .trim()
        .parse()
        .wrap_err_with(|| format!("`{s}` is not a coordinate"))?;
    if n >= 8 {
        return Err(eyre!("coordinate {n} is off the board"));
    }
    Ok(n)
}

/// "r,c" to a position
fn parse_position(s: &str) -> Result<Position> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| eyre!("expected `row,col`, got `{s}`"))?;
    Ok(Position::new(parse_coord(row)?, parse_coord(col)?))
}

/// "r,c-r,c" to a move
fn parse_move(s: &str) -> Result<(Position, Position)> {
    let (from, to) = s
        .split_once('-')
        .ok_or_else(|| eyre!("expected `row,col-row,col`, got `{s}`"))?;
    Ok((parse_position(from)?, parse_position(to)?))
}

fn positions_from_args(args: &[&str]) -> Result<Vec<Position>> {
    args.chunks(2)
        .map(|pair| match pair {
            [row, col] => Ok(Position::new(parse_coord(row)?, parse_coord(col)?)),
            _ => Err(eyre!("coordinates come in `row col` pairs")),
        })
        .collect()
}

fn report_outcome(game: &Game, outcome: Outcome) {
    game.board().draw_to_terminal();
    match outcome {
        Outcome::Ok => match game.check() {
            Some(color) => println!("{} to move, in check", color.to_human()),
            None => println!("{} to move", game.side_to_move().to_human()),
        },
        Outcome::Checkmate(winner) => println!("Checkmate, {} wins", winner.to_human()),
        Outcome::Stalemate => println!("Stalemate"),
    }
}

fn print_destinations(destinations: &[Position]) {
    let list: Vec<String> = destinations.iter().map(|p| p.to_string()).collect();
    println!("legal: {}", list.join(" "));
}

/// Run one prompt line. Returns false when the user wants to leave.
fn run_command(game: &mut Game, line: &str) -> Result<bool> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, rest)) = words.split_first() else {
        return Ok(true);
    };

    match command {
        "quit" | "exit" => return Ok(false),
        "board" => game.board().draw_to_terminal(),
        "new" => {
            game.new_game();
            game.board().draw_to_terminal();
        }
        "undo" => match game.undo() {
            UndoResult::Restored => game.board().draw_to_terminal(),
            UndoResult::NothingToUndo => println!("nothing to undo"),
        },
        "moves" => match game.phase() {
            Phase::PieceSelected { destinations, .. } => print_destinations(destinations),
            Phase::AwaitingSelection => println!("no piece selected"),
            Phase::Checkmate(winner) => println!("game over, {} won", winner.to_human()),
            Phase::Stalemate => println!("game over, stalemate"),
        },
        "select" => {
            let positions = positions_from_args(rest)?;
            let [pos] = positions[..] else {
                return Err(eyre!("usage: select r c"));
            };
            match game.select(pos)? {
                Some(destinations) => print_destinations(destinations),
                None => println!("deselected {pos}"),
            }
        }
        "move" => {
            let positions = positions_from_args(rest)?;
            let [from, to] = positions[..] else {
                return Err(eyre!("usage: move r c r c"));
            };
            let outcome = game.apply_move(from, to)?;
            report_outcome(game, outcome);
        }
        "click" => {
            let positions = positions_from_args(rest)?;
            let [pos] = positions[..] else {
                return Err(eyre!("usage: click r c"));
            };
            match game.click(pos) {
                ClickResult::Moved(outcome) => report_outcome(game, outcome),
                ClickResult::Selected(destinations) => print_destinations(&destinations),
                ClickResult::Deselected => println!("deselected"),
                ClickResult::Ignored => println!("nothing to do at {pos}"),
            }
        }
        "help" => println!("{HELP}"),
        other => println!("unknown command `{other}`, {HELP}"),
    }
    Ok(true)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut game = Game::new();

    if let Some(depth) = args.perft {
        let nodes = perft(game.state(), game.rights(), depth);
        println!("perft({depth}) = {nodes}");
        return Ok(());
    }

    for mv in args.moves.split_whitespace() {
        let (from, to) = parse_move(mv)?;
        game.apply_move(from, to)
            .wrap_err_with(|| format!("scripted move `{mv}` failed"))?;
    }
    game.board().draw_to_terminal();
    if args.no_prompt {
        return Ok(());
    }

    println!("{HELP}");
    let stdin = io::stdin();
    loop {
        print!("{}> ", game.side_to_move().to_human());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match run_command(&mut game, &line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("error: {e:#}"),
        }
    }
    Ok(())
}
