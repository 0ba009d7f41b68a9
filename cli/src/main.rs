use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use minegrid_core::{GameConfig, Session};

use command::Command;

mod command;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Rows and columns of the square board
    #[arg(long, default_value_t = 10)]
    size: u8,

    /// Number of mines, must leave at least one safe cell
    #[arg(short, long, default_value_t = 10)]
    mines: u16,

    /// Print digits without terminal colors
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(log_level) = args.verbose.log_level() {
        simple_logger::init_with_level(log_level).context("error initializing logger")?;
    }

    let config = GameConfig::square(args.size, args.mines).with_context(|| {
        format!("invalid board: {} mines on {}x{}", args.mines, args.size, args.size)
    })?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let mut session = Session::new(config, seed).context("could not start a game")?;
    play(&mut session, io::stdin().lock(), &mut io::stdout().lock(), !args.no_color)
}

/// Runs the command loop until `quit` or end of input.
///
/// A finished round is drawn together with its notice, and only replaced once the player acknowledges it.
fn play(session: &mut Session, input: impl BufRead, out: &mut impl Write, colored: bool) -> Result<()> {
    let mut lines = input.lines();

    writeln!(out, "{}", command::HELP)?;
    write!(out, "{}", render::render(session, colored))?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next().transpose().context("failed to read input")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let parsed = match line.parse::<Command>() {
            Ok(parsed) => parsed,
            Err(err) => {
                writeln!(out, "{err}, type `h` for help")?;
                continue;
            }
        };
        log::debug!("command: {:?}", parsed);

        let update = match parsed {
            Command::Reveal(coords) => session.reveal(coords),
            Command::Flag(coords) => session.toggle_flag(coords),
            Command::NewGame => session.new_game()?,
            Command::Help => {
                writeln!(out, "{}", command::HELP)?;
                continue;
            }
            Command::Quit => break,
        };

        if !update.has_update() {
            writeln!(out, "nothing changed")?;
            continue;
        }
        write!(out, "{}", render::render(session, colored))?;

        if let Some(notice) = update.notice {
            writeln!(out, "{}", notice.message())?;
            write!(out, "Press Enter to start a new round")?;
            out.flush()?;
            if lines.next().transpose()?.is_none() {
                break;
            }
            session.new_game()?;
            write!(out, "{}", render::render(session, colored))?;
        }
    }

    Ok(())
}
