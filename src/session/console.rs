//! Line-oriented study loop: one command per input line, card printed after
//! every command that moves or marks.

use std::io::{BufRead, Write};

use log::debug;

use crate::core::error::{DrillError, Result};
use crate::core::model::Mark;
use crate::session::{Direction, Field, RevealSettings, StudyOrder, StudySession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Random,
    GoTo(usize),
    Mark(Mark),
    Toggle(Field),
    RevealAll,
    Stats,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let head = words.next()?.to_lowercase();
        let arg = words.next();

        let command = match head.as_str() {
            "n" | "next" => Command::Move(Direction::Next),
            "p" | "prev" => Command::Move(Direction::Prev),
            "r" | "random" => Command::Random,
            "g" | "go" => Command::GoTo(arg?.parse().ok()?),
            "y" | "ok" => Command::Mark(Mark::Correct),
            "x" | "fail" => Command::Mark(Mark::Incorrect),
            "t" | "toggle" => Command::Toggle(parse_field(arg?)?),
            "a" | "all" => Command::RevealAll,
            "s" | "stats" => Command::Stats,
            "?" | "h" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

fn parse_field(word: &str) -> Option<Field> {
    match word.to_lowercase().as_str() {
        "m" | "meaning" | "viet" => Some(Field::Meaning),
        "h" | "han" => Some(Field::Han),
        "p" | "pinyin" => Some(Field::Pinyin),
        _ => None,
    }
}

const HELP: &str = "\
commands:
  n | next          next sentence (sequential order only)
  p | prev          previous sentence (sequential order only)
  r | random        random sentence
  g <n>             go to sentence number n
  y | ok            mark current sentence correct
  x | fail          mark current sentence incorrect
  t <field>         show/hide meaning | han | pinyin
  a | all           show every field
  s | stats         tally of marks
  q | quit          finish";

/// Applies one command. Returns `false` once the loop should stop.
pub fn apply(session: &mut StudySession, command: Command, out: &mut impl Write) -> Result<bool> {
    match command {
        Command::Move(direction) => match session.order {
            StudyOrder::Random => {
                writeln!(out, "(next/prev are disabled in random order, use r)")?;
                return Ok(true);
            }
            StudyOrder::Sequential => {
                session.advance(direction);
            }
        },
        Command::Random => {
            session.jump_random()?;
        }
        Command::GoTo(ordinal) => {
            session.go_to(ordinal)?;
        }
        Command::Mark(mark) => session.mark_current(mark)?,
        Command::Toggle(field) => session.reveal.toggle(field),
        Command::RevealAll => session.reveal = RevealSettings::all(),
        Command::Stats => {
            let summary = session.summary();
            writeln!(
                out,
                "Đúng: {}  Sai: {}  Chưa đánh dấu: {}",
                summary.correct, summary.incorrect, summary.unmarked
            )?;
            return Ok(true);
        }
        Command::Help => {
            writeln!(out, "{HELP}")?;
            return Ok(true);
        }
        Command::Quit => return Ok(false),
    }

    render_card(session, out)?;
    Ok(true)
}

pub fn render_card(session: &StudySession, out: &mut impl Write) -> Result<()> {
    let record = session.current()?;
    let verdict = session.verdict(session.cursor());

    writeln!(out, "----------------------------------------")?;
    write!(out, "#{} / {}", record.ordinal, session.len())?;
    if let Some(row) = record.source_row {
        write!(out, "  (dòng {row} trong file)")?;
    }
    writeln!(out, "  [{}]", verdict.display_label())?;

    if session.reveal.meaning {
        writeln!(out, "  Nghĩa tiếng Việt: {}", record.meaning)?;
    }
    if session.reveal.han {
        writeln!(out, "  Hán tự:           {}", record.han)?;
    }
    if session.reveal.pinyin {
        writeln!(out, "  Pinyin:           {}", record.pinyin)?;
    }
    Ok(())
}

/// Runs until `quit` or end of input. Errors from individual commands are
/// printed and the loop continues; only I/O failures end it early.
pub fn run<R: BufRead, W: Write>(
    session: &mut StudySession,
    input: R,
    out: &mut W,
) -> Result<()> {
    if session.is_empty() {
        return Err(DrillError::EmptyDataset);
    }

    writeln!(out, "{} sentence(s) loaded, type ? for help", session.len())?;
    render_card(session, out)?;
    prompt(out)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            prompt(out)?;
            continue;
        }

        let keep_going = match Command::parse(&line) {
            Some(command) => {
                debug!("command {command:?} at row {}", session.cursor());
                match apply(session, command, out) {
                    Ok(keep_going) => keep_going,
                    Err(DrillError::Io(err)) => return Err(DrillError::Io(err)),
                    Err(err) => {
                        writeln!(out, "! {err}")?;
                        true
                    }
                }
            }
            None => {
                writeln!(out, "unknown command {:?}, type ? for help", line.trim())?;
                true
            }
        };

        if !keep_going {
            break;
        }
        prompt(out)?;
    }

    Ok(())
}

fn prompt(out: &mut impl Write) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}
