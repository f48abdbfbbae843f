//! # Quiz App
//!
//! Terminal driver for a [`Session`]. Each input line becomes a [`Message`], and
//! [`QuizApp::update`] applies it and writes the resulting board state.
//!
//! ## Input
//! - `<string> <fret>` taps a cell
//! - `mode <display|fill-chord|find-interval|find-scale>`
//! - `root <note>`, `chord <name>`, `scale <name>`
//! - `next` draws a new interval, `show` reprints, `help`, `quit`

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use clap::ValueEnum;
use fretboard_core::{FretPosition, Mode, Session, TapOutcome, TheoryEngine};
use log::debug;
use rand::Rng;

/// Mode names accepted on the command line and in the quiz loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Display,
    FillChord,
    FindInterval,
    FindScale,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Display => Mode::Display,
            ModeArg::FillChord => Mode::FillChord,
            ModeArg::FindInterval => Mode::FindSingleInterval,
            ModeArg::FindScale => Mode::FindScale,
        }
    }
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Tap(FretPosition),
    SetMode(Mode),
    SetRoot(String),
    SetChordType(String),
    SetScaleType(String),
    NextInterval,
    Show,
    Help,
    Exit,
}

impl FromStr for Message {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        if let Ok(string) = command.parse::<usize>() {
            let fret = rest
                .parse::<u8>()
                .with_context(|| format!("expected '<string> <fret>', got '{line}'"))?;
            return Ok(Message::Tap(FretPosition::new(string, fret)));
        }

        let argument = |what: &str| {
            if rest.is_empty() {
                Err(anyhow!("'{command}' needs a {what}"))
            } else {
                Ok(rest.to_string())
            }
        };

        match command {
            "mode" => {
                let mode = <ModeArg as ValueEnum>::from_str(rest, true).map_err(|e| anyhow!(e))?;
                Ok(Message::SetMode(mode.into()))
            }
            "root" => Ok(Message::SetRoot(argument("note")?)),
            "chord" => Ok(Message::SetChordType(argument("chord name")?)),
            "scale" => Ok(Message::SetScaleType(argument("scale name")?)),
            "next" => Ok(Message::NextInterval),
            "show" | "" => Ok(Message::Show),
            "help" | "?" => Ok(Message::Help),
            "quit" | "exit" | "q" => Ok(Message::Exit),
            other => bail!("unknown command '{other}' (try 'help')"),
        }
    }
}

/// Whether the loop should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Session plus the queue of completion notices waiting to be printed.
pub struct QuizApp<'e, R: Rng> {
    engine: &'e TheoryEngine,
    session: Session<'e, R>,
    notices: Rc<RefCell<Vec<String>>>,
}

impl<'e, R: Rng> QuizApp<'e, R> {
    pub fn new(engine: &'e TheoryEngine, mut session: Session<'e, R>) -> Self {
        let notices = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&notices);
        session.set_on_complete(move |completion| sink.borrow_mut().push(completion.to_string()));
        Self {
            engine,
            session,
            notices,
        }
    }

    pub fn session(&self) -> &Session<'e, R> {
        &self.session
    }

    /// Applies one message. Selection errors are reported, not fatal.
    pub fn update<W: Write>(&mut self, message: Message, out: &mut W) -> Result<Flow> {
        debug!("[UPDATE] Received message: {:?}", message);

        let changed = match message {
            Message::Tap(position) => {
                match self.session.tap(position) {
                    TapOutcome::Ignored => writeln!(out, "{position}: nothing new")?,
                    TapOutcome::Found { remaining } => {
                        let label = self
                            .engine
                            .cell_label(position, self.session.selection().root)
                            .map(|l| l.to_string())
                            .unwrap_or_default();
                        writeln!(out, "{position}: {label} found, {remaining} to go")?;
                    }
                    TapOutcome::Completed => {}
                }
                self.flush_notices(out)?;
                return Ok(Flow::Continue);
            }
            Message::SetMode(mode) => self.session.set_mode(mode),
            Message::SetRoot(root) => self.session.set_root(&root),
            Message::SetChordType(name) => self.session.set_chord_type(&name),
            Message::SetScaleType(name) => self.session.set_scale_type(&name),
            Message::NextInterval => self.session.reroll_interval().map(|_| ()),
            Message::Show => Ok(()),
            Message::Help => {
                writeln!(out, "{}", HELP)?;
                return Ok(Flow::Continue);
            }
            Message::Exit => return Ok(Flow::Exit),
        };

        match changed {
            Ok(()) => self.render(out)?,
            Err(e) => writeln!(out, "error: {e}")?,
        }
        self.flush_notices(out)?;
        Ok(Flow::Continue)
    }

    fn flush_notices<W: Write>(&self, out: &mut W) -> Result<()> {
        for notice in self.notices.borrow_mut().drain(..) {
            writeln!(out, "*** {notice} ***")?;
        }
        Ok(())
    }

    /// Writes the current header and every visible cell.
    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        let session = &self.session;
        let selection = session.selection();
        let mode = session.mode();

        let subject = match mode {
            Mode::Display | Mode::FillChord => self
                .engine
                .catalog()
                .lookup(&selection.chord_type)
                .map(|t| self.engine.describe(t))?,
            Mode::FindScale => selection.scale_type.clone(),
            Mode::FindSingleInterval => {
                let (shown, wanted) = session.prompt();
                format!("we show {shown}, please find {wanted}")
            }
        };
        writeln!(out, "[{mode}] root {} - {subject}", selection.root)?;

        if mode.tracks_taps() {
            writeln!(
                out,
                "found {}/{}",
                session.found().len(),
                session.round().targets().len()
            )?;
        }
        for label in self
            .engine
            .cell_labels(&session.visible_positions(), selection.root)
        {
            let FretPosition { string, fret } = label.position;
            writeln!(out, "  string {string} fret {fret:>2}  {label}")?;
        }
        Ok(())
    }
}

pub const HELP: &str = "\
commands:
  <string> <fret>   tap a cell (string 0 is the lowest)
  mode <m>          display | fill-chord | find-interval | find-scale
  root <note>       change the root (C, F#, Bb, ...)
  chord <name>      change the chord type
  scale <name>      change the scale
  next              draw a new interval to find
  show              print the board again
  quit              leave";

#[cfg(test)]
mod tests {
    use super::*;
    use fretboard_core::EngineConfig;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn output<R: Rng>(app: &mut QuizApp<'_, R>, line: &str) -> String {
        let mut out = Vec::new();
        let message: Message = line.parse().unwrap();
        app.update(message, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!("0 8".parse::<Message>().unwrap(), Message::Tap(FretPosition::new(0, 8)));
        assert_eq!(
            "mode fill-chord".parse::<Message>().unwrap(),
            Message::SetMode(Mode::FillChord)
        );
        assert_eq!(
            "chord Major 7".parse::<Message>().unwrap(),
            Message::SetChordType("Major 7".to_string())
        );
        assert_eq!("quit".parse::<Message>().unwrap(), Message::Exit);
        assert!("0 x".parse::<Message>().is_err());
        assert!("root".parse::<Message>().is_err());
        assert!("mode karaoke".parse::<Message>().is_err());
        assert!("dance".parse::<Message>().is_err());
    }

    #[test]
    fn fill_chord_round_prints_completion_once() {
        let engine = TheoryEngine::default();
        let session = Session::new(&engine, StdRng::seed_from_u64(1)).unwrap();
        let mut app = QuizApp::new(&engine, session);

        let header = output(&mut app, "mode fill-chord");
        assert!(header.starts_with("[FillChord] root C - Major (1 3 5)"));

        let targets = app.session().round().targets().to_vec();
        let mut transcript = String::new();
        for cell in &targets {
            transcript += &output(&mut app, &format!("{} {}", cell.string, cell.fret));
        }
        transcript += &output(&mut app, &format!("{} {}", targets[0].string, targets[0].fret));

        assert_eq!(transcript.matches("You found all chord notes!").count(), 1);
        assert!(transcript.ends_with("nothing new\n"));
    }

    #[test]
    fn empty_round_reports_completion_on_switch() {
        let config = EngineConfig {
            max_fret: 0,
            ..EngineConfig::default()
        };
        let engine = TheoryEngine::new(config).unwrap();
        let session = Session::new(&engine, StdRng::seed_from_u64(1)).unwrap();
        let mut app = QuizApp::new(&engine, session);

        output(&mut app, "root C#");
        let text = output(&mut app, "mode fill-chord");
        assert!(text.contains("found 0/0"));
        assert!(text.ends_with("*** You found all chord notes! ***\n"));
        assert_eq!(output(&mut app, "0 0"), "(0, 0): nothing new\n");
    }

    #[test]
    fn next_keeps_fill_chord_progress() {
        let engine = TheoryEngine::default();
        let session = Session::new(&engine, StdRng::seed_from_u64(1)).unwrap();
        let mut app = QuizApp::new(&engine, session);
        output(&mut app, "mode fill-chord");
        let first = app.session().round().targets()[0];
        output(&mut app, &format!("{} {}", first.string, first.fret));

        let text = output(&mut app, "next");
        assert!(text.contains("found 1/"));
    }

    #[test]
    fn bad_selection_is_reported() {
        let engine = TheoryEngine::default();
        let session = Session::new(&engine, StdRng::seed_from_u64(1)).unwrap();
        let mut app = QuizApp::new(&engine, session);
        let text = output(&mut app, "root H");
        assert!(text.starts_with("error: unknown note"));
    }

    #[test]
    fn exit_stops_the_loop() {
        let engine = TheoryEngine::default();
        let session = Session::new(&engine, StdRng::seed_from_u64(1)).unwrap();
        let mut app = QuizApp::new(&engine, session);
        let mut out = Vec::new();
        assert_eq!(app.update(Message::Exit, &mut out).unwrap(), Flow::Exit);
    }
}
