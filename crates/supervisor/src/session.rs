use std::io::{BufRead, Write};

use gaptune_core::{LapTime, ParameterVector};
use gaptune_engine::{Engine, JsonFileStorage, Mode, PersistenceError};
use tracing::{info, warn};

use crate::cli::{AppError, Cli};

/// One operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Input,
    Guess,
    Best,
    History,
    Save,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_uppercase().as_str() {
            "I" => Some(Self::Input),
            "G" => Some(Self::Guess),
            "B" => Some(Self::Best),
            "H" => Some(Self::History),
            "S" => Some(Self::Save),
            "Q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// An engine bound to its history file.
pub(crate) struct Session {
    engine: Engine,
    storage: JsonFileStorage,
}

impl Session {
    /// Builds the engine from the flags and loads any saved history.
    ///
    /// A missing or corrupt history file starts an empty session. History
    /// saved for a different parameter space is an error, so it is never
    /// overwritten by accident.
    pub(crate) fn open(cli: &Cli) -> Result<Self, AppError> {
        let space = cli.parameter_space()?;
        let config = cli.engine_config()?;
        let storage = JsonFileStorage::new(cli.history.clone());
        Self::with_storage(Engine::new(space, config), storage)
    }

    fn with_storage(mut engine: Engine, storage: JsonFileStorage) -> Result<Self, AppError> {
        match engine.load(&storage) {
            Ok(loaded) => info!(loaded, path = %storage.path().display(), "resuming session"),
            Err(PersistenceError::NotFound { path }) => {
                info!(path = %path.display(), "no saved history, starting fresh");
            }
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "discarding unreadable history, starting fresh");
            }
            Err(err) => return Err(AppError::Load(err)),
        }
        Ok(Self { engine, storage })
    }

    /// Runs commands until `Q` or end of input, then saves.
    pub(crate) fn run(
        &mut self,
        mut input: impl BufRead,
        mut output: impl Write,
    ) -> Result<(), AppError> {
        loop {
            write!(output, "[I]nput, [G]uess, [B]est, [H]istory, [S]ave, [Q]uit: ")?;
            output.flush()?;

            let Some(line) = read_line(&mut input)? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match Command::parse(&line) {
                Some(Command::Input) => self.record(&mut input, &mut output)?,
                Some(Command::Guess) => self.propose(Mode::Explore, &mut output)?,
                Some(Command::Best) => self.propose(Mode::BestOnly, &mut output)?,
                Some(Command::History) => self.summarize(&mut output)?,
                Some(Command::Save) => match self.engine.save(&self.storage) {
                    Ok(()) => writeln!(output, "saved {} laps", self.engine.size())?,
                    Err(err) => {
                        warn!(error = %err, "save failed, history kept in memory");
                        writeln!(output, "save failed: {err}")?;
                    }
                },
                Some(Command::Quit) => break,
                None => writeln!(output, "unknown command `{}`", line.trim())?,
            }
        }

        self.engine.save(&self.storage).map_err(AppError::Save)?;
        writeln!(output, "saved {} laps", self.engine.size())?;
        Ok(())
    }

    fn record(
        &mut self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<(), AppError> {
        let names: Vec<&str> = self
            .engine
            .space()
            .fields()
            .iter()
            .map(|field| field.name.as_str())
            .collect();
        write!(output, "parameters ({}): ", names.join(", "))?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(());
        };
        let vector = match self.engine.space().parse(&line) {
            Ok(vector) => vector,
            Err(err) => {
                writeln!(output, "invalid parameters: {err}")?;
                return Ok(());
            }
        };

        write!(output, "lap time in seconds, or dnf: ")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(());
        };
        let lap_time = match parse_lap_time(&line) {
            Ok(lap_time) => lap_time,
            Err(message) => {
                writeln!(output, "invalid lap time: {message}")?;
                return Ok(());
            }
        };

        if !vector.in_bounds() {
            warn!(vector = %vector, "recorded vector lies outside the search bounds");
        }
        if let Err(err) = self.engine.record(vector, lap_time) {
            writeln!(output, "invalid parameters: {err}")?;
            return Ok(());
        }
        writeln!(output, "recorded lap {}: {lap_time}", self.engine.size())?;
        Ok(())
    }

    fn propose(&mut self, mode: Mode, output: &mut impl Write) -> Result<(), AppError> {
        let vector = self.engine.request(mode);
        print_vector(output, &vector)?;
        Ok(())
    }

    fn summarize(&self, output: &mut impl Write) -> Result<(), AppError> {
        writeln!(output, "{} laps recorded", self.engine.size())?;
        match self.engine.best() {
            Some(best) => {
                writeln!(output, "fastest: {} (lap {})", best.lap_time, best.index + 1)?;
                print_vector(output, &best.vector)?;
            }
            None => writeln!(output, "no laps yet")?,
        }
        Ok(())
    }
}

fn print_vector(output: &mut impl Write, vector: &ParameterVector) -> std::io::Result<()> {
    writeln!(output, "{}", vector.format())?;
    let raw: Vec<String> = vector.values().iter().map(ToString::to_string).collect();
    writeln!(output, "as input: {}", raw.join(","))
}

/// Reads one line, or `None` at end of input.
fn read_line(input: &mut impl BufRead) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn parse_lap_time(text: &str) -> Result<LapTime, String> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("dnf") {
        return Ok(LapTime::DidNotFinish);
    }
    let seconds: f64 = text.parse().map_err(|_| format!("`{text}` is not a number"))?;
    LapTime::finished(seconds).map_err(|err| err.to_string())
}
