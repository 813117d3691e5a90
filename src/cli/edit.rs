//! Interactive lineup editing
//!
//! One `edit` invocation is one session: the engine is built once and every
//! command line read from stdin is a gesture against it. Gestures are
//! cached as they happen; only `save` talks to the backend.

use std::io::{IsTerminal, Write};

use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::client::TeamApi;
use crate::error::{Error, LineupError, Result};
use crate::lineup::{
    DragOrigin, DropOutcome, Formation, LineupEngine, Move, Player, PlayerId, Rejection,
};
use crate::output::{self, LineupView};
use crate::session::LoadGuard;
use crate::store::LineupStore;

const HELP: &str = "\
Commands:
  show                     Print the pitch and bench
  move <player> <slot>     Drag a player onto a slot
  bench <player>           Take a player off the pitch
  sub <pitch> <bench>      Swap a pitch player for a bench starter
  reset                    Rebuild the default lineup
  clear                    Empty the pitch and stop auto-fill
  save                     Save the lineup to the backend
  quit                     Leave the session
Players are referenced by ID or by shirt number, e.g. #9.";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Show,
    Move { player: String, slot: String },
    Bench { player: String },
    Sub { outgoing: String, incoming: String },
    Reset,
    Clear,
    Save,
    Help,
    Quit,
}

impl EditCommand {
    /// Parse a line; blank lines and `#!` comments yield `Ok(None)`
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = words.split_first() else {
            return Ok(None);
        };
        if verb.starts_with("#!") {
            return Ok(None);
        }

        let command = match (verb.to_ascii_lowercase().as_str(), args) {
            ("show" | "ls", []) => EditCommand::Show,
            ("move" | "mv", [player, slot]) => EditCommand::Move {
                player: player.to_string(),
                slot: slot.to_string(),
            },
            ("bench", [player]) => EditCommand::Bench {
                player: player.to_string(),
            },
            ("sub", [outgoing, incoming]) => EditCommand::Sub {
                outgoing: outgoing.to_string(),
                incoming: incoming.to_string(),
            },
            ("reset", []) => EditCommand::Reset,
            ("clear", []) => EditCommand::Clear,
            ("save", []) => EditCommand::Save,
            ("help" | "?", []) => EditCommand::Help,
            ("quit" | "exit" | "q", []) => EditCommand::Quit,
            ("move" | "mv", _) => return Err("usage: move <player> <slot>".to_string()),
            ("bench", _) => return Err("usage: bench <player>".to_string()),
            ("sub", _) => return Err("usage: sub <pitch-player> <bench-player>".to_string()),
            (other, _) if HELP.contains(&format!("  {} ", other)) => {
                return Err(format!("'{}' takes no arguments", other));
            }
            (other, _) => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(Some(command))
    }
}

enum Flow {
    Continue,
    Quit,
}

/// An editing session over one engine
pub struct EditSession<'a, S: LineupStore, A: TeamApi + ?Sized> {
    engine: LineupEngine<S>,
    api: &'a A,
    formation: Formation,
    format: OutputFormat,
    interactive: bool,
}

impl<'a, S: LineupStore, A: TeamApi + ?Sized> EditSession<'a, S, A> {
    pub fn new(engine: LineupEngine<S>, api: &'a A, formation: Formation, format: OutputFormat) -> Self {
        Self {
            engine,
            api,
            formation,
            format,
            interactive: false,
        }
    }

    /// Print a prompt before each line
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn engine(&self) -> &LineupEngine<S> {
        &self.engine
    }

    /// Read commands until `quit` or end of input.
    ///
    /// `confirm` is asked before destructive commands.
    pub async fn run<R, W, C>(&mut self, input: R, out: &mut W, mut confirm: C) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        C: FnMut(&str) -> Result<bool>,
    {
        let mut lines = input.lines();
        loop {
            if self.interactive {
                write!(out, "{} ", "pitchside>".cyan())?;
                out.flush()?;
            }
            let Some(line) = lines.next_line().await? else {
                break;
            };

            let command = match EditCommand::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(msg) => {
                    writeln!(out, "{} {}", "✗".red(), msg)?;
                    continue;
                }
            };

            log::debug!("edit command: {:?}", command);
            if let Flow::Quit = self.execute(command, out, &mut confirm).await? {
                break;
            }
        }

        if self.engine.is_dirty() {
            writeln!(
                out,
                "{} Lineup has changes that were not saved to the backend",
                "⚠".yellow()
            )?;
        }
        Ok(())
    }

    async fn execute<W, C>(&mut self, command: EditCommand, out: &mut W, confirm: &mut C) -> Result<Flow>
    where
        W: Write,
        C: FnMut(&str) -> Result<bool>,
    {
        match command {
            EditCommand::Show => {
                let view = LineupView::new(&self.engine, &self.formation);
                writeln!(out, "{}", view.format(self.format)?)?;
            }
            EditCommand::Help => writeln!(out, "{}", HELP)?,
            EditCommand::Quit => return Ok(Flow::Quit),
            EditCommand::Move { player, slot } => match self.move_player(&player, &slot) {
                Ok(message) => writeln!(out, "{}", message)?,
                Err(e) => writeln!(out, "{} {}", "✗".red(), e)?,
            },
            EditCommand::Bench { player } => match self.bench_player(&player) {
                Ok(message) => writeln!(out, "{}", message)?,
                Err(e) => writeln!(out, "{} {}", "✗".red(), e)?,
            },
            EditCommand::Sub { outgoing, incoming } => {
                match self.substitute(&outgoing, &incoming) {
                    Ok(message) => writeln!(out, "{}", message)?,
                    Err(e) => writeln!(out, "{} {}", "✗".red(), e)?,
                }
            }
            EditCommand::Reset => {
                if confirm("Discard the current lineup and rebuild it?")? {
                    self.engine.reset_to_initial();
                    writeln!(out, "{} Lineup rebuilt", "✓".green())?;
                }
            }
            EditCommand::Clear => {
                if confirm("Remove every player from the pitch?")? {
                    self.engine.clear_field();
                    writeln!(out, "{} Pitch cleared; auto-fill suspended", "✓".green())?;
                }
            }
            EditCommand::Save => {
                let spinner = output::spinner("Saving lineup".to_string());
                let result = self.engine.commit_to_backend(self.api).await;
                spinner.finish_and_clear();
                match result {
                    Ok(()) => writeln!(out, "{} Lineup saved", "✓".green())?,
                    Err(e) => writeln!(out, "{} Save failed: {}", "✗".red(), e)?,
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn lookup(&self, reference: &str) -> Result<(PlayerId, String)> {
        let player = self.engine.find_player(reference)?;
        Ok((player.id.clone(), player.label()))
    }

    fn label(&self, id: &PlayerId) -> String {
        self.engine
            .player(id)
            .map(Player::label)
            .unwrap_or_else(|| id.to_string())
    }

    fn origin_of(&self, id: &PlayerId) -> DragOrigin {
        match self.engine.slot_of(id) {
            Some(slot) => DragOrigin::Slot(slot.slot_id.clone()),
            None => DragOrigin::Bench,
        }
    }

    fn move_player(&mut self, reference: &str, slot: &str) -> Result<String> {
        let (id, label) = self.lookup(reference)?;
        let slot_id = slot.to_ascii_uppercase();
        if self.engine.slot(&slot_id).is_none() {
            return Err(LineupError::UnknownSlot(slot.to_string()).into());
        }

        let origin = self.origin_of(&id);
        let Some(payload) = self.engine.begin_drag(id, origin) else {
            return Ok(rejection_message(Rejection::NotStarter, &label));
        };

        Ok(match self.engine.drop_on_slot(&payload, &slot_id) {
            DropOutcome::Applied(Move::Swapped { with: Some(other) }) => {
                format!("Swapped {} with {}", label, self.label(&other))
            }
            DropOutcome::Applied(Move::Replaced { displaced }) => format!(
                "{} into {}; {} to the bench",
                label,
                slot_id,
                self.label(&displaced)
            ),
            DropOutcome::Applied(Move::Manual {
                displaced: Some(displaced),
            }) => format!(
                "{} into {}; {} to the bench (no auto-fill)",
                label,
                slot_id,
                self.label(&displaced)
            ),
            DropOutcome::Applied(Move::Manual { displaced: None }) => {
                format!("{} into {} (no auto-fill)", label, slot_id)
            }
            DropOutcome::Applied(_) => format!("{} into {}", label, slot_id),
            DropOutcome::Rejected(rejection) => rejection_message(rejection, &label),
            DropOutcome::Ignored => "Nothing to do".to_string(),
        })
    }

    fn bench_player(&mut self, reference: &str) -> Result<String> {
        let (id, label) = self.lookup(reference)?;
        let Some(slot_id) = self.engine.slot_of(&id).map(|s| s.slot_id.clone()) else {
            return Ok(rejection_message(Rejection::NotOnPitch, &label));
        };

        let origin = DragOrigin::Slot(slot_id.clone());
        let Some(payload) = self.engine.begin_drag(id.clone(), origin) else {
            return Ok(rejection_message(Rejection::NotStarter, &label));
        };

        Ok(match self.engine.drop_on_bench(&payload) {
            DropOutcome::Applied(_) => {
                match self.engine.slot(&slot_id).and_then(|s| s.player_id.clone()) {
                    Some(filler) if filler == id => {
                        format!("{} back into {} by auto-fill", label, slot_id)
                    }
                    Some(filler) => format!(
                        "{} to the bench; {} fills {}",
                        label,
                        self.label(&filler),
                        slot_id
                    ),
                    None => format!("{} to the bench; {} left empty", label, slot_id),
                }
            }
            DropOutcome::Rejected(rejection) => rejection_message(rejection, &label),
            DropOutcome::Ignored => "Nothing to do".to_string(),
        })
    }

    fn substitute(&mut self, outgoing: &str, incoming: &str) -> Result<String> {
        let (out_id, out_label) = self.lookup(outgoing)?;
        let (in_id, in_label) = self.lookup(incoming)?;

        let origin = self.origin_of(&out_id);
        let Some(payload) = self.engine.begin_drag(out_id, origin) else {
            return Ok(rejection_message(Rejection::NotStarter, &out_label));
        };

        Ok(match self.engine.drop_on_bench_player(&payload, &in_id) {
            DropOutcome::Applied(_) => format!("{} on for {}", in_label, out_label),
            DropOutcome::Rejected(rejection) => {
                let dragged_ok = self.engine.player(&payload.player).is_some_and(|p| p.is_starter);
                let subject = match rejection {
                    Rejection::NotOnPitch => &out_label,
                    Rejection::TargetNotOnBench => &in_label,
                    _ if dragged_ok => &in_label,
                    _ => &out_label,
                };
                rejection_message(rejection, subject)
            }
            DropOutcome::Ignored => "Nothing to do".to_string(),
        })
    }
}

fn rejection_message(rejection: Rejection, label: &str) -> String {
    let reason = match rejection {
        Rejection::UnknownPlayer => "is not on this roster",
        Rejection::NotStarter => "is not a starter and cannot go on the pitch",
        Rejection::NotOnPitch => "is not on the pitch",
        Rejection::TargetNotOnBench => "is already on the pitch",
    };
    format!("{} {} {}", "✗".red(), label, reason)
}

/// Run the edit command
pub async fn run(
    opts: &GlobalOptions,
    team: &str,
    formation: Option<&str>,
    yes: bool,
    guard: &LoadGuard,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let client = ctx.client()?;

    let Some((engine, formation)) = ctx.open_engine(team, formation, guard).await? else {
        eprintln!("{}", "Load cancelled".yellow());
        return Ok(());
    };

    let terminal = std::io::stdin().is_terminal();
    let mut session = EditSession::new(engine, &client, formation, ctx.format).interactive(terminal);

    if terminal {
        println!("{}", LineupView::new(session.engine(), &formation).format(ctx.format)?);
        println!("Type {} for commands.", "help".cyan());
    }

    let confirm = |prompt: &str| -> Result<bool> {
        if yes || !terminal {
            return Ok(true);
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(Error::from)
    };

    let mut stdout = std::io::stdout();
    session
        .run(BufReader::new(tokio::io::stdin()), &mut stdout, confirm)
        .await
}
