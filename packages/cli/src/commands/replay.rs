use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dropzone_document::Data;
use dropzone_editor::{Action, Descriptor, EditSession, GestureEvent};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Document to edit (JSON)
    pub document: PathBuf,

    /// Script of editor events to replay (JSON array)
    pub script: PathBuf,

    /// Print a summary of the history timeline
    #[arg(long)]
    pub history: bool,
}

/// One scripted editor event
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum ScriptStep {
    Dispatch {
        action: Action,
    },
    DragStart {
        source: Descriptor,
    },
    DragOver {
        #[serde(default)]
        source: Option<Descriptor>,
        #[serde(default)]
        target: Option<Descriptor>,
    },
    DragEnd {
        #[serde(default)]
        source: Option<Descriptor>,
        #[serde(default)]
        target: Option<Descriptor>,
    },
    Key {
        chord: String,
    },
    Flush,
    RegisterZone {
        zone: String,
    },
    UnregisterZone {
        zone: String,
    },
}

pub fn replay(args: ReplayArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    let data = Data::from_json(&read(&args.document)?)
        .with_context(|| format!("Invalid document {}", args.document.display()))?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&read(&args.script)?)
        .with_context(|| format!("Invalid script {}", args.script.display()))?;

    let mut session = EditSession::with_options(config.session_options(), data);
    run_script(&mut session, &steps)?;

    println!("{}", serde_json::to_string_pretty(session.data())?);

    if args.history {
        let history = session.history();
        eprintln!();
        eprintln!(
            "{} {} entries, at {}",
            "History:".bright_blue().bold(),
            history.len(),
            history.index()
        );
        for (index, entry) in history.histories().iter().enumerate() {
            let marker = if index == history.index() { "→" } else { " " };
            eprintln!(
                "  {} #{} {} items",
                marker,
                index,
                entry.data.data.item_count()
            );
        }
    }

    Ok(())
}

/// Feed every step to the session in order
pub fn run_script(session: &mut EditSession, steps: &[ScriptStep]) -> Result<()> {
    for (index, step) in steps.iter().enumerate() {
        tracing::debug!("step {}: {:?}", index, step);

        match step.clone() {
            ScriptStep::Dispatch { action } => session.dispatch(action)?,
            ScriptStep::DragStart { source } => {
                session.on_drag_start(&GestureEvent::new(Some(source), None))?
            }
            ScriptStep::DragOver { source, target } => {
                session.on_drag_over(&mut GestureEvent::new(source, target))?
            }
            ScriptStep::DragEnd { source, target } => {
                session.on_drag_end(&GestureEvent::new(source, target))?
            }
            ScriptStep::Key { chord } => {
                if !session.handle_chord(&chord)? {
                    tracing::warn!("step {}: unbound chord {}", index, chord);
                }
            }
            ScriptStep::Flush => session.flush_zones(),
            ScriptStep::RegisterZone { zone } => {
                session.register_zone(&zone);
            }
            ScriptStep::UnregisterZone { zone } => {
                session.unregister_zone(&zone);
            }
        }
    }

    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
}
