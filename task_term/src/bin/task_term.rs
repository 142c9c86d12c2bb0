// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Interactive host for [`task_term::TerminalSession`]. Puts the terminal in raw mode,
//! feeds crossterm events to the session, and runs a tiny built-in command executor
//! whose output is appended to an in-memory task store.
//!
//! Try `help`, `echo hello`, `sessions`, `switch build`, and `exit` (or Ctrl+D).

use std::{path::PathBuf, str::FromStr};

use clap::{Parser, ValueEnum};
use crossterm::{event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind,
                        KeyModifiers},
                terminal};
use futures_util::StreamExt as _;
use miette::IntoDiagnostic as _;
use strum::IntoEnumIterator as _;
use task_term::{AnsiSurfaceFactory, CommonResult, InMemoryTaskStore, MountTarget,
                Session, SubmittedCommand, TerminalProps, TerminalSession, ok,
                setup_default_miette_global_report_handler,
                try_initialize_logging_global};
use tokio::sync::mpsc;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const ERROR_FOOTER: &str = "Rerun with --enable-logging and check log.txt for a trace.";

#[derive(Debug, Parser)]
#[command(
    bin_name = "task_term",
    about = "Session-aware terminal line editor demo 🐚",
    version,
    arg_required_else_help(false)
)]
pub struct CLIArg {
    #[arg(long, short = 'i', help = "Label shown in the welcome banner")]
    pub instance_id: Option<String>,

    #[arg(long, short = 'w', help = "Print the welcome and session switch banners")]
    pub show_welcome: bool,

    #[arg(
        long,
        short = 'p',
        help = "JSON file with terminal props, e.g. {\"instanceId\": \"left\"}. Flags override it"
    )]
    pub props: Option<PathBuf>,

    #[arg(
        long,
        short = 'l',
        help = "Log app output to a file named `log.txt` for debugging."
    )]
    pub enable_logging: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Debug)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing_core::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing_core::LevelFilter::ERROR,
            LogLevel::Warn => tracing_core::LevelFilter::WARN,
            LogLevel::Info => tracing_core::LevelFilter::INFO,
            LogLevel::Debug => tracing_core::LevelFilter::DEBUG,
            LogLevel::Trace => tracing_core::LevelFilter::TRACE,
        }
    }
}

impl CLIArg {
    /// Props from the JSON file if one was given, with command line flags on top.
    fn load_props(&self) -> CommonResult<TerminalProps> {
        let mut props = match &self.props {
            Some(path) => {
                let json = std::fs::read_to_string(path).into_diagnostic()?;
                serde_json::from_str::<TerminalProps>(&json).into_diagnostic()?
            }
            None => TerminalProps::default(),
        };
        if let Some(instance_id) = &self.instance_id {
            props.instance_id = Some(instance_id.clone());
        }
        if self.show_welcome {
            props.show_welcome = true;
        }
        Ok(props)
    }
}

/// Commands the demo executor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString,
         strum_macros::EnumIter, strum_macros::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
enum Builtin {
    Help,
    Echo,
    Sessions,
    Switch,
    Exit,
}

/// What the event loop should do after a command ran.
enum ControlFlow {
    Continue,
    Exit,
}

fn run_command(command: &SubmittedCommand, store: &mut InMemoryTaskStore) -> ControlFlow {
    let Some(session_id) = command.session_id.clone() else {
        tracing::warn!(message = "command without a session", line = %command.line);
        return ControlFlow::Continue;
    };
    let line = command.line.trim();
    let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match Builtin::from_str(name) {
        Ok(Builtin::Help) => {
            let names: Vec<&'static str> = Builtin::iter().map(<&'static str>::from).collect();
            store.push_output(&session_id, format!("commands: {}", names.join(", ")));
        }
        Ok(Builtin::Echo) => {
            store.push_output(&session_id, rest);
        }
        Ok(Builtin::Sessions) => {
            for id in store.session_ids() {
                store.push_output(&session_id, format!("  {id}"));
            }
        }
        Ok(Builtin::Switch) if !rest.is_empty() => {
            store.set_active(rest);
        }
        Ok(Builtin::Switch) => {
            store.push_output(&session_id, "usage: switch <session id>");
        }
        Ok(Builtin::Exit) => return ControlFlow::Exit,
        Err(_) => {
            store.push_output(&session_id, format!("command not found: {name}"));
        }
    }
    ControlFlow::Continue
}

/// Ctrl+C and Ctrl+D end the demo. The line editor itself ignores both.
fn is_exit_chord(event: &Event) -> bool {
    match event {
        Event::Key(KeyEvent {
            code: KeyCode::Char('d' | 'c'),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => *modifiers == KeyModifiers::CONTROL,
        _ => false,
    }
}

/// Leave raw mode however the event loop ends.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> CommonResult<Self> {
        terminal::enable_raw_mode().into_diagnostic()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) { terminal::disable_raw_mode().ok(); }
}

fn demo_store() -> InMemoryTaskStore {
    let mut store = InMemoryTaskStore::new();
    store
        .insert_session(Session::new("build").with_history([
            "Compiling task_term v0.1.0",
            "Finished `dev` profile",
        ]))
        .insert_session(Session::new("deploy"))
        .set_active("build");
    store
}

// Note: The `tokio::main` macro internally calls `.expect("Failed building the Runtime")`
// when initializing the Tokio runtime. The lint must be suppressed here.
#[tokio::main]
#[allow(clippy::unwrap_in_result)]
async fn main() -> CommonResult<()> {
    setup_default_miette_global_report_handler(Some(ERROR_FOOTER));

    let cli_arg = CLIArg::parse();

    if cli_arg.enable_logging {
        let level: tracing_core::LevelFilter = cli_arg.log_level.into();
        try_initialize_logging_global(level).ok();
        // % is Display, ? is Debug.
        tracing::debug!(message = "Start logging...", cli_arg = ?cli_arg);
    }

    let props = cli_arg.load_props()?;
    let mut store = demo_store();
    let target = MountTarget::new("stdout");
    let (command_sender, mut command_receiver) = mpsc::unbounded_channel::<SubmittedCommand>();

    let _raw_mode = RawModeGuard::enable()?;
    let mut session = TerminalSession::new(AnsiSurfaceFactory::stdout(), command_sender);
    session.update(&props, &store, Some(&target))?;

    let mut event_stream = EventStream::new();

    loop {
        tokio::select! {
            // Branch: terminal input. `EventStream::next()` is cancel safe.
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(event)) if is_exit_chord(&event) => break,
                    Some(Ok(event)) => {
                        let outcome = session.handle_event(&event);
                        tracing::trace!(message = "event handled", ?outcome);
                    }
                    Some(Err(err)) => {
                        tracing::error!(message = "event stream failed", error = %err);
                        break;
                    }
                    None => break,
                }
            }

            // Branch: commands submitted by the line editor. `recv()` is cancel safe.
            Some(command) = command_receiver.recv() => {
                if let ControlFlow::Exit = run_command(&command, &mut store) {
                    break;
                }
                session.update(&props, &store, Some(&target))?;
            }
        }
    }

    session.unmount();
    println!("\r");

    if cli_arg.enable_logging {
        tracing::debug!(message = "Stop logging...");
    }

    ok!()
}
