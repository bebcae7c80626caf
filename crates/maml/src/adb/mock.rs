//! Scripted bridge runner used by unit tests

use super::dispatch::{CommandRunner, RawOutput};
use async_trait::async_trait;
use std::io;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&[String]) -> io::Result<RawOutput> + Send + Sync>;

/// Records every invocation and answers from a closure
pub(crate) struct ScriptedRunner {
    calls: Mutex<Vec<Vec<String>>>,
    respond: Responder,
}

impl ScriptedRunner {
    pub fn new(respond: impl Fn(&[String]) -> io::Result<RawOutput> + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Bridge whose `get-state` prints `state` and whose listing holds `listing` rows
    pub fn with_state(state: &'static str, listing: &'static str) -> Self {
        Self::new(move |args| {
            let stripped = strip_serial(args);
            let command = stripped.first().map(String::as_str);
            Ok(match command {
                Some("get-state") => RawOutput::stdout(format!("{}\n", state)),
                Some("devices") => RawOutput::stdout(format!("List of devices attached\n{}\n", listing)),
                _ => RawOutput::default(),
            })
        })
    }

    /// One emulator attached and booted
    pub fn online() -> Self {
        Self::with_state("device", "emulator-5554\tdevice")
    }

    /// Nothing attached; `get-state` answers on stderr only
    pub fn empty() -> Self {
        Self::new(|args| {
            let stripped = strip_serial(args);
            let command = stripped.first().map(String::as_str);
            Ok(match command {
                Some("devices") => RawOutput::stdout("List of devices attached\n\n"),
                Some("get-state") => RawOutput {
                    stdout: Vec::new(),
                    stderr: b"error: no devices/emulators found\n".to_vec(),
                    exit_code: Some(1),
                },
                _ => RawOutput::default(),
            })
        })
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Device-side arguments of every `shell` invocation, in order
    pub fn shell_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .iter()
            .map(|args| strip_serial(args))
            .filter(|args| args.first().map(String::as_str) == Some("shell"))
            .map(|args| args[1..].to_vec())
            .collect()
    }

    /// Number of invocations of a bridge subcommand
    pub fn count(&self, command: &str) -> usize {
        self.calls()
            .iter()
            .filter(|args| {
                let stripped = strip_serial(args);
                stripped.first().map(String::as_str) == Some(command)
            })
            .count()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, _program: &str, args: &[String]) -> io::Result<RawOutput> {
        self.calls.lock().unwrap().push(args.to_vec());
        (self.respond)(args)
    }
}

fn strip_serial(args: &[String]) -> Vec<String> {
    if args.first().map(String::as_str) == Some("-s") {
        args.iter().skip(2).cloned().collect()
    } else {
        args.to_vec()
    }
}

pub(crate) fn keyevent(code: &str) -> Vec<String> {
    vec!["input".to_string(), "keyevent".to_string(), code.to_string()]
}

pub(crate) fn input_text(text: &str) -> Vec<String> {
    vec!["input".to_string(), "text".to_string(), text.to_string()]
}
