//! Terminal output for the `zebulon` binary.
//!
//! Human-readable progress goes to stderr; `--json` results go to stdout.

use std::io::IsTerminal;
use std::sync::OnceLock;

/// Global output switches set once from CLI flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputMode {
    pub quiet: bool,
    pub json: bool,
    pub verbose: bool,
    pub no_color: bool,
}

impl OutputMode {
    /// Human progress lines should be printed.
    pub fn chatty(&self) -> bool {
        !self.quiet && !self.json
    }
}

static MODE: OnceLock<OutputMode> = OnceLock::new();

/// Record the output mode. Later calls are ignored.
pub fn init(mode: OutputMode) {
    let _ = MODE.set(mode);
}

/// The recorded mode, or the default before [`init`].
pub fn mode() -> OutputMode {
    MODE.get().copied().unwrap_or_default()
}

fn wants_color(mode: OutputMode, env_disabled: bool, terminal: bool) -> bool {
    !mode.no_color && !env_disabled && terminal
}

/// Colour class of a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Bad,
    Muted,
    Strong,
}

impl Tone {
    fn ansi(self) -> &'static str {
        match self {
            Tone::Good => "\x1b[32m",
            Tone::Bad => "\x1b[31m",
            Tone::Muted => "\x1b[2m",
            Tone::Strong => "\x1b[1m",
        }
    }
}

/// Paints text when stderr is a colour terminal.
#[derive(Debug, Clone, Copy)]
pub struct Styled {
    color: bool,
}

impl Styled {
    /// Colour on a terminal unless `NO_COLOR`, `ZEBULON_NO_COLOR` or
    /// `--no-color` say otherwise.
    pub fn detect() -> Self {
        let env_disabled =
            std::env::var_os("NO_COLOR").is_some() || std::env::var_os("ZEBULON_NO_COLOR").is_some();
        Self {
            color: wants_color(mode(), env_disabled, std::io::stderr().is_terminal()),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn tone(&self, tone: Tone, text: &str) -> String {
        if self.color {
            format!("{}{text}\x1b[0m", tone.ansi())
        } else {
            text.to_string()
        }
    }

    /// `✓`/`✗` on a terminal, `ok`/`fail` otherwise.
    pub fn mark(&self, ok: bool) -> String {
        match (ok, self.color) {
            (true, true) => self.tone(Tone::Good, "\u{2713}"),
            (false, true) => self.tone(Tone::Bad, "\u{2717}"),
            (true, false) => "ok".to_string(),
            (false, false) => "fail".to_string(),
        }
    }
}

/// `Zebulon listings vX.Y.Z` and a blank line.
pub fn banner(s: &Styled) {
    let version = format!("v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "  {} {}",
        s.tone(Tone::Strong, "Zebulon listings"),
        s.tone(Tone::Muted, &version)
    );
    eprintln!();
}

/// One aligned `mark label value` line.
pub fn field(s: &Styled, ok: bool, label: &str, value: &str) {
    eprintln!("    {} {label:<12} {value}", s.mark(ok));
}

/// Final line of a command.
pub fn verdict(s: &Styled, ok: bool, detail: &str) {
    let word = if ok {
        s.tone(Tone::Good, "done")
    } else {
        s.tone(Tone::Bad, "failed")
    };
    eprintln!();
    eprintln!("  {word} {}", s.tone(Tone::Muted, &format!("({detail})")));
}

/// Pretty JSON on stdout.
pub fn emit_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("  could not render JSON result: {e}"),
    }
}
