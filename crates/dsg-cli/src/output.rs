//! Output management and formatting.
//!
//! The only place where [`MessageLevel`]s turn into colours and glyphs.

use std::io::{self, IsTerminal};

use console::{Term, measure_text_width};
use owo_colors::OwoColorize;
use tracing::debug;

use dsg_core::{application::ports::Presenter, domain::MessageLevel};

use crate::cli::GlobalArgs;
use crate::config::AppConfig;

const HERO: &str = r"
 ██████╗     ███████╗     ██████╗     Django Starter Generator:
 ██╔══██╗    ██╔════╝    ██╔════╝     creates, configures and
 ██║  ██║    ███████╗    ██║  ███╗    launches a new Django
 ██║  ██║    ╚════██║    ██║   ██║    project in one go.
 ██████╔╝    ███████║    ╚██████╔╝
 ╚═════╝     ╚══════╝     ╚═════╝";

const GREETING: &str = "Good day!\nLet's create your new Django project.";

/// Manages CLI output based on configuration.
pub struct OutputManager {
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        Self {
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color || !io::stdout().is_terminal(),
            term: Term::stdout(),
        }
    }

    /// Startup banner and greeting; suppressed in quiet mode.
    pub fn banner(&self) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let hero = if self.no_color {
            HERO.to_owned()
        } else {
            HERO.green().to_string()
        };
        self.term.write_line(&hero)?;
        self.term.write_str(&self.render_notice(MessageLevel::Info, GREETING))
    }

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    fn suppressed(&self, level: MessageLevel) -> bool {
        self.quiet && level != MessageLevel::Error
    }

    fn render_line(&self, level: MessageLevel, text: &str) -> String {
        let glyph = glyph(level);
        if self.no_color {
            return format!("    {glyph} {text}");
        }
        match level {
            MessageLevel::Info => format!("    {} {}", glyph.blue().bold(), text),
            MessageLevel::Warning => format!("    {} {}", glyph.yellow().bold(), text.yellow()),
            MessageLevel::Error => format!("    {} {}", glyph.red().bold(), text.red()),
            MessageLevel::Success => format!("    {} {}", glyph.green().bold(), text.green()),
        }
    }

    fn render_notice(&self, level: MessageLevel, text: &str) -> String {
        let framed = frame(text);
        if self.no_color {
            return framed;
        }
        match level {
            MessageLevel::Info => framed.cyan().to_string(),
            MessageLevel::Warning => framed.yellow().to_string(),
            MessageLevel::Error => framed.red().to_string(),
            MessageLevel::Success => framed.green().to_string(),
        }
    }

    fn write(&self, rendered: &str) {
        if let Err(e) = self.term.write_line(rendered) {
            debug!(error = %e, "Failed to write to terminal");
        }
    }
}

impl Presenter for OutputManager {
    fn message(&self, level: MessageLevel, text: &str) {
        if self.suppressed(level) {
            return;
        }
        self.write(&self.render_line(level, text));
    }

    fn notice(&self, level: MessageLevel, text: &str) {
        if self.suppressed(level) {
            return;
        }
        self.write(&self.render_notice(level, text));
    }
}

fn glyph(level: MessageLevel) -> &'static str {
    match level {
        MessageLevel::Info => "\u{2139}",    // ℹ
        MessageLevel::Warning => "\u{26a0}", // ⚠
        MessageLevel::Error => "\u{2717}",   // ✗
        MessageLevel::Success => "\u{2713}", // ✓
    }
}

/// Draw a rounded box around `text`, one row per line, trimmed and padded
/// to the widest line.
fn frame(text: &str) -> String {
    let lines: Vec<String> = text
        .lines()
        .map(|line| line.trim().replace('\t', "    "))
        .collect();
    let width = lines.iter().map(|l| measure_text_width(l)).max().unwrap_or(0);
    let rule = "─".repeat(width + 4);

    let mut out = format!("\n   ╭{rule}╮\n");
    for line in &lines {
        let pad = " ".repeat(width - measure_text_width(line));
        out.push_str(&format!("   │  {line}{pad}  │\n"));
    }
    out.push_str(&format!(".oO╰{rule}╯\n"));
    out
}

// ── tests ─────────────────────────────────────────────────────────────────────
