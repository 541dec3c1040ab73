//! Terminal rendering of the board.

use std::io::{self, Write};
use taskboard_core::controller::{FailureNotice, Renderer};
use taskboard_core::timeago::Locale;
use taskboard_core::view::{BoardView, DaySection, TaskEntry};

use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, write_error};

/// Writes the board to `out` and the failure placeholder to `err`.
pub struct TerminalRenderer<O, E> {
    mode: OutputMode,
    out: O,
    err: E,
}

impl TerminalRenderer<io::Stdout, io::Stderr> {
    pub fn stdio(mode: OutputMode) -> Self {
        Self::new(mode, io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> TerminalRenderer<O, E> {
    pub const fn new(mode: OutputMode, out: O, err: E) -> Self {
        Self { mode, out, err }
    }

    #[cfg(test)]
    fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Renderer for TerminalRenderer<O, E> {
    type Error = io::Error;

    fn render_board(&mut self, view: &BoardView) -> io::Result<()> {
        match self.mode {
            OutputMode::Json => {
                serde_json::to_writer_pretty(&mut self.out, view)?;
                writeln!(self.out)
            }
            OutputMode::Text => write_text(&mut self.out, view),
            OutputMode::Pretty => write_pretty(&mut self.out, view),
        }
    }

    fn render_failure(&mut self, failure: &FailureNotice) -> io::Result<()> {
        write_error(&mut self.err, self.mode, &CliError::from(failure))
    }
}

/// One line per task: `day  status  fingerprint  title  age`.
fn write_text(w: &mut dyn Write, view: &BoardView) -> io::Result<()> {
    for section in &view.sections {
        for entry in &section.entries {
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}",
                section.day.english_name().to_ascii_lowercase(),
                if entry.completed { "completed" } else { "pending" },
                entry.fingerprint,
                entry.task.title.trim(),
                entry.age_label
            )?;
        }
    }
    Ok(())
}

fn write_pretty(w: &mut dyn Write, view: &BoardView) -> io::Result<()> {
    let english = view.locale == Locale::English;
    if !view.criteria.is_all() {
        pretty_kv(w, "subject", view.criteria.subject.to_string())?;
        pretty_kv(w, "window", view.criteria.window.to_string())?;
        pretty_kv(w, "status", view.criteria.status.to_string())?;
        writeln!(w)?;
    }

    for section in &view.sections {
        write_section(w, section, english)?;
    }

    let count = view.task_count();
    if english {
        writeln!(w, "{count} task(s)")
    } else {
        writeln!(w, "{count} تکلیف")
    }
}

fn write_section(w: &mut dyn Write, section: &DaySection, english: bool) -> io::Result<()> {
    pretty_section(w, &section.label)?;
    if section.is_empty() {
        writeln!(w, "  {}", if english { "(no tasks)" } else { "(تکلیفی نیست)" })?;
    }
    for entry in &section.entries {
        write_entry(w, entry)?;
    }
    writeln!(w)
}

fn write_entry(w: &mut dyn Write, entry: &TaskEntry) -> io::Result<()> {
    let mark = if entry.completed { "[x]" } else { "[ ]" };
    write!(w, "  {mark} {}", entry.task.title.trim())?;
    if !entry.age_label.is_empty() {
        write!(w, "  ({})", entry.age_label)?;
    }
    writeln!(w, "  #{}", entry.fingerprint)?;

    let description = entry.task.description.as_deref().map_or("", str::trim);
    if !description.is_empty() {
        writeln!(w, "      {description}")?;
    }
    if !entry.task.categories.is_empty() {
        writeln!(w, "      {}", entry.task.categories.join(", "))?;
    }
    Ok(())
}
