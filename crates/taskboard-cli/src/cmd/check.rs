//! `tb check`: fetch once so new tasks are detected and announced.

use serde::Serialize;
use std::io::Write;
use taskboard_core::novelty::NoveltyReport;

use crate::app::App;
use crate::cmd::load_board;
use crate::output::{pretty_kv, pretty_section, render_mode};

#[derive(Debug, Serialize)]
struct CheckReport {
    source: String,
    total: usize,
    #[serde(flatten)]
    novelty: NoveltyReport,
}

pub fn run_check(app: &App) -> anyhow::Result<()> {
    let (board, _) = load_board(app)?;
    let report = CheckReport {
        source: app.source_location()?.to_string(),
        total: board.tasks().len(),
        novelty: board.last_report().cloned().unwrap_or_default(),
    };

    if app.quiet && !app.output.is_json() {
        return Ok(());
    }

    render_mode(
        app.output,
        &report,
        |r, w| {
            writeln!(
                w,
                "total={} previous={} new={} notified={} persisted={}",
                r.total,
                r.novelty.previous_count,
                r.novelty.new_count(),
                r.novelty.notified,
                r.novelty.persisted
            )?;
            for title in &r.novelty.new_titles {
                writeln!(w, "new\t{title}")?;
            }
            Ok(())
        },
        |r, w| {
            pretty_section(w, "Check")?;
            pretty_kv(w, "source", &r.source)?;
            pretty_kv(w, "tasks", r.total.to_string())?;
            pretty_kv(w, "known", r.novelty.previous_count.to_string())?;
            pretty_kv(w, "new", r.novelty.new_count().to_string())?;
            pretty_kv(w, "notified", if r.novelty.notified { "yes" } else { "no" })?;
            if !r.novelty.persisted {
                pretty_kv(w, "warning", "snapshot could not be saved")?;
            }
            for title in &r.novelty.new_titles {
                writeln!(w, "  + {title}")?;
            }
            Ok(())
        },
    )
}
