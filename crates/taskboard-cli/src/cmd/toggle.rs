//! `tb toggle`: flip a task between completed and pending.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use taskboard_core::fingerprint::{Fingerprint, fingerprint as fingerprint_of};

use crate::app::App;
use crate::cmd::{board_failure, load_board};
use crate::output::render_mode;

#[derive(Args, Debug)]
pub struct ToggleArgs {
    /// Task fingerprint, as printed by `tb show`.
    pub fingerprint: String,
}

#[derive(Debug, Serialize)]
struct ToggleResult<'a> {
    fingerprint: &'a str,
    title: &'a str,
    completed: bool,
}

pub fn run_toggle(args: &ToggleArgs, app: &App) -> anyhow::Result<()> {
    let (mut board, _) = load_board(app)?;
    let fingerprint = Fingerprint::from_raw(args.fingerprint.trim());
    let outcome = board
        .toggle_completion(&fingerprint)
        .map_err(|err| board_failure(app, &err))?;

    let title = board
        .tasks()
        .iter()
        .find(|task| fingerprint_of(task) == outcome.fingerprint)
        .map_or("", |task| task.title.trim());

    let result = ToggleResult {
        fingerprint: outcome.fingerprint.as_str(),
        title,
        completed: outcome.completed,
    };
    let state = |completed: bool| if completed { "completed" } else { "pending" };
    render_mode(
        app.output,
        &result,
        |r, w| writeln!(w, "{}\t{}", r.fingerprint, state(r.completed)),
        |r, w| writeln!(w, "✓ {} is now {}", r.title, state(r.completed)),
    )
}
