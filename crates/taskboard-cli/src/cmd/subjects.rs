//! `tb subjects`: list the distinct task titles offered by the subject filter.

use std::io::Write;

use crate::app::App;
use crate::cmd::load_board;
use crate::output::{pretty_section, render_mode};

pub fn run_subjects(app: &App) -> anyhow::Result<()> {
    let (board, _) = load_board(app)?;
    let subjects = board.subjects().to_vec();

    render_mode(
        app.output,
        &subjects,
        |subjects, w| {
            for subject in subjects {
                writeln!(w, "{subject}")?;
            }
            Ok(())
        },
        |subjects, w| {
            pretty_section(w, &format!("Subjects ({})", subjects.len()))?;
            for subject in subjects {
                writeln!(w, "  {subject}")?;
            }
            Ok(())
        },
    )
}
