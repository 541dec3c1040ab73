pub mod check;
pub mod completions;
pub mod show;
pub mod subjects;
pub mod toggle;

use anyhow::Result;
use taskboard_core::controller::BoardError;
use taskboard_core::view::BoardView;

use crate::app::{App, Board};
use crate::output::{CliError, Reported, fail};
use crate::render::TerminalRenderer;

/// Build the board and run one fetch cycle. A failed fetch renders the
/// error placeholder and ends the command.
pub fn load_board(app: &App) -> Result<(Board, BoardView)> {
    let mut board = app.board()?;
    match board.reload() {
        Ok(view) => Ok((board, view)),
        Err(err) => {
            board.render(&mut TerminalRenderer::stdio(app.output))?;
            Err(Reported(err.to_string()).into())
        }
    }
}

/// Render a command-level error and convert it for `main`.
pub fn board_failure(app: &App, err: &BoardError) -> anyhow::Error {
    fail(app.output, CliError::from(err))
}
