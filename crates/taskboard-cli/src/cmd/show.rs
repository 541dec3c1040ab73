//! `tb show`: fetch the board and render it, optionally filtered.

use clap::Args;
use std::str::FromStr;
use taskboard_core::filter::{FilterCriteria, FilterParseError, StatusFilter, SubjectFilter, TimeWindow};

use crate::app::App;
use crate::cmd::{board_failure, load_board};
use crate::output::{CliError, fail};
use crate::render::TerminalRenderer;

#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// Only tasks with this title (`all` for every subject).
    #[arg(long)]
    pub subject: Option<String>,

    /// Maximum task age: all, 1h, 24h, 3d, 1w.
    #[arg(long)]
    pub window: Option<String>,

    /// Completion status: all, completed, pending.
    #[arg(long)]
    pub status: Option<String>,
}

impl ShowArgs {
    /// Parse the selector flags; absent flags mean "all".
    ///
    /// # Errors
    ///
    /// Returns the first unrecognized selector value.
    pub fn criteria(&self) -> Result<FilterCriteria, FilterParseError> {
        Ok(FilterCriteria {
            subject: parse_or_default::<SubjectFilter>(self.subject.as_deref())?,
            window: parse_or_default::<TimeWindow>(self.window.as_deref())?,
            status: parse_or_default::<StatusFilter>(self.status.as_deref())?,
        })
    }
}

fn parse_or_default<T>(raw: Option<&str>) -> Result<T, FilterParseError>
where
    T: FromStr<Err = FilterParseError> + Default,
{
    raw.map_or_else(|| Ok(T::default()), T::from_str)
}

pub fn run_show(args: &ShowArgs, app: &App) -> anyhow::Result<()> {
    // selectors are checked before the fetch
    let criteria = args
        .criteria()
        .map_err(|err| fail(app.output, CliError::from(&err)))?;

    let (mut board, _) = load_board(app)?;
    if !criteria.is_all() {
        board
            .apply_criteria(criteria)
            .map_err(|err| board_failure(app, &err))?;
    }

    board.render(&mut TerminalRenderer::stdio(app.output))?;
    Ok(())
}
