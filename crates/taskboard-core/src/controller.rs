//! Board lifecycle.
//!
//! [`BoardController`] owns the application state (phase, last fetched
//! tasks, subject options, active criteria) and the seams it talks to. All
//! transitions take `&mut self`, so one operation always runs to completion
//! before the next begins.
//!
//! ```text
//! Idle ──reload──▶ Loading ──ok──▶ Rendered ◀──▶ Filtering
//!                     │                │
//!                     └──fetch error──▶ Error ──reload──▶ Loading
//! ```
//!
//! A failed fetch drops the previous task list: the renderer gets a single
//! [`FailureNotice`] and nothing else until the next successful reload.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::cell::Cell;
use std::fmt;
use tracing::{debug, info, warn};

use crate::completion::CompletionStore;
use crate::error::ErrorCode;
use crate::filter::{FilterCriteria, apply_filters, subject_options};
use crate::fingerprint::{Fingerprint, fingerprint};
use crate::model::Task;
use crate::notify::Notifier;
use crate::novelty::{NoveltyDetector, NoveltyReport};
use crate::source::{FetchError, TaskSource};
use crate::store::{KeyValueStore, StoreError};
use crate::timeago::Locale;
use crate::view::{BoardView, ViewContext, build_view};

/// Source of "now" for age labels and time windows.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Lifecycle phase of the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardPhase {
    #[default]
    Idle,
    Loading,
    Rendered,
    Filtering,
    Error,
}

impl BoardPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Rendered => "rendered",
            Self::Filtering => "filtering",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for BoardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by controller transitions.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("cannot {operation} while the board is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: BoardPhase,
    },

    #[error("no task with fingerprint {0}")]
    TaskNotFound(Fingerprint),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BoardError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Fetch(err) => err.code(),
            Self::InvalidPhase { .. } => ErrorCode::InvalidPhase,
            Self::TaskNotFound(_) => ErrorCode::TaskNotFound,
            Self::Store(err) => err.code(),
        }
    }
}

/// The single placeholder rendered in place of the board after a failed
/// fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureNotice {
    pub code: &'static str,
    pub message: String,
    pub hint: Option<&'static str>,
}

impl FailureNotice {
    fn from_fetch(err: &FetchError) -> Self {
        let code = err.code();
        Self {
            code: code.code(),
            message: err.to_string(),
            hint: code.hint(),
        }
    }
}

/// Presentation adapter. Receives either the board or the failure notice,
/// never both.
pub trait Renderer {
    type Error;

    /// Draw the board.
    ///
    /// # Errors
    ///
    /// Whatever the output medium reports.
    fn render_board(&mut self, view: &BoardView) -> Result<(), Self::Error>;

    /// Draw the failure placeholder.
    ///
    /// # Errors
    ///
    /// Whatever the output medium reports.
    fn render_failure(&mut self, failure: &FailureNotice) -> Result<(), Self::Error>;
}

/// Result of [`BoardController::toggle_completion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    pub fingerprint: Fingerprint,
    pub completed: bool,
    pub view: BoardView,
}

#[derive(Debug, Default)]
struct BoardState {
    phase: BoardPhase,
    tasks: Vec<Task>,
    subjects: Vec<String>,
    criteria: FilterCriteria,
    failure: Option<FailureNotice>,
    report: Option<NoveltyReport>,
}

/// Drives fetch → novelty → filter → view for one board.
pub struct BoardController<Src, S, N, C = SystemClock> {
    source: Src,
    store: S,
    notifier: N,
    clock: C,
    locale: Locale,
    state: BoardState,
}

impl<Src, S, N> BoardController<Src, S, N, SystemClock>
where
    Src: TaskSource,
    S: KeyValueStore,
    N: Notifier,
{
    pub fn new(source: Src, store: S, notifier: N, locale: Locale) -> Self {
        Self {
            source,
            store,
            notifier,
            clock: SystemClock,
            locale,
            state: BoardState::default(),
        }
    }
}

impl<Src, S, N, C> BoardController<Src, S, N, C>
where
    Src: TaskSource,
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    /// Swap the clock (tests pin "now" with [`FixedClock`]).
    pub fn with_clock<C2: Clock>(self, clock: C2) -> BoardController<Src, S, N, C2> {
        BoardController {
            source: self.source,
            store: self.store,
            notifier: self.notifier,
            clock,
            locale: self.locale,
            state: self.state,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> BoardPhase {
        self.state.phase
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    #[must_use]
    pub fn subjects(&self) -> &[String] {
        &self.state.subjects
    }

    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.state.criteria
    }

    /// Novelty outcome of the last successful reload.
    #[must_use]
    pub const fn last_report(&self) -> Option<&NoveltyReport> {
        self.state.report.as_ref()
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&FailureNotice> {
        self.state.failure.as_ref()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Fetch, run novelty detection, reset the criteria, and build the view.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Fetch`] when the source fails; the board is then
    /// in [`BoardPhase::Error`] and holds no tasks.
    pub fn reload(&mut self) -> Result<BoardView, BoardError> {
        self.state.phase = BoardPhase::Loading;
        let location = self.source.location();
        debug!(%location, "fetching tasks");

        let tasks = match self.source.fetch() {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(%location, error = %err, "fetch failed");
                self.state = BoardState {
                    phase: BoardPhase::Error,
                    failure: Some(FailureNotice::from_fetch(&err)),
                    ..BoardState::default()
                };
                return Err(err.into());
            }
        };

        let report = NoveltyDetector::new(&self.store, &self.notifier, self.locale).detect(&tasks);
        info!(
            count = tasks.len(),
            new = report.new_count(),
            notified = report.notified,
            "board reloaded"
        );

        self.state = BoardState {
            phase: BoardPhase::Rendered,
            subjects: subject_options(&tasks),
            tasks,
            criteria: FilterCriteria::default(),
            failure: None,
            report: Some(report),
        };
        Ok(self.build_view())
    }

    /// Re-filter the loaded tasks with new criteria.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidPhase`] unless a reload has succeeded in
    /// the current cycle.
    pub fn apply_criteria(&mut self, criteria: FilterCriteria) -> Result<BoardView, BoardError> {
        self.require_loaded("apply filters")?;
        self.state.phase = BoardPhase::Filtering;
        debug!(
            subject = %criteria.subject,
            window = %criteria.window,
            status = %criteria.status,
            "applying criteria"
        );
        self.state.criteria = criteria;
        let view = self.build_view();
        self.state.phase = BoardPhase::Rendered;
        Ok(view)
    }

    /// Flip one task's completion flag and rebuild the view with the
    /// current criteria.
    ///
    /// # Errors
    ///
    /// [`BoardError::InvalidPhase`] before a successful reload,
    /// [`BoardError::TaskNotFound`] when no loaded task has this fingerprint,
    /// [`BoardError::Store`] when the flag cannot be persisted.
    pub fn toggle_completion(&mut self, fp: &Fingerprint) -> Result<ToggleOutcome, BoardError> {
        self.require_loaded("toggle completion")?;
        if !self.state.tasks.iter().any(|task| fingerprint(task) == *fp) {
            return Err(BoardError::TaskNotFound(fp.clone()));
        }
        let completed = CompletionStore::new(&self.store).toggle(fp)?;
        info!(fingerprint = %fp, completed, "completion toggled");
        Ok(ToggleOutcome {
            fingerprint: fp.clone(),
            completed,
            view: self.build_view(),
        })
    }

    /// The board as it stands, or `None` outside the rendered phases.
    #[must_use]
    pub fn current_view(&self) -> Option<BoardView> {
        self.is_loaded().then(|| self.build_view())
    }

    /// Hand the current board, or the failure notice, to a renderer.
    /// Nothing is drawn before the first reload.
    ///
    /// # Errors
    ///
    /// Propagates the renderer's error.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), R::Error> {
        if let Some(failure) = &self.state.failure {
            return renderer.render_failure(failure);
        }
        match self.current_view() {
            Some(view) => renderer.render_board(&view),
            None => {
                debug!(phase = %self.state.phase, "nothing to render yet");
                Ok(())
            }
        }
    }

    const fn is_loaded(&self) -> bool {
        matches!(
            self.state.phase,
            BoardPhase::Rendered | BoardPhase::Filtering
        )
    }

    fn require_loaded(&self, operation: &'static str) -> Result<(), BoardError> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(BoardError::InvalidPhase {
                operation,
                phase: self.state.phase,
            })
        }
    }

    fn build_view(&self) -> BoardView {
        let completed = CompletionStore::new(&self.store).load_map();
        let now = self.clock.now();
        let visible = apply_filters(&self.state.tasks, &self.state.criteria, &completed, now);
        build_view(
            visible,
            ViewContext {
                completed: &completed,
                subjects: &self.state.subjects,
                criteria: &self.state.criteria,
                now,
                locale: self.locale,
            },
        )
    }
}
