//! Swipe-to-act gesture tracking for list rows.
//!
//! One `SwipeTracker` per row. Pointer samples from any input source are
//! normalized to `PointerEvent` before they reach the tracker, so touch and
//! mouse share the same thresholds and outcomes.
//!
//! ```text
//! Idle --down--> Tracking --move--> Tracking
//!                Tracking --up/cancel--> Idle | EditCommitted | DeleteCommitted
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::expense::Expense;

/// Distances are in the same units as the pointer samples (CSS pixels in a browser).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeConfig {
    /// Displacement above which a press counts as a drag rather than a tap.
    pub jitter: f64,
    pub min_swipe_distance: f64,
    pub edit_threshold: f64,
    pub delete_threshold: f64,
    pub edit_delay_ms: u64,
    pub delete_delay_ms: u64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            jitter: 10.0,
            min_swipe_distance: 50.0,
            edit_threshold: 80.0,
            delete_threshold: 150.0,
            edit_delay_ms: 100,
            delete_delay_ms: 200,
        }
    }
}

impl SwipeConfig {
    /// Furthest the row can be dragged, and where it rests once delete commits.
    pub fn max_offset(&self) -> f64 {
        self.delete_threshold + 50.0
    }

    pub fn edit_delay(&self) -> Duration {
        Duration::from_millis(self.edit_delay_ms)
    }

    pub fn delete_delay(&self) -> Duration {
        Duration::from_millis(self.delete_delay_ms)
    }
}

/// Input-agnostic pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerEvent {
    Down { x: f64 },
    Move { x: f64 },
    Up,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeState {
    #[default]
    Idle,
    Tracking,
    EditCommitted,
    DeleteCommitted,
}

/// What a finished gesture asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeOutcome {
    None,
    Edit,
    Delete,
}

#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    config: SwipeConfig,
    state: SwipeState,
    start_x: f64,
    last_x: f64,
    moved: bool,
    offset: f64,
}

impl SwipeTracker {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SwipeState {
        self.state
    }

    /// Current leftward translation of the row, in `[0, max_offset]`.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Leftward displacement of the gesture so far (negative when dragged right).
    pub fn displacement(&self) -> f64 {
        self.start_x - self.last_x
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn handle(&mut self, event: PointerEvent) -> SwipeOutcome {
        match event {
            PointerEvent::Down { x } => {
                self.down(x);
                SwipeOutcome::None
            }
            PointerEvent::Move { x } => {
                self.move_to(x);
                SwipeOutcome::None
            }
            PointerEvent::Up => self.up(),
            PointerEvent::Cancel => self.cancel(),
        }
    }

    pub fn down(&mut self, x: f64) {
        // A row that committed to delete is on its way out.
        if self.state == SwipeState::DeleteCommitted {
            return;
        }
        self.state = SwipeState::Tracking;
        self.start_x = x;
        self.last_x = x;
        self.moved = false;
    }

    pub fn move_to(&mut self, x: f64) {
        if self.state != SwipeState::Tracking {
            return;
        }
        self.last_x = x;

        let distance = self.displacement();
        if distance.abs() > self.config.jitter {
            self.moved = true;
        }
        if distance > 0.0 {
            self.offset = distance.min(self.config.max_offset());
        }
    }

    /// Resolve the gesture on release.
    pub fn up(&mut self) -> SwipeOutcome {
        if self.state != SwipeState::Tracking {
            return SwipeOutcome::None;
        }

        let distance = self.displacement();
        let cfg = self.config;
        let outcome = if !self.moved || distance < cfg.min_swipe_distance {
            SwipeOutcome::None
        } else if distance > cfg.delete_threshold {
            SwipeOutcome::Delete
        } else if distance > cfg.edit_threshold {
            SwipeOutcome::Edit
        } else {
            SwipeOutcome::None
        };

        match outcome {
            SwipeOutcome::Delete => {
                self.state = SwipeState::DeleteCommitted;
                self.offset = cfg.max_offset();
            }
            SwipeOutcome::Edit => {
                self.state = SwipeState::EditCommitted;
                self.offset = cfg.edit_threshold;
            }
            SwipeOutcome::None => self.reset(),
        }
        self.moved = false;

        if outcome != SwipeOutcome::None {
            tracing::debug!(?outcome, distance, "swipe committed");
        }
        outcome
    }

    /// Cancel resolves exactly like a release.
    pub fn cancel(&mut self) -> SwipeOutcome {
        self.up()
    }

    /// A tap on a row that is still shifted puts it back without acting.
    /// Returns true if the row was reset.
    pub fn tap(&mut self) -> bool {
        if self.state == SwipeState::Tracking || self.offset == 0.0 {
            return false;
        }
        self.reset();
        true
    }

    /// Apply the post-delay offset once a committed command has been issued.
    pub fn settle(&mut self) {
        if self.state == SwipeState::EditCommitted {
            self.reset();
        }
    }

    /// Display delay before the command for `outcome` should fire.
    pub fn delay_for(&self, outcome: SwipeOutcome) -> Option<Duration> {
        match outcome {
            SwipeOutcome::None => None,
            SwipeOutcome::Edit => Some(self.config.edit_delay()),
            SwipeOutcome::Delete => Some(self.config.delete_delay()),
        }
    }

    fn reset(&mut self) {
        self.state = SwipeState::Idle;
        self.offset = 0.0;
        self.moved = false;
    }
}

/// Intent sent back to whoever owns the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "lowercase")]
pub enum SwipeCommand {
    None,
    Edit(Expense),
    Delete(i64),
}

/// A command to issue after `delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommand {
    pub command: SwipeCommand,
    pub delay: Duration,
}

/// A list row: the expense it shows plus its own tracker.
#[derive(Debug, Clone)]
pub struct SwipeRow {
    pub expense: Expense,
    pub tracker: SwipeTracker,
}

impl SwipeRow {
    pub fn new(expense: Expense, config: SwipeConfig) -> Self {
        Self {
            expense,
            tracker: SwipeTracker::new(config),
        }
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<PendingCommand> {
        let outcome = self.tracker.handle(event);
        let delay = self.tracker.delay_for(outcome)?;
        let command = match outcome {
            SwipeOutcome::Edit => SwipeCommand::Edit(self.expense.clone()),
            SwipeOutcome::Delete => SwipeCommand::Delete(self.expense.id),
            SwipeOutcome::None => return None,
        };
        Some(PendingCommand { command, delay })
    }
}

/// Independent trackers for every row of a list, keyed by expense id.
#[derive(Debug, Clone, Default)]
pub struct SwipeList {
    config: SwipeConfig,
    rows: HashMap<i64, SwipeRow>,
}

impl SwipeList {
    pub fn new(expenses: &[Expense], config: SwipeConfig) -> Self {
        Self {
            config,
            rows: expenses
                .iter()
                .map(|e| (e.id, SwipeRow::new(e.clone(), config)))
                .collect(),
        }
    }

    pub fn row(&self, id: i64) -> Option<&SwipeRow> {
        self.rows.get(&id)
    }

    /// Events for unknown ids are dropped.
    pub fn handle(&mut self, id: i64, event: PointerEvent) -> Option<PendingCommand> {
        self.rows.get_mut(&id)?.handle(event)
    }

    /// Rebuild rows after the list changed, keeping trackers of surviving ids.
    pub fn sync(&mut self, expenses: &[Expense]) {
        let mut rows = HashMap::with_capacity(expenses.len());
        for e in expenses {
            let row = match self.rows.remove(&e.id) {
                Some(mut row) => {
                    row.expense = e.clone();
                    row
                }
                None => SwipeRow::new(e.clone(), self.config),
            };
            rows.insert(e.id, row);
        }
        self.rows = rows;
    }
}

/// Fold a complete pointer stream for one row into the command it produces.
///
/// If the stream holds several gestures, the last committed one wins.
pub fn resolve_gesture<I>(expense: &Expense, events: I, config: SwipeConfig) -> SwipeCommand
where
    I: IntoIterator<Item = PointerEvent>,
{
    let mut row = SwipeRow::new(expense.clone(), config);
    events
        .into_iter()
        .filter_map(|ev| row.handle(ev))
        .last()
        .map(|p| p.command)
        .unwrap_or(SwipeCommand::None)
}
