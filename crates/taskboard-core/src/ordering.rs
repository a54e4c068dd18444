//! Kanban ordering engine.
//!
//! Positions are sparse integers. A move only rewrites the moved task's
//! position (midpoint of its new neighbours) unless the gap between the
//! neighbours is exhausted, in which case the whole destination column is
//! renumbered in steps of [`POSITION_STEP`]. Everything here is a pure
//! function of its inputs.

use serde::{Deserialize, Serialize};

use crate::{Board, CoreError, Task, TaskId, TaskStatus};

/// Position given to the first task of an empty column.
pub const DEFAULT_POSITION: i64 = 1000;

/// Gap used when appending and when renumbering a column.
pub const POSITION_STEP: i64 = 1000;

/// Largest accepted magnitude for a position.
///
/// Positions cross the wire as JSON numbers, which are exact only up to
/// 2^53 - 1.
pub const MAX_POSITION: i64 = (1 << 53) - 1;

/// A single `(task, status, position)` write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub position: i64,
}

impl TaskUpdate {
    /// Create a new TaskUpdate.
    pub fn new(task_id: TaskId, status: TaskStatus, position: i64) -> Self {
        Self {
            task_id,
            status,
            position,
        }
    }
}

/// Plan the writes needed to move a task to `target_index` of `target_column`.
///
/// `target_index` indexes the destination column with the moved task
/// already removed, and is clamped to the column length. The moved task is
/// always part of the result; other tasks appear only when the destination
/// column had to be renumbered.
pub fn plan_move(
    board: &Board,
    moved_task_id: &TaskId,
    target_column: TaskStatus,
    target_index: usize,
) -> Result<Vec<TaskUpdate>, CoreError> {
    let (source_column, source_index) = board
        .locate(moved_task_id)
        .ok_or_else(|| CoreError::task_not_found(moved_task_id))?;
    let moved = &board.column(source_column)[source_index];

    let destination: Vec<&Task> = board
        .column(target_column)
        .iter()
        .filter(|t| &t.id != moved_task_id)
        .collect();
    let index = target_index.min(destination.len());
    let before = index.checked_sub(1).map(|i| destination[i].position);
    let after = destination.get(index).map(|t| t.position);

    // Already in place with a consistent key: nothing to rewrite.
    if source_column == target_column
        && source_index == index
        && sits_between(moved.position, before, after)
    {
        return Ok(vec![TaskUpdate::new(
            moved.id.clone(),
            target_column,
            moved.position,
        )]);
    }

    let plan = match position_between(before, after) {
        Some(position) => vec![TaskUpdate::new(moved.id.clone(), target_column, position)],
        None => renumber(&destination, moved, target_column, index),
    };
    Ok(plan)
}

fn sits_between(position: i64, before: Option<i64>, after: Option<i64>) -> bool {
    before.map_or(true, |b| b < position) && after.map_or(true, |a| position < a)
}

/// Position strictly between the neighbours, if one exists.
///
/// Inserts at index 0 halve a positive first position; once the first
/// position is 1 or less they step below it instead.
fn position_between(before: Option<i64>, after: Option<i64>) -> Option<i64> {
    match (before, after) {
        (None, None) => Some(DEFAULT_POSITION),
        (Some(prev), None) => prev
            .checked_add(POSITION_STEP)
            .filter(|p| *p <= MAX_POSITION),
        (None, Some(next)) if next > 1 => midpoint(0, next),
        (None, Some(next)) => next
            .checked_sub(POSITION_STEP)
            .filter(|p| *p >= -MAX_POSITION),
        (Some(prev), Some(next)) => midpoint(prev, next),
    }
}

/// Position for a task appended below `column`, or `None` when the column
/// has to be renumbered first.
pub fn append_position(column: &[Task]) -> Option<i64> {
    position_between(column.last().map(|t| t.position), None)
}

fn midpoint(low: i64, high: i64) -> Option<i64> {
    let (low, high) = (i128::from(low), i128::from(high));
    if high - low < 2 {
        return None;
    }
    i64::try_from(low + (high - low) / 2).ok()
}

/// Evenly respace the destination column with the moved task inserted.
///
/// Ordinal order is preserved exactly; only tasks whose encoding changes
/// are emitted, plus the moved task.
fn renumber(
    destination: &[&Task],
    moved: &Task,
    target_column: TaskStatus,
    index: usize,
) -> Vec<TaskUpdate> {
    let mut sequence = destination.to_vec();
    sequence.insert(index, moved);

    sequence
        .into_iter()
        .enumerate()
        .filter_map(|(i, task)| {
            let position = POSITION_STEP.saturating_mul(i as i64 + 1);
            let changed = task.id == moved.id || task.position != position;
            changed.then(|| TaskUpdate::new(task.id.clone(), target_column, position))
        })
        .collect()
}

/// Raw bulk item as supplied by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkUpdateItem {
    pub task_id: String,
    pub status: String,
    pub position: f64,
}

/// An item of a bulk request that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedUpdate {
    pub task_id: String,
    pub error: CoreError,
}

/// Result of validating a bulk request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkPlan {
    /// Valid items, in request order.
    pub updates: Vec<TaskUpdate>,
    /// Invalid items, in request order.
    pub rejected: Vec<RejectedUpdate>,
}

impl BulkPlan {
    /// Returns true if every item passed validation.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Validate a client-computed batch of placements.
///
/// Positions are trusted as computed by repeated [`plan_move`] calls on the
/// client; this only checks that each item is well formed. Invalid items
/// are reported without affecting the valid ones.
pub fn plan_bulk_status_update(items: impl IntoIterator<Item = BulkUpdateItem>) -> BulkPlan {
    let mut plan = BulkPlan::default();
    for item in items {
        match validate_item(&item) {
            Ok(update) => plan.updates.push(update),
            Err(error) => plan.rejected.push(RejectedUpdate {
                task_id: item.task_id,
                error,
            }),
        }
    }
    plan
}

fn validate_item(item: &BulkUpdateItem) -> Result<TaskUpdate, CoreError> {
    if item.task_id.trim().is_empty() {
        return Err(CoreError::InvalidInput("task_id is required".to_string()));
    }
    let status: TaskStatus = item.status.parse()?;
    let position = validate_position(item.position)?;
    Ok(TaskUpdate::new(
        TaskId::new(item.task_id.as_str()),
        status,
        position,
    ))
}

/// Accept only finite integers within [`MAX_POSITION`].
pub fn validate_position(raw: f64) -> Result<i64, CoreError> {
    let bound = MAX_POSITION as f64;
    if !raw.is_finite() || raw.fract() != 0.0 || raw.abs() > bound {
        return Err(CoreError::InvalidPosition(raw.to_string()));
    }
    Ok(raw as i64)
}
