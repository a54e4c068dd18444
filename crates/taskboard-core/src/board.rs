//! In-memory board snapshots and the optimistic view built on them.
//!
//! A [`Board`] groups tasks by status column and keeps each column sorted by
//! `position`, breaking ties by the order the tasks were fetched in. A
//! [`BoardView`] layers a two-phase protocol on top: plans are staged onto
//! the current board immediately, then either confirmed once persisted or
//! rolled back to the last confirmed snapshot.

use std::collections::{BTreeMap, HashMap};

use crate::{Task, TaskId, TaskStatus, TaskUpdate};

/// Tasks grouped by column, each column in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    columns: BTreeMap<TaskStatus, Vec<Task>>,
    fetch_order: HashMap<TaskId, usize>,
}

impl Board {
    /// Build a board from tasks in fetch order.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut board = Self::default();
        for (seq, task) in tasks.into_iter().enumerate() {
            board.fetch_order.insert(task.id.clone(), seq);
            board.columns.entry(task.status).or_default().push(task);
        }
        board.sort_columns();
        board
    }

    fn sort_columns(&mut self) {
        let order = &self.fetch_order;
        for column in self.columns.values_mut() {
            column.sort_by_key(|t| (t.position, order.get(&t.id).copied().unwrap_or(usize::MAX)));
        }
    }

    /// Tasks of one column in display order.
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        self.columns.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Column and index of a task.
    pub fn locate(&self, task_id: &TaskId) -> Option<(TaskStatus, usize)> {
        self.columns.iter().find_map(|(status, column)| {
            column
                .iter()
                .position(|t| &t.id == task_id)
                .map(|idx| (*status, idx))
        })
    }

    /// Look up a task by id.
    pub fn get(&self, task_id: &TaskId) -> Option<&Task> {
        self.locate(task_id)
            .map(|(status, idx)| &self.column(status)[idx])
    }

    /// Number of tasks on the board.
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// Returns true if the board holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All tasks, column by column in board order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.columns.values().flatten()
    }

    /// Apply updates in order and re-sort.
    ///
    /// Returns the ids of updates that referenced tasks not on the board.
    pub fn apply(&mut self, updates: &[TaskUpdate]) -> Vec<TaskId> {
        let mut missing = Vec::new();
        for update in updates {
            let Some((status, idx)) = self.locate(&update.task_id) else {
                missing.push(update.task_id.clone());
                continue;
            };
            let Some(column) = self.columns.get_mut(&status) else {
                continue;
            };
            let mut task = column.remove(idx);
            task.status = update.status;
            task.position = update.position;
            self.columns.entry(task.status).or_default().push(task);
        }
        self.sort_columns();
        missing
    }

    /// Consume the board, yielding tasks in board order.
    pub fn into_tasks(self) -> Vec<Task> {
        self.columns.into_values().flatten().collect()
    }
}

/// Board state as rendered by a client: last confirmed snapshot plus
/// optimistically staged plans.
#[derive(Debug, Clone, Default)]
pub struct BoardView {
    confirmed: Board,
    current: Board,
    pending: Vec<TaskUpdate>,
}

impl BoardView {
    /// Start from a freshly fetched board.
    pub fn new(board: Board) -> Self {
        Self {
            confirmed: board.clone(),
            current: board,
            pending: Vec::new(),
        }
    }

    /// Board as it should be rendered right now.
    pub fn current(&self) -> &Board {
        &self.current
    }

    /// Last board state the server confirmed.
    pub fn confirmed(&self) -> &Board {
        &self.confirmed
    }

    /// Updates staged since the last confirm/rollback.
    pub fn pending(&self) -> &[TaskUpdate] {
        &self.pending
    }

    /// Render a plan before persistence confirms it.
    pub fn stage(&mut self, updates: &[TaskUpdate]) {
        self.current.apply(updates);
        self.pending.extend_from_slice(updates);
    }

    /// Persistence succeeded: the current board becomes the confirmed one.
    pub fn confirm(&mut self) {
        self.confirmed = self.current.clone();
        self.pending.clear();
    }

    /// Persistence failed: drop staged updates.
    pub fn rollback(&mut self) {
        self.current = self.confirmed.clone();
        self.pending.clear();
    }

    /// Replace both snapshots with a re-fetched board.
    pub fn reconcile(&mut self, board: Board) {
        self.confirmed = board.clone();
        self.current = board;
        self.pending.clear();
    }
}
