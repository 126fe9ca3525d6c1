use crate::GamePhase;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    EnterPhase(GamePhase),
}

#[derive(Debug, Clone)]
struct Task {
    id: TaskId,
    due: u64,
    action: ScheduledAction,
}

/// Delayed actions on a logical millisecond clock. Nothing fires until the
/// owner calls `advance`.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: u64,
    next_id: u64,
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule(&mut self, delay_ms: u64, action: ScheduledAction) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            due: self.now.saturating_add(delay_ms),
            action,
        });
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Moves the clock forward and returns due actions, earliest first.
    /// Ties keep scheduling order.
    pub fn advance(&mut self, ms: u64) -> Vec<(TaskId, ScheduledAction)> {
        self.now = self.now.saturating_add(ms);
        let now = self.now;
        let mut due: Vec<Task> = Vec::new();
        self.tasks.retain(|task| {
            if task.due <= now {
                due.push(task.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|task| (task.due, task.id));
        due.into_iter().map(|task| (task.id, task.action)).collect()
    }
}
