//! Per-scene scheduled tasks.
//!
//! A scene owns one `TaskList` and ticks it once per frame. Each entry
//! carries its remaining delay, an optional repeat interval and a cancelled
//! flag. Dropping or clearing the list on scene exit is all it takes to make
//! sure no callback outlives its scene.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Task<K> {
    id: TaskId,
    kind: K,
    remaining: Duration,
    interval: Option<Duration>,
    cancelled: bool,
}

#[derive(Debug, Clone)]
pub struct TaskList<K> {
    tasks: Vec<Task<K>>,
    next_id: u64,
}

impl<K> Default for TaskList<K> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
        }
    }
}

impl<K: Clone> TaskList<K> {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: K, delay: Duration, interval: Option<Duration>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            kind,
            remaining: delay,
            interval,
            cancelled: false,
        });
        id
    }

    /// Fire `kind` once after `delay`.
    pub fn schedule_once(&mut self, delay: Duration, kind: K) -> TaskId {
        self.push(kind, delay, None)
    }

    /// Fire `kind` every `interval`, first after one full interval.
    ///
    /// A zero interval would fire without bound, so it is treated as one
    /// millisecond.
    pub fn schedule_repeating(&mut self, interval: Duration, kind: K) -> TaskId {
        let interval = interval.max(Duration::from_millis(1));
        self.push(kind, interval, Some(interval))
    }

    /// Cancel a task. Returns false if it had already fired or been removed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id && !t.cancelled) {
            Some(task) => {
                task.cancelled = true;
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id && !t.cancelled)
    }

    pub fn len(&self) -> usize {
        self.tasks.iter().filter(|t| !t.cancelled).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance every task by `dt` and return the kinds that fired, in
    /// schedule order. A repeating task fires once per elapsed interval, so a
    /// long frame can fire it more than once.
    pub fn tick(&mut self, dt: Duration) -> Vec<K> {
        let mut fired = Vec::new();

        for task in &mut self.tasks {
            if task.cancelled {
                continue;
            }
            let mut budget = dt;
            while budget >= task.remaining {
                budget -= task.remaining;
                fired.push(task.kind.clone());
                match task.interval {
                    Some(interval) => task.remaining = interval,
                    None => {
                        task.cancelled = true;
                        break;
                    }
                }
            }
            if !task.cancelled {
                task.remaining -= budget;
            }
        }

        self.tasks.retain(|t| !t.cancelled);
        fired
    }
}
