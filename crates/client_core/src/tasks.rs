//! Delayed work owned by the mounted page.

use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Submit,
    ChatReply,
    Detection,
}

/// Handles of every task spawned on behalf of one mounted page. Dropping the set
/// aborts whatever is still pending, so unmounting a page cancels its timers.
#[derive(Debug, Default)]
pub struct PageTasks {
    handles: Vec<(TaskKind, JoinHandle<()>)>,
}

impl PageTasks {
    pub fn track(&mut self, kind: TaskKind, handle: JoinHandle<()>) {
        self.handles.retain(|(_, handle)| !handle.is_finished());
        self.handles.push((kind, handle));
    }

    pub fn cancel(&mut self, kind: TaskKind) -> usize {
        let mut cancelled = 0;
        self.handles.retain(|(task_kind, handle)| {
            if *task_kind != kind {
                return true;
            }
            if !handle.is_finished() {
                handle.abort();
                cancelled += 1;
            }
            false
        });
        cancelled
    }

    pub fn cancel_all(&mut self) -> usize {
        let pending = self
            .handles
            .iter()
            .filter(|(_, handle)| !handle.is_finished())
            .count();
        for (_, handle) in self.handles.drain(..) {
            handle.abort();
        }
        pending
    }

    pub fn pending(&self, kind: TaskKind) -> usize {
        self.handles
            .iter()
            .filter(|(task_kind, handle)| *task_kind == kind && !handle.is_finished())
            .count()
    }
}

impl Drop for PageTasks {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn cancel_only_touches_matching_kind() {
        let mut tasks = PageTasks::default();
        tasks.track(
            TaskKind::Detection,
            tokio::spawn(tokio::time::sleep(Duration::from_secs(5))),
        );
        tasks.track(
            TaskKind::ChatReply,
            tokio::spawn(tokio::time::sleep(Duration::from_secs(5))),
        );

        assert_eq!(tasks.cancel(TaskKind::Detection), 1);
        assert_eq!(tasks.pending(TaskKind::Detection), 0);
        assert_eq!(tasks.pending(TaskKind::ChatReply), 1);
        assert_eq!(tasks.cancel_all(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_set_aborts_pending_work() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let mut tasks = PageTasks::default();
        tasks.track(
            TaskKind::Submit,
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                let _ = tx.send(());
            }),
        );
        drop(tasks);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(rx.await.is_err());
    }
}
