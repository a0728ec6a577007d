use super::actions::Action;
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type TaskId = u64;

#[derive(Debug)]
pub struct BackgroundTask {
    pub id: TaskId,
    pub handle: JoinHandle<()>,
    pub description: String,
    pub started_at: std::time::Instant,
}

impl BackgroundTask {
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}

/// Runs view-state operations off the UI loop.
///
/// Each operation resolves to the [`Action`] the app should process next,
/// which is delivered through the receiver returned by [`TaskManager::new`].
pub struct TaskManager {
    tasks: HashMap<TaskId, BackgroundTask>,
    next_task_id: TaskId,
    action_sender: mpsc::UnboundedSender<Action>,
}

impl TaskManager {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();

        (
            Self {
                tasks: HashMap::new(),
                next_task_id: 1,
                action_sender: tx,
            },
            rx,
        )
    }

    /// Spawn an operation whose output is sent back as an action
    pub fn spawn_operation<Fut>(&mut self, description: impl Into<String>, operation: Fut) -> TaskId
    where
        Fut: Future<Output = Action> + Send + 'static,
    {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        let action_sender = self.action_sender.clone();
        let handle = tokio::spawn(async move {
            let action = operation.await;
            // The receiver is gone only while the app shuts down
            let _ = action_sender.send(action);
        });

        let task = BackgroundTask {
            id: task_id,
            handle,
            description: description.into(),
            started_at: std::time::Instant::now(),
        };

        self.tasks.insert(task_id, task);
        task_id
    }

    /// Remove finished tasks, returning their ids and descriptions
    pub fn cleanup_finished_tasks(&mut self) -> Vec<(TaskId, String)> {
        let finished: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.handle.is_finished())
            .map(|(id, _)| *id)
            .collect();

        finished
            .into_iter()
            .filter_map(|id| self.tasks.remove(&id))
            .map(|task| {
                log::debug!("Task {} '{}' finished after {:?}", task.id, task.description, task.elapsed());
                (task.id, task.description)
            })
            .collect()
    }

    /// Descriptions of the operations still running
    pub fn running_descriptions(&self) -> Vec<String> {
        self.tasks.values().map(|task| task.description.clone()).collect()
    }

    pub fn cancel_all_tasks(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.handle.abort();
        }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.cancel_all_tasks();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_operation_result_is_delivered_as_action() {
        let (mut manager, mut rx) = TaskManager::new();
        manager.spawn_operation("quit", async { Action::Quit });

        let action = rx.recv().await.expect("action should be sent");
        assert!(matches!(action, Action::Quit));

        // The task has finished once its action arrived
        tokio::task::yield_now().await;
        let mut finished = Vec::new();
        for _ in 0..10 {
            finished.extend(manager.cleanup_finished_tasks());
            if !finished.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].1, "quit");
        assert_eq!(manager.task_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_all_tasks() {
        let (mut manager, _rx) = TaskManager::new();
        manager.spawn_operation("sleep", async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Action::None
        });
        assert_eq!(manager.task_count(), 1);
        assert_eq!(manager.running_descriptions(), vec!["sleep".to_string()]);

        manager.cancel_all_tasks();
        assert_eq!(manager.task_count(), 0);
    }
}
