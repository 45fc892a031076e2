//! Scripted oracle for tests

use super::{Oracle, OracleError, OracleRequest, Task};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Default)]
struct Script {
    queue: VecDeque<Result<serde_json::Value, String>>,
    /// Answer given once the queue is drained
    fallback: Option<serde_json::Value>,
}

/// Mock oracle: returns scripted answers per task, in order.
///
/// Each task has a FIFO queue. When a queue runs dry the task's `always`
/// answer is used if one was set; otherwise the call fails with
/// `EnsembleNotFound`. Every request is recorded for inspection.
pub struct MockOracle {
    available: bool,
    delay: Option<Duration>,
    scripts: Mutex<HashMap<Task, Script>>,
    requests: Mutex<Vec<OracleRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockOracle {
    /// Create a mock oracle that reports as available.
    pub fn available() -> Self {
        Self {
            available: true,
            delay: None,
            scripts: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock oracle that reports as unavailable.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::available()
        }
    }

    /// Queue one answer for a task.
    pub fn with_response(self, task: Task, answer: serde_json::Value) -> Self {
        self.edit(task, |script| script.queue.push_back(Ok(answer)))
    }

    /// Queue several answers for a task, consumed in order.
    pub fn with_responses(
        self,
        task: Task,
        answers: impl IntoIterator<Item = serde_json::Value>,
    ) -> Self {
        self.edit(task, |script| script.queue.extend(answers.into_iter().map(Ok)))
    }

    /// Answer every call for a task once its queue is empty.
    pub fn always(self, task: Task, answer: serde_json::Value) -> Self {
        self.edit(task, |script| script.fallback = Some(answer))
    }

    /// Queue a failure for a task.
    pub fn with_failure(self, task: Task, message: impl Into<String>) -> Self {
        let message = message.into();
        self.edit(task, |script| script.queue.push_back(Err(message)))
    }

    /// Sleep before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<OracleRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests received for a task.
    pub fn calls(&self, task: Task) -> usize {
        lock(&self.requests).iter().filter(|r| r.task == task).count()
    }

    fn edit(self, task: Task, f: impl FnOnce(&mut Script)) -> Self {
        f(lock(&self.scripts).entry(task).or_default());
        self
    }

    fn next_answer(&self, task: Task) -> Result<serde_json::Value, OracleError> {
        let mut scripts = lock(&self.scripts);
        let script = scripts.get_mut(&task).ok_or_else(|| {
            OracleError::EnsembleNotFound(format!("no mock script for task '{}'", task))
        })?;

        match script.queue.pop_front() {
            Some(Ok(answer)) => Ok(answer),
            Some(Err(message)) => Err(OracleError::InvocationFailed(format!(
                "mock failure for task '{}': {}",
                task, message
            ))),
            None => script.fallback.clone().ok_or_else(|| {
                OracleError::EnsembleNotFound(format!(
                    "mock script for task '{}' is exhausted",
                    task
                ))
            }),
        }
    }
}

#[async_trait]
impl Oracle for MockOracle {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn consult(&self, request: &OracleRequest) -> Result<serde_json::Value, OracleError> {
        lock(&self.requests).push(request.clone());

        if !self.available {
            return Err(OracleError::Unavailable(
                "mock oracle configured as unavailable".to_string(),
            ));
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_answer(request.task)
    }
}
