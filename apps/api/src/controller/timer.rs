//! Per-question countdown. One spawned task covers both the one-second
//! display tick and the final deadline, so a single handle cancels
//! everything — there is no second timer to forget.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::ControllerEvent;

pub struct QuestionTimer {
    handle: JoinHandle<()>,
}

impl QuestionTimer {
    /// Emits `Tick { remaining }` once per second and a final `Deadline`
    /// when the budget elapses. Events carry the question epoch so the
    /// controller can drop anything from an already answered question.
    pub fn start(epoch: u64, budget: Duration, events: mpsc::Sender<ControllerEvent>) -> Self {
        let handle = tokio::spawn(async move {
            let total = budget.as_secs();
            for elapsed in 1..=total {
                tokio::time::sleep(Duration::from_secs(1)).await;
                let remaining = total - elapsed;
                if remaining > 0 {
                    if events
                        .send(ControllerEvent::Tick { epoch, remaining })
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
            }
            let _ = events.send(ControllerEvent::Deadline { epoch }).await;
        });
        Self { handle }
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
