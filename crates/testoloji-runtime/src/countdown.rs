use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Tick { remaining: Duration },
    /// Time is up; the exam should be submitted
    Expired,
}

/// Counts an exam down in whole seconds.
///
/// Emits a `Tick` every second and a single `Expired` at zero. Dropping the
/// handle stops the timer.
pub struct ExamCountdown {
    task: JoinHandle<()>,
}

impl ExamCountdown {
    /// Must be called from within a tokio runtime
    pub fn start(duration: Duration, events: mpsc::UnboundedSender<CountdownEvent>) -> Self {
        let task = tokio::spawn(async move {
            let mut remaining = duration.as_secs();
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately
            interval.tick().await;

            while remaining > 0 {
                interval.tick().await;
                remaining -= 1;

                let event = if remaining == 0 {
                    CountdownEvent::Expired
                } else {
                    CountdownEvent::Tick {
                        remaining: Duration::from_secs(remaining),
                    }
                };
                if events.send(event).is_err() {
                    return;
                }
            }

            log::info!("Exam time expired after {} seconds", duration.as_secs());
        });

        Self { task }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn stop(self) {}
}

impl Drop for ExamCountdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}
