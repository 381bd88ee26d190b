use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delivers a value after a quiet period. Scheduling again before the delay
/// ran out replaces the earlier value, so only the latest one is sent.
pub struct Debouncer<T> {
    delay: Duration,
    sink: mpsc::UnboundedSender<T>,
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Must be called from within a tokio runtime
    pub fn new(delay: Duration, sink: mpsc::UnboundedSender<T>) -> Self {
        Self::with_handle(Handle::current(), delay, sink)
    }

    /// For callers outside the runtime, such as the UI thread
    pub fn with_handle(runtime: Handle, delay: Duration, sink: mpsc::UnboundedSender<T>) -> Self {
        Self {
            delay,
            sink,
            runtime,
            pending: None,
        }
    }

    pub fn schedule(&mut self, value: T) {
        if self.cancel() {
            log::debug!("Superseding scheduled value");
        }

        let delay = self.delay;
        let sink = self.sink.clone();
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sink.send(value);
        }));
    }

    /// Drop the scheduled value. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
