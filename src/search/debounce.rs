use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppError;

/// Default quiet period before a search runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Hands the latest pushed value to a handler once input has been quiet for
/// `delay`.
///
/// A value pushed while another is pending replaces it and restarts the
/// timer. Dropping the debouncer cancels whatever is pending.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debounce loop on the current tokio runtime.
    pub fn spawn<F>(delay: Duration, handler: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(debounce_loop(rx, delay, handler));
        Self { tx, task }
    }

    pub fn push(&self, value: T) -> Result<(), AppError> {
        self.tx
            .send(value)
            .map_err(|_| AppError::Internal("debounce task has stopped".into()))
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn debounce_loop<T, F>(mut rx: mpsc::UnboundedReceiver<T>, delay: Duration, mut handler: F)
where
    F: FnMut(T),
{
    let mut pending: Option<T> = None;
    loop {
        match pending.take() {
            None => match rx.recv().await {
                Some(value) => pending = Some(value),
                None => break,
            },
            Some(value) => {
                tokio::select! {
                    next = rx.recv() => match next {
                        Some(newer) => pending = Some(newer),
                        None => break,
                    },
                    _ = tokio::time::sleep(delay) => handler(value),
                }
            }
        }
    }
}
