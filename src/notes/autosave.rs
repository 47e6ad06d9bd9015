//! Trailing-debounce auto-save for free-text notes. Each edit cancels
//! the previous timer and arms a new one, so only the last value in a
//! burst is persisted; teardown aborts whatever is pending so nothing
//! saves after disposal.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::api::ApiError;

/// Quiescence window before a pending note value is persisted.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1500);

/// Destination for auto-saved note text.
#[async_trait]
pub trait NoteSink: Send + Sync + 'static {
    async fn persist(&self, text: String) -> Result<(), ApiError>;
}

/// Debounced saver over a [`NoteSink`].
pub struct NoteAutoSaver {
    sink: Arc<dyn NoteSink>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl NoteAutoSaver {
    pub fn new(sink: Arc<dyn NoteSink>, delay: Duration) -> Self {
        Self {
            sink,
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Record a new value: cancel any armed timer and start the window over.
    pub async fn note_changed(&self, text: String) {
        let mut pending = self.pending.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let sink = Arc::clone(&self.sink);
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = sink.persist(text).await {
                log::warn!("note auto-save failed: {}", e);
            }
        }));
    }

    /// Persist immediately, cancelling any armed timer first.
    pub async fn flush(&self, text: String) -> Result<(), ApiError> {
        self.cancel().await;
        self.sink.persist(text).await
    }

    /// Cancel any pending save. Called on view teardown.
    pub async fn shutdown(&self) {
        self.cancel().await;
    }

    async fn cancel(&self) {
        if let Some(handle) = self.pending.lock().await.take() {
            handle.abort();
        }
    }
}

impl Drop for NoteAutoSaver {
    fn drop(&mut self) {
        // Cannot await in Drop; abort the timer task directly.
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        saved: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NoteSink for RecordingSink {
        async fn persist(&self, text: String) -> Result<(), ApiError> {
            self.saved.lock().unwrap().push(text);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_saves_only_the_last_value() {
        let sink = Arc::new(RecordingSink::default());
        let saver = NoteAutoSaver::new(sink.clone(), Duration::from_millis(500));

        saver.note_changed("f".into()).await;
        saver.note_changed("fu".into()).await;
        saver.note_changed("futures red".into()).await;

        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert_eq!(*sink.saved.lock().unwrap(), vec!["futures red".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn edit_resets_the_window() {
        let sink = Arc::new(RecordingSink::default());
        let saver = NoteAutoSaver::new(sink.clone(), Duration::from_millis(500));

        saver.note_changed("first".into()).await;
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(sink.saved.lock().unwrap().is_empty());

        saver.note_changed("second".into()).await;
        tokio::time::sleep(Duration::from_millis(300)).await;
        // first timer was cancelled, second has not elapsed yet
        assert!(sink.saved.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(*sink.saved.lock().unwrap(), vec!["second".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_save() {
        let sink = Arc::new(RecordingSink::default());
        let saver = NoteAutoSaver::new(sink.clone(), Duration::from_millis(500));

        saver.note_changed("never saved".into()).await;
        saver.shutdown().await;

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(sink.saved.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn flush_saves_immediately() {
        let sink = Arc::new(RecordingSink::default());
        let saver = NoteAutoSaver::new(sink.clone(), Duration::from_millis(500));

        saver.note_changed("stale".into()).await;
        saver.flush("final".into()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(*sink.saved.lock().unwrap(), vec!["final".to_string()]);
    }
}
