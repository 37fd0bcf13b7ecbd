use std::time::Duration;

use tokio::task::JoinHandle;

/// Quiet-period timer where only the most recently scheduled expiry counts.
///
/// The expiry callback only receives a sequence number; the owner hands it
/// back to [`Debouncer::fire`] to learn whether the expiry is still current.
#[derive(Debug)]
pub(crate) struct Debouncer {
    delay: Duration,
    seq: u64,
    timer: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            seq: 0,
            timer: None,
        }
    }

    /// Restarts the quiet period, dropping any expiry scheduled before.
    pub(crate) fn schedule<F>(&mut self, on_elapsed: F)
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.seq += 1;
        let seq = self.seq;
        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_elapsed(seq);
        }));
    }

    /// Consumes the expiry `seq`; `false` if it was superseded or cancelled.
    pub(crate) fn fire(&mut self, seq: u64) -> bool {
        if seq == self.seq && self.timer.is_some() {
            self.timer = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.timer.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
