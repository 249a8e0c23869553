// Asynchronous track loading guarded by a load epoch

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, error, info};
use tokio::runtime::Handle;

use crate::errors::GpxSplitError;
use crate::track::{FileStore, Track, parse_gpx};

/// What a screen should currently show for its track
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewState<'a> {
    Loading,
    Error(&'a str),
    Loaded(&'a Arc<Track>),
}

/// Identifies one load request. Only the outcome of the latest ticket issued
/// by a [`LoadState`] is ever applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub epoch: u64,
    pub reference: String,
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub epoch: u64,
    pub result: Result<Track, GpxSplitError>,
}

/// Screen-local load state machine.
///
/// `track` and `error` are never both set. Every call to [`LoadState::begin`]
/// with a new reference, and every [`LoadState::teardown`], moves to a new
/// epoch; outcomes from older epochs are dropped.
#[derive(Debug, Default)]
pub struct LoadState {
    epoch: u64,
    reference: Option<String>,
    track: Option<Arc<Track>>,
    error: Option<String>,
}

impl LoadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `reference`.
    ///
    /// Returns `None` when `reference` is already the one being loaded or
    /// shown, so re-rendering never triggers a second read.
    pub fn begin(&mut self, reference: &str) -> Option<LoadTicket> {
        if self.reference.as_deref() == Some(reference) {
            return None;
        }
        self.epoch += 1;
        self.reference = Some(reference.to_string());
        self.track = None;
        self.error = None;
        debug!("Starting load #{} for {}", self.epoch, reference);
        Some(LoadTicket {
            epoch: self.epoch,
            reference: reference.to_string(),
        })
    }

    /// Apply a finished load. Returns `false` when the outcome is stale.
    pub fn apply(&mut self, outcome: LoadOutcome) -> bool {
        if outcome.epoch != self.epoch || self.view() != ViewState::Loading {
            debug!(
                "Discarding stale load result #{} (current #{})",
                outcome.epoch, self.epoch
            );
            return false;
        }
        match outcome.result {
            Ok(track) => {
                info!(
                    "Loaded {} with {} points",
                    self.reference.as_deref().unwrap_or_default(),
                    track.len()
                );
                self.track = Some(Arc::new(track));
            }
            Err(e) => {
                error!(
                    "Failed to load {}: {}",
                    self.reference.as_deref().unwrap_or_default(),
                    e
                );
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Invalidate any in-flight load; its result will be discarded
    pub fn teardown(&mut self) {
        self.epoch += 1;
        self.reference = None;
    }

    pub fn view(&self) -> ViewState<'_> {
        match (&self.track, &self.error) {
            (_, Some(message)) => ViewState::Error(message),
            (Some(track), None) => ViewState::Loaded(track),
            (None, None) => ViewState::Loading,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

/// Runtime and storage shared by every screen that loads tracks
#[derive(Clone)]
pub struct LoaderContext {
    runtime: Handle,
    store: Arc<dyn FileStore>,
}

impl LoaderContext {
    pub fn new(runtime: Handle, store: Arc<dyn FileStore>) -> Self {
        Self { runtime, store }
    }

    /// Create a loader with its own result channel
    pub fn loader(&self) -> TrackLoader {
        TrackLoader::new(self.clone())
    }
}

/// Runs read and parse off the UI thread and hands outcomes back over a
/// channel owned by a single screen.
pub struct TrackLoader {
    context: LoaderContext,
    sender: Sender<LoadOutcome>,
    receiver: Receiver<LoadOutcome>,
}

impl TrackLoader {
    pub fn new(context: LoaderContext) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            context,
            sender,
            receiver,
        }
    }

    pub fn spawn(&self, ticket: LoadTicket) {
        let store = Arc::clone(&self.context.store);
        let sender = self.sender.clone();
        self.context.runtime.spawn(async move {
            let LoadTicket { epoch, reference } = ticket;
            let blocking_reference = reference.clone();
            let result = tokio::task::spawn_blocking(move || {
                let raw = store.read_to_string(&blocking_reference)?;
                parse_gpx(&raw)
            })
            .await
            .unwrap_or_else(|e| {
                error!("Load task for {} did not complete: {}", reference, e);
                Err(GpxSplitError::LoadAborted { reference })
            });

            if sender.send(LoadOutcome { epoch, result }).is_err() {
                debug!("Screen closed before load #{} completed", epoch);
            }
        });
    }

    /// Drain every outcome that has arrived so far without blocking
    pub fn poll(&self) -> Vec<LoadOutcome> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackPoint;

    fn sample_track(len: usize) -> Track {
        Track::new(
            None,
            (0..len)
                .map(|i| TrackPoint::new(45.0 + i as f64 * 0.001, 7.0))
                .collect(),
        )
    }

    fn ok_outcome(epoch: u64, len: usize) -> LoadOutcome {
        LoadOutcome {
            epoch,
            result: Ok(sample_track(len)),
        }
    }

    #[test]
    fn test_initial_state_is_loading() {
        let state = LoadState::new();
        assert_eq!(state.view(), ViewState::Loading);
        assert_eq!(state.epoch(), 0);
        assert!(state.reference().is_none());
    }

    #[test]
    fn test_successful_load_reaches_loaded() {
        let mut state = LoadState::new();
        let ticket = state.begin("track1.gpx").unwrap();
        assert!(state.apply(ok_outcome(ticket.epoch, 100)));
        match state.view() {
            ViewState::Loaded(track) => assert_eq!(track.len(), 100),
            other => panic!("Expected Loaded, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_load_keeps_message_verbatim() {
        let mut state = LoadState::new();
        let ticket = state.begin("broken.gpx").unwrap();
        let err = GpxSplitError::GpxParse {
            reason: "unexpected end of stream".to_string(),
        };
        let expected = err.to_string();
        assert!(state.apply(LoadOutcome {
            epoch: ticket.epoch,
            result: Err(err),
        }));
        assert_eq!(state.view(), ViewState::Error(expected.as_str()));
    }

    #[test]
    fn test_same_reference_is_not_loaded_twice() {
        let mut state = LoadState::new();
        assert!(state.begin("track1.gpx").is_some());
        assert!(state.begin("track1.gpx").is_none());

        let epoch = state.epoch();
        state.apply(ok_outcome(epoch, 3));
        assert!(state.begin("track1.gpx").is_none());
        assert!(matches!(state.view(), ViewState::Loaded(_)));
    }

    #[test]
    fn test_reference_change_discards_previous_result() {
        let mut state = LoadState::new();
        let first = state.begin("a.gpx").unwrap();
        let second = state.begin("b.gpx").unwrap();
        assert!(second.epoch > first.epoch);

        assert!(!state.apply(ok_outcome(first.epoch, 5)));
        assert_eq!(state.view(), ViewState::Loading);

        assert!(state.apply(ok_outcome(second.epoch, 7)));
        match state.view() {
            ViewState::Loaded(track) => assert_eq!(track.len(), 7),
            other => panic!("Expected Loaded, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_change_after_settling_restarts_loading() {
        let mut state = LoadState::new();
        let first = state.begin("a.gpx").unwrap();
        state.apply(ok_outcome(first.epoch, 5));

        let second = state.begin("b.gpx").unwrap();
        assert_eq!(second.reference, "b.gpx");
        assert_eq!(state.view(), ViewState::Loading);
    }

    #[test]
    fn test_two_quick_changes_only_apply_latest() {
        let mut state = LoadState::new();
        let a = state.begin("a.gpx").unwrap();
        let b = state.begin("b.gpx").unwrap();
        let c = state.begin("c.gpx").unwrap();

        // results arrive out of order
        assert!(!state.apply(ok_outcome(b.epoch, 2)));
        assert!(state.apply(ok_outcome(c.epoch, 3)));
        assert!(!state.apply(ok_outcome(a.epoch, 1)));
        match state.view() {
            ViewState::Loaded(track) => assert_eq!(track.len(), 3),
            other => panic!("Expected Loaded, got {:?}", other),
        }
    }

    #[test]
    fn test_late_result_after_teardown_is_discarded() {
        let mut state = LoadState::new();
        let ticket = state.begin("a.gpx").unwrap();
        state.teardown();
        assert!(!state.apply(ok_outcome(ticket.epoch, 5)));
        assert_eq!(state.view(), ViewState::Loading);
    }

    #[test]
    fn test_second_outcome_for_same_epoch_is_ignored() {
        let mut state = LoadState::new();
        let ticket = state.begin("a.gpx").unwrap();
        assert!(state.apply(ok_outcome(ticket.epoch, 5)));
        assert!(!state.apply(LoadOutcome {
            epoch: ticket.epoch,
            result: Err(GpxSplitError::EmptyTrack),
        }));
        assert!(matches!(state.view(), ViewState::Loaded(_)));
    }
}
