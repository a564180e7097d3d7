use crate::catalog::{MusicTrack, Speaker};
use tracing::{debug, info};

/// The active session as seen by every view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionOptions {
    pub speaker: Option<Speaker>,
    pub music: Option<MusicTrack>,
    pub duration_minutes: f64,
    pub started: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SessionOptions)>;

/// Application-wide session state.
///
/// Constructed once at startup and handed to the views that need it. Every
/// mutation replaces the state in one step and then notifies listeners
/// synchronously, in subscription order.
#[derive(Default)]
pub struct SessionStore {
    options: SessionOptions,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn is_started(&self) -> bool {
        self.options.started
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SessionOptions) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false when the id was not (or no longer) subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Overwrites the chosen options without touching `started`.
    /// Callers are responsible for passing a positive duration.
    pub fn set_session_options(
        &mut self,
        speaker: Speaker,
        music: MusicTrack,
        duration_minutes: f64,
    ) {
        debug!(%speaker, %music, duration_minutes, "session options set");
        self.options = SessionOptions {
            speaker: Some(speaker),
            music: Some(music),
            duration_minutes,
            started: self.options.started,
        };
        self.notify();
    }

    pub fn start_session(&mut self) {
        info!(
            speaker = ?self.options.speaker,
            music = ?self.options.music,
            duration_minutes = self.options.duration_minutes,
            "session started"
        );
        self.options.started = true;
        self.notify();
    }

    pub fn end_session(&mut self) {
        info!("session ended");
        self.options = SessionOptions::default();
        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = self.options.clone();
        for (_, listener) in self.listeners.iter_mut() {
            listener(&snapshot);
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("options", &self.options)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_initial_state_is_empty() {
        let store = SessionStore::new();
        assert_eq!(store.options(), &SessionOptions::default());
        assert!(!store.is_started());
        assert_eq!(store.options().duration_minutes, 0.0);
    }

    #[test]
    fn test_set_options_does_not_start() {
        let mut store = SessionStore::new();
        store.set_session_options(Speaker::GentleGuide, MusicTrack::SoftPiano, 10.0);

        let opts = store.options();
        assert_eq!(opts.speaker, Some(Speaker::GentleGuide));
        assert_eq!(opts.music, Some(MusicTrack::SoftPiano));
        assert_eq!(opts.duration_minutes, 10.0);
        assert!(!opts.started);
    }

    #[test]
    fn test_set_options_keeps_started_flag() {
        let mut store = SessionStore::new();
        store.start_session();
        store.set_session_options(Speaker::CalmVoice, MusicTrack::OceanWaves, 5.0);
        assert!(store.is_started());
    }

    #[test]
    fn test_start_session_is_idempotent() {
        let mut store = SessionStore::new();
        store.set_session_options(Speaker::CalmVoice, MusicTrack::OceanWaves, 5.0);
        store.start_session();
        store.start_session();
        assert!(store.is_started());
        assert_eq!(store.options().duration_minutes, 5.0);
    }

    #[test]
    fn test_end_session_resets_everything() {
        let mut store = SessionStore::new();
        store.set_session_options(Speaker::SoothingWhisper, MusicTrack::ForestSounds, 1.5);
        store.start_session();
        store.end_session();
        assert_eq!(store.options(), &SessionOptions::default());
    }

    #[test]
    fn test_listeners_see_every_mutation_in_order() {
        let mut store = SessionStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |opts| sink.borrow_mut().push(opts.started));

        store.set_session_options(Speaker::CalmVoice, MusicTrack::SoftPiano, 5.0);
        store.start_session();
        store.end_session();

        assert_eq!(*seen.borrow(), vec![false, true, false]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = SessionStore::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let id = store.subscribe(move |_| *c.borrow_mut() += 1);

        store.start_session();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.end_session();

        assert_eq!(*count.borrow(), 1);
        assert_eq!(store.listener_count(), 0);
    }
}
