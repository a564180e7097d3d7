use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::audio::PreviewPlayer;
use crate::prefs::PreferenceStore;
use crate::runtime::AppEvent;
use crate::session_view::SessionView;
use crate::store::{SessionStore, SubscriptionId};
use crate::timer::Scheduler;
use crate::wizard::{SetupWizard, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Launcher,
    Session,
}

/// Root view: the launcher (with the optional wizard overlay) or the
/// running session, chosen by the store's `started` flag.
pub struct App<P: PreferenceStore, A: PreviewPlayer> {
    store: SessionStore,
    prefs: P,
    player: A,
    scheduler: Scheduler,
    previews_dir: PathBuf,
    wizard: Option<SetupWizard>,
    session: Option<SessionView>,
    store_changed: Rc<Cell<bool>>,
    subscription: SubscriptionId,
    should_quit: bool,
}

impl<P: PreferenceStore, A: PreviewPlayer> App<P, A> {
    pub fn new(mut store: SessionStore, prefs: P, player: A, previews_dir: PathBuf) -> Self {
        let store_changed = Rc::new(Cell::new(true));
        let flag = store_changed.clone();
        let subscription = store.subscribe(move |_| flag.set(true));

        let mut app = Self {
            store,
            prefs,
            player,
            scheduler: Scheduler::new(),
            previews_dir,
            wizard: None,
            session: None,
            store_changed,
            subscription,
            should_quit: false,
        };
        app.sync_with_store();
        app
    }

    pub fn state(&self) -> AppState {
        if self.session.is_some() {
            AppState::Session
        } else {
            AppState::Launcher
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    pub fn player(&self) -> &A {
        &self.player
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn wizard(&self) -> Option<&SetupWizard> {
        self.wizard.as_ref()
    }

    pub fn wizard_mut(&mut self) -> Option<&mut SetupWizard> {
        self.wizard.as_mut()
    }

    pub fn session(&self) -> Option<&SessionView> {
        self.session.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_wizard_open(&self) -> bool {
        self.wizard.is_some()
    }

    /// Opens the setup overlay with a draft freshly read from preferences
    pub fn open_wizard(&mut self) {
        if self.store.is_started() || self.wizard.is_some() {
            return;
        }
        self.wizard = Some(SetupWizard::open(&self.prefs, self.previews_dir.clone()));
    }

    /// Closes the overlay, discarding the draft
    pub fn close_wizard(&mut self) {
        if self.wizard.take().is_some() {
            debug!("wizard dismissed");
        }
    }

    pub fn wizard_next(&mut self) -> Option<Transition> {
        let wizard = self.wizard.as_mut()?;
        let transition = wizard.next(&mut self.store, &mut self.prefs);
        if let Transition::Completed { .. } = transition {
            self.wizard = None;
        }
        self.sync_with_store();
        Some(transition)
    }

    pub fn end_session(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.end(&mut self.store);
        }
        self.sync_with_store();
    }

    /// Feed wall-clock time to the timers and dispatch due ticks
    pub fn advance(&mut self, elapsed: Duration) {
        for id in self.scheduler.advance(elapsed) {
            if let Some(session) = self.session.as_mut() {
                if session.timer_id() == Some(id) {
                    session.on_tick();
                }
            }
        }
    }

    /// Credit `elapsed` to the running timers, then handle `event`.
    /// A timer registered by the event starts counting from here.
    pub fn on_event(&mut self, event: AppEvent, elapsed: Duration) {
        self.advance(elapsed);
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Resize | AppEvent::Tick => {}
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.wizard.is_some() {
            self.on_wizard_key(key);
        } else if self.session.is_some() {
            if matches!(key.code, KeyCode::Char('e') | KeyCode::Enter) {
                self.end_session();
            }
        } else {
            match key.code {
                KeyCode::Enter => self.open_wizard(),
                KeyCode::Esc => self.should_quit = true,
                _ => {}
            }
        }
    }

    fn on_wizard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_wizard(),
            KeyCode::Enter => {
                self.wizard_next();
            }
            code => {
                let Some(wizard) = self.wizard.as_mut() else {
                    return;
                };
                match code {
                    KeyCode::Left => {
                        wizard.back();
                    }
                    KeyCode::Up => wizard.cycle(false),
                    KeyCode::Down => wizard.cycle(true),
                    KeyCode::Char(' ') => wizard.toggle_remember(),
                    KeyCode::Char('p') => {
                        wizard.preview(&mut self.player);
                    }
                    KeyCode::Char('u') => wizard.toggle_custom_unit(),
                    KeyCode::Char(c) if c.is_ascii_digit() => wizard.push_custom_digit(c),
                    KeyCode::Backspace => wizard.pop_custom_char(),
                    _ => {}
                }
            }
        }
    }

    /// Attach or detach the session view after the store changed
    fn sync_with_store(&mut self) {
        if !self.store_changed.replace(false) {
            return;
        }
        match (self.store.is_started(), self.session.is_some()) {
            (true, false) => {
                self.session = Some(SessionView::attach(&self.store, &mut self.scheduler));
            }
            (false, true) => {
                // dropping the view releases its countdown timer
                self.session = None;
                debug!("session view detached");
            }
            _ => {}
        }
    }
}

impl<P: PreferenceStore, A: PreviewPlayer> Drop for App<P, A> {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}
