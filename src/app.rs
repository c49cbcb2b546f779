//! The view-model.
//!
//! `App` owns everything the screen shows: the river list, the selection, the
//! selected river's content and the status line.  It never does I/O.  Any
//! action that needs the network queues a [`FetchRequest`] in the outbox,
//! which the main loop hands to the fetcher; results come back through
//! [`App::apply`].
//!
//! Every request carries a fresh [`RequestToken`].  Only the latest manifest
//! token and the latest river token are accepted, so a slow response for a
//! river the user has already moved away from is dropped instead of
//! overwriting the newer one.

use std::time::{Duration, Instant};

use ratatui::widgets::ListState;

use crate::fetch::{FetchMsg, FetchRequest, RequestToken};
use crate::river::{Feed, RiverContent};

pub struct App {
    /// Rivers from the last successful manifest load.
    pub rivers: Vec<Feed>,
    /// Content of the last river applied for the current selection.
    pub content: Option<RiverContent>,
    /// List selection state; mirrors `selected`.
    pub list_state: ListState,
    /// Vertical scroll offset of the content pane.
    pub scroll: u16,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
    selected: Option<usize>,
    next_token: u64,
    pending_manifest: Option<RequestToken>,
    pending_river: Option<RequestToken>,
    outbox: Vec<FetchRequest>,
    refresh_timer: RefreshTimer,
}

/// Fires once every `every`; never when disabled.
#[derive(Debug, Clone, Copy)]
pub struct RefreshTimer {
    every: Option<Duration>,
    last: Instant,
}

impl RefreshTimer {
    pub fn new(every: Option<Duration>, now: Instant) -> Self {
        Self { every, last: now }
    }

    pub fn disabled() -> Self {
        Self::new(None, Instant::now())
    }

    /// True when the interval has elapsed since the last firing; restarts it.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.every {
            Some(every) if now.saturating_duration_since(self.last) >= every => {
                self.last = now;
                true
            }
            _ => false,
        }
    }
}

impl App {
    /// A fresh view-model with the initial manifest request already queued.
    pub fn new() -> Self {
        let mut app = Self {
            rivers: Vec::new(),
            content: None,
            list_state: ListState::default(),
            scroll: 0,
            quit: false,
            status: "Starting…".into(),
            selected: None,
            next_token: 0,
            pending_manifest: None,
            pending_river: None,
            outbox: Vec::new(),
            refresh_timer: RefreshTimer::disabled(),
        };
        app.load_manifest();
        app
    }

    /// Re-fetch the selected river every `every`, starting from `now`.
    pub fn with_refresh(mut self, every: Option<Duration>, now: Instant) -> Self {
        self.refresh_timer = RefreshTimer::new(every, now);
        self
    }

    /// Called once per main-loop iteration; queues a periodic refresh when due.
    pub fn tick(&mut self, now: Instant) {
        if self.refresh_timer.due(now) {
            tracing::debug!("periodic refresh");
            self.refresh();
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_feed(&self) -> Option<&Feed> {
        self.selected.and_then(|i| self.rivers.get(i))
    }

    /// True while a river request for the current selection is in flight.
    pub fn loading(&self) -> bool {
        self.pending_river.is_some()
    }

    /// Hand queued requests to the caller.
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.outbox)
    }

    // -- requests ------------------------------------------------------------

    fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken(self.next_token)
    }

    /// Queue a (re)load of the manifest.
    pub fn load_manifest(&mut self) {
        let token = self.issue_token();
        self.pending_manifest = Some(token);
        self.outbox.push(FetchRequest::Manifest { token });
        self.status = "Loading manifest…".into();
    }

    /// Re-fetch the selected river.  No-op without a selection.
    pub fn refresh(&mut self) {
        if self.selected.is_some() {
            self.request_river();
        }
    }

    fn request_river(&mut self) {
        let Some(url) = self.selected_feed().map(|feed| feed.url.clone()) else {
            return;
        };
        let token = self.issue_token();
        self.pending_river = Some(token);
        self.outbox.push(FetchRequest::River { token, url });
    }

    /// A request never reached the fetcher.  Stop waiting for it.
    pub fn request_failed(&mut self, request: FetchRequest) {
        let token = match request {
            FetchRequest::Manifest { token } | FetchRequest::River { token, .. } => token,
        };
        if self.pending_manifest == Some(token) {
            self.pending_manifest = None;
        }
        if self.pending_river == Some(token) {
            self.pending_river = None;
        }
        self.status = "Fetcher stopped".into();
    }

    // -- responses -----------------------------------------------------------

    /// Apply a fetcher result.  Responses to superseded requests are dropped.
    pub fn apply(&mut self, msg: FetchMsg) {
        match msg {
            FetchMsg::Manifest { token, result } => {
                if self.pending_manifest != Some(token) {
                    tracing::debug!(?token, "dropping stale manifest response");
                    return;
                }
                self.pending_manifest = None;
                match result {
                    Ok(rivers) => self.set_rivers(rivers),
                    Err(e) => {
                        tracing::warn!(error = %e, "manifest fetch failed");
                        self.status = format!("Manifest error: {e}");
                    }
                }
            }
            FetchMsg::River { token, url, result } => {
                if self.pending_river != Some(token) {
                    tracing::debug!(?token, %url, "dropping stale river response");
                    return;
                }
                self.pending_river = None;
                match result {
                    Ok(content) => {
                        self.status = match &content.river {
                            Some(river) => format!("Loaded {} items", river.item_count()),
                            None => "Loaded".into(),
                        };
                        self.content = Some(content);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, %url, "river fetch failed");
                        self.status = format!("Error: {e}");
                    }
                }
            }
        }
    }

    /// Replace the river list wholesale and select the first entry.
    fn set_rivers(&mut self, rivers: Vec<Feed>) {
        tracing::info!(count = rivers.len(), "manifest loaded");
        self.rivers = rivers;
        self.selected = None;
        self.list_state.select(None);

        if self.rivers.is_empty() {
            self.content = None;
            self.pending_river = None;
            self.status = "Manifest lists no rivers".into();
            return;
        }
        self.status = format!("{} rivers", self.rivers.len());
        self.select(0);
    }

    // -- navigation ----------------------------------------------------------

    /// Select river `index`, fetching it if the selection actually changes.
    pub fn select(&mut self, index: usize) {
        if index >= self.rivers.len() || self.selected == Some(index) {
            return;
        }
        self.selected = Some(index);
        self.list_state.select(Some(index));
        self.scroll = 0;
        self.request_river();
    }

    pub fn select_next(&mut self) {
        if self.rivers.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1).min(self.rivers.len() - 1),
            None => 0,
        };
        self.select(i);
    }

    pub fn select_previous(&mut self) {
        if self.rivers.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.select(i);
    }

    pub fn select_first(&mut self) {
        self.select(0);
    }

    pub fn select_last(&mut self) {
        if let Some(last) = self.rivers.len().checked_sub(1) {
            self.select(last);
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }
}
