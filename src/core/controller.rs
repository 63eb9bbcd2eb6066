// src/core/controller.rs

//! The session controller: the single owner of wizard state, the active
//! session, the live relay and the output buffer.
//!
//! Every network operation runs on a spawned task and reports back through a
//! `SessionEvent`. The event loop feeds those into [`SessionController::handle_event`],
//! so all state mutation happens on one logical thread.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::core::catalog;
use crate::core::client::BackendClient;
use crate::core::error::ScanError;
use crate::core::launcher;
use crate::core::models::{OptionCatalog, ScanConfiguration, ScanSession, ToolSelection, WizardStep};
use crate::core::relay::{LiveOutputRelay, OutputBuffer, RelayEvent, RelayState};
use crate::core::wizard::Wizard;

/// Completions of asynchronous work, applied in arrival order.
#[derive(Debug)]
pub enum SessionEvent {
    CatalogLoaded(Result<OptionCatalog, ScanError>),
    LaunchCompleted {
        epoch: u64,
        result: Result<ScanSession, ScanError>,
    },
    Relay {
        relay_id: u64,
        event: RelayEvent,
    },
}

pub struct SessionController {
    client: BackendClient,
    events: UnboundedSender<SessionEvent>,
    catalog: OptionCatalog,
    catalog_loading: bool,
    wizard: Wizard,
    session: Option<ScanSession>,
    relay: Option<LiveOutputRelay>,
    output: OutputBuffer,
    is_scanning: bool,
    launching: bool,
    last_error: Option<ScanError>,
    // Bumped on every reset so late launch replies can be recognised.
    epoch: u64,
    next_relay_id: u64,
}

impl SessionController {
    pub fn new(client: BackendClient, events: UnboundedSender<SessionEvent>) -> Self {
        Self {
            client,
            events,
            catalog: OptionCatalog::default(),
            catalog_loading: false,
            wizard: Wizard::new(),
            session: None,
            relay: None,
            output: OutputBuffer::default(),
            is_scanning: false,
            launching: false,
            last_error: None,
            epoch: 0,
            next_relay_id: 0,
        }
    }

    // --- Read-only views ---

    pub fn catalog(&self) -> &OptionCatalog {
        &self.catalog
    }

    pub fn step(&self) -> WizardStep {
        self.wizard.step()
    }

    pub fn config(&self) -> &ScanConfiguration {
        self.wizard.config()
    }

    pub fn session(&self) -> Option<&ScanSession> {
        self.session.as_ref()
    }

    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    pub fn is_scanning(&self) -> bool {
        self.is_scanning
    }

    /// The `loading` guard: a catalog fetch or a launch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.catalog_loading || self.launching
    }

    pub fn is_launching(&self) -> bool {
        self.launching
    }

    pub fn last_error(&self) -> Option<&ScanError> {
        self.last_error.as_ref()
    }

    pub fn relay_state(&self) -> Option<RelayState> {
        self.relay.as_ref().map(LiveOutputRelay::state)
    }

    pub fn relay_session_id(&self) -> Option<&str> {
        self.relay.as_ref().map(LiveOutputRelay::session_id)
    }

    pub fn can_advance(&self) -> bool {
        !self.is_loading() && self.wizard.can_advance()
    }

    pub fn can_retreat(&self) -> bool {
        !self.is_loading() && self.wizard.can_retreat(self.channel_live())
    }

    /// Streaming, or attached and still connecting. Either way the relay must
    /// not be left behind by a step change.
    fn channel_live(&self) -> bool {
        self.is_scanning || self.relay_state() == Some(RelayState::Idle)
    }

    pub fn can_launch(&self) -> bool {
        !self.is_loading() && self.step() == WizardStep::SelectTool
    }

    // --- Catalog ---

    /// Starts a (re)load of the option catalog. A failed reload keeps the
    /// catalog already in place.
    pub fn load_catalog(&mut self) {
        if self.catalog_loading {
            debug!("Catalog load already in flight.");
            return;
        }
        self.catalog_loading = true;
        let client = self.client.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = catalog::load_catalog(&client).await;
            let _ = events.send(SessionEvent::CatalogLoaded(result));
        });
    }

    // --- Selection mutators ---

    pub fn select_model(&mut self, name: &str) {
        self.wizard.select_model(name);
    }

    pub fn select_environment(&mut self, name: &str) {
        self.wizard.select_environment(name);
    }

    pub fn select_tool(&mut self, tool: ToolSelection) {
        self.wizard.select_tool(tool);
    }

    pub fn toggle_probe(&mut self, probe: &str) {
        self.wizard.toggle_probe(probe);
    }

    pub fn set_promptmap_directory(&mut self, directory: &str) {
        self.wizard.set_promptmap_directory(directory);
    }

    // --- Transitions ---

    pub fn advance(&mut self) -> bool {
        if self.is_loading() {
            debug!("Advance ignored while loading.");
            return false;
        }
        let moved = self.wizard.advance();
        if moved {
            self.last_error = None;
        }
        moved
    }

    pub fn retreat(&mut self) -> bool {
        if self.is_loading() {
            debug!("Retreat ignored while loading.");
            return false;
        }
        let moved = self.wizard.retreat(self.channel_live());
        if moved {
            self.last_error = None;
        }
        moved
    }

    /// Validates the configuration and, if it passes, submits it on a
    /// background task. The outcome arrives as `SessionEvent::LaunchCompleted`.
    ///
    /// Returns `Ok(false)` when the call was a no-op (wrong step or a launch
    /// already outstanding). Validation failures are stored in the error slot
    /// and returned; they never change any other state.
    pub fn launch(&mut self) -> Result<bool, ScanError> {
        if !self.can_launch() {
            debug!(step = %self.step(), loading = self.is_loading(), "Launch ignored.");
            return Ok(false);
        }
        let request = match launcher::build_request(self.wizard.config()) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Launch rejected by validation.");
                self.last_error = Some(e.clone());
                return Err(e);
            }
        };

        self.last_error = None;
        self.launching = true;
        let epoch = self.epoch;
        let client = self.client.clone();
        let events = self.events.clone();
        let configuration = self.wizard.config().clone();
        tokio::spawn(async move {
            let result = launcher::submit(&client, configuration, request).await;
            let _ = events.send(SessionEvent::LaunchCompleted { epoch, result });
        });
        Ok(true)
    }

    /// Applies one completion. Stale events (from before a reset or from a
    /// detached relay) are dropped.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::CatalogLoaded(result) => self.on_catalog_loaded(result),
            SessionEvent::LaunchCompleted { epoch, result } => {
                if epoch != self.epoch {
                    warn!(epoch, current = self.epoch, "Discarding launch result from a reset session.");
                    return;
                }
                self.on_launch_completed(result);
            }
            SessionEvent::Relay { relay_id, event } => self.on_relay_event(relay_id, event),
        }
    }

    fn on_catalog_loaded(&mut self, result: Result<OptionCatalog, ScanError>) {
        self.catalog_loading = false;
        match result {
            Ok(catalog) => {
                self.catalog = catalog;
            }
            Err(e) => {
                self.last_error = Some(e);
            }
        }
    }

    fn on_launch_completed(&mut self, result: Result<ScanSession, ScanError>) {
        self.launching = false;
        let session = match result {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Launch failed; staying on tool step.");
                self.last_error = Some(e);
                return;
            }
        };

        let url = match self.client.stream_url(&session.session_id) {
            Ok(url) => url,
            Err(e) => {
                self.last_error = Some(e);
                return;
            }
        };

        info!(session_id = %session.session_id, "Scan running.");
        self.wizard.enter_running();
        self.output.clear();
        self.next_relay_id += 1;
        // Replacing the previous relay drops, and therefore detaches, it.
        self.relay = Some(LiveOutputRelay::attach(
            self.next_relay_id,
            &session.session_id,
            url,
            self.events.clone(),
        ));
        self.session = Some(session);
    }

    fn on_relay_event(&mut self, relay_id: u64, event: RelayEvent) {
        let Some(relay) = self.relay.as_mut().filter(|r| r.id() == relay_id && r.is_attached()) else {
            debug!(relay_id, "Discarding event from a detached relay.");
            return;
        };

        match event {
            RelayEvent::Opened => {
                relay.set_state(RelayState::Open);
                self.output.clear();
                self.is_scanning = true;
            }
            RelayEvent::Message(line) => {
                self.output.append(line);
            }
            RelayEvent::Closed => {
                relay.set_state(RelayState::Closed);
                self.is_scanning = false;
                info!(lines = self.output.len(), "Scan output stream finished.");
            }
            RelayEvent::Error(message) => {
                relay.set_state(RelayState::Error);
                self.is_scanning = false;
                self.last_error = Some(ScanError::Channel(message));
            }
        }
    }

    /// Tears everything down and returns to the first step. Idempotent.
    /// The catalog is kept.
    pub fn reset(&mut self) {
        if let Some(mut relay) = self.relay.take() {
            relay.detach();
        }
        if self.launching {
            info!("Reset while a launch was outstanding; its result will be discarded.");
        }
        self.epoch += 1;
        self.launching = false;
        self.wizard.reset();
        self.session = None;
        self.output.clear();
        self.is_scanning = false;
        self.last_error = None;
        debug!(epoch = self.epoch, "Wizard reset.");
    }
}
