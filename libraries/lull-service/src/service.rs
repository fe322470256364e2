//! Serialized playback thread
//!
//! The manager and the router live on one dedicated thread. Commands, focus
//! callbacks, noisy-output notices, and queries from any other thread are
//! posted into a single queue and handled there in arrival order.

use crate::command::Command;
use crate::config::ServiceConfig;
use crate::controller::PlaybackController;
use crate::error::{Result, ServiceError};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use lull_core::{FocusChange, FocusRequestResult, Preset};
use lull_playback::{PlaybackEvent, PlaybackState, PlayerManager};
use serde_json::Value;
use std::fmt;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

type Query = Box<dyn FnOnce(&mut PlayerManager) + Send>;

/// Messages drained by the playback thread
pub enum ServiceMessage {
    Command(Command),

    /// Raw JSON request, decoded on the playback thread
    Request(Value),

    /// Late answer to a delayed focus request
    FocusRequestResult(FocusRequestResult),

    FocusChange(FocusChange),

    /// Output about to become noisy (headphones unplugged)
    BecomingNoisy,

    /// Run a closure against the manager
    Query(Query),

    Shutdown,
}

impl fmt::Debug for ServiceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceMessage::Command(c) => f.debug_tuple("Command").field(c).finish(),
            ServiceMessage::Request(r) => f.debug_tuple("Request").field(r).finish(),
            ServiceMessage::FocusRequestResult(r) => {
                f.debug_tuple("FocusRequestResult").field(r).finish()
            }
            ServiceMessage::FocusChange(c) => f.debug_tuple("FocusChange").field(c).finish(),
            ServiceMessage::BecomingNoisy => f.write_str("BecomingNoisy"),
            ServiceMessage::Query(_) => f.write_str("Query"),
            ServiceMessage::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Cloneable sender side of the playback thread
#[derive(Clone)]
pub struct ServiceHandle {
    tx: Sender<ServiceMessage>,
}

impl ServiceHandle {
    fn post(&self, message: ServiceMessage) -> Result<()> {
        self.tx.send(message).map_err(|_| ServiceError::Disconnected)
    }

    pub fn send(&self, command: Command) -> Result<()> {
        self.post(ServiceMessage::Command(command))
    }

    /// Post an undecoded JSON request
    pub fn send_request(&self, request: Value) -> Result<()> {
        self.post(ServiceMessage::Request(request))
    }

    pub fn becoming_noisy(&self) -> Result<()> {
        self.post(ServiceMessage::BecomingNoisy)
    }

    /// Run `f` on the playback thread and wait for its result
    ///
    /// Must not be called from the playback thread itself.
    pub fn query<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PlayerManager) -> T + Send + 'static,
    {
        let (reply_tx, reply_rx) = bounded(1);
        self.post(ServiceMessage::Query(Box::new(move |manager| {
            reply_tx.send(f(manager)).ok();
        })))?;
        reply_rx.recv().map_err(|_| ServiceError::Disconnected)
    }

    pub fn subscribe(&self) -> Result<Receiver<PlaybackEvent>> {
        self.query(PlayerManager::subscribe)
    }

    pub fn playback_state(&self) -> Result<PlaybackState> {
        self.query(|manager| manager.playback_state())
    }

    pub fn current_preset(&self) -> Result<Option<Preset>> {
        self.query(|manager| manager.current_preset())
    }

    pub fn save_current_preset(&self, name: impl Into<String>) -> Result<Option<Preset>> {
        let name = name.into();
        Ok(self.query(move |manager| manager.save_current_preset(&name))??)
    }

    pub fn remove_preset(&self, index: usize) -> Result<Option<Preset>> {
        Ok(self.query(move |manager| manager.remove_preset(index))??)
    }

    pub fn set_volume(&self, sound_key: impl Into<String>, volume: f32) -> Result<bool> {
        let sound_key = sound_key.into();
        self.query(move |manager| manager.set_volume(&sound_key, volume))
    }

    pub fn set_time_period(&self, sound_key: impl Into<String>, seconds: u32) -> Result<bool> {
        let sound_key = sound_key.into();
        self.query(move |manager| manager.set_time_period(&sound_key, seconds))
    }
}

/// Entry point for platform focus callbacks
///
/// Callbacks may arrive on any thread; they are queued behind everything
/// already posted.
#[derive(Clone)]
pub struct FocusListener {
    tx: Sender<ServiceMessage>,
}

impl FocusListener {
    pub fn on_request_result(&self, result: FocusRequestResult) {
        self.post(ServiceMessage::FocusRequestResult(result));
    }

    pub fn on_focus_change(&self, change: FocusChange) {
        self.post(ServiceMessage::FocusChange(change));
    }

    fn post(&self, message: ServiceMessage) {
        if self.tx.send(message).is_err() {
            debug!("focus callback after playback service stopped");
        }
    }
}

/// Owner of the playback thread
pub struct PlaybackService {
    handle: ServiceHandle,
    thread: Option<JoinHandle<()>>,
}

impl PlaybackService {
    /// Move `manager` and `controller` onto a new playback thread
    pub fn spawn(
        config: &ServiceConfig,
        manager: PlayerManager,
        controller: PlaybackController,
    ) -> Result<Self> {
        let (tx, rx) = unbounded();
        let tick = config.tick_interval();

        let thread = thread::Builder::new()
            .name("lull-playback".to_string())
            .spawn(move || run(&rx, manager, controller, tick))?;

        Ok(Self {
            handle: ServiceHandle { tx },
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> ServiceHandle {
        self.handle.clone()
    }

    pub fn focus_listener(&self) -> FocusListener {
        FocusListener {
            tx: self.handle.tx.clone(),
        }
    }

    /// Stop playback, release focus, cancel the timer, and join the thread
    pub fn shutdown(mut self) -> Result<()> {
        self.join()
    }

    fn join(&mut self) -> Result<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };

        // Already gone if the thread panicked
        self.handle.post(ServiceMessage::Shutdown).ok();
        thread.join().map_err(|_| ServiceError::ThreadPanicked)
    }
}

impl Drop for PlaybackService {
    fn drop(&mut self) {
        if let Err(e) = self.join() {
            warn!("Playback service did not stop cleanly: {}", e);
        }
    }
}

fn run(
    rx: &Receiver<ServiceMessage>,
    mut manager: PlayerManager,
    mut controller: PlaybackController,
    tick: Duration,
) {
    info!("playback service started");
    let mut last_tick = Instant::now();

    loop {
        let mut wake = last_tick + tick;
        if let Some(deadline) = controller.next_deadline() {
            wake = wake.min(deadline);
        }

        match rx.recv_timeout(wake.saturating_duration_since(Instant::now())) {
            Ok(ServiceMessage::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(message) => dispatch(message, &mut manager, &mut controller),
            Err(RecvTimeoutError::Timeout) => {}
        }

        let now = Instant::now();
        controller.poll_timer(&mut manager, now);

        let elapsed = now.saturating_duration_since(last_tick);
        if elapsed >= tick {
            manager.tick(elapsed);
            last_tick = now;
        }
    }

    manager.shutdown();
    controller.clear_auto_stop_callback();
    info!("playback service stopped");
}

fn dispatch(
    message: ServiceMessage,
    manager: &mut PlayerManager,
    controller: &mut PlaybackController,
) {
    match message {
        ServiceMessage::Command(command) => controller.handle(manager, command),
        ServiceMessage::Request(request) => controller.handle_request(manager, &request),
        ServiceMessage::FocusRequestResult(result) => manager.handle_focus_request_result(result),
        ServiceMessage::FocusChange(change) => manager.handle_focus_change(change),
        ServiceMessage::BecomingNoisy => manager.handle_becoming_noisy(),
        ServiceMessage::Query(query) => query(manager),
        ServiceMessage::Shutdown => {}
    }
}
