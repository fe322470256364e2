//! Recording fakes for the platform collaborators
//!
//! Every fake is cheaply clonable and clones share state, so a test can
//! keep one copy for assertions after boxing the other into the manager.

use lull_core::{Clock, EngineHandle, FocusArbiter, FocusRequestResult, PlaybackEngine};
use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One call observed by [`RecordingEngine`]
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Open(String),
    SetVolume(String, f32),
    Start(String),
    Pause(String),
    Stop(String),
    Release(String),
}

impl EngineCall {
    pub fn sound_key(&self) -> &str {
        match self {
            EngineCall::Open(key)
            | EngineCall::SetVolume(key, _)
            | EngineCall::Start(key)
            | EngineCall::Pause(key)
            | EngineCall::Stop(key)
            | EngineCall::Release(key) => key,
        }
    }
}

#[derive(Default)]
struct EngineLog {
    calls: Vec<EngineCall>,
    failing: BTreeSet<String>,
}

/// Engine that records every call instead of producing audio
#[derive(Clone, Default)]
pub struct RecordingEngine {
    log: Arc<Mutex<EngineLog>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `open` fail for `sound_key`
    pub fn fail_open(&self, sound_key: &str) {
        lock(&self.log).failing.insert(sound_key.to_string());
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        lock(&self.log).calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&EngineCall) -> bool) -> usize {
        lock(&self.log).calls.iter().filter(|c| pred(c)).count()
    }

    /// Calls for one sound, in order
    pub fn calls_for(&self, sound_key: &str) -> Vec<EngineCall> {
        lock(&self.log)
            .calls
            .iter()
            .filter(|c| c.sound_key() == sound_key)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.log).calls.clear();
    }

    fn record(&self, call: EngineCall) {
        lock(&self.log).calls.push(call);
    }
}

impl PlaybackEngine for RecordingEngine {
    fn open(&self, sound_key: &str) -> lull_core::Result<Box<dyn EngineHandle>> {
        if lock(&self.log).failing.contains(sound_key) {
            return Err(lull_core::LullError::engine(format!(
                "cannot open {}",
                sound_key
            )));
        }

        self.record(EngineCall::Open(sound_key.to_string()));
        Ok(Box::new(RecordingHandle {
            sound_key: sound_key.to_string(),
            engine: self.clone(),
        }))
    }
}

struct RecordingHandle {
    sound_key: String,
    engine: RecordingEngine,
}

impl EngineHandle for RecordingHandle {
    fn start(&mut self) {
        self.engine.record(EngineCall::Start(self.sound_key.clone()));
    }

    fn pause(&mut self) {
        self.engine.record(EngineCall::Pause(self.sound_key.clone()));
    }

    fn stop(&mut self) {
        self.engine.record(EngineCall::Stop(self.sound_key.clone()));
    }

    fn set_volume(&mut self, volume: f32) {
        self.engine
            .record(EngineCall::SetVolume(self.sound_key.clone(), volume));
    }

    fn release(&mut self) {
        self.engine
            .record(EngineCall::Release(self.sound_key.clone()));
    }
}

struct FocusScript {
    responses: VecDeque<FocusRequestResult>,
    fallback: FocusRequestResult,
    requests: usize,
    abandons: usize,
}

/// Focus arbiter answering from a queue of scripted results
///
/// Once the queue is empty every request gets the fallback answer
/// (`Granted` unless changed).
#[derive(Clone)]
pub struct ScriptedFocus {
    script: Arc<Mutex<FocusScript>>,
}

impl Default for ScriptedFocus {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedFocus {
    pub fn new() -> Self {
        Self::always(FocusRequestResult::Granted)
    }

    pub fn always(result: FocusRequestResult) -> Self {
        Self {
            script: Arc::new(Mutex::new(FocusScript {
                responses: VecDeque::new(),
                fallback: result,
                requests: 0,
                abandons: 0,
            })),
        }
    }

    /// Queue the answer for the next unanswered request
    pub fn then(&self, result: FocusRequestResult) -> &Self {
        lock(&self.script).responses.push_back(result);
        self
    }

    pub fn requests(&self) -> usize {
        lock(&self.script).requests
    }

    pub fn abandons(&self) -> usize {
        lock(&self.script).abandons
    }
}

impl FocusArbiter for ScriptedFocus {
    fn request_focus(&mut self) -> FocusRequestResult {
        let mut script = lock(&self.script);
        script.requests += 1;
        let fallback = script.fallback;
        script.responses.pop_front().unwrap_or(fallback)
    }

    fn abandon_focus(&mut self) {
        lock(&self.script).abandons += 1;
    }
}

/// Clock that only moves when told to
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start_millis)),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
