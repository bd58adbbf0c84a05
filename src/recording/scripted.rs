//! Capture source that replays fixed readings instead of opening a device.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use super::source::{CaptureError, CaptureSource};
use crate::session::level::SILENCE_DB;

/// Replays a queue of dB readings, then repeats a fallback reading.
///
/// Clones share their counters, so a test can keep one clone to inspect how
/// many handles the controller acquired and released.
#[derive(Debug, Clone)]
pub struct ScriptedCapture {
    readings: Rc<RefCell<VecDeque<f32>>>,
    fallback_db: Rc<Cell<f32>>,
    failure: Option<String>,
    begun: Rc<Cell<usize>>,
    ended: Rc<Cell<usize>>,
}

/// Handle issued by [`ScriptedCapture`].
#[derive(Debug)]
pub struct ScriptedHandle {
    id: usize,
}

impl ScriptedHandle {
    pub fn id(&self) -> usize {
        self.id
    }
}

impl ScriptedCapture {
    /// Reports `level_db` on every reading.
    pub fn constant(level_db: f32) -> Self {
        Self {
            readings: Rc::new(RefCell::new(VecDeque::new())),
            fallback_db: Rc::new(Cell::new(level_db)),
            failure: None,
            begun: Rc::new(Cell::new(0)),
            ended: Rc::new(Cell::new(0)),
        }
    }

    /// Reports each of `readings` once, then silence.
    pub fn sequence(readings: impl IntoIterator<Item = f32>) -> Self {
        let capture = Self::constant(SILENCE_DB);
        capture.readings.borrow_mut().extend(readings);
        capture
    }

    /// Fails every `begin` with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::constant(SILENCE_DB)
        }
    }

    /// Queues more readings behind the current ones.
    pub fn push_readings(&self, readings: impl IntoIterator<Item = f32>) {
        self.readings.borrow_mut().extend(readings);
    }

    /// Changes the reading reported once the queue is empty.
    pub fn set_fallback(&self, level_db: f32) {
        self.fallback_db.set(level_db);
    }

    pub fn begun(&self) -> usize {
        self.begun.get()
    }

    pub fn ended(&self) -> usize {
        self.ended.get()
    }

    /// Handles acquired and not yet released.
    pub fn active(&self) -> usize {
        self.begun.get() - self.ended.get()
    }
}

impl CaptureSource for ScriptedCapture {
    type Handle = ScriptedHandle;

    fn begin(&mut self) -> Result<ScriptedHandle, CaptureError> {
        if let Some(reason) = &self.failure {
            return Err(CaptureError::Stream(reason.clone()));
        }
        let id = self.begun.get() + 1;
        self.begun.set(id);
        Ok(ScriptedHandle { id })
    }

    fn peak_level_db(&self, _handle: &ScriptedHandle) -> f32 {
        self.readings
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| self.fallback_db.get())
    }

    fn end(&mut self, _handle: ScriptedHandle) {
        self.ended.set(self.ended.get() + 1);
    }
}
