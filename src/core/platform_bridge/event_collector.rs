//=========================================================================
// Event Collector
//=========================================================================
//
// Core-side draining of platform events with bounded polling and
// shutdown detection.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → inputs + reload flag → TickControl
//
// Bounded polling prevents starvation. The collector never blocks; the
// core loop does its own pacing.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects platform events for one core frame.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    inputs: Vec<InputEvent>,
    reload_requested: bool,
}

impl EventCollector {
    const MAX_EVENTS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            inputs: Vec::with_capacity(16),
            reload_requested: false,
        }
    }

    /// Drains pending platform events (bounded to prevent starvation).
    ///
    /// Inputs from the previous frame are discarded. A pending reload
    /// request survives until taken.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.inputs.clear();
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!(target: "platform", "Event queue backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Key transitions collected this frame, in arrival order.
    pub(crate) fn inputs(&self) -> &[InputEvent] {
        &self.inputs
    }

    /// Returns and clears the pending reload request.
    ///
    /// Several requests within one frame collapse into one reload.
    pub(crate) fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Inputs(batch) => {
                self.inputs.extend(batch);
                TickControl::Continue
            }
            PlatformEvent::ReloadRequested => {
                debug!(target: "platform", "Reload request received");
                self.reload_requested = true;
                TickControl::Continue
            }
            PlatformEvent::WindowClosed => TickControl::Exit,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
