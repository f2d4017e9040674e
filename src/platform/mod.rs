//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the core thread via a crossbeam
// channel.
//
// Architecture:
// ```text
//  Main Thread:                     Core Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop        │    │  EventCollector      │
//  │   ↓                      │    │  ↓                   │
//  │  InputProcessor          │    │  KeyState            │
//  │   ├─ arrows / space      │    │  ↓                   │
//  │   ├─ F5 / R  ──reload──┐ │    │  ReloadHost          │
//  │   └─ Escape  ──close─┐ │ │    │   ├─ reload()        │
//  │   ↓                  │ │ │    │   └─ tick()          │
//  │  InputBuffer         │ │ │    └──────────────────────┘
//  │   ↓ RedrawRequested  │ │ │               ↑
//  │  Channel ────────────┴─┴─┼───────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: buffered keys are sent as one
//   batch per redraw
// - **Reload flushes first**: keys pressed before F5 reach the core
//   thread before the reload request does
// - **Focus loss releases keys**: a key held while the window loses
//   focus never reports its release
// - **Graceful channel disconnect**: if the core thread dies the window
//   keeps running so the user can close it
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::{InputProcessor, KeyAction};

//=== Platform ============================================================

/// Window manager and keyboard event forwarder.
///
/// Runs on the main thread (Winit requirement on macOS/iOS). Not Send;
/// talks to the core thread only through `event_sender`.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    title: String,
    size: (u32, u32),

    /// Buffers key transitions until `RedrawRequested`.
    buffer: InputBuffer,

    event_sender: Sender<PlatformEvent>,

    input_processor: InputProcessor,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens in `resumed()`.
    pub fn new(
        event_sender: Sender<PlatformEvent>,
        title: impl Into<String>,
        size: (u32, u32),
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            title: title.into(),
            size,
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the window closes.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends buffered key transitions to the core thread.
    ///
    /// A disconnected channel drops the events with a warning.
    fn flush_input_buffer(&mut self) {
        if let Some(batch) = self.buffer.drain() {
            let count = batch.len();
            trace!(target: "platform::input", "Flushing {} key events", count);

            if self.event_sender.send(PlatformEvent::Inputs(batch)).is_err() {
                warn!(
                    target: "platform::input",
                    "Channel disconnected, dropping {} key events",
                    count
                );
            }
        }
    }

    fn request_reload(&mut self) {
        self.flush_input_buffer();
        info!(target: "platform", "Hot reload requested");
        if self.event_sender.send(PlatformEvent::ReloadRequested).is_err() {
            warn!(target: "platform", "Channel disconnected, reload request dropped");
        }
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        let _ = self.event_sender.send(PlatformEvent::WindowClosed);
        event_loop.exit();
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on first resume.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.size.0, self.size.1));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.close(event_loop);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close(event_loop);
            }

            WindowEvent::Focused(false) => {
                for event in self.input_processor.release_all() {
                    self.buffer.push(event);
                }
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match self.input_processor.process_key_event(key_event) {
                    Some(KeyAction::Input(event)) => self.buffer.push(event),
                    Some(KeyAction::Reload) => self.request_reload(),
                    Some(KeyAction::Close) => {
                        info!(target: "platform", "Escape pressed, closing");
                        self.close(event_loop);
                    }
                    None => trace!(target: "platform::input", "Key ignored"),
                }
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode};
    use crossbeam_channel::unbounded;

    fn platform(tx: Sender<PlatformEvent>) -> Platform {
        Platform::new(tx, "test", (800, 600))
    }

    #[test]
    fn platform_creation() {
        let (tx, _rx) = unbounded();
        let platform = platform(tx);
        assert!(platform.window().is_none(), "Window should be created lazily");
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (tx, rx) = unbounded();
        let mut platform = platform(tx);

        platform.flush_input_buffer();

        assert!(rx.try_recv().is_err(), "No events should be sent for empty buffer");
    }

    #[test]
    fn flush_sends_buffered_events() {
        let (tx, rx) = unbounded();
        let mut platform = platform(tx);

        platform.buffer.push(InputEvent::KeyDown(KeyCode::Space));
        platform.flush_input_buffer();

        assert_eq!(
            rx.try_recv(),
            Ok(PlatformEvent::Inputs(vec![InputEvent::KeyDown(KeyCode::Space)]))
        );
    }

    #[test]
    fn reload_request_follows_buffered_keys() {
        let (tx, rx) = unbounded();
        let mut platform = platform(tx);

        platform.buffer.push(InputEvent::KeyDown(KeyCode::ArrowRight));
        platform.request_reload();

        assert!(matches!(rx.try_recv(), Ok(PlatformEvent::Inputs(_))));
        assert_eq!(rx.try_recv(), Ok(PlatformEvent::ReloadRequested));
    }

    #[test]
    fn flush_handles_disconnected_channel() {
        let (tx, rx) = unbounded();
        let mut platform = platform(tx);

        platform.buffer.push(InputEvent::KeyDown(KeyCode::Space));
        drop(rx);

        platform.flush_input_buffer();
        platform.request_reload();
    }
}
