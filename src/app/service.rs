//! Controller service: the hexagonal core.
//!
//! [`Controller`] owns the mode machine and its context.  It feeds
//! inputs to [`Fsm::step`], then executes the returned actions against
//! port traits injected at call sites, making the whole service testable
//! with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       Controller       │
//!    PumpPort ◀── │   Fsm · FsmContext     │ ──▶ LinkPort
//!                 └────────────────────────┘
//! ```

use core::fmt::Write as _;

use log::{info, warn};

use crate::config::ControllerConfig;
use crate::events::ControlEvent;
use crate::fsm::context::{Action, FsmContext, LinkState, SensorSample};
use crate::fsm::states::build_mode_table;
use crate::fsm::{Fsm, Input, Mode, Step};
use crate::link::framing::Record;
use crate::link::handshake::HandshakeToken;

use super::events::AppEvent;
use super::ports::{ClockPort, EventSink, LinkPort, PumpPort, SensorPort, StatusIndicator};

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

/// The controller orchestrates all domain logic.
pub struct Controller {
    fsm: Fsm,
    ctx: FsmContext,
}

impl Controller {
    /// Construct the controller from configuration.
    ///
    /// Does **not** start the FSM. Call [`start`](Self::start) next.
    pub fn new(config: ControllerConfig) -> Self {
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_mode_table(), Mode::Monitoring);
        Self { fsm, ctx }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in its initial mode (Monitoring).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_mode()));
        info!("Controller started in {:?}", self.fsm.current_mode());
    }

    // ── Per-step orchestration ────────────────────────────────

    /// Render the current mode glyph.
    pub fn render(&self, display: &mut impl StatusIndicator) {
        display.show(self.fsm.current_mode().glyph());
    }

    /// Run one control step.  Returns the sleep the step asked for.
    ///
    /// A Watering step blocks for the whole pump hold and returns with
    /// the pump off and the mode back at Monitoring.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + PumpPort + ClockPort),
        link: &mut impl LinkPort,
        sink: &mut impl EventSink,
    ) -> Option<u32> {
        if self.fsm.samples() {
            self.ctx.sample = Some(hw.read());
        }
        let step = self.fsm.step(Input::Tick, &mut self.ctx);
        self.apply(step, hw, link, sink)
    }

    /// Dispatch one queued event.  Runs to completion.
    pub fn handle_event(
        &mut self,
        event: ControlEvent,
        hw: &mut (impl PumpPort + ClockPort),
        link: &mut impl LinkPort,
        sink: &mut impl EventSink,
    ) {
        let step = self.fsm.step(Input::Event(event), &mut self.ctx);
        // Event handlers never request a sleep.
        let _ = self.apply(step, hw, link, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.fsm.current_mode()
    }

    pub fn link_state(&self) -> LinkState {
        self.ctx.link
    }

    pub fn last_sample(&self) -> Option<SensorSample> {
        self.ctx.sample
    }

    pub fn waterings_left(&self) -> Option<u32> {
        self.ctx.waterings_left
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply(
        &mut self,
        step: Step,
        hw: &mut (impl PumpPort + ClockPort),
        link: &mut impl LinkPort,
        sink: &mut impl EventSink,
    ) -> Option<u32> {
        if step.changed() {
            sink.emit(&AppEvent::ModeChanged {
                from: step.from,
                to: step.to,
            });
        }

        let mut sleep = None;
        for action in step.actions {
            match action {
                Action::Send(token) => self.send(&token, link, sink),
                Action::Pump(on) => hw.set_pump(on),
                Action::Hold { ms } => {
                    hw.delay_ms(ms);
                    let done = self.fsm.step(Input::HoldElapsed, &mut self.ctx);
                    if let Some(ms) = self.apply(done, hw, link, sink) {
                        sleep = Some(ms);
                    }
                    sink.emit(&AppEvent::Watered { duration_ms: ms });
                }
                Action::Sleep { ms } => sleep = Some(ms),
                Action::Report(anomaly) => sink.emit(&AppEvent::Anomaly(anomaly)),
                Action::LogSnapshot => {
                    sink.emit(&AppEvent::Snapshot(self.ctx.sample.unwrap_or_default()));
                }
            }
        }
        sleep
    }

    fn send(&self, token: &HandshakeToken, link: &mut impl LinkPort, sink: &mut impl EventSink) {
        let mut text = Record::new();
        if write!(text, "{token}").is_err() {
            warn!("link: token too long to send: {:?}", token);
            return;
        }
        if let Err(e) = link.send(&text) {
            warn!("link: send '{}' failed: {}", text, e);
        }
        if *token == HandshakeToken::EndOfStream {
            sink.emit(&AppEvent::TelemetrySent(self.ctx.sample.unwrap_or_default()));
        }
    }
}
