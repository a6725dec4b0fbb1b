//! Cooperative control loop.
//!
//! One iteration:
//!
//! ```text
//!  drain events ─▶ render glyph ─▶ tick ─▶ sleep (in slices, draining
//!                                                  events between slices)
//! ```
//!
//! Every event handler and every tick runs to completion on the control
//! thread.  Events that arrive during a tick (including a pump hold)
//! wait in the queue and are dispatched after it finishes.

use crate::events::{drain_from, EventQueue};

use super::ports::{Board, EventSink, LinkPort};
use super::service::Controller;

pub struct ControlLoop {
    controller: Controller,
    poll_ms: u32,
}

impl ControlLoop {
    pub fn new(controller: Controller) -> Self {
        let poll_ms = controller.config().event_poll_ms.max(1);
        Self {
            controller,
            poll_ms,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Dispatch every queued event.  Returns how many were handled.
    pub fn dispatch_pending(
        &mut self,
        queue: &EventQueue,
        hw: &mut impl Board,
        link: &mut impl LinkPort,
        sink: &mut impl EventSink,
    ) -> usize {
        let mut handled = 0;
        drain_from(queue, |event| {
            self.controller.handle_event(event, hw, link, sink);
            handled += 1;
        });
        handled
    }

    /// Run one loop iteration.
    pub fn run_once(
        &mut self,
        queue: &EventQueue,
        hw: &mut impl Board,
        link: &mut impl LinkPort,
        sink: &mut impl EventSink,
    ) {
        self.dispatch_pending(queue, hw, link, sink);
        self.controller.render(hw);
        if let Some(ms) = self.controller.tick(hw, link, sink) {
            self.sleep(ms, queue, hw, link, sink);
        }
    }

    /// Sleep `ms`, servicing the queue every `event_poll_ms`.
    fn sleep(
        &mut self,
        ms: u32,
        queue: &EventQueue,
        hw: &mut impl Board,
        link: &mut impl LinkPort,
        sink: &mut impl EventSink,
    ) {
        let mut remaining = ms;
        while remaining > 0 {
            let slice = remaining.min(self.poll_ms);
            hw.delay_ms(slice);
            remaining -= slice;
            self.dispatch_pending(queue, hw, link, sink);
        }
    }
}
