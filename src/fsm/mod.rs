//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  ModeTable                                                       │
//! │  ┌───────────────┬─────────┬──────────────────┬────────────────┐ │
//! │  │ Mode          │ samples │ on_tick          │ on_timer       │ │
//! │  ├───────────────┼─────────┼──────────────────┼────────────────┤ │
//! │  │ Registering   │ no      │ fn(ctx)->Option  │ -              │ │
//! │  │ Monitoring    │ yes     │ fn(ctx)->Option  │ -              │ │
//! │  │ Communicating │ yes     │ fn(ctx)->Option  │ -              │ │
//! │  │ Watering      │ no      │ fn(ctx)->Option  │ fn(ctx)->Option│ │
//! │  │ Waiting       │ no      │ fn(ctx)->Option  │ -              │ │
//! │  └───────────────┴─────────┴──────────────────┴────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Fsm::step`] is the single transition function
//! `(Mode, Input) -> (Mode, [Action])`.  Ticks go to the current row's
//! `on_tick`, a finished hold goes to its `on_timer`, and link or button
//! events go to [`states::on_event`].  Handlers never perform I/O; they
//! queue [`Action`](context::Action)s that the controller executes.

pub mod context;
pub mod states;

use context::{Actions, FsmContext};
use log::{info, warn};

use crate::events::ControlEvent;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Operating modes.  Must stay in sync with [`states::build_mode_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    Registering = 0,
    Monitoring = 1,
    Communicating = 2,
    Watering = 3,
    Waiting = 4,
}

impl Mode {
    /// Total number of modes, used to size the table array.
    pub const COUNT: usize = 5;

    pub const ALL: [Mode; Mode::COUNT] = [
        Self::Registering,
        Self::Monitoring,
        Self::Communicating,
        Self::Watering,
        Self::Waiting,
    ];

    /// Convert an index back to `Mode`.  Panics on out-of-range in debug
    /// builds; returns `Monitoring` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Registering,
            1 => Self::Monitoring,
            2 => Self::Communicating,
            3 => Self::Watering,
            4 => Self::Waiting,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::Monitoring
            }
        }
    }

    /// Status display glyph.
    pub const fn glyph(self) -> char {
        match self {
            Self::Registering => 'R',
            Self::Monitoring => 'M',
            Self::Communicating => 'C',
            Self::Watering => 'W',
            Self::Waiting => 'A',
        }
    }

    /// Modes that cannot accept a new session.
    pub const fn is_busy(self) -> bool {
        matches!(
            self,
            Self::Registering | Self::Communicating | Self::Watering
        )
    }

    /// Modes where a pending registration may be served.
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Monitoring | Self::Waiting)
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Runs once when a mode is entered.
pub type ModeActionFn = fn(&mut FsmContext);

/// Per-tick (or per-timer) handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type ModeUpdateFn = fn(&mut FsmContext) -> Option<Mode>;

// ---------------------------------------------------------------------------
// Mode descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single mode.
/// Stored in a fixed-size array: no heap, no `dyn`.
pub struct ModeDescriptor {
    pub mode: Mode,
    pub name: &'static str,
    /// Take a fresh sensor sample before `on_tick`.
    pub samples: bool,
    pub on_enter: Option<ModeActionFn>,
    pub on_tick: ModeUpdateFn,
    /// Completion of a `Hold` requested by this mode.
    pub on_timer: Option<ModeUpdateFn>,
}

// ---------------------------------------------------------------------------
// Inputs and step result
// ---------------------------------------------------------------------------

/// Everything that can drive the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// One control-loop step.
    Tick,
    /// A `Hold` requested by the current mode has finished.
    HoldElapsed,
    /// A queued link or button event.
    Event(ControlEvent),
}

/// Outcome of one [`Fsm::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub from: Mode,
    pub to: Mode,
    pub actions: Actions,
}

impl Step {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `Mode as usize`.
    table: [ModeDescriptor; Mode::COUNT],
    /// Index of the currently active mode.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given mode table, starting in `initial`.
    pub fn new(table: [ModeDescriptor; Mode::COUNT], initial: Mode) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting mode.
    /// Call once after construction, before the first step.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in mode: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Apply one input and return the resulting transition and actions.
    pub fn step(&mut self, input: Input, ctx: &mut FsmContext) -> Step {
        let from = self.current_mode();

        let next = match input {
            Input::Tick => (self.table[self.current].on_tick)(ctx),
            Input::HoldElapsed => match self.table[self.current].on_timer {
                Some(on_timer) => on_timer(ctx),
                None => {
                    warn!(
                        "FSM: hold elapsed in {}, ignored",
                        self.table[self.current].name
                    );
                    None
                }
            },
            Input::Event(event) => states::on_event(from, event, ctx),
        };

        if let Some(next) = next {
            self.transition(next, ctx);
        }

        Step {
            from,
            to: self.current_mode(),
            actions: ctx.take_actions(),
        }
    }

    /// Force an immediate transition, bypassing the handlers' guards.
    pub fn force_transition(&mut self, next: Mode, ctx: &mut FsmContext) {
        self.transition(next, ctx);
    }

    /// The current mode.
    pub fn current_mode(&self) -> Mode {
        self.table[self.current].mode
    }

    /// Whether the current mode samples sensors before its tick.
    pub fn samples(&self) -> bool {
        self.table[self.current].samples
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: Mode, ctx: &mut FsmContext) {
        let next_idx = next as usize;
        if next_idx == self.current {
            return;
        }

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
