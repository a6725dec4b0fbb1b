//! Concrete mode handler functions and table builder.
//!
//! Each mode is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!                 ┌──[connect]──────────────────────────────┐
//!                 ▼                                         │
//!   REGISTERING ──[OK]──▶ COMMUNICATING ──[burst]──▶ WAITING
//!        ▲                                                  │
//!        │ [pending]                                        │
//!        │                                                  │
//!   MONITORING ──[needs water]──▶ WATERING ──[hold done]──┐ │
//!        ▲  ▲                                             │ │
//!        │  └─────────────────────────────────────────────┘ │
//!        │                                                  │
//!   Any mode ──[disconnect]──▶ MONITORING ◀─────────────────┘
//! ```

use log::{debug, info, warn};

use super::context::{Action, Anomaly, FsmContext};
use super::{Mode, ModeDescriptor};
use crate::app::commands::AppCommand;
use crate::events::ControlEvent;
use crate::link::framing::Record;
use crate::link::handshake::{telemetry_burst, HandshakeToken};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static mode table.  Called once at startup.
pub fn build_mode_table() -> [ModeDescriptor; Mode::COUNT] {
    [
        // Index 0: Registering
        ModeDescriptor {
            mode: Mode::Registering,
            name: "Registering",
            samples: false,
            on_enter: Some(registering_enter),
            on_tick: idle_tick,
            on_timer: None,
        },
        // Index 1: Monitoring
        ModeDescriptor {
            mode: Mode::Monitoring,
            name: "Monitoring",
            samples: true,
            on_enter: None,
            on_tick: monitoring_tick,
            on_timer: None,
        },
        // Index 2: Communicating
        ModeDescriptor {
            mode: Mode::Communicating,
            name: "Communicating",
            samples: true,
            on_enter: Some(communicating_enter),
            on_tick: communicating_tick,
            on_timer: None,
        },
        // Index 3: Watering
        ModeDescriptor {
            mode: Mode::Watering,
            name: "Watering",
            samples: false,
            on_enter: None,
            on_tick: watering_tick,
            on_timer: Some(watering_elapsed),
        },
        // Index 4: Waiting
        ModeDescriptor {
            mode: Mode::Waiting,
            name: "Waiting",
            samples: false,
            on_enter: None,
            on_tick: idle_tick,
            on_timer: None,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  REGISTERING / WAITING: nothing to actuate
// ═══════════════════════════════════════════════════════════════════════════

fn registering_enter(ctx: &mut FsmContext) {
    ctx.link.pending_registration = false;
    info!("REGISTERING: awaiting whoareyou");
}

fn idle_tick(ctx: &mut FsmContext) -> Option<Mode> {
    ctx.emit(Action::Sleep {
        ms: ctx.config.idle_interval_ms,
    });
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  MONITORING: sample, then decide
// ═══════════════════════════════════════════════════════════════════════════

fn monitoring_tick(ctx: &mut FsmContext) -> Option<Mode> {
    // A deferred connect always wins over a watering decision.
    if ctx.link.pending_registration {
        return Some(Mode::Registering);
    }

    if ctx.force_watering || ctx.needs_water() {
        if ctx.has_water() {
            return Some(Mode::Watering);
        }
        warn!("MONITORING: watering needed but reservoir budget exhausted");
        ctx.force_watering = false;
        ctx.emit(Action::Report(Anomaly::ReservoirEmpty));
    }

    ctx.emit(Action::Sleep {
        ms: ctx.config.sample_interval_ms,
    });
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  COMMUNICATING: one telemetry burst
// ═══════════════════════════════════════════════════════════════════════════

fn communicating_enter(ctx: &mut FsmContext) {
    ctx.link.pending_registration = false;
    info!("COMMUNICATING: registration accepted");
}

fn communicating_tick(ctx: &mut FsmContext) -> Option<Mode> {
    let sample = ctx.sample.unwrap_or_default();
    for token in telemetry_burst(&sample) {
        ctx.emit(Action::Send(token));
    }
    ctx.emit(Action::Sleep {
        ms: ctx.config.idle_interval_ms,
    });
    Some(Mode::Waiting)
}

// ═══════════════════════════════════════════════════════════════════════════
//  WATERING: pump on, hold, pump off
// ═══════════════════════════════════════════════════════════════════════════

fn watering_tick(ctx: &mut FsmContext) -> Option<Mode> {
    info!("WATERING: pump on for {} ms", ctx.config.pump_duration_ms);
    ctx.emit(Action::Pump(true));
    ctx.emit(Action::Hold {
        ms: ctx.config.pump_duration_ms,
    });
    None
}

fn watering_elapsed(ctx: &mut FsmContext) -> Option<Mode> {
    ctx.emit(Action::Pump(false));
    ctx.force_watering = false;
    if let Some(left) = ctx.waterings_left.as_mut() {
        *left = left.saturating_sub(1);
        info!("WATERING: done, {} waterings left", left);
    }
    Some(Mode::Monitoring)
}

// ═══════════════════════════════════════════════════════════════════════════
//  Events (link and button): valid in every mode
// ═══════════════════════════════════════════════════════════════════════════

/// Dispatch one queued event against the current mode.
pub fn on_event(mode: Mode, event: ControlEvent, ctx: &mut FsmContext) -> Option<Mode> {
    match event {
        ControlEvent::Connected => on_connect(mode, ctx),
        ControlEvent::Disconnected => on_disconnect(mode, ctx),
        ControlEvent::Data(record) => on_link_data(mode, record, ctx),
        ControlEvent::Command(cmd) => {
            on_command(cmd, ctx);
            None
        }
    }
}

fn on_connect(mode: Mode, ctx: &mut FsmContext) -> Option<Mode> {
    ctx.link.connected = true;
    if ctx.link.pending_registration {
        debug!("connect: registration already pending");
        return None;
    }
    if mode.is_busy() {
        info!("connect: busy in {:?}, registration deferred", mode);
        ctx.link.pending_registration = true;
        return None;
    }
    Some(Mode::Registering)
}

fn on_disconnect(mode: Mode, ctx: &mut FsmContext) -> Option<Mode> {
    ctx.link.connected = false;
    ctx.link.pending_registration = false;
    if mode.is_busy() {
        ctx.emit(Action::Report(Anomaly::LostConnection(mode)));
    }
    Some(Mode::Monitoring)
}

fn on_link_data(mode: Mode, record: Record, ctx: &mut FsmContext) -> Option<Mode> {
    let registering = mode == Mode::Registering;
    let awaiting = ctx.link.pending_registration && mode.is_idle();
    let token = HandshakeToken::decode(&record);

    // Outside Registering only the session tokens reach the handshake layer.
    if !(registering || (awaiting && token.is_session_control())) {
        ctx.emit(Action::Report(Anomaly::SpuriousData(record)));
        return None;
    }

    match token {
        HandshakeToken::WhoAreYou => {
            ctx.emit(Action::Send(HandshakeToken::announce(&ctx.config.identity)));
            None
        }
        HandshakeToken::Ok => Some(Mode::Communicating),
        _ => {
            ctx.emit(Action::Report(Anomaly::Protocol(record)));
            None
        }
    }
}

fn on_command(cmd: AppCommand, ctx: &mut FsmContext) {
    match cmd {
        AppCommand::WaterNow => {
            info!("command: watering requested");
            ctx.force_watering = true;
        }
        AppCommand::LogSnapshot => ctx.emit(Action::LogSnapshot),
        AppCommand::ReservoirRefilled => {
            info!("command: reservoir refilled");
            ctx.refill();
        }
    }
}
