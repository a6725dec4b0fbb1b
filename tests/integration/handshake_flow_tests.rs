//! End-to-end pairing and telemetry sessions through the control loop.
//!
//! Inbound records are queued the way the link I/O task queues them;
//! outbound records are captured by the mock link (or by the real
//! `QueuedLink` where framing matters).

use core::sync::atomic::{AtomicBool, Ordering};

use plantvase::app::control_loop::ControlLoop;
use plantvase::app::events::AppEvent;
use plantvase::app::service::Controller;
use plantvase::config::{ControllerConfig, Delimiter};
use plantvase::events::{push_to, ControlEvent, EventQueue};
use plantvase::fsm::context::Anomaly;
use plantvase::fsm::Mode;
use plantvase::io_task::{QueuedLink, TxChannel};
use plantvase::link::bridge::LinkBridge;
use plantvase::link::framing::Record;

use crate::mock_hw::{sample, MockBoard, MockLink, RecordingSink};

fn data(text: &str) -> ControlEvent {
    let mut r = Record::new();
    r.push_str(text).unwrap();
    ControlEvent::Data(r)
}

fn started(config: ControllerConfig, sink: &mut RecordingSink) -> ControlLoop {
    let mut c = Controller::new(config);
    c.start(sink);
    ControlLoop::new(c)
}

#[test]
fn full_session_registers_then_sends_one_burst() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(60.0));
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let mut lp = started(ControllerConfig::default(), &mut sink);

    push_to(&queue, ControlEvent::Connected);
    push_to(&queue, data("whoareyou"));
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Registering);
    assert_eq!(link.sent, ["whoiam:vase"]);

    push_to(&queue, data("OK"));
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Waiting);
    assert_eq!(
        link.sent[1..],
        ["temperature:60", "light:120", "moisture:512", "EOS"]
    );
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::TelemetrySent(_))),
        1
    );

    // Waiting never sends a second burst on its own.
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Waiting);
    assert_eq!(link.sent.len(), 5);

    push_to(&queue, ControlEvent::Disconnected);
    lp.dispatch_pending(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Monitoring);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::Anomaly(Anomaly::LostConnection(_)))),
        0
    );
}

#[test]
fn connect_during_watering_registers_after_the_hold() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(10.0));
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let mut lp = started(ControllerConfig::default(), &mut sink);

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Watering);

    push_to(&queue, ControlEvent::Connected);
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(hw.pump_log, [true, false]);
    assert_eq!(lp.controller().mode(), Mode::Monitoring);
    assert!(lp.controller().link_state().pending_registration);

    // Still cold, but the pending registration wins.
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Registering);
    assert!(!lp.controller().link_state().pending_registration);
    assert_eq!(hw.pump_log, [true, false]);
}

#[test]
fn second_connect_while_pending_is_ignored() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(10.0));
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let mut lp = started(ControllerConfig::default(), &mut sink);

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    push_to(&queue, ControlEvent::Connected);
    push_to(&queue, ControlEvent::Connected);
    lp.dispatch_pending(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Watering);
    assert!(lp.controller().link_state().pending_registration);
}

#[test]
fn disconnect_mid_registration_discards_the_session() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(60.0));
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let mut lp = started(ControllerConfig::default(), &mut sink);

    push_to(&queue, ControlEvent::Connected);
    push_to(&queue, data("whoareyou"));
    push_to(&queue, ControlEvent::Disconnected);
    lp.dispatch_pending(&queue, &mut hw, &mut link, &mut sink);

    assert_eq!(lp.controller().mode(), Mode::Monitoring);
    assert!(sink.events.contains(&AppEvent::Anomaly(Anomaly::LostConnection(
        Mode::Registering
    ))));

    // A late OK must not resurrect the session.
    push_to(&queue, data("OK"));
    lp.dispatch_pending(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Monitoring);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::Anomaly(Anomaly::SpuriousData(_)))),
        1
    );
}

#[test]
fn unknown_token_keeps_registration_open() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(60.0));
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let mut lp = started(ControllerConfig::default(), &mut sink);

    push_to(&queue, ControlEvent::Connected);
    push_to(&queue, data("hello"));
    lp.dispatch_pending(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Registering);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::Anomaly(Anomaly::Protocol(_)))),
        1
    );

    push_to(&queue, data("whoareyou"));
    push_to(&queue, data("OK"));
    lp.dispatch_pending(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Communicating);
    assert_eq!(link.sent, ["whoiam:vase"]);
}

#[test]
fn burst_over_a_dead_link_still_reaches_waiting() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(60.0));
    let mut link = MockLink::down();
    let mut sink = RecordingSink::new();
    let mut lp = started(ControllerConfig::default(), &mut sink);

    push_to(&queue, ControlEvent::Connected);
    push_to(&queue, data("OK"));
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Waiting);
    assert_eq!(link.failures, 4);
}

#[test]
fn newline_link_round_trip_through_bridge_and_queued_link() {
    let mut config = ControllerConfig::default();
    config.delimiter = Delimiter::NewLine;
    config.identity.clear();
    config.identity.push_str("fern").unwrap();

    let queue = EventQueue::new();
    let tx = TxChannel::new();
    let up = AtomicBool::new(true);
    let mut bridge = LinkBridge::new(Delimiter::NewLine);
    let mut link = QueuedLink::with(&tx, &up, Delimiter::NewLine);
    let mut hw = MockBoard::new(sample(60.0));
    let mut sink = RecordingSink::new();
    let mut lp = started(config, &mut sink);

    bridge.on_link_state(true, &queue);
    bridge.on_rx(b"whoare", &queue);
    bridge.on_rx(b"you\r\nOK\r\n", &queue);
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);

    let mut wire = Vec::new();
    while let Ok(record) = tx.try_receive() {
        wire.push(record.as_str().to_owned());
    }
    assert_eq!(
        wire,
        [
            "whoiam:fern\n",
            "temperature:60\n",
            "light:120\n",
            "moisture:512\n",
            "EOS\n"
        ]
    );
    assert_eq!(lp.controller().mode(), Mode::Waiting);
    assert!(up.load(Ordering::Relaxed));
}

#[test]
fn peer_water_request_waters_after_the_session() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(60.0));
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let mut bridge = LinkBridge::new(Delimiter::Dollar);
    let mut lp = started(ControllerConfig::default(), &mut sink);

    bridge.on_link_state(true, &queue);
    bridge.on_rx(b"whoareyou$OK$water$", &queue);
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Waiting);
    assert!(hw.pump_log.is_empty());
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::Anomaly(_))),
        0
    );

    bridge.on_link_state(false, &queue);
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Watering);

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(hw.pump_log, [true, false]);
    assert_eq!(lp.controller().mode(), Mode::Monitoring);
}
