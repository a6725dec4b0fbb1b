//! Control loop scheduling, watering and button commands.

use plantvase::app::commands::AppCommand;
use plantvase::app::control_loop::ControlLoop;
use plantvase::app::events::AppEvent;
use plantvase::app::service::Controller;
use plantvase::config::{ControllerConfig, WateringTrigger};
use plantvase::events::{push_to, ControlEvent, EventQueue};
use plantvase::fsm::context::{Anomaly, SensorSample};
use plantvase::fsm::Mode;

use crate::mock_hw::{sample, MockBoard, MockLink, RecordingSink};

fn started(config: ControllerConfig, sink: &mut RecordingSink) -> ControlLoop {
    let mut c = Controller::new(config);
    c.start(sink);
    ControlLoop::new(c)
}

#[test]
fn start_reports_monitoring() {
    let mut sink = RecordingSink::new();
    let _ = started(ControllerConfig::default(), &mut sink);
    assert_eq!(sink.events, [AppEvent::Started(Mode::Monitoring)]);
}

#[test]
fn warm_monitoring_sleeps_in_poll_slices() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(60.0));
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let mut lp = started(ControllerConfig::default(), &mut sink);

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);

    assert_eq!(lp.controller().mode(), Mode::Monitoring);
    assert_eq!(hw.glyphs, ['M']);
    assert_eq!(hw.reads, 1);
    assert_eq!(hw.total_delay_ms(), 2_000);
    assert!(hw.delays.iter().all(|&d| d <= 50));
    assert!(hw.pump_log.is_empty());
}

#[test]
fn events_queued_while_sleeping_are_dispatched_before_next_tick() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(60.0));
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let mut lp = started(ControllerConfig::default(), &mut sink);

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    push_to(&queue, ControlEvent::Connected);
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);

    assert_eq!(lp.controller().mode(), Mode::Registering);
    assert_eq!(hw.glyphs, ['M', 'R']);
    assert_eq!(hw.reads, 1, "Registering does not sample");
}

#[test]
fn cold_sample_waters_once_then_returns_to_monitoring() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(10.0)).then(sample(60.0));
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let mut lp = started(ControllerConfig::default(), &mut sink);

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Watering);
    assert!(hw.pump_log.is_empty());

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Monitoring);
    assert_eq!(hw.pump_log, [true, false]);
    assert_eq!(hw.delayed_with_pump_on, 5_000);
    assert!(sink.events.contains(&AppEvent::Watered { duration_ms: 5_000 }));

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Monitoring);
    assert_eq!(hw.pump_log, [true, false]);
    assert_eq!(hw.glyphs, ['M', 'W', 'M']);
}

#[test]
fn events_raised_during_the_hold_wait_for_it() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(10.0)).then(sample(60.0));
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let mut lp = started(ControllerConfig::default(), &mut sink);

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    hw.inject_during_hold(
        &queue,
        vec![ControlEvent::Disconnected, ControlEvent::Connected],
    );
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);

    assert_eq!(hw.pump_log, [true, false]);
    assert_eq!(lp.controller().mode(), Mode::Monitoring);
    assert_eq!(queue.len(), 2);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::Anomaly(Anomaly::LostConnection(_)))),
        0
    );

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert!(queue.is_empty());
    assert_eq!(lp.controller().mode(), Mode::Registering);
}

#[test]
fn water_now_overrides_a_warm_reading() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(60.0));
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let mut lp = started(ControllerConfig::default(), &mut sink);

    push_to(&queue, ControlEvent::Command(AppCommand::WaterNow));
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Watering);

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(hw.pump_log, [true, false], "forced watering runs once");
}

#[test]
fn reservoir_budget_runs_out_and_refills() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(10.0));
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let config = ControllerConfig {
        watering_budget: Some(1),
        ..ControllerConfig::default()
    };
    let mut lp = started(config, &mut sink);

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(hw.pump_log, [true, false]);
    assert_eq!(lp.controller().waterings_left(), Some(0));

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Monitoring);
    assert!(sink.events.contains(&AppEvent::Anomaly(Anomaly::ReservoirEmpty)));
    assert_eq!(hw.pump_log, [true, false]);

    push_to(&queue, ControlEvent::Command(AppCommand::ReservoirRefilled));
    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().waterings_left(), Some(1));
    assert_eq!(lp.controller().mode(), Mode::Watering);
}

#[test]
fn snapshot_reports_the_latest_sample() {
    let queue = EventQueue::new();
    let mut hw = MockBoard::new(sample(60.0));
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let mut lp = started(ControllerConfig::default(), &mut sink);

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    push_to(&queue, ControlEvent::Command(AppCommand::LogSnapshot));
    lp.dispatch_pending(&queue, &mut hw, &mut link, &mut sink);

    assert!(sink.events.contains(&AppEvent::Snapshot(sample(60.0))));
}

#[test]
fn moisture_trigger_ignores_temperature() {
    let queue = EventQueue::new();
    let wet = SensorSample {
        moisture_raw: 800.0,
        ..sample(5.0)
    };
    let dry = SensorSample {
        moisture_raw: 120.0,
        ..sample(60.0)
    };
    let mut hw = MockBoard::new(wet).then(dry);
    let mut link = MockLink::up();
    let mut sink = RecordingSink::new();
    let config = ControllerConfig {
        watering_trigger: WateringTrigger::Moisture,
        moisture_threshold: 300.0,
        ..ControllerConfig::default()
    };
    let mut lp = started(config, &mut sink);

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Monitoring);

    lp.run_once(&queue, &mut hw, &mut link, &mut sink);
    assert_eq!(lp.controller().mode(), Mode::Watering);
}
