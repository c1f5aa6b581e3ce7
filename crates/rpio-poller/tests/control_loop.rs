//! Control loop behaviour against in-memory drivers

use std::sync::Arc;
use std::time::Duration;

use rpio_actuator::ActuatorController;
use rpio_condition::{ControlRules, Reach, RuleKind};
use rpio_core::{OutputPin, RawReading, Sample, SensorError};
use rpio_drivers::memory::{MemoryPin, PinProbe, ScriptedSensor};
use rpio_poller::{CycleError, SensorPoller};
use rpio_state_store::{SharedStateStore, StateStore};
use serde_json::json;
use tokio::sync::broadcast;

const OFF_HOT: &str = "temperature:gt:30:and";
const ON_COLD: &str = "temperature:lt:20:and";

struct Rig {
    poller: SensorPoller,
    sensor: ScriptedSensor,
    store: SharedStateStore,
    probes: Vec<PinProbe>,
}

fn rig(pins: &[(u32, bool)], off: &[&str], on: &[&str], off_first: bool) -> Rig {
    let mut outputs: Vec<Box<dyn OutputPin>> = Vec::new();
    let mut probes = Vec::new();
    for &(number, lit) in pins {
        let pin = if lit {
            MemoryPin::lit(number)
        } else {
            MemoryPin::new(number)
        };
        probes.push(pin.probe());
        outputs.push(Box::new(pin));
    }

    let store = Arc::new(StateStore::new(ActuatorController::new(outputs)));
    let rules = Arc::new(ControlRules::parse(off, on, off_first));
    let sensor = ScriptedSensor::new();
    let poller = SensorPoller::new(store.clone(), rules, sensor.clone()).unwrap();

    Rig {
        poller,
        sensor,
        store,
        probes,
    }
}

fn lit(probes: &[PinProbe]) -> Vec<bool> {
    probes.iter().map(PinProbe::is_lit).collect()
}

fn raw(value: serde_json::Value) -> RawReading {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_between_thresholds_leaves_outputs_alone() {
    let rig = rig(&[(17, true), (27, false)], &[OFF_HOT], &[ON_COLD], false);
    rig.sensor.push_sample(25.0, 50.0);

    let report = rig.poller.run_cycle().await.unwrap();

    assert_eq!(report.sample, Sample::new(25.0, 50.0));
    assert_eq!(
        report.evaluated,
        vec![(RuleKind::On, Reach::NotReached), (RuleKind::Off, Reach::NotReached)]
    );
    assert!(report.acted.is_none());
    assert_eq!(lit(&rig.probes), vec![true, false]);
}

#[tokio::test]
async fn test_hot_sample_turns_outputs_off() {
    let rig = rig(&[(17, true), (27, true)], &[OFF_HOT], &[ON_COLD], false);
    rig.sensor.push_sample(35.0, 50.0);

    let report = rig.poller.run_cycle().await.unwrap();

    assert_eq!(
        report.evaluated,
        vec![(RuleKind::On, Reach::NotReached), (RuleKind::Off, Reach::Reached)]
    );
    let (kind, transitions) = report.acted.unwrap();
    assert_eq!(kind, RuleKind::Off);
    assert_eq!(transitions.len(), 2);
    assert_eq!(lit(&rig.probes), vec![false, false]);
}

#[tokio::test]
async fn test_off_first_cold_sample_turns_outputs_on() {
    let rig = rig(&[(17, false)], &[OFF_HOT], &[ON_COLD], true);
    rig.sensor.push_sample(15.0, 50.0);

    let report = rig.poller.run_cycle().await.unwrap();

    assert_eq!(
        report.evaluated,
        vec![(RuleKind::Off, Reach::NotReached), (RuleKind::On, Reach::Reached)]
    );
    assert_eq!(report.acted.map(|(kind, _)| kind), Some(RuleKind::On));
    assert_eq!(lit(&rig.probes), vec![true]);
}

#[tokio::test]
async fn test_first_reached_rule_suppresses_the_other() {
    // Both rules reach at 25; ON is checked first
    let rig = rig(
        &[(17, false)],
        &["temperature:gt:20:and"],
        &["temperature:lt:30:and"],
        false,
    );
    rig.sensor.push_sample(25.0, 50.0);

    let report = rig.poller.run_cycle().await.unwrap();

    assert_eq!(report.evaluated, vec![(RuleKind::On, Reach::Reached)]);
    assert_eq!(lit(&rig.probes), vec![true]);
}

#[tokio::test]
async fn test_probes_are_averaged() {
    let rig = rig(&[(17, false)], &[OFF_HOT], &[ON_COLD], false);
    rig.sensor.push_readings(vec![
        ScriptedSensor::probe(20.0, 40.0),
        ScriptedSensor::probe(22.0, 60.0),
    ]);

    let report = rig.poller.run_cycle().await.unwrap();

    assert_eq!(report.sample, Sample::new(21.0, 50.0));
    assert_eq!(rig.store.snapshot().await.sample.temperature, 21.0);
}

#[tokio::test]
async fn test_repeated_cycles_do_not_rewrite_outputs() {
    let rig = rig(&[(17, false), (27, false)], &[OFF_HOT], &[ON_COLD], false);
    rig.sensor.push_sample(10.0, 50.0);
    rig.sensor.push_sample(11.0, 50.0);

    let first = rig.poller.run_cycle().await.unwrap();
    let second = rig.poller.run_cycle().await.unwrap();

    assert_eq!(first.acted.unwrap().1.len(), 2);
    let (kind, transitions) = second.acted.unwrap();
    assert_eq!(kind, RuleKind::On);
    assert!(transitions.is_empty());
    assert!(rig.probes.iter().all(|p| p.calls() == 1));
}

#[tokio::test]
async fn test_undefined_rule_falls_through() {
    let rig = rig(&[(17, true)], &[OFF_HOT], &["pressure:lt:20:and"], false);
    rig.sensor.push_sample(35.0, 50.0);

    let report = rig.poller.run_cycle().await.unwrap();

    assert_eq!(
        report.evaluated,
        vec![(RuleKind::On, Reach::Undefined), (RuleKind::Off, Reach::Reached)]
    );
    assert_eq!(lit(&rig.probes), vec![false]);
}

#[tokio::test]
async fn test_empty_read_keeps_previous_state() {
    let rig = rig(&[(17, false)], &[OFF_HOT], &[ON_COLD], false);
    rig.sensor.push_sample(10.0, 45.0);
    rig.sensor.push_readings(Vec::new());

    rig.poller.run_cycle().await.unwrap();
    let before = rig.store.snapshot().await;

    let result = rig.poller.run_cycle().await;

    assert!(matches!(result, Err(CycleError::Sample(_))));
    assert_eq!(rig.store.snapshot().await, before);
}

#[tokio::test]
async fn test_missing_humidity_skips_cycle() {
    let rig = rig(&[(17, false)], &[OFF_HOT], &[ON_COLD], false);
    rig.sensor
        .push_readings(vec![raw(json!({"Internal Temperature": "10.0"}))]);

    let result = rig.poller.run_cycle().await;

    assert!(matches!(result, Err(CycleError::Sample(_))));
    let snapshot = rig.store.snapshot().await;
    assert!(snapshot.sample.last_updated.is_none());
    assert_eq!(lit(&rig.probes), vec![false]);
}

#[tokio::test]
async fn test_sensor_failure_skips_cycle() {
    let rig = rig(&[(17, false)], &[OFF_HOT], &[ON_COLD], false);
    rig.sensor
        .push_failure(SensorError::Unavailable("no device".to_string()));
    rig.sensor.push_sample(10.0, 50.0);

    let result = rig.poller.run_cycle().await;
    assert!(matches!(result, Err(CycleError::Sensor(_))));
    assert!(rig.store.snapshot().await.sample.last_updated.is_none());

    // The next tick recovers
    rig.poller.run_cycle().await.unwrap();
    assert_eq!(lit(&rig.probes), vec![true]);
}

#[tokio::test]
async fn test_failing_output_reports_actuator_error() {
    let pins: Vec<Box<dyn OutputPin>> = vec![Box::new(MemoryPin::new(17).failing())];
    let store = Arc::new(StateStore::new(ActuatorController::new(pins)));
    let rules = Arc::new(ControlRules::parse(&[OFF_HOT], &[ON_COLD], false));
    let sensor = ScriptedSensor::new();
    sensor.push_sample(10.0, 50.0);
    let poller = SensorPoller::new(store.clone(), rules, sensor).unwrap();

    let result = poller.run_cycle().await;

    assert!(matches!(result, Err(CycleError::Actuator(_))));
    // The sample itself was still published
    assert_eq!(store.snapshot().await.sample.temperature, 10.0);
}

#[tokio::test]
async fn test_run_stops_on_shutdown() {
    let rig = rig(&[(17, false)], &[OFF_HOT], &[ON_COLD], false);
    rig.sensor.push_sample(10.0, 50.0);
    let sensor = rig.sensor.clone();
    let probes = rig.probes.clone();

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let poller = rig.poller.with_interval(Duration::from_millis(10));
    let handle = tokio::spawn(poller.run(shutdown_rx));

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown_tx.send(()).unwrap();

    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("poller did not stop")
        .unwrap();

    assert!(sensor.reads() >= 2);
    assert!(probes[0].is_lit());
}

#[tokio::test]
async fn test_run_stops_when_sender_dropped() {
    let rig = rig(&[(17, false)], &[OFF_HOT], &[ON_COLD], false);
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    drop(shutdown_tx);

    let poller = rig.poller.with_interval(Duration::from_secs(60));
    tokio::time::timeout(Duration::from_secs(2), poller.run(shutdown_rx))
        .await
        .expect("poller did not stop");

    assert_eq!(rig.sensor.reads(), 0);
}
