use std::cell::RefCell;
use std::rc::Rc;

use vizij_sm_inputs::{
    BridgeConfig, HostObject, MemoryStateMachine, PropertyTable, SharedStateMachine, SignalId,
    StateMachine, StateMachineInputs, Value,
};

fn vehicle() -> Rc<RefCell<MemoryStateMachine>> {
    Rc::new(RefCell::new(
        MemoryStateMachine::new("vehicle")
            .with_number("Throttle", 0.0)
            .with_boolean("Headlights", false)
            .with_trigger("Honk"),
    ))
}

fn bind(bridge: &mut StateMachineInputs, sm: &Rc<RefCell<MemoryStateMachine>>) {
    let shared: SharedStateMachine = sm.clone();
    bridge.bind_state_machine(Some(shared));
}

/// Host table as a UI layer would declare it: notifying properties named after
/// the inputs plus a signal for the trigger.
fn declared_bridge() -> (StateMachineInputs, SignalId) {
    let mut bridge = StateMachineInputs::new();
    let host = bridge.host_mut();
    host.declare_property("throttle", Value::Float(0.0), true);
    host.declare_property("headlights", Value::Bool(false), true);
    host.declare_property("label", Value::from("car"), true);
    let honk = host.declare_signal("honk");
    bridge.begin();
    bridge.complete_activation();
    (bridge, honk)
}

#[test]
fn host_writes_reach_the_machine_without_a_tick() {
    let sm = vehicle();
    let (mut bridge, _) = declared_bridge();
    bind(&mut bridge, &sm);

    assert!(bridge.host_write("throttle", Value::Float(0.75)));
    assert_eq!(sm.borrow().number(0), Some(0.75));

    assert!(bridge.host_write("headlights", Value::Bool(true)));
    assert_eq!(sm.borrow().boolean(1), Some(true));

    // unchanged write raises no notification
    assert!(!bridge.host_write("headlights", Value::Bool(true)));
    // properties without a matching input are stored but never routed
    assert!(bridge.host_write("label", Value::from("truck")));
    assert_eq!(bridge.host().read_property("label"), Some(Value::from("truck")));
}

#[test]
fn host_values_are_coerced_on_routing() {
    let sm = vehicle();
    let (mut bridge, _) = declared_bridge();
    bind(&mut bridge, &sm);

    bridge.host_write("throttle", Value::Int(1));
    assert_eq!(sm.borrow().number(0), Some(1.0));

    bridge.host_write("throttle", Value::Text("0.5".into()));
    assert_eq!(sm.borrow().number(0), Some(0.5));

    bridge.host_write("throttle", Value::Text("full".into()));
    assert_eq!(sm.borrow().number(0), Some(0.5));

    bridge.host_write("headlights", Value::Int(1));
    assert_eq!(sm.borrow().boolean(1), Some(true));
}

#[test]
fn trigger_signals_fire_the_matching_trigger() {
    let sm = vehicle();
    let (mut bridge, honk) = declared_bridge();
    bind(&mut bridge, &sm);

    assert!(bridge.router().connection(honk).unwrap().trigger);
    assert!(bridge.emit(honk));
    assert!(bridge.emit_named("honk"));
    assert_eq!(sm.borrow().fire_count("Honk"), 2);

    assert!(!bridge.emit_named("unknown"));
    assert!(!bridge.emit(SignalId(1_000)));
}

#[test]
fn rebinding_never_duplicates_connections() {
    let sm = vehicle();
    let (mut bridge, honk) = declared_bridge();
    bind(&mut bridge, &sm);
    let wired = bridge.router().len();
    bind(&mut bridge, &sm);
    bind(&mut bridge, &sm);

    assert_eq!(bridge.router().len(), wired);
    bridge.emit(honk);
    assert_eq!(sm.borrow().fire_count("Honk"), 1);
}

#[test]
fn rebinding_to_another_machine_drops_stale_wiring() {
    let sm = vehicle();
    let (mut bridge, honk) = declared_bridge();
    bind(&mut bridge, &sm);

    let other = Rc::new(RefCell::new(
        MemoryStateMachine::new("other").with_number("Throttle", 0.0),
    ));
    bind(&mut bridge, &other);

    assert!(!bridge.router().is_connected(honk));
    assert!(!bridge.emit(honk));
    assert_eq!(sm.borrow().fire_count("Honk"), 0);

    bridge.host_write("throttle", Value::Float(0.3));
    assert_eq!(other.borrow().number(0), Some(0.3));
    assert_eq!(sm.borrow().number(0), Some(0.0));

    bridge.bind_state_machine(None);
    assert!(bridge.router().is_empty());
}

#[test]
fn properties_declared_after_binding_need_rewire() {
    let sm = vehicle();
    let mut bridge = StateMachineInputs::new();
    bridge.complete_activation();
    bind(&mut bridge, &sm);

    bridge
        .host_mut()
        .declare_property("throttle", Value::Float(0.0), true);
    bridge.host_write("throttle", Value::Float(0.9));
    assert_eq!(sm.borrow().number(0), Some(0.0));

    bridge.rewire();
    bridge.host_write("throttle", Value::Float(0.8));
    assert_eq!(sm.borrow().number(0), Some(0.8));
}

#[test]
fn custom_changed_suffix_is_honoured() {
    let sm = vehicle();
    let config = BridgeConfig {
        changed_suffix: "_changed".into(),
        ..BridgeConfig::default()
    };
    let mut bridge =
        StateMachineInputs::with_host(PropertyTable::with_changed_suffix("_changed"), config);
    let signal = bridge
        .host_mut()
        .declare_property("throttle", Value::Float(0.0), true)
        .unwrap();
    assert_eq!(bridge.host().signal_name(signal), Some("throttle_changed"));

    bridge.complete_activation();
    bind(&mut bridge, &sm);
    bridge.host_write("throttle", Value::Float(0.6));
    assert_eq!(sm.borrow().number(0), Some(0.6));
}
