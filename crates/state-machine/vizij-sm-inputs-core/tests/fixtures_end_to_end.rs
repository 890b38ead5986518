use std::cell::RefCell;
use std::rc::Rc;

use vizij_sm_inputs::{
    BridgeConfig, HostObject, InputKind, InputListing, MemoryStateMachine, PropertyTable,
    SharedStateMachine, StateMachine, StateMachineInputs, Value,
};
use vizij_test_fixtures::{configs, state_machines};

fn load(name: &str) -> Rc<RefCell<MemoryStateMachine>> {
    let sm: MemoryStateMachine = state_machines::load(name).expect("state machine fixture");
    Rc::new(RefCell::new(sm))
}

fn listing(name: &str, kind: InputKind) -> InputListing {
    InputListing {
        name: name.to_string(),
        kind,
    }
}

#[test]
fn character_scenario() {
    let sm = load("character");
    let mut bridge = StateMachineInputs::new();

    let notifications = Rc::new(RefCell::new(Vec::new()));
    let sink = notifications.clone();
    bridge.on_inputs_changed(move |l| sink.borrow_mut().push(l.to_vec()));

    bridge.begin();
    let shared: SharedStateMachine = sm.clone();
    bridge.bind_state_machine(Some(shared));
    assert!(notifications.borrow().is_empty());
    bridge.complete_activation();

    let expected = vec![
        listing("is_Jumping", InputKind::Boolean),
        listing("speed", InputKind::Number),
        listing("jump", InputKind::Trigger),
    ];
    assert_eq!(bridge.inputs(), expected);
    assert_eq!(*notifications.borrow(), vec![Vec::new(), expected.clone()]);

    bridge.set_value("speed", Value::Float(3.5));
    assert_eq!(bridge.get_value("SPEED"), Some(Value::Float(3.5)));

    bridge.fire_trigger("jump");
    assert_eq!(sm.borrow().fire_count("Jump"), 1);

    let json = bridge.inputs_json().expect("listing serializes");
    assert_eq!(
        json,
        serde_json::json!([
            { "text": "is_Jumping", "type": "Boolean" },
            { "text": "speed", "type": "Number" },
            { "text": "jump", "type": "Trigger" }
        ])
    );
}

#[test]
fn rebind_to_empty_fixture_notifies_twice() {
    let mut bridge = StateMachineInputs::new();
    bridge.complete_activation();
    let character: SharedStateMachine = load("character");
    bridge.bind_state_machine(Some(character));
    let before = bridge.revision();

    let sizes = Rc::new(RefCell::new(Vec::new()));
    let sink = sizes.clone();
    bridge.on_inputs_changed(move |l| sink.borrow_mut().push(l.len()));

    let empty: SharedStateMachine = load("empty");
    bridge.bind_state_machine(Some(empty));

    assert_eq!(*sizes.borrow(), vec![0, 0]);
    assert_eq!(bridge.revision(), before + 1);
    assert_eq!(bridge.get_value("speed"), None);
}

#[test]
fn messy_names_are_skipped_or_cleaned() {
    let sm = load("messy-names");
    let mut bridge = StateMachineInputs::new();
    bridge.complete_activation();
    let shared: SharedStateMachine = sm.clone();
    bridge.bind_state_machine(Some(shared));

    assert_eq!(
        bridge.inputs(),
        vec![
            listing("blend_Amount", InputKind::Number),
            listing("cash$", InputKind::Number),
        ]
    );
    assert_eq!(bridge.get_value("BLEND_AMOUNT"), Some(Value::Float(0.25)));
    assert_eq!(bridge.get_value("3d_offset"), None);
    assert_eq!(bridge.get_value("tint"), None);

    bridge.set_value("Cash$", Value::Int(7));
    let index = sm.borrow().index_of("cash$").unwrap();
    assert_eq!(sm.borrow().number(index), Some(7.0));
}

#[test]
fn last_wins_config_from_fixture() {
    let text = configs::json("last-wins").expect("config fixture");
    let config = BridgeConfig::from_json(&text).expect("config parses");

    let sm = load("messy-names");
    let mut bridge = StateMachineInputs::with_host(PropertyTable::new(), config);
    bridge.complete_activation();
    let shared: SharedStateMachine = sm.clone();
    bridge.bind_state_machine(Some(shared));

    let kinds: Vec<_> = bridge.inputs().into_iter().map(|l| l.kind).collect();
    assert_eq!(kinds, vec![InputKind::Boolean, InputKind::Number]);
    assert_eq!(bridge.get_value("blend_amount"), Some(Value::Bool(true)));
}

#[test]
fn vehicle_fixture_drives_host_properties_both_ways() {
    let sm = load("vehicle");
    let mut bridge = StateMachineInputs::new();
    bridge
        .host_mut()
        .declare_property("throttle", Value::Float(0.0), true);
    bridge.complete_activation();
    let shared: SharedStateMachine = sm.clone();
    bridge.bind_state_machine(Some(shared));

    // host -> machine
    bridge.host_write("throttle", Value::Float(0.4));
    assert_eq!(bridge.get_value("throttle"), Some(Value::Float(0.4)));

    // machine -> host
    sm.borrow_mut().set_number(0, 0.9);
    let handle = bridge.listen_to("Throttle");
    assert_eq!(handle.value(), Some(Value::Float(0.9)));
    let report = bridge.tick();
    assert_eq!(report.host_writes, 1);
    assert_eq!(
        bridge.host().read_property("throttle"),
        Some(Value::Float(0.9))
    );
}
