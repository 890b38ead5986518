//! StateMachineInputs: the host-facing facade.
//!
//! Lifecycle:
//! - `begin()` / `complete_activation()`: nothing is registered before activation,
//!   even when a state machine is already bound
//! - `bind_state_machine(..)`: replaces the instance; registry, listener handles
//!   and router wiring are rebuilt synchronously
//! - `tick()`: once per host frame, after the engine advanced
//!
//! All access is silent on failure: inactive, unbound, unresolved or mistyped
//! calls return `None` or do nothing.

use std::fmt;

use log::{debug, trace};

use crate::coercion;
use crate::config::BridgeConfig;
use crate::host::{HostObject, PropertyTable, WriteOrigin};
use crate::ids::SignalId;
use crate::listeners::{DynamicPropertyHub, ListenerHandle};
use crate::machine::{read_input, InputKind, SharedStateMachine, StateMachine};
use crate::names::NameNormalizer;
use crate::registry::{InputDescriptor, InputListing, InputRegistry};
use crate::router::ChangeRouter;
use crate::sync::{self, InputSnapshot, SyncReport};
use crate::Value;

pub struct StateMachineInputs<H: HostObject = PropertyTable> {
    config: BridgeConfig,
    names: NameNormalizer,
    active: bool,
    machine: Option<SharedStateMachine>,
    registry: InputRegistry,
    hub: DynamicPropertyHub,
    router: ChangeRouter,
    host: H,
}

impl<H: HostObject + fmt::Debug> fmt::Debug for StateMachineInputs<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachineInputs")
            .field("active", &self.active)
            .field("bound", &self.machine.is_some())
            .field("registry", &self.registry)
            .field("listeners", &self.hub)
            .field("router", &self.router)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl StateMachineInputs<PropertyTable> {
    /// Bridge over an empty [`PropertyTable`] with the default config.
    pub fn new() -> Self {
        Self::with_host(PropertyTable::new(), BridgeConfig::default())
    }
}

impl Default for StateMachineInputs<PropertyTable> {
    fn default() -> Self {
        Self::new()
    }
}

/// Current value of `name` if it resolves to a Number/Boolean input.
fn value_of(registry: &InputRegistry, machine: &dyn StateMachine, name: &str) -> Option<Value> {
    let desc = registry.lookup(name)?;
    read_input(machine, desc.index, desc.kind).map(Value::from)
}

impl<H: HostObject> StateMachineInputs<H> {
    pub fn with_host(host: H, config: BridgeConfig) -> Self {
        Self {
            names: NameNormalizer::from_config(&config),
            config,
            active: false,
            machine: None,
            registry: InputRegistry::new(),
            hub: DynamicPropertyHub::new(),
            router: ChangeRouter::new(),
            host,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access. Declaring new properties or signals takes effect
    /// on the next rebind or [`StateMachineInputs::rewire`].
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_bound(&self) -> bool {
        self.machine.is_some()
    }

    /// Start of host construction. Nothing to do until activation completes.
    pub fn begin(&mut self) {}

    /// Mark the bridge ready and wire an already bound state machine.
    pub fn complete_activation(&mut self) {
        self.active = true;
        self.rebind();
    }

    /// Replace the bound state machine (or unbind with `None`).
    pub fn bind_state_machine(&mut self, machine: Option<SharedStateMachine>) {
        self.machine = machine;
        self.rebind();
    }

    fn live_machine(&self) -> Option<SharedStateMachine> {
        if self.active {
            self.machine.clone()
        } else {
            None
        }
    }

    fn rebind(&mut self) {
        self.router.disconnect_all();
        self.hub.clear();

        match self.live_machine() {
            Some(machine) => {
                let machine = machine.borrow();
                self.registry.rebuild(
                    Some(&*machine),
                    &self.names,
                    self.config.collision_policy,
                );
            }
            None => {
                self.registry
                    .rebuild(None, &self.names, self.config.collision_policy);
                return;
            }
        }
        self.rewire();
    }

    /// Re-run router wiring against the current registry and host table.
    pub fn rewire(&mut self) {
        if self.live_machine().is_none() {
            self.router.disconnect_all();
            return;
        }
        let connected = self.router.connect(&self.registry, &self.host);
        debug!(
            "wired {} host signals to {} state machine inputs",
            connected,
            self.registry.len()
        );
    }

    /// Current value of a Number/Boolean input, any casing.
    pub fn get_value(&self, name: &str) -> Option<Value> {
        let machine = self.live_machine()?;
        let machine = machine.borrow();
        value_of(&self.registry, &*machine, name)
    }

    /// Write a Number (Float/Int) or Boolean (Bool) input. Mismatched values are ignored.
    pub fn set_value(&mut self, name: &str, value: Value) {
        let Some(machine) = self.live_machine() else {
            return;
        };
        let Some(desc) = self.registry.lookup(name) else {
            return;
        };
        let mut machine = machine.borrow_mut();
        match desc.kind {
            InputKind::Number => match coercion::as_number(&value) {
                Some(n) => machine.set_number(desc.index, n),
                None => trace!("{:?} is not a number for input {}", value, desc.key),
            },
            InputKind::Boolean => match coercion::as_bool(&value) {
                Some(b) => machine.set_boolean(desc.index, b),
                None => trace!("{:?} is not a boolean for input {}", value, desc.key),
            },
            InputKind::Trigger => trace!("input {} is a trigger; use fire_trigger", desc.key),
        }
    }

    /// Fire a Trigger input once. Other kinds and unresolved names are ignored.
    pub fn fire_trigger(&mut self, name: &str) {
        let Some(machine) = self.live_machine() else {
            return;
        };
        if let Some(desc) = self.registry.lookup(name) {
            if desc.kind == InputKind::Trigger {
                machine.borrow_mut().fire(desc.index);
            }
        }
    }

    /// Live handle tracking `name`; the same handle for every casing of a name.
    /// Inactive or unbound bridges return a detached handle and register nothing.
    pub fn listen_to(&mut self, name: &str) -> ListenerHandle {
        let Some(machine) = self.live_machine() else {
            return ListenerHandle::detached(name);
        };
        let registry = &self.registry;
        self.hub.subscribe(name, || {
            let machine = machine.borrow();
            value_of(registry, &*machine, name)
        })
    }

    pub fn lookup(&self, name: &str) -> Option<&InputDescriptor> {
        self.registry.lookup(name)
    }

    /// Display names and kinds of all exposed inputs.
    pub fn inputs(&self) -> Vec<InputListing> {
        self.registry.list()
    }

    /// [`StateMachineInputs::inputs`] as `[{ "text": ..., "type": ... }]`.
    pub fn inputs_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.inputs())
    }

    /// Observe the listing; called twice per rebuild (cleared, then populated).
    pub fn on_inputs_changed(&mut self, f: impl FnMut(&[InputListing]) + 'static) {
        self.registry.on_inputs_changed(f);
    }

    /// Number of registry rebuilds so far.
    pub fn revision(&self) -> u64 {
        self.registry.revision()
    }

    /// Host-side write of a declared property. When the stored value changes and
    /// the property notifies, the change is routed into the state machine at once.
    pub fn host_write(&mut self, name: &str, value: Value) -> bool {
        if !self.host.write_property(name, value, WriteOrigin::Host) {
            return false;
        }
        if let Some(signal) = self.host.property_decl(name).and_then(|p| p.notify) {
            self.emit(signal);
        }
        true
    }

    /// Raise a host signal. Returns true when the state machine was touched.
    pub fn emit(&mut self, signal: SignalId) -> bool {
        let Some(machine) = self.live_machine() else {
            return false;
        };
        let mut machine = machine.borrow_mut();
        self.router.dispatch(
            signal,
            &self.config.changed_suffix,
            &self.registry,
            &self.host,
            &mut *machine,
        )
    }

    /// [`StateMachineInputs::emit`] by signal name.
    pub fn emit_named(&mut self, name: &str) -> bool {
        match self.host.signal_id(name) {
            Some(signal) => self.emit(signal),
            None => false,
        }
    }

    /// One reconciliation pass; call once per host tick. Observers and listener
    /// subscribers run with the state machine unborrowed.
    pub fn tick(&mut self) -> SyncReport {
        let Some(machine) = self.live_machine() else {
            return SyncReport::default();
        };
        let snapshot = InputSnapshot::capture(&self.registry, &*machine.borrow());
        sync::reconcile(&self.registry, &self.hub, &mut self.host, &snapshot)
    }

    /// Router wiring, exposed for inspection.
    pub fn router(&self) -> &ChangeRouter {
        &self.router
    }

    /// Listener handles currently owned by the bridge.
    pub fn listeners(&self) -> &DynamicPropertyHub {
        &self.hub
    }
}
