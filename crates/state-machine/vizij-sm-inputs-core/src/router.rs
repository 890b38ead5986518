//! Change router: host notifications -> state machine, outside the tick cycle.
//!
//! Wiring happens on every rebind and replaces the previous wiring entirely:
//! - a notifying host property whose name resolves in the registry gets its
//!   change signal routed to a property handler
//! - a host signal whose name resolves to a Trigger input gets routed to `fire`
//!
//! The property handler only knows the signal id. It recovers the property name
//! from the signal's own name by stripping the configured "changed" suffix.
//! Feedback is prevented upstream: only [`crate::WriteOrigin::Host`] writes
//! raise signals.

use hashbrown::HashMap;
use log::{debug, trace};

use crate::coercion;
use crate::host::HostObject;
use crate::ids::SignalId;
use crate::machine::{InputKind, StateMachine};
use crate::registry::InputRegistry;

/// What a connected signal does when raised. A signal may carry both routes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Connection {
    pub property_changed: bool,
    pub trigger: bool,
}

#[derive(Debug, Default)]
pub struct ChangeRouter {
    connections: HashMap<SignalId, Connection>,
}

impl ChangeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disconnect_all(&mut self) {
        self.connections.clear();
    }

    /// Replace all wiring with connections derived from `registry` and `host`.
    /// Returns the number of connected signals.
    pub fn connect(&mut self, registry: &InputRegistry, host: &dyn HostObject) -> usize {
        self.disconnect_all();

        for prop in host.properties() {
            match (prop.notify, registry.lookup(&prop.name)) {
                (Some(signal), Some(desc)) => {
                    debug!(
                        "map property {:?} (normalized {}) connected by signal {:?}",
                        prop.name, desc.key, host.signal_name(signal)
                    );
                    self.connections.entry(signal).or_default().property_changed = true;
                }
                _ => debug!(
                    "property {:?} was not found in the state machine or has no notify signal; not connected",
                    prop.name
                ),
            }
        }

        for signal in host.signals() {
            if let Some(desc) = registry.lookup(&signal.name) {
                if desc.kind == InputKind::Trigger {
                    debug!("signal {:?} fires trigger {}", signal.name, desc.key);
                    self.connections.entry(signal.id).or_default().trigger = true;
                }
            }
        }

        self.connections.len()
    }

    pub fn connection(&self, signal: SignalId) -> Option<Connection> {
        self.connections.get(&signal).copied()
    }

    pub fn is_connected(&self, signal: SignalId) -> bool {
        self.connections.contains_key(&signal)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Route a raised signal. Returns true when the state machine was touched.
    /// Unconnected signals are dropped.
    pub fn dispatch(
        &self,
        signal: SignalId,
        changed_suffix: &str,
        registry: &InputRegistry,
        host: &dyn HostObject,
        machine: &mut dyn StateMachine,
    ) -> bool {
        let Some(conn) = self.connection(signal) else {
            return false;
        };

        let mut applied = false;
        if conn.property_changed {
            applied |= Self::route_property(signal, changed_suffix, registry, host, machine);
        }
        if conn.trigger {
            applied |= Self::route_trigger(signal, registry, host, machine);
        }
        applied
    }

    fn route_property(
        signal: SignalId,
        changed_suffix: &str,
        registry: &InputRegistry,
        host: &dyn HostObject,
        machine: &mut dyn StateMachine,
    ) -> bool {
        let Some(property) = host
            .signal_name(signal)
            .and_then(|name| name.strip_suffix(changed_suffix))
        else {
            return false;
        };
        let (Some(value), Some(desc)) = (host.read_property(property), registry.lookup(property))
        else {
            return false;
        };
        match desc.kind {
            InputKind::Number => match coercion::to_number(&value) {
                Some(n) => {
                    machine.set_number(desc.index, n);
                    true
                }
                None => {
                    trace!("property {:?} value {:?} is not numeric", property, value);
                    false
                }
            },
            InputKind::Boolean => match coercion::to_bool(&value) {
                Some(b) => {
                    machine.set_boolean(desc.index, b);
                    true
                }
                None => {
                    trace!("property {:?} value {:?} is not boolean", property, value);
                    false
                }
            },
            InputKind::Trigger => false,
        }
    }

    fn route_trigger(
        signal: SignalId,
        registry: &InputRegistry,
        host: &dyn HostObject,
        machine: &mut dyn StateMachine,
    ) -> bool {
        match host.signal_name(signal).and_then(|name| registry.lookup(name)) {
            Some(desc) if desc.kind == InputKind::Trigger => {
                machine.fire(desc.index);
                true
            }
            _ => false,
        }
    }
}
