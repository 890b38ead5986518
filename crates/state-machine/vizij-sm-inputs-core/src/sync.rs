//! Tick reconciliation: state machine -> host.
//!
//! The engine emits no per-input change events, so every tick compares the
//! current input values against what the host shows:
//! 1. notifying host properties that resolve to Number/Boolean inputs
//! 2. live listener handles
//!
//! On divergence the input value wins. Host writes made here carry
//! [`WriteOrigin::StateMachine`] and are never routed back into the machine.
//!
//! Input values are captured into an [`InputSnapshot`] before anything is
//! written, so host observers and listener subscribers run with the machine
//! unborrowed and may write inputs themselves. Such writes show up on the
//! next tick.

use hashbrown::HashMap;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::host::{HostObject, WriteOrigin};
use crate::listeners::DynamicPropertyHub;
use crate::machine::{read_input, StateMachine};
use crate::names::InputKey;
use crate::registry::InputRegistry;
use crate::value::InputValue;
use crate::Value;

/// Number/Boolean input values read in one go, keyed like the registry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    values: HashMap<InputKey, InputValue>,
}

impl InputSnapshot {
    pub fn capture(registry: &InputRegistry, machine: &dyn StateMachine) -> Self {
        let values = registry
            .iter()
            .filter_map(|desc| {
                read_input(machine, desc.index, desc.kind).map(|v| (desc.key.clone(), v))
            })
            .collect();
        Self { values }
    }

    /// Captured value for a name, any casing.
    pub fn get(&self, registry: &InputRegistry, name: &str) -> Option<InputValue> {
        let desc = registry.lookup(name)?;
        self.values.get(&desc.key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Writes performed by one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub host_writes: usize,
    pub listener_updates: usize,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.host_writes == 0 && self.listener_updates == 0
    }
}

/// Run both reconciliation steps against one snapshot.
pub fn reconcile(
    registry: &InputRegistry,
    hub: &DynamicPropertyHub,
    host: &mut dyn HostObject,
    snapshot: &InputSnapshot,
) -> SyncReport {
    SyncReport {
        host_writes: reconcile_host_properties(registry, host, snapshot),
        listener_updates: reconcile_listeners(registry, hub, host, snapshot),
    }
}

/// Step 1: push input values into stale notifying host properties.
pub fn reconcile_host_properties(
    registry: &InputRegistry,
    host: &mut dyn HostObject,
    snapshot: &InputSnapshot,
) -> usize {
    let pending: Vec<(String, Value)> = host
        .properties()
        .iter()
        .filter(|prop| prop.notify.is_some())
        .filter_map(|prop| {
            let current = snapshot.get(registry, &prop.name)?;
            let shown = host.read_property(&prop.name);
            match shown {
                Some(v) if current.matches(&v) => None,
                _ => Some((prop.name.clone(), Value::from(current))),
            }
        })
        .collect();

    let mut writes = 0;
    for (name, value) in pending {
        trace!("sync: property {:?} <- {:?}", name, value);
        if host.write_property(&name, value, WriteOrigin::StateMachine) {
            writes += 1;
        }
    }
    writes
}

/// Step 2: refresh listener handles and mirror their value into the host's
/// dynamic property storage.
pub fn reconcile_listeners(
    registry: &InputRegistry,
    hub: &DynamicPropertyHub,
    host: &mut dyn HostObject,
    snapshot: &InputSnapshot,
) -> usize {
    let mut updates = 0;
    for (key, handle) in hub.iter() {
        let Some(current) = snapshot.get(registry, key.as_str()) else {
            continue;
        };

        let observed = host
            .dynamic_property(key.as_str())
            .or_else(|| handle.value());
        let observed_fresh = observed.as_ref().is_some_and(|v| current.matches(v));
        let cached_fresh = handle.value().is_some_and(|v| current.matches(&v));
        if observed_fresh && cached_fresh {
            continue;
        }

        let value = Value::from(current);
        trace!("sync: listener {} <- {:?}", key, value);
        handle.set_value(value.clone());
        host.set_dynamic_property(key.as_str(), value);
        updates += 1;
    }
    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollisionPolicy;
    use crate::host::PropertyTable;
    use crate::memory::MemoryStateMachine;
    use crate::names::NameNormalizer;

    #[test]
    fn stale_notifying_properties_are_overwritten() {
        let sm = MemoryStateMachine::new("sm")
            .with_number("Speed", 0.5)
            .with_boolean("Armed", true)
            .with_trigger("Jump");
        let mut reg = InputRegistry::new();
        reg.rebuild(
            Some(&sm as &dyn StateMachine),
            &NameNormalizer::default(),
            CollisionPolicy::FirstWins,
        );

        let mut host = PropertyTable::new();
        host.declare_property("speed", Value::Int(3), true);
        host.declare_property("armed", Value::Bool(true), true);
        host.declare_property("Speed", Value::Float(9.0), false);
        host.declare_property("jump", Value::Bool(false), true);

        let snapshot = InputSnapshot::capture(&reg, &sm);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(&reg, "SPEED"), Some(InputValue::Number(0.5)));
        assert_eq!(snapshot.get(&reg, "jump"), None);

        assert_eq!(reconcile_host_properties(&reg, &mut host, &snapshot), 1);
        assert_eq!(host.read_property("speed"), Some(Value::Float(0.5)));
        // non-notifying and trigger-named properties are left alone
        assert_eq!(host.read_property("Speed"), Some(Value::Float(9.0)));
        assert_eq!(host.read_property("jump"), Some(Value::Bool(false)));

        assert_eq!(reconcile_host_properties(&reg, &mut host, &snapshot), 0);
    }
}
