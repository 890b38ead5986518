//! Engine-side contract: the indexed, typed inputs of a state-machine instance.
//!
//! The animation engine owns the instance and advances it; this crate only reads
//! names and type keys, gets/sets values and fires triggers by input index.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::value::InputValue;

/// Native type key of number inputs.
pub const NUMBER_TYPE_KEY: u16 = 56;
/// Native type key of trigger inputs.
pub const TRIGGER_TYPE_KEY: u16 = 58;
/// Native type key of boolean inputs.
pub const BOOLEAN_TYPE_KEY: u16 = 59;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    Number,
    Boolean,
    Trigger,
}

impl InputKind {
    /// Map a native type key to a kind; unknown keys are unsupported inputs.
    pub fn from_type_key(key: u16) -> Option<Self> {
        match key {
            NUMBER_TYPE_KEY => Some(InputKind::Number),
            BOOLEAN_TYPE_KEY => Some(InputKind::Boolean),
            TRIGGER_TYPE_KEY => Some(InputKind::Trigger),
            _ => None,
        }
    }

    pub fn type_key(self) -> u16 {
        match self {
            InputKind::Number => NUMBER_TYPE_KEY,
            InputKind::Boolean => BOOLEAN_TYPE_KEY,
            InputKind::Trigger => TRIGGER_TYPE_KEY,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::Number => "Number",
            InputKind::Boolean => "Boolean",
            InputKind::Trigger => "Trigger",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indexed view over a state-machine instance's inputs.
///
/// Typed accessors return `None` (or do nothing) when the index is out of range
/// or the input at `index` is of another kind.
pub trait StateMachine {
    fn input_count(&self) -> usize;
    fn input_name(&self, index: usize) -> Option<&str>;
    fn input_type_key(&self, index: usize) -> Option<u16>;

    fn number(&self, index: usize) -> Option<f32>;
    fn set_number(&mut self, index: usize, value: f32);

    fn boolean(&self, index: usize) -> Option<bool>;
    fn set_boolean(&mut self, index: usize, value: bool);

    fn fire(&mut self, index: usize);
}

/// A state machine shared between the host loop (which advances it) and the bridge.
pub type SharedStateMachine = Rc<RefCell<dyn StateMachine>>;

/// Read the current value of a Number/Boolean input. Triggers have no value.
pub fn read_input(machine: &dyn StateMachine, index: usize, kind: InputKind) -> Option<InputValue> {
    match kind {
        InputKind::Number => machine.number(index).map(InputValue::Number),
        InputKind::Boolean => machine.boolean(index).map(InputValue::Boolean),
        InputKind::Trigger => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_keys_round_trip() {
        for kind in [InputKind::Number, InputKind::Boolean, InputKind::Trigger] {
            assert_eq!(InputKind::from_type_key(kind.type_key()), Some(kind));
        }
        assert_eq!(InputKind::from_type_key(57), None);
    }
}
