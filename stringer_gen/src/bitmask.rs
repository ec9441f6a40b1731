//! Bitmask accessor operations and their reference semantics.
//!
//! Backends render each [`BitOp`] in their own syntax; [`BitOp::apply`] is
//! what that rendering must compute on the underlying integer.

use serde_derive::Serialize;
use stringer_types::IntegerKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BitOp {
    /// `v & m != 0`
    Has,
    /// `v | m`
    Set,
    /// `v & !m`
    Clear,
    /// `v ^ m`
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOutcome {
    Flag(bool),
    Value(i128),
}

impl BitOp {
    /// Emission order of the accessor methods.
    pub const ALL: [BitOp; 4] = [BitOp::Has, BitOp::Set, BitOp::Clear, BitOp::Toggle];

    pub fn method_name(self) -> &'static str {
        match self {
            BitOp::Has => "Has",
            BitOp::Set => "Set",
            BitOp::Clear => "Clear",
            BitOp::Toggle => "Toggle",
        }
    }

    pub fn returns_flag(self) -> bool {
        matches!(self, BitOp::Has)
    }

    /* Evaluate on two values of `kind`. Results are reduced into the kind's
     * domain, so they are exactly what a register of that width holds. */
    pub fn apply(self, kind: IntegerKind, value: i128, mask: i128) -> BitOutcome {
        match self {
            BitOp::Has => BitOutcome::Flag(has(kind, value, mask)),
            BitOp::Set => BitOutcome::Value(set(kind, value, mask)),
            BitOp::Clear => BitOutcome::Value(clear(kind, value, mask)),
            BitOp::Toggle => BitOutcome::Value(toggle(kind, value, mask)),
        }
    }
}

pub fn has(kind: IntegerKind, value: i128, mask: i128) -> bool {
    kind.wrap(value) & kind.wrap(mask) != 0
}

pub fn set(kind: IntegerKind, value: i128, mask: i128) -> i128 {
    kind.wrap(kind.wrap(value) | kind.wrap(mask))
}

pub fn clear(kind: IntegerKind, value: i128, mask: i128) -> i128 {
    kind.wrap(kind.wrap(value) & !kind.wrap(mask))
}

pub fn toggle(kind: IntegerKind, value: i128, mask: i128) -> i128 {
    kind.wrap(kind.wrap(value) ^ kind.wrap(mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_ops() {
        let k = IntegerKind::Uint8;
        assert!(has(k, 0b1010, 0b0010));
        assert!(!has(k, 0b1010, 0b0101));
        assert_eq!(set(k, 0b1000, 0b0001), 0b1001);
        assert_eq!(clear(k, 0b1011, 0b0010), 0b1001);
        assert_eq!(toggle(k, 0b1011, 0b0110), 0b1101);
        assert_eq!(clear(k, 0xff, 0x0f), 0xf0);
    }

    #[test]
    fn test_signed_ops_stay_in_domain() {
        let k = IntegerKind::Int8;
        assert_eq!(set(k, 0, -128), -128);
        assert_eq!(toggle(k, -1, 0x7f), -128);
        assert_eq!(clear(k, -1, -128), 127);
        assert!(has(k, -1, -128));
    }

    #[test]
    fn test_aliases_are_interchangeable() {
        let k = IntegerKind::Int;
        let (a, b) = (1, 1);
        assert_eq!(set(k, 4, a), set(k, 4, b));
        assert_eq!(has(k, 5, a), has(k, 5, b));
    }

    #[test]
    fn test_apply_matches_free_functions() {
        let k = IntegerKind::Uint16;
        assert_eq!(BitOp::Has.apply(k, 0x0100, 0x0101), BitOutcome::Flag(true));
        assert_eq!(BitOp::Set.apply(k, 0, 1), BitOutcome::Value(1));
        assert_eq!(BitOp::Clear.apply(k, 1, 1), BitOutcome::Value(0));
        assert_eq!(BitOp::Toggle.apply(k, 0xffff, 0x00ff), BitOutcome::Value(0xff00));
        assert_eq!(set(k, 0, 1), 1);
        assert_eq!(clear(k, 1, 1), 0);
    }

    #[test]
    fn test_method_names_in_emission_order() {
        let names: Vec<&str> = BitOp::ALL.iter().map(|op| op.method_name()).collect();
        assert_eq!(names, vec!["Has", "Set", "Clear", "Toggle"]);
        assert!(BitOp::Has.returns_flag());
        assert!(!BitOp::Toggle.returns_flag());
    }
}
