use serde_derive::{Deserialize, Serialize};
use std::fmt;

/* Underlying fixed-width integer kind of a declared type. `int`, `uint` and
 * `uintptr` are treated as 64 bits wide. */
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IntegerKind {
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
}

impl IntegerKind {
    pub const ALL: [IntegerKind; 11] = [
        IntegerKind::Int,
        IntegerKind::Int8,
        IntegerKind::Int16,
        IntegerKind::Int32,
        IntegerKind::Int64,
        IntegerKind::Uint,
        IntegerKind::Uint8,
        IntegerKind::Uint16,
        IntegerKind::Uint32,
        IntegerKind::Uint64,
        IntegerKind::Uintptr,
    ];

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            IntegerKind::Int
                | IntegerKind::Int8
                | IntegerKind::Int16
                | IntegerKind::Int32
                | IntegerKind::Int64
        )
    }

    pub fn bits(self) -> u32 {
        match self {
            IntegerKind::Int8 | IntegerKind::Uint8 => 8,
            IntegerKind::Int16 | IntegerKind::Uint16 => 16,
            IntegerKind::Int32 | IntegerKind::Uint32 => 32,
            IntegerKind::Int
            | IntegerKind::Int64
            | IntegerKind::Uint
            | IntegerKind::Uint64
            | IntegerKind::Uintptr => 64,
        }
    }

    /// Smallest representable value.
    pub fn min_value(self) -> i128 {
        if self.is_signed() {
            -(1i128 << (self.bits() - 1))
        } else {
            0
        }
    }

    /// Largest representable value.
    pub fn max_value(self) -> i128 {
        if self.is_signed() {
            (1i128 << (self.bits() - 1)) - 1
        } else {
            (1i128 << self.bits()) - 1
        }
    }

    pub fn contains(self, value: i128) -> bool {
        value >= self.min_value() && value <= self.max_value()
    }

    /* Reduce an arbitrary integer into this kind's domain using two's
     * complement wrapping, the way a fixed-width register would hold it. */
    pub fn wrap(self, value: i128) -> i128 {
        let modulus = 1i128 << self.bits();
        let reduced = value.rem_euclid(modulus);
        if self.is_signed() && reduced > self.max_value() {
            reduced - modulus
        } else {
            reduced
        }
    }

    /* Type name as spelled in Go source */
    pub fn go_name(self) -> &'static str {
        match self {
            IntegerKind::Int => "int",
            IntegerKind::Int8 => "int8",
            IntegerKind::Int16 => "int16",
            IntegerKind::Int32 => "int32",
            IntegerKind::Int64 => "int64",
            IntegerKind::Uint => "uint",
            IntegerKind::Uint8 => "uint8",
            IntegerKind::Uint16 => "uint16",
            IntegerKind::Uint32 => "uint32",
            IntegerKind::Uint64 => "uint64",
            IntegerKind::Uintptr => "uintptr",
        }
    }

    /* Native Rust integer holding the same domain */
    pub fn rust_name(self) -> &'static str {
        match self {
            IntegerKind::Int | IntegerKind::Int64 => "i64",
            IntegerKind::Int8 => "i8",
            IntegerKind::Int16 => "i16",
            IntegerKind::Int32 => "i32",
            IntegerKind::Uint | IntegerKind::Uint64 => "u64",
            IntegerKind::Uint8 => "u8",
            IntegerKind::Uint16 => "u16",
            IntegerKind::Uint32 => "u32",
            IntegerKind::Uintptr => "usize",
        }
    }
}

impl fmt::Display for IntegerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.go_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(IntegerKind::Int8.min_value(), -128);
        assert_eq!(IntegerKind::Int8.max_value(), 127);
        assert_eq!(IntegerKind::Uint8.min_value(), 0);
        assert_eq!(IntegerKind::Uint8.max_value(), 255);
        assert_eq!(IntegerKind::Uint64.max_value(), u64::MAX as i128);
        assert_eq!(IntegerKind::Int.min_value(), i64::MIN as i128);
        assert!(IntegerKind::Uint.contains(253));
        assert!(!IntegerKind::Uint.contains(-1));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(IntegerKind::Uint8.wrap(-3), 253);
        assert_eq!(IntegerKind::Uint8.wrap(256), 0);
        assert_eq!(IntegerKind::Int8.wrap(128), -128);
        assert_eq!(IntegerKind::Int8.wrap(-129), 127);
        assert_eq!(IntegerKind::Uint64.wrap(-1), u64::MAX as i128);
        for kind in IntegerKind::ALL {
            assert_eq!(kind.wrap(kind.max_value()), kind.max_value());
            assert_eq!(kind.wrap(kind.min_value()), kind.min_value());
        }
    }

    #[test]
    fn test_names_round_trip_through_serde() {
        for kind in IntegerKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.go_name()));
            let back: IntegerKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }
}
