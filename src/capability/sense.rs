// src/capability/sense.rs
//! Decoding of RPM dependency sense flags
//!
//! RPM stores the comparison operator of a versioned dependency as a
//! bitmask (RPMSENSE_LESS = 2, RPMSENSE_GREATER = 4, RPMSENSE_EQUAL = 8).
//! Only the low four bits describe the comparison; the upper bits carry
//! unrelated markers (prereq, scriptlet context, ...) and are ignored here.

use std::fmt;

/// Mask selecting the comparison bits of a sense value
pub const SENSE_MASK: i64 = 0xf;

const SENSE_LESS: i64 = 0x02;
const SENSE_GREATER: i64 = 0x04;
const SENSE_EQUAL: i64 = 0x08;

/// Comparison operator of a versioned capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SenseFlag {
    Lt,
    Gt,
    Eq,
    Le,
    Ge,
}

/// Outcome of decoding a raw sense value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenseDecode {
    /// The comparison bits named one of the five operators
    Known(SenseFlag),
    /// The comparison bits matched no operator; carries the masked bits
    Fallback(u8),
}

impl SenseFlag {
    /// Operator reported for comparison bits that match no known operator
    pub const FALLBACK: SenseFlag = SenseFlag::Ge;

    /// Map the comparison bits of `sense` to an operator, if they name one
    pub fn from_bits(sense: i64) -> Option<Self> {
        match sense & SENSE_MASK {
            SENSE_LESS => Some(Self::Lt),
            SENSE_GREATER => Some(Self::Gt),
            SENSE_EQUAL => Some(Self::Eq),
            m if m == SENSE_LESS | SENSE_EQUAL => Some(Self::Le),
            m if m == SENSE_GREATER | SENSE_EQUAL => Some(Self::Ge),
            _ => None,
        }
    }

    /// Decode a raw sense value, reporting whether the fallback was used
    pub fn decode(sense: i64) -> SenseDecode {
        match Self::from_bits(sense) {
            Some(flag) => SenseDecode::Known(flag),
            None => SenseDecode::Fallback((sense & SENSE_MASK) as u8),
        }
    }

    /// Token used in the `flags` attribute of repository metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lt => "LT",
            Self::Gt => "GT",
            Self::Eq => "EQ",
            Self::Le => "LE",
            Self::Ge => "GE",
        }
    }
}

impl SenseDecode {
    /// The operator to emit; unrecognized bits map to [`SenseFlag::FALLBACK`]
    pub fn flag(&self) -> SenseFlag {
        match self {
            Self::Known(flag) => *flag,
            Self::Fallback(_) => SenseFlag::FALLBACK,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

impl fmt::Display for SenseFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
