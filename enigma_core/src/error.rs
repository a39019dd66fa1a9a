//! Error types for the enigma_core library.

use thiserror::Error;

/// Errors produced by the cipher engine's public operations.
///
/// Every variant is a caller contract violation detected at the engine
/// boundary; a failed call leaves the machine state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnigmaError {
    /// The character is not a letter of the machine alphabet.
    #[error("'{0}' is not a letter of the machine alphabet")]
    InvalidLetter(char),

    /// A rotor index outside the machine's rotor bank.
    #[error("rotor index {index} is out of range, machine has {count} rotors")]
    RotorIndexOutOfRange { index: usize, count: usize },

    /// A wiring table that is not a permutation of the alphabet.
    #[error("wiring {found:?} is not a permutation of the 26-letter alphabet")]
    InvalidWiring { found: String },
}
