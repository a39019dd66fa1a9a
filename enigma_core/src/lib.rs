//! Simulation of the electromechanical encryption path of a three-rotor
//! cipher machine: key press, rotor stepping, multi-stage substitution,
//! letter output.
//!
//! The engine is deterministic and synchronous; a presentation layer drives
//! it one key event at a time and reads back key, lamp, and rotor-window
//! state to render.
//!
//! # Architecture
//!
//! ```text
//! Wiring        (fixed permutation + precomputed inverse, O(1) both ways)
//!     ↕ mounted
//! Rotor         (wiring + rotational position, steps modulo 26)
//!     ↕ 3 chained, odometer stepping
//! EnigmaMachine (keyboard/lampboard state + substitution pipeline + observers)
//! ```
//!
//! # Examples
//!
//! Press a key and read the lamp:
//!
//! ```
//! use enigma_core::{EnigmaMachine, Letter};
//!
//! let mut machine = EnigmaMachine::historical();
//! let lamp = machine.press_key(Letter::from_char('A').unwrap());
//! assert_eq!(lamp.to_char(), 'T');
//! assert_eq!(machine.positions().to_string(), "AAB");
//!
//! machine.release_key(Letter::from_char('A').unwrap());
//! assert!(!machine.is_lamp_on(lamp));
//! ```
//!
//! The machine is a reciprocal cipher: typing the ciphertext on an
//! identically configured machine recovers the plaintext.
//!
//! ```
//! use enigma_core::{EnigmaMachine, Letter};
//!
//! let mut sender = EnigmaMachine::historical();
//! let mut receiver = EnigmaMachine::historical();
//!
//! let ciphertext: String = "ENIGMA"
//!     .chars()
//!     .map(|c| sender.press_key(Letter::from_char(c).unwrap()).to_char())
//!     .collect();
//! assert_eq!(ciphertext, "CKXMDB");
//!
//! let decoded: String = ciphertext
//!     .chars()
//!     .map(|c| receiver.press_key(Letter::from_char(c).unwrap()).to_char())
//!     .collect();
//! assert_eq!(decoded, "ENIGMA");
//! ```

pub mod alphabet;
pub mod config;
pub mod error;
pub mod machine;
pub mod rotor;
pub mod wiring;

pub use crate::alphabet::{Letter, ALPHABET_LEN};
pub use crate::config::{
    MachineConfig, REFLECTOR_B, ROTOR_COUNT, ROTOR_I, ROTOR_II, ROTOR_III,
};
pub use crate::error::EnigmaError;
pub use crate::machine::{EnigmaMachine, MachineState, RotorSnapshot};
pub use crate::rotor::Rotor;
pub use crate::wiring::Wiring;
