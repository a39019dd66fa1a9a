use crate::error::EnigmaError;
use crate::wiring::Wiring;

/// Number of rotors in the bank. Index 0 is the slow (leftmost) rotor,
/// index 2 the fast (rightmost) one.
pub const ROTOR_COUNT: usize = 3;

/// Wiring of Enigma I rotor I (slow slot).
pub const ROTOR_I: &str = "EKMFLGDQVZNTOWYHXUSPAIBRCJ";
/// Wiring of Enigma I rotor II (medium slot).
pub const ROTOR_II: &str = "AJDKSIRUXBLHWTMCQGZNPYFVOE";
/// Wiring of Enigma I rotor III (fast slot).
pub const ROTOR_III: &str = "BDFHJLCPRTXVZNYEIWGAKMUSQO";
/// Wiring of reflector B, an involution with no fixed points.
pub const REFLECTOR_B: &str = "YRUHQSLDPXNGOKMIEBFZCWVJAT";

/// Immutable machine configuration: three rotor wirings plus a reflector.
///
/// The configuration is built once and handed to the engine at construction;
/// wirings are not swappable afterwards. The reflector is expected to be an
/// involution for the machine to be reciprocal, but this is not independently
/// enforced.
#[derive(Clone, Debug)]
pub struct MachineConfig {
    rotors: [Wiring; ROTOR_COUNT],
    reflector: Wiring,
}

impl MachineConfig {
    /// Builds a configuration from wiring tables, slow rotor first.
    pub fn new(rotors: [&str; ROTOR_COUNT], reflector: &str) -> Result<Self, EnigmaError> {
        let [slow, medium, fast] = rotors;
        Ok(Self {
            rotors: [Wiring::new(slow)?, Wiring::new(medium)?, Wiring::new(fast)?],
            reflector: Wiring::new(reflector)?,
        })
    }

    /// The historical configuration: rotors I, II, III and reflector B.
    pub fn historical() -> Self {
        Self::new([ROTOR_I, ROTOR_II, ROTOR_III], REFLECTOR_B)
            .expect("built-in wiring tables are valid permutations")
    }

    pub fn rotor(&self, index: usize) -> &Wiring {
        &self.rotors[index]
    }

    pub fn reflector(&self) -> &Wiring {
        &self.reflector
    }

    pub(crate) fn into_parts(self) -> ([Wiring; ROTOR_COUNT], Wiring) {
        (self.rotors, self.reflector)
    }
}
