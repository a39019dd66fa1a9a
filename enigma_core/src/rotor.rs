use crate::alphabet::{Letter, ALPHABET_LEN};
use crate::wiring::Wiring;

/// One rotor of the bank: a fixed wiring plus a mutable rotational position.
///
/// The position always stays in `[0, 26)`; stepping is modulo the alphabet.
#[derive(Clone, Debug)]
pub struct Rotor {
    wiring: Wiring,
    position: u8,
}

impl Rotor {
    /// Mounts a rotor at position 0.
    pub fn new(wiring: Wiring) -> Self {
        Self {
            wiring,
            position: 0,
        }
    }

    pub fn wiring(&self) -> &Wiring {
        &self.wiring
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    /// The letter visible through the rotor window at the current position.
    pub fn window(&self) -> Letter {
        Letter::from_raw(self.position)
    }

    /// Steps the rotor one notch. Returns true when the position wrapped
    /// back to 0, which carries into the next slower rotor under the
    /// odometer rule.
    pub fn advance(&mut self) -> bool {
        self.position = (self.position + 1) % ALPHABET_LEN as u8;
        self.position == 0
    }
}
