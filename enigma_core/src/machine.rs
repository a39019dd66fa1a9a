use std::fmt;

use log::debug;

use crate::alphabet::{Letter, ALPHABET_LEN};
use crate::config::{MachineConfig, ROTOR_COUNT};
use crate::error::EnigmaError;
use crate::rotor::Rotor;
use crate::wiring::Wiring;

/// The rotor positions at a given instant.
///
/// A snapshot fully determines the substitution mapping in effect at that
/// instant; the engine's key-driven stepping never reuses one, but a captured
/// snapshot can be replayed through [`EnigmaMachine::substitute_at`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RotorSnapshot([u8; ROTOR_COUNT]);

impl RotorSnapshot {
    /// Builds a snapshot, reducing each position modulo the alphabet.
    pub fn new(positions: [u8; ROTOR_COUNT]) -> Self {
        Self(positions.map(|p| p % ALPHABET_LEN as u8))
    }

    pub fn positions(&self) -> [u8; ROTOR_COUNT] {
        self.0
    }
}

impl fmt::Display for RotorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for position in self.0 {
            write!(f, "{}", Letter::from_raw(position))?;
        }
        Ok(())
    }
}

/// The observable state handed to registered observers after each mutating
/// command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MachineState {
    pub rotors: RotorSnapshot,
    pub keys_down: [bool; ALPHABET_LEN],
    pub lamps: [bool; ALPHABET_LEN],
}

type Observer = Box<dyn FnMut(&MachineState)>;

/// The key press that currently owns the lit lamp.
#[derive(Clone, Copy)]
struct ActiveLamp {
    key: Letter,
    lamp: Letter,
}

/// The cipher engine: rotor bank, reflector, keyboard and lampboard state,
/// and the observer list.
///
/// Every command runs to completion synchronously; observers see no partial
/// state. All operations are O(1), bounded by the fixed three-rotor pipeline.
pub struct EnigmaMachine {
    rotors: [Rotor; ROTOR_COUNT],
    reflector: Wiring,
    keys_down: [bool; ALPHABET_LEN],
    lamps: [bool; ALPHABET_LEN],
    active: Option<ActiveLamp>,
    observers: Vec<Observer>,
}

impl EnigmaMachine {
    /// Builds a machine from the given configuration, all rotors at position
    /// 0, no keys down, no lamps lit.
    pub fn new(config: MachineConfig) -> Self {
        let (wirings, reflector) = config.into_parts();
        Self {
            rotors: wirings.map(Rotor::new),
            reflector,
            keys_down: [false; ALPHABET_LEN],
            lamps: [false; ALPHABET_LEN],
            active: None,
            observers: Vec::new(),
        }
    }

    /// A machine wired with the historical rotor I/II/III and reflector B
    /// tables.
    pub fn historical() -> Self {
        Self::new(MachineConfig::historical())
    }

    /// Registers an observer. Observers are invoked synchronously, in
    /// registration order, after every command that changes observable state.
    pub fn add_observer(&mut self, observer: impl FnMut(&MachineState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Presses a key: marks it down, steps the rotors, substitutes through
    /// the post-advance positions, and lights the output lamp. Returns the
    /// lamp letter.
    ///
    /// The pressed key becomes the owner of the lit lamp; a previously lit
    /// lamp is extinguished first, so at most one lamp is ever lit.
    pub fn press_key(&mut self, key: Letter) -> Letter {
        self.keys_down[key.index()] = true;
        self.advance_rotors();
        let lamp = self.substitute(key);
        if let Some(previous) = self.active.take() {
            self.lamps[previous.lamp.index()] = false;
        }
        self.lamps[lamp.index()] = true;
        self.active = Some(ActiveLamp { key, lamp });
        debug!("press {key}: rotors {} light {lamp}", self.positions());
        self.notify();
        lamp
    }

    /// Releases a key. If the key owns the lit lamp, the lamp goes out;
    /// rotor positions are untouched.
    pub fn release_key(&mut self, key: Letter) {
        self.keys_down[key.index()] = false;
        if let Some(active) = self.active {
            if active.key == key {
                self.lamps[active.lamp.index()] = false;
                self.active = None;
            }
        }
        self.notify();
    }

    /// Manually advances a single rotor one notch, without the odometer
    /// carry. This is how an operator dials in an initial rotor setting.
    pub fn advance_rotor(&mut self, index: usize) -> Result<(), EnigmaError> {
        if index >= ROTOR_COUNT {
            return Err(EnigmaError::RotorIndexOutOfRange {
                index,
                count: ROTOR_COUNT,
            });
        }
        self.rotors[index].advance();
        debug!("manual advance rotor {index}: rotors {}", self.positions());
        self.notify();
        Ok(())
    }

    pub fn is_key_down(&self, letter: Letter) -> bool {
        self.keys_down[letter.index()]
    }

    pub fn is_lamp_on(&self, letter: Letter) -> bool {
        self.lamps[letter.index()]
    }

    /// The currently lit lamp, if any.
    pub fn lit_lamp(&self) -> Option<Letter> {
        self.active.map(|active| active.lamp)
    }

    /// The letter visible through the rotor window at the given index.
    pub fn rotor_letter(&self, index: usize) -> Result<Letter, EnigmaError> {
        self.rotors
            .get(index)
            .map(Rotor::window)
            .ok_or(EnigmaError::RotorIndexOutOfRange {
                index,
                count: ROTOR_COUNT,
            })
    }

    pub fn positions(&self) -> RotorSnapshot {
        RotorSnapshot(self.rotors.each_ref().map(Rotor::position))
    }

    pub fn state(&self) -> MachineState {
        MachineState {
            rotors: self.positions(),
            keys_down: self.keys_down,
            lamps: self.lamps,
        }
    }

    /// Runs the substitution pipeline against a frozen snapshot without
    /// touching machine state.
    ///
    /// For any snapshot the mapping is an involution: applying it twice with
    /// the same snapshot returns the original letter, which is what makes the
    /// machine a reciprocal cipher.
    pub fn substitute_at(&self, snapshot: RotorSnapshot, letter: Letter) -> Letter {
        let positions = snapshot.0;
        let mut pos = letter.index() as u8;
        // Forward pass, fast rotor to slow: shift by the rotor offset, then
        // enter the wiring at that contact.
        for index in (0..ROTOR_COUNT).rev() {
            pos = offset_add(pos, positions[index]);
            pos = self.rotors[index].wiring().position_of(pos);
        }
        pos = self.reflector.position_of(pos);
        // Backward pass, slow rotor to fast: leave the wiring, then undo the
        // rotor offset.
        for index in 0..ROTOR_COUNT {
            pos = self.rotors[index].wiring().letter_at(pos);
            pos = offset_sub(pos, positions[index]);
        }
        Letter::from_raw(pos)
    }

    fn substitute(&self, letter: Letter) -> Letter {
        self.substitute_at(self.positions(), letter)
    }

    /// The odometer rule: the fast rotor steps on every press, slower rotors
    /// step only as carry-outs of a full revolution.
    fn advance_rotors(&mut self) {
        if self.rotors[2].advance() && self.rotors[1].advance() {
            self.rotors[0].advance();
        }
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let state = self.state();
        for observer in &mut self.observers {
            observer(&state);
        }
    }
}

fn offset_add(pos: u8, offset: u8) -> u8 {
    (pos + offset) % ALPHABET_LEN as u8
}

fn offset_sub(pos: u8, offset: u8) -> u8 {
    (pos + ALPHABET_LEN as u8 - offset) % ALPHABET_LEN as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn letter(c: char) -> Letter {
        Letter::from_char(c).unwrap()
    }

    #[test]
    fn press_substitutes_through_post_advance_positions() {
        let mut machine = EnigmaMachine::historical();
        // At the resting AAA positions 'A' would map to 'L', but the press
        // steps the fast rotor first.
        assert_eq!(
            machine.substitute_at(RotorSnapshot::new([0, 0, 0]), letter('A')),
            letter('L')
        );
        let lamp = machine.press_key(letter('A'));
        assert_eq!(lamp, letter('T'));
        assert_eq!(machine.positions().to_string(), "AAB");
        assert!(machine.is_key_down(letter('A')));
        assert!(machine.is_lamp_on(letter('T')));
    }

    #[test]
    fn exactly_one_lamp_is_lit_after_a_press() {
        let mut machine = EnigmaMachine::historical();
        machine.press_key(letter('A'));
        let lit: Vec<char> = Letter::all()
            .filter(|&l| machine.is_lamp_on(l))
            .map(Letter::to_char)
            .collect();
        assert_eq!(lit, vec!['T']);
    }

    #[test]
    fn release_clears_the_lamp_and_the_key() {
        let mut machine = EnigmaMachine::historical();
        machine.press_key(letter('A'));
        machine.release_key(letter('A'));
        assert!(!machine.is_key_down(letter('A')));
        assert_eq!(machine.lit_lamp(), None);
        assert!(Letter::all().all(|l| !machine.is_lamp_on(l)));
    }

    #[test]
    fn second_press_takes_over_the_lamp() {
        let mut machine = EnigmaMachine::historical();
        machine.press_key(letter('A'));
        let second = machine.press_key(letter('B'));
        assert_eq!(second, letter('D'));
        // The first press's lamp went out; only the new owner's lamp is lit.
        assert!(!machine.is_lamp_on(letter('T')));
        assert!(machine.is_lamp_on(letter('D')));
        // Releasing the non-owner leaves the lamp alone.
        machine.release_key(letter('A'));
        assert!(machine.is_lamp_on(letter('D')));
        machine.release_key(letter('B'));
        assert_eq!(machine.lit_lamp(), None);
    }

    #[test]
    fn fast_rotor_revolution_carries_into_the_medium_rotor() {
        let mut machine = EnigmaMachine::historical();
        for _ in 0..26 {
            machine.press_key(letter('A'));
        }
        assert_eq!(machine.positions().to_string(), "ABA");
    }

    #[test]
    fn manual_advance_does_not_cascade() {
        let mut machine = EnigmaMachine::historical();
        machine.advance_rotor(1).unwrap();
        assert_eq!(machine.positions().to_string(), "ABA");
        // A full manual revolution of the fast rotor carries nowhere.
        for _ in 0..26 {
            machine.advance_rotor(2).unwrap();
        }
        assert_eq!(machine.positions().to_string(), "ABA");
    }

    #[test]
    fn out_of_range_rotor_index_is_rejected_without_side_effects() {
        let mut machine = EnigmaMachine::historical();
        let before = machine.state();
        assert_eq!(
            machine.advance_rotor(3),
            Err(EnigmaError::RotorIndexOutOfRange { index: 3, count: 3 })
        );
        assert_eq!(machine.state(), before);
        assert_eq!(
            machine.rotor_letter(9),
            Err(EnigmaError::RotorIndexOutOfRange { index: 9, count: 3 })
        );
    }

    #[test]
    fn rotor_letter_reads_the_window() {
        let mut machine = EnigmaMachine::historical();
        machine.advance_rotor(0).unwrap();
        machine.advance_rotor(0).unwrap();
        assert_eq!(machine.rotor_letter(0).unwrap(), letter('C'));
        assert_eq!(machine.rotor_letter(2).unwrap(), letter('A'));
    }

    #[test]
    fn substitute_at_leaves_state_untouched() {
        let machine = EnigmaMachine::historical();
        let snapshot = RotorSnapshot::new([16, 4, 21]);
        assert_eq!(machine.substitute_at(snapshot, letter('Q')), letter('X'));
        assert_eq!(machine.substitute_at(snapshot, letter('Q')), letter('X'));
        assert_eq!(machine.positions().to_string(), "AAA");
    }

    #[test]
    fn observers_run_once_per_mutating_command() {
        let mut machine = EnigmaMachine::historical();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        machine.add_observer(move |state: &MachineState| {
            sink.borrow_mut().push(state.rotors.to_string());
        });
        machine.press_key(letter('A'));
        machine.release_key(letter('A'));
        machine.advance_rotor(0).unwrap();
        // Queries do not notify.
        let _ = machine.is_lamp_on(letter('A'));
        assert_eq!(
            *calls.borrow(),
            vec!["AAB".to_string(), "AAB".to_string(), "BAB".to_string()]
        );
    }

    #[test]
    fn observer_sees_the_fully_updated_state() {
        let mut machine = EnigmaMachine::historical();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        machine.add_observer(move |state: &MachineState| {
            *sink.borrow_mut() = Some(*state);
        });
        machine.press_key(letter('A'));
        let state = seen.borrow().unwrap();
        assert!(state.keys_down[0]);
        assert!(state.lamps[letter('T').index()]);
        assert_eq!(state.rotors.to_string(), "AAB");
    }

    #[test]
    fn snapshot_constructor_reduces_modulo_alphabet() {
        assert_eq!(
            RotorSnapshot::new([26, 27, 52]),
            RotorSnapshot::new([0, 1, 0])
        );
    }
}
