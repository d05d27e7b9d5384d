//! Held-control input state
//!
//! Input handlers set and clear logical controls as keys or touch buttons go
//! down and up. The simulation only ever sees a level-triggered snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Logical controls understood by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    MoveLeft,
    MoveRight,
    Fire,
    Pause,
    Restart,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::MoveLeft,
        Control::MoveRight,
        Control::Fire,
        Control::Pause,
        Control::Restart,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of currently held controls (bit set, `Copy`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSet(u8);

impl ControlSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, control: Control) -> Self {
        self.insert(control);
        self
    }

    pub fn insert(&mut self, control: Control) {
        self.0 |= control.bit();
    }

    pub fn remove(&mut self, control: Control) {
        self.0 &= !control.bit();
    }

    pub fn set(&mut self, control: Control, held: bool) {
        if held {
            self.insert(control);
        } else {
            self.remove(control);
        }
    }

    #[inline]
    pub fn contains(&self, control: Control) -> bool {
        self.0 & control.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Controls held now that were not held in `previous`
    pub fn pressed_since(&self, previous: ControlSet) -> ControlSet {
        ControlSet(self.0 & !previous.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Control> + '_ {
        Control::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Control> for ControlSet {
    fn from_iter<I: IntoIterator<Item = Control>>(iter: I) -> Self {
        let mut set = ControlSet::empty();
        for control in iter {
            set.insert(control);
        }
        set
    }
}

/// Held-control set that input threads can write while a tick reads it.
///
/// Cloning shares the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct SharedControls {
    bits: Arc<AtomicU8>,
}

impl SharedControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key/button down
    pub fn press(&self, control: Control) {
        self.bits.fetch_or(control.bit(), Ordering::Relaxed);
    }

    /// Key/button up
    pub fn release(&self, control: Control) {
        self.bits.fetch_and(!control.bit(), Ordering::Relaxed);
    }

    /// Replace the whole set (used by the autopilot)
    pub fn replace(&self, set: ControlSet) {
        self.bits.store(set.0, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.bits.store(0, Ordering::Relaxed);
    }

    /// Level-triggered snapshot taken at the start of a tick
    pub fn snapshot(&self) -> ControlSet {
        ControlSet(self.bits.load(Ordering::Relaxed))
    }
}
