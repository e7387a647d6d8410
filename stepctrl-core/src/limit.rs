// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use avr_atomic::AvrAtomic;

const UP: u8 = 1 << 0;
const DOWN: u8 = 1 << 1;

/// Live levels of both limit switches.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct LimitState {
    pub up: bool,
    pub down: bool,
}

impl LimitState {
    pub const fn new(up: bool, down: bool) -> Self {
        Self { up, down }
    }

    const fn from_bits(bits: u8) -> Self {
        Self {
            up: bits & UP != 0,
            down: bits & DOWN != 0,
        }
    }

    const fn to_bits(self) -> u8 {
        (if self.up { UP } else { 0 }) | (if self.down { DOWN } else { 0 })
    }

    /// Both switches asserted at once. Never happens on a healthy mechanism.
    pub const fn both(&self) -> bool {
        self.up && self.down
    }
}

/// Limit switch monitor.
///
/// Written from the pin change interrupt only.
/// Both levels share one byte, so a snapshot never sees a half update.
pub struct LimitSwitchMonitor {
    levels: AvrAtomic<u8>,
    changed: AvrAtomic<bool>,
}

impl LimitSwitchMonitor {
    pub const fn new() -> Self {
        Self {
            levels: AvrAtomic::new(),
            changed: AvrAtomic::new(),
        }
    }

    /// Set the levels without raising the changed flag.
    /// Used once during init, before interrupts are enabled.
    pub fn init(&self, state: LimitState) {
        self.levels.store(state.to_bits());
        self.changed.store(false);
    }

    /// Pin change edge. Called from interrupt context.
    pub fn update(&self, state: LimitState) {
        let bits = state.to_bits();
        if bits != self.levels.load() {
            self.levels.store(bits);
            self.changed.store(true);
        }
    }

    pub fn snapshot(&self) -> LimitState {
        LimitState::from_bits(self.levels.load())
    }

    /// Read and clear the changed flag.
    ///
    /// An edge racing with the clear is coalesced into the reported one.
    pub fn take_changed(&self) -> bool {
        let changed = self.changed.load();
        if changed {
            self.changed.store(false);
        }
        changed
    }

    pub fn clear_changed(&self) {
        self.changed.store(false);
    }
}

impl Default for LimitSwitchMonitor {
    fn default() -> Self {
        Self::new()
    }
}


// vim: ts=4 sw=4 expandtab
