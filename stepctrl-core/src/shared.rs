// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use avr_atomic::AvrAtomic;

/// One byte handed over from the bus interrupt to the main loop.
///
/// The bus engine is the only writer. The main loop is the only reader.
/// There is no queue: the newest byte overwrites any unread older one.
pub struct SharedByteRegister {
    value: AvrAtomic<u8>,
}

impl SharedByteRegister {
    /// Power-on value is zero.
    pub const fn new() -> Self {
        Self {
            value: AvrAtomic::new(),
        }
    }

    #[inline]
    pub fn load(&self) -> u8 {
        self.value.load()
    }

    #[inline]
    pub fn store(&self, value: u8) {
        self.value.store(value);
    }
}

impl Default for SharedByteRegister {
    fn default() -> Self {
        Self::new()
    }
}


// vim: ts=4 sw=4 expandtab
