// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Observable debug values.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Debug {
    /// Homing phase that just started (1..=4), 0 when done.
    HomingPhase,
    /// Steps taken by the last finished homing phase.
    HomingSteps,
    Position,
    Target,
    /// `Fault` code of the fail-stop, 0 = no fault.
    Fault,
}
pub const NRVALUES: usize = 5;

/// Sink for debug values.
pub trait DebugLog {
    fn log(&mut self, id: Debug, value: i16);

    fn log_u16(&mut self, id: Debug, value: u16) {
        self.log(id, value as i16);
    }
}

/// Discard everything.
impl DebugLog for () {
    #[inline(always)]
    fn log(&mut self, _id: Debug, _value: i16) {}
}

// vim: ts=4 sw=4 expandtab
