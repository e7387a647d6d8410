// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::ports::{PB_DEBUG, PORTB};
use avr_context::{MainCtx, MainCtxCell};
use stepctrl_core::debug::{Debug, DebugLog, NRVALUES};

/// Latest value of each [Debug] id. Read it with a debugger.
#[unsafe(no_mangle)]
static DEBUG_VALUES: [MainCtxCell<i16>; NRVALUES] = [
    MainCtxCell::new(0),
    MainCtxCell::new(0),
    MainCtxCell::new(0),
    MainCtxCell::new(0),
    MainCtxCell::new(0),
];

/// Short pulse on the debug pin.
#[allow(dead_code)]
pub fn debug_pulse(_m: &MainCtx) {
    PORTB.write_pin(PB_DEBUG, true);
    PORTB.write_pin(PB_DEBUG, false);
}

pub struct DebugTable<'a> {
    m: &'a MainCtx<'a>,
}

impl<'a> DebugTable<'a> {
    pub fn new(m: &'a MainCtx<'a>) -> Self {
        Self { m }
    }
}

impl DebugLog for DebugTable<'_> {
    fn log(&mut self, id: Debug, value: i16) {
        if let Some(v) = DEBUG_VALUES.get(id as usize) {
            v.set(self.m, value);
        }
        #[cfg(feature = "debug")]
        if matches!(id, Debug::HomingPhase | Debug::Fault) {
            debug_pulse(self.m);
        }
    }
}

// vim: ts=4 sw=4 expandtab
