// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::ports::{PA_DIR, PA_FAULT, PA_HEARTBEAT, PA_STEP, PORTA};
use avr_context::MainCtx;
use core::{convert::Infallible, marker::PhantomData};
use embedded_hal::digital::{ErrorType, OutputPin};

/// Direction line level that moves the carriage up.
pub const DIR_UP_LEVEL: bool = true;

/// The fault indicator is lit by a high level.
pub const FAULT_ACTIVE_HIGH: bool = true;

/// Output line on PORTA. Only usable from main context.
///
/// `INVERT` maps the logical level to the inverted electrical level.
pub struct PortAPin<'a, const BIT: usize, const INVERT: bool> {
    _m: PhantomData<&'a MainCtx<'a>>,
}

impl<'a, const BIT: usize, const INVERT: bool> PortAPin<'a, BIT, INVERT> {
    pub fn new(_m: &'a MainCtx<'a>) -> Self {
        Self { _m: PhantomData }
    }

    pub fn toggle(&mut self) {
        PORTA.write_pin(BIT, !PORTA.read_output(BIT));
    }
}

impl<const BIT: usize, const INVERT: bool> ErrorType for PortAPin<'_, BIT, INVERT> {
    type Error = Infallible;
}

impl<const BIT: usize, const INVERT: bool> OutputPin for PortAPin<'_, BIT, INVERT> {
    #[inline(always)]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        PORTA.write_pin(BIT, !INVERT);
        Ok(())
    }

    #[inline(always)]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        PORTA.write_pin(BIT, INVERT);
        Ok(())
    }
}

pub type StepPin<'a> = PortAPin<'a, PA_STEP, false>;
pub type DirPin<'a> = PortAPin<'a, PA_DIR, false>;
pub type FaultPin<'a> = PortAPin<'a, PA_FAULT, { !FAULT_ACTIVE_HIGH }>;
pub type HeartbeatPin<'a> = PortAPin<'a, PA_HEARTBEAT, false>;

// vim: ts=4 sw=4 expandtab
