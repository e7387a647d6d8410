// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{hw::mcu, system::wdt_poke};
use avr_context::{InitCtx, InitCtxCell, MainCtx};
use embedded_hal::delay::DelayNs;

#[allow(non_snake_case)]
pub struct Dp {
    pub TC1: mcu::TC1,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static DP: InitCtxCell<Dp> = unsafe { InitCtxCell::uninit() };

pub const TIMER_TICK_US: u8 = 16; // 16 us per tick.

/// Longest busy wait between two timer reads. Must be well below the timer period.
const MAX_CHUNK_TICKS: u8 = 0x7F;

impl Dp {
    #[rustfmt::skip]
    pub fn setup(&self, _: &InitCtx) {
        // Timer 1 configuration:
        // CS: 256 -> 16 us per timer tick.
        self.TC1.tc1h().write(|w| w);
        self.TC1.tcnt1().write(|w| w);
        self.TC1.tccr1a().write(|w| w);
        self.TC1.tccr1c().write(|w| w);
        self.TC1.tccr1d().write(|w| w);
        self.TC1.tccr1e().write(|w| w);
        self.TC1.ocr1c().write(|w| w.set(0xFF)); // TOP value
        self.TC1.dt1().write(|w| w);
        self.TC1.tccr1b().write(|w| w.cs1().prescale_256());
    }
}

/// Convert microseconds to timer ticks. Rounds up.
#[inline]
pub const fn micros_to_ticks(us: u32) -> u32 {
    us.div_ceil(TIMER_TICK_US as u32)
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Timestamp(pub u8);

impl core::ops::Sub for Timestamp {
    type Output = u8;

    /// Ticks elapsed between two timestamps.
    #[inline]
    fn sub(self, other: Self) -> Self::Output {
        self.0.wrapping_sub(other.0)
    }
}

#[inline(always)]
pub fn timer_get() -> Timestamp {
    Timestamp(DP.TC1.tcnt1().read().bits())
}

/// Busy waiting delay on the free running timer.
///
/// The watchdog is fed while waiting.
pub struct Delay<'a> {
    m: &'a MainCtx<'a>,
}

impl<'a> Delay<'a> {
    pub fn new(m: &'a MainCtx<'a>) -> Self {
        Self { m }
    }

    fn wait_ticks(&mut self, ticks: u8) {
        let begin = timer_get();
        while timer_get() - begin < ticks {}
    }
}

impl DelayNs for Delay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        let mut ticks = micros_to_ticks(us);
        while ticks > 0 {
            let chunk = ticks.min(MAX_CHUNK_TICKS as u32);
            self.wait_ticks(chunk as u8);
            ticks -= chunk;
            wdt_poke(self.m);
        }
    }
}

// vim: ts=4 sw=4 expandtab
