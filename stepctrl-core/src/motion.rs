// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{config::PULSE_REF_US, limit::LimitSwitchMonitor, speed::Speed};
use core::convert::Infallible;
use derive_more::{Add, AddAssign, Sub, SubAssign};
use embedded_hal::{
    delay::DelayNs,
    digital::{OutputPin, PinState},
};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub const fn sign(self) -> i16 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// Signed step position. Up is positive.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Add, Sub, AddAssign, SubAssign,
)]
pub struct Position(pub i16);

impl Position {
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Direction and step count needed to travel this distance.
    /// `None` if the distance is zero.
    pub fn travel(self) -> Option<(Direction, u16)> {
        match self.0 {
            0 => None,
            d if d > 0 => Some((Direction::Up, d.unsigned_abs())),
            d => Some((Direction::Down, d.unsigned_abs())),
        }
    }

    pub fn advance(&mut self, dir: Direction, steps: u16) {
        *self += Position(dir.sign().wrapping_mul(steps as i16));
    }
}

#[inline]
pub(crate) fn drive<P: OutputPin<Error = Infallible>>(pin: &mut P, high: bool) {
    match pin.set_state(PinState::from(high)) {
        Ok(()) => (),
        Err(e) => match e {},
    }
}

/// Step/direction driver.
pub struct Stepper<STEP, DIR> {
    step: STEP,
    dir: DIR,
    dir_up_level: bool,
    last_dir: Direction,
}

impl<STEP, DIR> Stepper<STEP, DIR>
where
    STEP: OutputPin<Error = Infallible>,
    DIR: OutputPin<Error = Infallible>,
{
    /// `dir_up_level` is the direction pin level that moves the carriage up.
    pub fn new(mut step: STEP, mut dir: DIR, dir_up_level: bool) -> Self {
        drive(&mut step, false);
        drive(&mut dir, dir_up_level);
        Self {
            step,
            dir,
            dir_up_level,
            last_dir: Direction::Up,
        }
    }

    pub fn last_direction(&self) -> Direction {
        self.last_dir
    }

    fn set_direction(&mut self, dir: Direction) {
        let level = match dir {
            Direction::Up => self.dir_up_level,
            Direction::Down => !self.dir_up_level,
        };
        drive(&mut self.dir, level);
        self.last_dir = dir;
    }

    /// Emit up to `max_steps` step pulses.
    ///
    /// Stops after the first pulse that completes while the
    /// limit switch monitor reports a change.
    /// Returns the number of completed pulses.
    pub fn move_steps(
        &mut self,
        delay: &mut impl DelayNs,
        limits: &LimitSwitchMonitor,
        dir: Direction,
        max_steps: u16,
        speed: Speed,
    ) -> u16 {
        if dir != self.last_dir {
            self.set_direction(dir);
        }
        limits.clear_changed();

        let phase_us = speed.phase_us(PULSE_REF_US);
        let mut steps = 0;
        while steps < max_steps {
            drive(&mut self.step, true);
            delay.delay_us(phase_us);
            drive(&mut self.step, false);
            delay.delay_us(phase_us);
            steps += 1;

            if limits.take_changed() {
                break;
            }
        }
        steps
    }
}


// vim: ts=4 sw=4 expandtab
