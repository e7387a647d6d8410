// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated linear axis with two end stop switches.

use crate::{
    debug::{Debug, DebugLog},
    limit::{LimitState, LimitSwitchMonitor},
    motion::Stepper,
};
use core::{cell::RefCell, convert::Infallible};
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, OutputPin},
};
use std::{rc::Rc, vec::Vec};

pub const DIR_UP_LEVEL: bool = true;

/// Delays at least this long are settle delays. Pulse phases are shorter.
const SETTLE_MIN_NS: u32 = 10_000_000;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Switch {
    Up,
    Down,
}

#[derive(Default)]
struct Axis {
    /// Physical carriage position. Up is positive.
    pos: i32,
    /// The down switch is asserted at or below this position.
    down_stop: i32,
    /// The up switch is asserted at or above this position.
    up_stop: i32,
    down_stuck: Option<bool>,
    up_stuck: Option<bool>,
    dir_level: bool,
    dir_writes: u32,
    step_level: bool,
    pulses: u32,
    inject_at: Option<u32>,
    elapsed_ns: u64,
    settles: u32,
    /// Force a switch level during the n-th settle delay (1-based).
    settle_stick: Option<(u32, Switch, bool)>,
}

impl Axis {
    fn stick(&mut self, switch: Switch, level: bool) {
        match switch {
            Switch::Up => self.up_stuck = Some(level),
            Switch::Down => self.down_stuck = Some(level),
        }
    }

    fn levels(&self) -> LimitState {
        LimitState::new(
            self.up_stuck.unwrap_or(self.pos >= self.up_stop),
            self.down_stuck.unwrap_or(self.pos <= self.down_stop),
        )
    }
}

pub struct Sim {
    axis: Rc<RefCell<Axis>>,
    pub limits: Rc<LimitSwitchMonitor>,
}

impl Sim {
    pub fn new(pos: i32, down_stop: i32, up_stop: i32) -> Self {
        let axis = Axis {
            pos,
            down_stop,
            up_stop,
            dir_level: DIR_UP_LEVEL,
            ..Default::default()
        };
        let limits = Rc::new(LimitSwitchMonitor::new());
        limits.init(axis.levels());
        Self {
            axis: Rc::new(RefCell::new(axis)),
            limits,
        }
    }

    pub fn stepper(&self) -> Stepper<SimStep, SimDir> {
        Stepper::new(
            SimStep {
                axis: Rc::clone(&self.axis),
                limits: Rc::clone(&self.limits),
            },
            SimDir {
                axis: Rc::clone(&self.axis),
            },
            DIR_UP_LEVEL,
        )
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay {
            axis: Rc::clone(&self.axis),
            limits: Rc::clone(&self.limits),
        }
    }

    /// Force a switch level, independent of the carriage position.
    pub fn stick_down(&self, level: bool) {
        self.axis.borrow_mut().stick(Switch::Down, level);
        self.refresh();
    }

    pub fn stick_up(&self, level: bool) {
        self.axis.borrow_mut().stick(Switch::Up, level);
        self.refresh();
    }

    /// Force a switch level while the n-th settle delay (1-based) runs.
    pub fn stick_on_settle(&self, settle: u32, switch: Switch, level: bool) {
        self.axis.borrow_mut().settle_stick = Some((settle, switch, level));
    }

    pub fn move_stops(&self, down_stop: i32, up_stop: i32) {
        let mut axis = self.axis.borrow_mut();
        axis.down_stop = down_stop;
        axis.up_stop = up_stop;
    }

    /// Bounce the up switch once during the k-th pulse.
    pub fn inject_change_after(&self, k: u32) {
        let mut axis = self.axis.borrow_mut();
        axis.inject_at = Some(axis.pulses + k);
    }

    /// Short glitch on the up switch. Levels end up unchanged.
    pub fn bounce(&self) {
        let levels = self.limits.snapshot();
        self.limits.update(LimitState::new(!levels.up, levels.down));
        self.limits.update(levels);
    }

    fn refresh(&self) {
        let levels = self.axis.borrow().levels();
        self.limits.update(levels);
    }

    pub fn physical(&self) -> i32 {
        self.axis.borrow().pos
    }

    pub fn pulses(&self) -> u32 {
        self.axis.borrow().pulses
    }

    pub fn dir_writes(&self) -> u32 {
        self.axis.borrow().dir_writes
    }

    pub fn elapsed_us(&self) -> u64 {
        self.axis.borrow().elapsed_ns / 1000
    }
}

pub struct SimStep {
    axis: Rc<RefCell<Axis>>,
    limits: Rc<LimitSwitchMonitor>,
}

impl ErrorType for SimStep {
    type Error = Infallible;
}

impl OutputPin for SimStep {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        let (levels, inject) = {
            let mut axis = self.axis.borrow_mut();
            let rising = !axis.step_level;
            axis.step_level = true;
            if !rising {
                return Ok(());
            }
            axis.pulses += 1;
            axis.pos += if axis.dir_level == DIR_UP_LEVEL { 1 } else { -1 };
            let inject = axis.inject_at == Some(axis.pulses);
            (axis.levels(), inject)
        };
        // The pin change interrupt.
        self.limits.update(levels);
        if inject {
            self.limits
                .update(LimitState::new(!levels.up, levels.down));
            self.limits.update(levels);
        }
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.axis.borrow_mut().step_level = false;
        Ok(())
    }
}

pub struct SimDir {
    axis: Rc<RefCell<Axis>>,
}

impl ErrorType for SimDir {
    type Error = Infallible;
}

impl OutputPin for SimDir {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut axis = self.axis.borrow_mut();
        axis.dir_level = true;
        axis.dir_writes += 1;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut axis = self.axis.borrow_mut();
        axis.dir_level = false;
        axis.dir_writes += 1;
        Ok(())
    }
}

pub struct SimDelay {
    axis: Rc<RefCell<Axis>>,
    limits: Rc<LimitSwitchMonitor>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let levels = {
            let mut axis = self.axis.borrow_mut();
            axis.elapsed_ns += ns as u64;
            if ns < SETTLE_MIN_NS {
                return;
            }
            axis.settles += 1;
            match axis.settle_stick {
                Some((n, switch, level)) if n == axis.settles => {
                    axis.stick(switch, level);
                    axis.levels()
                }
                _ => return,
            }
        };
        // The pin change interrupt.
        self.limits.update(levels);
    }
}

/// Plain output pin, e.g. the fault indicator.
#[derive(Clone, Default)]
pub struct SimPin {
    level: Rc<core::cell::Cell<bool>>,
}

impl SimPin {
    pub fn is_high(&self) -> bool {
        self.level.get()
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.set(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level.set(false);
        Ok(())
    }
}

/// Records all debug values.
#[derive(Default)]
pub struct RecLog {
    pub entries: Vec<(Debug, i16)>,
}

impl RecLog {
    pub fn values(&self, id: Debug) -> Vec<i16> {
        self.entries
            .iter()
            .filter(|(i, _)| *i == id)
            .map(|(_, v)| *v)
            .collect()
    }
}

impl DebugLog for RecLog {
    fn log(&mut self, id: Debug, value: i16) {
        self.entries.push((id, value));
    }
}

// vim: ts=4 sw=4 expandtab
