// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    debug::DebugTable,
    exint::LIMITS,
    hw::interrupt,
    pins::{DIR_UP_LEVEL, DirPin, FaultPin, HeartbeatPin, StepPin},
    timer::Delay,
    usi_twi::{REGISTER, usi_detach},
};
use avr_context::MainCtx;
use stepctrl_core::{
    config::{CONTROL_PARAMS, HOMING_PARAMS},
    control::{Actuator, Status},
    motion::Stepper,
};

#[cfg(feature = "stackmon")]
use avr_stack::estimate_unused_stack_space;
#[cfg(feature = "stackmon")]
use stepctrl_core::control::Fault;

/// Toggle the heartbeat output every this many control loop iterations.
const HEARTBEAT_DIV: u8 = 50;

/// Minimum amount of CPU stack space that must be free all the time.
/// Fail-stop, if less stack space is free.
#[cfg(feature = "stackmon")]
const MIN_STACK_SPACE: u16 = 64;

#[inline(always)]
pub fn wdt_poke(_m: &MainCtx) {
    avr_device::asm::wdr();
}

/// Home the axis and then follow the position register forever.
pub fn system_run(m: &MainCtx) -> ! {
    let stepper = Stepper::new(StepPin::new(m), DirPin::new(m), DIR_UP_LEVEL);
    let mut act = Actuator::new(
        stepper,
        FaultPin::new(m),
        Delay::new(m),
        DebugTable::new(m),
        HOMING_PARAMS,
        CONTROL_PARAMS,
    );
    let mut heartbeat = HeartbeatPin::new(m);
    let mut beat: u8 = 0;

    act.home(&LIMITS);

    loop {
        act.run_once(&LIMITS, &REGISTER);

        #[cfg(feature = "stackmon")]
        if estimate_unused_stack_space() < MIN_STACK_SPACE {
            act.halt(Fault::LowStack);
        }

        if let Status::Halted(_) = act.status() {
            halt(m);
        }

        beat += 1;
        if beat >= HEARTBEAT_DIV {
            beat = 0;
            heartbeat.toggle();
        }

        wdt_poke(m);
    }
}

/// Terminal fail-stop.
///
/// The fault output has already been asserted.
/// Interrupts are off and the USI is off, so the limit switches are ignored
/// and the bus lines are released for the other bus devices.
/// The watchdog is kept alive to prevent a reset and a new homing run.
/// Only a power cycle leaves this state.
fn halt(m: &MainCtx) -> ! {
    interrupt::disable();
    usi_detach(m);
    loop {
        wdt_poke(m);
    }
}

// vim: ts=4 sw=4 expandtab
