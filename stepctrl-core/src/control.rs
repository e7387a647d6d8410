// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    config::{ControlParams, HomingParams},
    debug::{Debug, DebugLog},
    homing::{Homing, HomingError},
    limit::LimitSwitchMonitor,
    motion::{Direction, Position, Stepper, drive},
    shared::SharedByteRegister,
};
use core::convert::Infallible;
use embedded_hal::{delay::DelayNs, digital::OutputPin};

/// Reason for the fail-stop.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Fault {
    Homing(HomingError),
    /// Both limit switches asserted during normal operation.
    BothLimits,
    /// Not enough free stack space.
    LowStack,
}

impl Fault {
    pub const fn code(&self) -> i16 {
        match self {
            Fault::Homing(e) => *e as i16,
            Fault::BothLimits => 0x10,
            Fault::LowStack => 0x11,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Status {
    /// Homing has not run yet.
    Unhomed,
    /// Homed. Following the target position.
    Running,
    /// Fail-stop. Terminal. Only an external power cycle recovers.
    Halted(Fault),
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MotorState {
    /// Only meaningful if `homed` is set.
    pub position: Position,
    pub homed: bool,
    pub target: Position,
}

/// Target step position for a received position byte.
pub const fn target_from_byte(byte: u8, scale: i16) -> Position {
    Position(byte as i16 * scale)
}

pub struct Actuator<STEP, DIR, FAULT, D, L> {
    stepper: Stepper<STEP, DIR>,
    fault: FAULT,
    delay: D,
    log: L,
    motor: MotorState,
    status: Status,
    homing: HomingParams,
    control: ControlParams,
}

impl<STEP, DIR, FAULT, D, L> Actuator<STEP, DIR, FAULT, D, L>
where
    STEP: OutputPin<Error = Infallible>,
    DIR: OutputPin<Error = Infallible>,
    FAULT: OutputPin<Error = Infallible>,
    D: DelayNs,
    L: DebugLog,
{
    /// `fault` is driven high to signal the fail-stop.
    pub fn new(
        stepper: Stepper<STEP, DIR>,
        mut fault: FAULT,
        delay: D,
        log: L,
        homing: HomingParams,
        control: ControlParams,
    ) -> Self {
        drive(&mut fault, false);
        Self {
            stepper,
            fault,
            delay,
            log,
            motor: MotorState {
                position: Position::zero(),
                homed: false,
                target: Position::zero(),
            },
            status: Status::Unhomed,
            homing,
            control,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn motor(&self) -> &MotorState {
        &self.motor
    }

    pub fn last_direction(&self) -> Direction {
        self.stepper.last_direction()
    }

    /// Run the homing sequence.
    ///
    /// Does nothing unless the actuator is still unhomed.
    pub fn home(&mut self, limits: &LimitSwitchMonitor) -> Status {
        if self.status == Status::Unhomed {
            let res = Homing::new(&self.homing).run(
                &mut self.stepper,
                &mut self.delay,
                limits,
                &mut self.log,
            );
            match res {
                Ok(()) => {
                    self.motor.position = Position::zero();
                    self.motor.target = Position::zero();
                    self.motor.homed = true;
                    self.status = Status::Running;
                }
                Err(e) => self.halt(Fault::Homing(e)),
            }
        }
        self.status
    }

    /// One control loop iteration.
    ///
    /// Moves toward the current target in one uninterruptible burst
    /// and afterwards picks up the latest position byte as new target.
    pub fn run_once(&mut self, limits: &LimitSwitchMonitor, reg: &SharedByteRegister) {
        if self.status != Status::Running {
            return;
        }

        let levels = limits.snapshot();
        if levels.both() {
            self.halt(Fault::BothLimits);
            return;
        }

        if let Some((dir, steps)) = (self.motor.target - self.motor.position).travel() {
            let blocked = match dir {
                Direction::Up => levels.up,
                Direction::Down => levels.down,
            };
            // Never start a burst into an asserted limit switch.
            if !blocked {
                let speed = self.control.speed;
                let taken = self
                    .stepper
                    .move_steps(&mut self.delay, limits, dir, steps, speed);
                self.motor.position.advance(dir, taken);
            }
        }

        self.motor.target = target_from_byte(reg.load(), self.control.scale);

        self.log.log(Debug::Position, self.motor.position.0);
        self.log.log(Debug::Target, self.motor.target.0);
    }

    /// Enter the fail-stop state. There is no way back.
    pub fn halt(&mut self, fault: Fault) {
        drive(&mut self.fault, true);
        if matches!(self.status, Status::Halted(_)) {
            // Keep the first cause.
            return;
        }
        self.motor.homed = false;
        self.status = Status::Halted(fault);
        self.log.log(Debug::Fault, fault.code());
    }
}


// vim: ts=4 sw=4 expandtab
