// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::speed::{Speed, speed};

/// 7 bit bus address of the actuator.
pub const TWI_ADDRESS: u8 = 0x26;

/// Maximum number of line polls in the start condition handler
/// while waiting for SCL to fall (start) or SDA to rise (stop).
pub const START_SETTLE_POLLS: u16 = 1000;

/// Pulse phase width at `Speed::ONE`, in microseconds.
/// One full step pulse is twice this long.
pub const PULSE_REF_US: u16 = 500;

/// Target steps per unit of the received position byte.
pub const POSITION_SCALE: i16 = 8;

/// Step budget for leaving an asserted up-limit switch.
pub const MAX_UP_HOMING_BACKOFF: u16 = 400;
/// Step budget for finding the down-limit switch.
/// Must be larger than the full mechanical travel.
pub const MAX_HOMING_STEPS: u16 = 4000;
/// Step budget for leaving the down-limit switch.
pub const MAX_BACKOFF_STEPS: u16 = 400;
/// Unchecked clearance after leaving the down-limit switch.
pub const EXTRA_BACKOFF_STEPS: u16 = 20;

/// Settle time after each homing phase, in milliseconds.
pub const SETTLE_MS: u32 = 50;

pub const HOMING_SPEED: Speed = speed!(1 / 2);
pub const CRUISE_SPEED: Speed = speed!(1);

/// Homing phase budgets and timing.
#[derive(Clone, Debug)]
pub struct HomingParams {
    pub max_up_backoff: u16,
    pub max_seek: u16,
    pub max_down_backoff: u16,
    pub extra_backoff: u16,
    pub settle_ms: u32,
    pub speed: Speed,
}

pub const HOMING_PARAMS: HomingParams = HomingParams {
    max_up_backoff: MAX_UP_HOMING_BACKOFF,
    max_seek: MAX_HOMING_STEPS,
    max_down_backoff: MAX_BACKOFF_STEPS,
    extra_backoff: EXTRA_BACKOFF_STEPS,
    settle_ms: SETTLE_MS,
    speed: HOMING_SPEED,
};

/// Position control loop parameters.
#[derive(Clone, Debug)]
pub struct ControlParams {
    pub scale: i16,
    pub speed: Speed,
}

pub const CONTROL_PARAMS: ControlParams = ControlParams {
    scale: POSITION_SCALE,
    speed: CRUISE_SPEED,
};

const _: () = assert!(POSITION_SCALE > 0);
const _: () = assert!((u8::MAX as i32) * (POSITION_SCALE as i32) <= i16::MAX as i32);
const _: () = assert!((u8::MAX as i32) * (POSITION_SCALE as i32) < MAX_HOMING_STEPS as i32);

// vim: ts=4 sw=4 expandtab
