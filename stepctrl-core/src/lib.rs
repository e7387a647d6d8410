// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hardware independent core of the stepper position actuator.
//!
//! Everything in here runs on the AVR target and on the build host.
//! The hardware is reached through `embedded-hal` traits and through
//! the [twi::UsiTwi] peripheral abstraction.

#![no_std]

pub mod config;
pub mod control;
pub mod debug;
pub mod homing;
pub mod limit;
pub mod motion;
pub mod shared;
pub mod speed;
pub mod twi;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod sim;

// vim: ts=4 sw=4 expandtab
