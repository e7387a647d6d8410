// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(unused_unsafe)]

use crate::hw::mcu;
use avr_context::{InitCtx, InitCtxCell};

/// PA0: Up limit switch. Input with pull-up.
pub const PA_LIMIT_UP: usize = 0;
/// PA1: Down limit switch. Input with pull-up.
pub const PA_LIMIT_DOWN: usize = 1;
/// PA2: Stepper driver step.
pub const PA_STEP: usize = 2;
/// PA3: Stepper driver direction.
pub const PA_DIR: usize = 3;
/// PA4: Fault indicator.
pub const PA_FAULT: usize = 4;
/// PA5: Heartbeat.
pub const PA_HEARTBEAT: usize = 5;

/// PB0: USI SDA.
pub const PB_SDA: usize = 0;
/// PB2: USI SCL.
pub const PB_SCL: usize = 2;
/// PB3: Debug.
pub const PB_DEBUG: usize = 3;

#[rustfmt::skip]
macro_rules! impl_port {
    (
        $struct:ident,
        $name:ident,
        $port:ident,
        $pin:ident,
        $ddr:ident,
        $bit0:ident,
        $bit1:ident,
        $bit2:ident,
        $bit3:ident,
        $bit4:ident,
        $bit5:ident,
        $bit6:ident,
        $bit7:ident
    ) => {
        #[allow(non_snake_case)]
        pub struct $struct {
            pub $name: mcu::$name,
        }

        // SAFETY: Is initialized when constructing the MainCtx.
        pub static $name: InitCtxCell<$struct> = unsafe { InitCtxCell::uninit() };

        impl $struct {
            /// Read the input level.
            #[inline(always)]
            #[allow(dead_code)]
            pub fn read_pin(&self, bit: usize) -> bool {
                let r = self.$name.$pin().read();
                match bit {
                    0 => r.$bit0().bit(),
                    1 => r.$bit1().bit(),
                    2 => r.$bit2().bit(),
                    3 => r.$bit3().bit(),
                    4 => r.$bit4().bit(),
                    5 => r.$bit5().bit(),
                    6 => r.$bit6().bit(),
                    7 => r.$bit7().bit(),
                    _ => unreachable!(),
                }
            }

            /// Set the output level (or the pull-up of an input).
            #[inline(always)]
            #[allow(dead_code)]
            pub fn write_pin(&self, bit: usize, value: bool) {
                match bit {
                    0 => self.$name.$port().modify(|_, w| w.$bit0().bit(value)),
                    1 => self.$name.$port().modify(|_, w| w.$bit1().bit(value)),
                    2 => self.$name.$port().modify(|_, w| w.$bit2().bit(value)),
                    3 => self.$name.$port().modify(|_, w| w.$bit3().bit(value)),
                    4 => self.$name.$port().modify(|_, w| w.$bit4().bit(value)),
                    5 => self.$name.$port().modify(|_, w| w.$bit5().bit(value)),
                    6 => self.$name.$port().modify(|_, w| w.$bit6().bit(value)),
                    7 => self.$name.$port().modify(|_, w| w.$bit7().bit(value)),
                    _ => unreachable!(),
                };
            }

            /// Read back the output level.
            #[inline(always)]
            #[allow(dead_code)]
            pub fn read_output(&self, bit: usize) -> bool {
                let r = self.$name.$port().read();
                match bit {
                    0 => r.$bit0().bit(),
                    1 => r.$bit1().bit(),
                    2 => r.$bit2().bit(),
                    3 => r.$bit3().bit(),
                    4 => r.$bit4().bit(),
                    5 => r.$bit5().bit(),
                    6 => r.$bit6().bit(),
                    7 => r.$bit7().bit(),
                    _ => unreachable!(),
                }
            }

            /// Switch the pin direction.
            #[inline(always)]
            #[allow(dead_code)]
            pub fn set_output(&self, bit: usize, output: bool) {
                match bit {
                    0 => self.$name.$ddr().modify(|_, w| w.$bit0().bit(output)),
                    1 => self.$name.$ddr().modify(|_, w| w.$bit1().bit(output)),
                    2 => self.$name.$ddr().modify(|_, w| w.$bit2().bit(output)),
                    3 => self.$name.$ddr().modify(|_, w| w.$bit3().bit(output)),
                    4 => self.$name.$ddr().modify(|_, w| w.$bit4().bit(output)),
                    5 => self.$name.$ddr().modify(|_, w| w.$bit5().bit(output)),
                    6 => self.$name.$ddr().modify(|_, w| w.$bit6().bit(output)),
                    7 => self.$name.$ddr().modify(|_, w| w.$bit7().bit(output)),
                    _ => unreachable!(),
                };
            }
        }
    };
}

impl_port!(
    PortA, PORTA, porta, pina, ddra, pa0, pa1, pa2, pa3, pa4, pa5, pa6, pa7
);
impl_port!(
    PortB, PORTB, portb, pinb, ddrb, pb0, pb1, pb2, pb3, pb4, pb5, pb6, pb7
);

fn pin_input(_bit: usize) -> u8 {
    0
}
fn pin_output(bit: usize) -> u8 {
    1 << bit
}
fn pin_low(_bit: usize) -> u8 {
    0
}
fn pin_high(bit: usize) -> u8 {
    1 << bit
}
fn pin_floating(_bit: usize) -> u8 {
    0
}
fn pin_pullup(bit: usize) -> u8 {
    1 << bit
}

impl PortA {
    pub fn setup(&self, _: &InitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
        //         All bit patterns are valid port configurations.
        unsafe {
            self.PORTA.porta().write(|w| {
                w.bits(
                    pin_pullup(PA_LIMIT_UP) |
                    pin_pullup(PA_LIMIT_DOWN) |
                    pin_low(PA_STEP) |
                    pin_low(PA_DIR) |
                    pin_low(PA_FAULT) |
                    pin_low(PA_HEARTBEAT) |
                    pin_low(6) | // DNC
                    pin_low(7), // DNC
                )
            });
            self.PORTA.ddra().write(|w| {
                w.bits(
                    pin_input(PA_LIMIT_UP) |
                    pin_input(PA_LIMIT_DOWN) |
                    pin_output(PA_STEP) |
                    pin_output(PA_DIR) |
                    pin_output(PA_FAULT) |
                    pin_output(PA_HEARTBEAT) |
                    pin_output(6) | // DNC
                    pin_output(7), // DNC
                )
            });
        }
    }
}

impl PortB {
    pub fn setup(&self, _: &InitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
        //         All bit patterns are valid port configurations.
        //         The USI pulls SDA and SCL low through the port driver.
        //         Therefore, both port bits must be high.
        unsafe {
            self.PORTB.portb().write(|w| {
                w.bits(
                    pin_high(PB_SDA) |
                    pin_pullup(1) | // ISP MISO
                    pin_high(PB_SCL) |
                    pin_low(PB_DEBUG) |
                    pin_floating(4) | // XTAL1
                    pin_floating(5) | // XTAL2
                    pin_low(6) | // DNC
                    pin_floating(7), // RESET, Debug-Wire
                )
            });
            self.PORTB.ddrb().write(|w| {
                w.bits(
                    pin_input(PB_SDA) |
                    pin_input(1) | // ISP MISO
                    pin_output(PB_SCL) |
                    pin_output(PB_DEBUG) |
                    pin_input(4) | // XTAL1
                    pin_input(5) | // XTAL2
                    pin_output(6) | // DNC
                    pin_input(7), // RESET, Debug-Wire
                )
            });
        }
    }
}

// vim: ts=4 sw=4 expandtab
