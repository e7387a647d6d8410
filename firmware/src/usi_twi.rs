// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    context::IrqCtxCell,
    hw::mcu,
    ports::{PB_SCL, PB_SDA, PORTB},
};
use avr_context::{InitCtx, InitCtxCell, IrqCtx, MainCtx};
use stepctrl_core::{
    config::TWI_ADDRESS,
    shared::SharedByteRegister,
    twi::{TwiSlave, UsiCount, UsiTwi, detach},
};

/// The received position byte.
pub static REGISTER: SharedByteRegister = SharedByteRegister::new();

static SLAVE: IrqCtxCell<TwiSlave> = IrqCtxCell::new(TwiSlave::new(TWI_ADDRESS));

#[allow(non_snake_case)]
pub struct Dp {
    pub USI: mcu::USI,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static DP: InitCtxCell<Dp> = unsafe { InitCtxCell::uninit() };

impl Dp {
    #[rustfmt::skip]
    pub fn setup(&self, _: &InitCtx) {
        // USI pins on PORTB.
        self.USI.usipp().write(|w| w);
        self.USI.usidr().write(|w| w.set(0xFF));
        self.USI.usicr().write(|w| {
            w.usisie().set_bit()
             .usiwm().two_wire()
             .usics().ext_pos()
        });
        self.USI.usisr().write(|w| {
            w.usisif().set_bit()
             .usioif().set_bit()
             .usipf().set_bit()
             .usidc().set_bit()
        });
    }
}

/// The USI in two-wire slave mode.
struct Usi;

impl UsiTwi for Usi {
    fn scl(&self) -> bool {
        PORTB.read_pin(PB_SCL)
    }

    fn sda(&self) -> bool {
        PORTB.read_pin(PB_SDA)
    }

    fn data(&self) -> u8 {
        DP.USI.usidr().read().bits()
    }

    fn set_data(&mut self, data: u8) {
        DP.USI.usidr().write(|w| w.set(data));
    }

    fn drive_sda(&mut self, drive: bool) {
        PORTB.set_output(PB_SDA, drive);
    }

    #[rustfmt::skip]
    fn set_overflow(&mut self, enable: bool) {
        if enable {
            // Hold SCL low after each counter overflow.
            DP.USI.usicr().write(|w| {
                w.usisie().set_bit()
                 .usioie().set_bit()
                 .usiwm().two_wire_slave()
                 .usics().ext_pos()
            });
        } else {
            DP.USI.usicr().write(|w| {
                w.usisie().set_bit()
                 .usiwm().two_wire()
                 .usics().ext_pos()
            });
        }
    }

    #[rustfmt::skip]
    fn release(&mut self, count: UsiCount) {
        // Writing the flags clears them and releases the SCL hold.
        DP.USI.usisr().write(|w| {
            w.usisif().set_bit()
             .usioif().set_bit()
             .usipf().set_bit()
             .usidc().set_bit()
             .usicnt().set(count.counter())
        });
    }

    #[rustfmt::skip]
    fn shutdown(&mut self) {
        DP.USI.usicr().write(|w| w);
        DP.USI.usisr().write(|w| {
            w.usisif().set_bit()
             .usioif().set_bit()
             .usipf().set_bit()
             .usidc().set_bit()
        });
        // Float both lines.
        PORTB.set_output(PB_SCL, false);
        PORTB.write_pin(PB_SCL, false);
        PORTB.write_pin(PB_SDA, false);
    }
}

pub fn irq_handler_usi_start(c: &mut IrqCtx) {
    SLAVE.with(c, |slave| slave.start_condition(&mut Usi));
}

pub fn irq_handler_usi_ovf(c: &mut IrqCtx) {
    SLAVE.with(c, |slave| slave.counter_overflow(&mut Usi, &REGISTER));
}

/// Release the bus for good.
///
/// Interrupts must be disabled.
pub fn usi_detach(_m: &MainCtx) {
    detach(&mut Usi);
}

// vim: ts=4 sw=4 expandtab
