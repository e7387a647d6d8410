// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

pub use attiny::{self as mcu, Peripherals};
pub use avr_device::attiny861a as attiny;
pub use avr_device::interrupt;

use avr_context::IrqCtx;

macro_rules! define_isr {
    ($name:ident, $handler:path) => {
        #[avr_device::interrupt(attiny861a)]
        fn $name() {
            // SAFETY: We are inside of an interrupt handler.
            // Therefore, it is safe to construct an `IrqCtx`.
            let mut c = unsafe { IrqCtx::new() };
            $handler(&mut c);
        }
    };
}

define_isr!(PCINT, crate::exint::irq_handler_pcint);
define_isr!(USI_START, crate::usi_twi::irq_handler_usi_start);
define_isr!(USI_OVF, crate::usi_twi::irq_handler_usi_ovf);

// vim: ts=4 sw=4 expandtab
