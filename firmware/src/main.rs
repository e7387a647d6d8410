// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]
#![feature(asm_experimental_arch)]

mod context;
mod debug;
mod exint;
mod hw;
mod pins;
mod ports;
mod system;
mod timer;
mod usi_twi;

use crate::{
    context::unwrap_option,
    exint::{EXINT, ExInt, LIMITS, limit_levels},
    hw::{Peripherals, interrupt},
    ports::{PORTA, PORTB, PortA, PortB},
    system::system_run,
};
use avr_context::MainCtx;

fn wdt_init() {
    // SAFETY: The asm code only accesses the WDT registers
    //         which are not accessed from anywhere else in the program.
    unsafe {
        // Enable WDT with timeout 32.5 ms
        core::arch::asm!(
            "ldi {tmp}, 0x10", // WDCE=1
            "out {WDTCR}, {tmp}",
            "ldi {tmp}, 0x19", // WDCE=1, WDE=1, WDP2=0, WDP1=0, WDP0=1
            "out {WDTCR}, {tmp}",
            tmp = out(reg_upper) _,
            WDTCR = const 0x21,
            options(nostack, preserves_flags)
        );
    }
}

#[avr_device::entry]
fn main() -> ! {
    wdt_init();

    let dp = unwrap_option(Peripherals::take());

    let porta = PortA { PORTA: dp.PORTA };
    let portb = PortB { PORTB: dp.PORTB };
    let exint = ExInt { EXINT: dp.EXINT };
    let timer = timer::Dp { TC1: dp.TC1 };
    let usi = usi_twi::Dp { USI: dp.USI };

    // SAFETY:
    // This is the context handle for the main() function.
    // Holding a reference to this object proves that the holder
    // is running in main() context.
    // Interrupts are still disabled after reset.
    let m = unsafe {
        MainCtx::new_with_init(|i| {
            porta.setup(i);
            portb.setup(i);
            timer.setup(i);
            usi.setup(i);
            exint.setup(i);

            PORTA.init(i, porta);
            PORTB.init(i, portb);
            timer::DP.init(i, timer);
            usi_twi::DP.init(i, usi);
            EXINT.init(i, exint);
        })
    };

    // Sample the switches once. From now on the pin change interrupt tracks them.
    LIMITS.init(limit_levels());

    // SAFETY: This must be after construction of MainCtx
    //         and after initialization of the InitCtxCell variables.
    unsafe { interrupt::enable() };

    system_run(&m);
}

// vim: ts=4 sw=4 expandtab
