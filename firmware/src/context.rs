// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use avr_context::IrqCtx;
use core::cell::UnsafeCell;

/// Cell that can only be accessed from interrupt context.
///
/// Interrupts do not nest. Therefore, there is never more than one
/// mutable reference at a time.
pub struct IrqCtxCell<T>(UnsafeCell<T>);

impl<T> IrqCtxCell<T> {
    #[inline(always)]
    pub const fn new(inner: T) -> Self {
        Self(UnsafeCell::new(inner))
    }

    #[inline(always)]
    pub fn with<R>(&self, _: &mut IrqCtx, f: impl FnOnce(&mut T) -> R) -> R {
        // SAFETY: Only one IrqCtx exists at a time. It is mutably borrowed
        //         for the duration of `f`, so `f` can't re-enter.
        f(unsafe { &mut *self.0.get() })
    }
}

// SAFETY: Access requires an IrqCtx. ISRs never run concurrently.
unsafe impl<T> Sync for IrqCtxCell<T> {}

/// Cheaper Option::unwrap() alternative.
///
/// This is cheaper, because it doesn't call into the panic unwind path.
#[inline(always)]
pub fn unwrap_option<T>(value: Option<T>) -> T {
    match value {
        Some(value) => value,
        None => reset_system(),
    }
}

/// Reset the system.
#[inline(always)]
#[allow(clippy::empty_loop)]
pub fn reset_system() -> ! {
    loop {
        // Wait for the watchdog timer to trigger and reset the system.
        // No interrupt will reset the watchdog timer.
    }
}

#[inline(always)]
#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    reset_system();
}

// vim: ts=4 sw=4 expandtab
