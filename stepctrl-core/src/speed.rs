// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Step speed relative to the reference pulse width.
///
/// Unsigned fixed point with 8 fractional bits.
/// `Speed::ONE` produces pulses of exactly the reference width.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Speed(u16);

macro_rules! speed {
    ($numerator:literal / $denominator:literal) => {
        $crate::speed::Speed::from_fraction($numerator, $denominator)
    };
    ($numerator:literal) => {
        $crate::speed::Speed::from_int($numerator)
    };
}
pub(crate) use speed;

impl Speed {
    pub const SHIFT: usize = 8;
    pub const ONE: Self = Self(1 << Self::SHIFT);

    pub const fn from_int(int: u8) -> Self {
        Self((int as u16) << Self::SHIFT)
    }

    pub const fn from_fraction(numerator: u16, denominator: u16) -> Self {
        let mut q: u32 = 1 << Self::SHIFT;
        q *= numerator as u32;
        q /= denominator as u32;
        if q > u16::MAX as u32 {
            Self(u16::MAX)
        } else {
            Self(q as u16)
        }
    }

    pub const fn to_q(self) -> u16 {
        self.0
    }

    /// Duration of one pulse phase (high or low) in microseconds.
    ///
    /// Inversely proportional to the speed.
    /// A zero speed is treated as the slowest representable speed.
    pub const fn phase_us(self, ref_us: u16) -> u32 {
        let q = if self.0 == 0 { 1 } else { self.0 as u32 };
        ((ref_us as u32) << Self::SHIFT) / q
    }
}


// vim: ts=4 sw=4 expandtab
