// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-wire bus slave on top of a shift register with a 4 bit edge counter.
//!
//! Only two transactions exist:
//! a one byte write (stored into the [SharedByteRegister]) and
//! a one byte read (returns the [SharedByteRegister]).
//!
//! The engine is driven by two interrupts:
//! The start condition interrupt calls [TwiSlave::start_condition]
//! and the counter overflow interrupt calls [TwiSlave::counter_overflow].
//! The peripheral holds SCL low after every counter overflow until
//! [UsiTwi::release] is called. That stretches the clock while software
//! inspects or prepares a byte or an acknowledge bit.

use crate::{config::START_SETTLE_POLLS, shared::SharedByteRegister};

/// General call address.
pub const BROADCAST_ADDRESS: u8 = 0;

/// Number of SCL edges to count until the next counter overflow.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UsiCount {
    /// 8 data bits. 16 edges.
    Byte,
    /// One acknowledge bit. 2 edges.
    Bit,
}

impl UsiCount {
    /// Preset for the 4 bit counter.
    pub const fn counter(self) -> u8 {
        match self {
            UsiCount::Byte => 0,
            UsiCount::Bit => 16 - 2,
        }
    }
}

/// The shift register peripheral in two-wire mode.
pub trait UsiTwi {
    /// Current SCL line level.
    fn scl(&self) -> bool;

    /// Current SDA line level.
    fn sda(&self) -> bool;

    /// Read the shift register.
    fn data(&self) -> u8;

    /// Write the shift register. The msb appears on SDA, if SDA is driven.
    fn set_data(&mut self, data: u8);

    /// Drive SDA from the shift register (`true`) or release it (`false`).
    fn drive_sda(&mut self, drive: bool);

    /// Enable or disable the counter overflow interrupt
    /// together with the SCL hold on counter overflow.
    /// Start condition detection is always enabled.
    fn set_overflow(&mut self, enable: bool);

    /// Clear all pending flags, preset the counter and release SCL.
    fn release(&mut self, count: UsiCount);

    /// Switch the peripheral off. Neither SDA nor SCL is held afterwards
    /// and no further start condition is detected.
    fn shutdown(&mut self);
}

/// Leave the bus for good.
///
/// Releases both lines, whatever state the engine is in.
/// Other devices on the bus keep working.
pub fn detach(hw: &mut impl UsiTwi) {
    hw.set_overflow(false);
    hw.drive_sda(false);
    hw.shutdown();
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum TwiState {
    /// The next byte is an address byte.
    CheckAddress,
    /// The address acknowledge is on the bus. A data byte from the master follows.
    DataRead,
    /// A data byte from the master is in the shift register.
    DataReadAck,
    /// The address acknowledge is on the bus. Our data byte follows.
    DataSend,
    /// Our data byte has been shifted out. The master acknowledge follows.
    DataSendAck,
    /// Transaction complete. Idle until the next start condition.
    Done,
}

/// Result of the start condition line settling.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StartOutcome {
    /// SCL went low. A transaction begins.
    Start,
    /// SDA went high while SCL stayed high.
    Stop,
    /// The lines did not settle in time. Ignore the bus until the next start.
    Timeout,
}

pub struct TwiSlave {
    address: u8,
    state: TwiState,
}

impl TwiSlave {
    pub const fn new(address: u8) -> Self {
        Self {
            address: address & 0x7F,
            state: TwiState::CheckAddress,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn state(&self) -> TwiState {
        self.state
    }

    fn matches(&self, address: u8) -> bool {
        address == self.address || address == BROADCAST_ADDRESS
    }

    /// Start condition interrupt handler.
    ///
    /// A start condition unconditionally aborts whatever
    /// transaction has been in progress.
    pub fn start_condition(&mut self, hw: &mut impl UsiTwi) -> StartOutcome {
        hw.drive_sda(false);
        self.state = TwiState::CheckAddress;

        // Wait until the master either pulls SCL low (start complete)
        // or releases SDA (stop condition).
        let mut polls = START_SETTLE_POLLS;
        let outcome = loop {
            if !hw.scl() {
                break StartOutcome::Start;
            }
            if hw.sda() {
                break StartOutcome::Stop;
            }
            if polls == 0 {
                break StartOutcome::Timeout;
            }
            polls -= 1;
        };

        match outcome {
            StartOutcome::Start => {
                hw.set_overflow(true);
            }
            StartOutcome::Stop => {
                hw.set_overflow(false);
                self.state = TwiState::Done;
            }
            StartOutcome::Timeout => {
                hw.set_overflow(false);
            }
        }
        hw.release(UsiCount::Byte);

        outcome
    }

    /// Counter overflow interrupt handler.
    pub fn counter_overflow(&mut self, hw: &mut impl UsiTwi, reg: &SharedByteRegister) {
        match self.state {
            TwiState::CheckAddress => {
                let data = hw.data();
                if self.matches(data >> 1) {
                    self.state = if data & 1 == 0 {
                        TwiState::DataRead
                    } else {
                        TwiState::DataSend
                    };
                    send_ack(hw);
                } else {
                    // Not for us. Stay quiet until the next start condition.
                    wait_for_start(hw);
                }
            }
            TwiState::DataRead => {
                hw.drive_sda(false);
                hw.release(UsiCount::Byte);
                self.state = TwiState::DataReadAck;
            }
            TwiState::DataReadAck => {
                reg.store(hw.data());
                send_ack(hw);
                self.state = TwiState::Done;
            }
            TwiState::DataSend => {
                hw.set_data(reg.load());
                hw.drive_sda(true);
                hw.release(UsiCount::Byte);
                self.state = TwiState::DataSendAck;
            }
            TwiState::DataSendAck => {
                // Clock in the master acknowledge and ignore it.
                hw.drive_sda(false);
                hw.release(UsiCount::Bit);
                self.state = TwiState::Done;
            }
            TwiState::Done => {
                wait_for_start(hw);
            }
        }
    }
}

fn send_ack(hw: &mut impl UsiTwi) {
    hw.set_data(0);
    hw.drive_sda(true);
    hw.release(UsiCount::Bit);
}

fn wait_for_start(hw: &mut impl UsiTwi) {
    hw.set_overflow(false);
    hw.drive_sda(false);
    hw.release(UsiCount::Byte);
}


// vim: ts=4 sw=4 expandtab
