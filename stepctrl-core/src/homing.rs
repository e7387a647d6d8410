// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    config::HomingParams,
    debug::{Debug, DebugLog},
    limit::{LimitState, LimitSwitchMonitor},
    motion::{Direction, Stepper},
};
use core::convert::Infallible;
use embedded_hal::{delay::DelayNs, digital::OutputPin};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum HomingError {
    /// Up-limit switch did not release within its backoff budget.
    UpBackoffExhausted = 1,
    /// Up-limit switch asserted again after settling.
    UpLimitStuck,
    /// Down-limit switch not found within the seek budget.
    DownSeekExhausted,
    /// Down-limit switch released again after settling.
    DownLimitNotReached,
    /// Down-limit switch did not release within its backoff budget.
    DownBackoffExhausted,
    /// Down-limit switch asserted again after settling.
    DownLimitStuck,
    /// Both limit switches asserted at the same time.
    BothLimits,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum HomingPhase {
    /// Leave the up-limit switch, if it is asserted.
    UpBackoff = 1,
    /// Drive down until the down-limit switch asserts.
    SeekDown,
    /// Leave the down-limit switch.
    DownBackoff,
    /// Fixed additional distance away from the down-limit switch.
    Clearance,
}

impl HomingPhase {
    pub fn next(&self) -> Option<Self> {
        match self {
            HomingPhase::UpBackoff => Some(HomingPhase::SeekDown),
            HomingPhase::SeekDown => Some(HomingPhase::DownBackoff),
            HomingPhase::DownBackoff => Some(HomingPhase::Clearance),
            HomingPhase::Clearance => None,
        }
    }
}

/// Startup homing sequence.
///
/// Runs all phases to completion. The first violated expectation aborts
/// the whole sequence. There is no retry.
pub struct Homing<'a> {
    params: &'a HomingParams,
}

impl<'a> Homing<'a> {
    pub const fn new(params: &'a HomingParams) -> Self {
        Self { params }
    }

    pub fn run<STEP, DIR>(
        &self,
        stepper: &mut Stepper<STEP, DIR>,
        delay: &mut impl DelayNs,
        limits: &LimitSwitchMonitor,
        log: &mut impl DebugLog,
    ) -> Result<(), HomingError>
    where
        STEP: OutputPin<Error = Infallible>,
        DIR: OutputPin<Error = Infallible>,
    {
        let mut phase = Some(HomingPhase::UpBackoff);
        while let Some(p) = phase {
            log.log(Debug::HomingPhase, p as i16);
            check_both(limits.snapshot())?;
            let steps = self.run_phase(p, stepper, delay, limits)?;
            log.log_u16(Debug::HomingSteps, steps);
            phase = p.next();
        }
        log.log(Debug::HomingPhase, 0);
        Ok(())
    }

    fn run_phase<STEP, DIR>(
        &self,
        phase: HomingPhase,
        stepper: &mut Stepper<STEP, DIR>,
        delay: &mut impl DelayNs,
        limits: &LimitSwitchMonitor,
    ) -> Result<u16, HomingError>
    where
        STEP: OutputPin<Error = Infallible>,
        DIR: OutputPin<Error = Infallible>,
    {
        let p = self.params;
        let seek = match phase {
            HomingPhase::UpBackoff => Seek {
                dir: Direction::Down,
                budget: p.max_up_backoff,
                reached: |l: LimitState| !l.up,
                exhausted: HomingError::UpBackoffExhausted,
                stuck: HomingError::UpLimitStuck,
            },
            HomingPhase::SeekDown => Seek {
                dir: Direction::Down,
                budget: p.max_seek,
                reached: |l: LimitState| l.down,
                exhausted: HomingError::DownSeekExhausted,
                stuck: HomingError::DownLimitNotReached,
            },
            HomingPhase::DownBackoff => Seek {
                dir: Direction::Up,
                budget: p.max_down_backoff,
                reached: |l: LimitState| !l.down,
                exhausted: HomingError::DownBackoffExhausted,
                stuck: HomingError::DownLimitStuck,
            },
            HomingPhase::Clearance => {
                // Only the motion primitive's own limit abort applies here.
                let steps =
                    stepper.move_steps(delay, limits, Direction::Up, p.extra_backoff, p.speed);
                delay.delay_ms(p.settle_ms);
                check_both(limits.snapshot())?;
                return Ok(steps);
            }
        };

        let mut steps: u16 = 0;
        while !(seek.reached)(limits.snapshot()) {
            if steps >= seek.budget {
                return Err(seek.exhausted);
            }
            steps += stepper.move_steps(delay, limits, seek.dir, seek.budget - steps, p.speed);
        }

        delay.delay_ms(p.settle_ms);
        let levels = limits.snapshot();
        check_both(levels)?;
        if !(seek.reached)(levels) {
            return Err(seek.stuck);
        }
        Ok(steps)
    }
}

/// Bounded motion toward a switch condition.
struct Seek {
    dir: Direction,
    budget: u16,
    reached: fn(LimitState) -> bool,
    /// Budget used up before the condition was reached.
    exhausted: HomingError,
    /// Condition lost again while settling.
    stuck: HomingError,
}

fn check_both(levels: LimitState) -> Result<(), HomingError> {
    if levels.both() {
        Err(HomingError::BothLimits)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        config::HOMING_PARAMS,
        sim::{RecLog, Sim, Switch},
    };
    use std::vec::Vec;

    fn home(sim: &Sim, log: &mut RecLog) -> Result<(), HomingError> {
        let mut stepper = sim.stepper();
        let mut delay = sim.delay();
        Homing::new(&HOMING_PARAMS).run(&mut stepper, &mut delay, &sim.limits, log)
    }

    #[test]
    fn test_from_up_limit() {
        let sim = Sim::new(2005, 0, 2000);
        assert!(sim.limits.snapshot().up);
        let mut log = RecLog::default();
        assert_eq!(home(&sim, &mut log), Ok(()));

        assert_eq!(log.values(Debug::HomingPhase), [1, 2, 3, 4, 0]);
        assert_eq!(log.values(Debug::HomingSteps), [6, 1999, 1, 20]);
        assert_eq!(sim.physical(), 21);
        assert_eq!(sim.limits.snapshot(), LimitState::new(false, false));
    }

    #[test]
    fn test_from_down_limit() {
        let sim = Sim::new(-5, 0, 2000);
        let mut log = RecLog::default();
        assert_eq!(home(&sim, &mut log), Ok(()));
        assert_eq!(log.values(Debug::HomingSteps), [0, 0, 6, 20]);
        assert_eq!(sim.physical(), 21);
    }

    #[test]
    fn test_settle_delays() {
        let sim = Sim::new(500, 0, 2000);
        assert_eq!(home(&sim, &mut RecLog::default()), Ok(()));
        let pulses = sim.pulses() as u64;
        let phase_us = HOMING_PARAMS.speed.phase_us(crate::config::PULSE_REF_US) as u64;
        assert_eq!(
            sim.elapsed_us(),
            pulses * 2 * phase_us + 4 * 1000 * HOMING_PARAMS.settle_ms as u64
        );
    }

    #[test]
    fn test_down_limit_never_asserts() {
        let sim = Sim::new(100, 0, 2000);
        sim.stick_down(false);
        let mut log = RecLog::default();
        assert_eq!(home(&sim, &mut log), Err(HomingError::DownSeekExhausted));
        assert_eq!(sim.pulses(), HOMING_PARAMS.max_seek as u32);
        assert_eq!(log.values(Debug::HomingPhase), [1, 2]);
    }

    #[test]
    fn test_up_limit_stuck() {
        let sim = Sim::new(1000, 0, 2000);
        sim.stick_up(true);
        assert_eq!(
            home(&sim, &mut RecLog::default()),
            Err(HomingError::UpBackoffExhausted)
        );
        assert_eq!(sim.pulses(), HOMING_PARAMS.max_up_backoff as u32);
        assert_eq!(sim.physical(), 1000 - HOMING_PARAMS.max_up_backoff as i32);
    }

    #[test]
    fn test_down_limit_stuck() {
        let sim = Sim::new(100, 0, 2000);
        sim.stick_down(true);
        assert_eq!(
            home(&sim, &mut RecLog::default()),
            Err(HomingError::DownBackoffExhausted)
        );
        assert_eq!(sim.pulses(), HOMING_PARAMS.max_down_backoff as u32);
    }

    #[test]
    fn test_up_limit_returns_while_settling() {
        let sim = Sim::new(500, 0, 2000);
        sim.stick_on_settle(1, Switch::Up, true);
        let mut log = RecLog::default();
        assert_eq!(home(&sim, &mut log), Err(HomingError::UpLimitStuck));
        assert_eq!(sim.pulses(), 0);
        assert_eq!(log.values(Debug::HomingPhase), [1]);
    }

    #[test]
    fn test_down_limit_lost_while_settling() {
        let sim = Sim::new(500, 0, 2000);
        sim.stick_on_settle(2, Switch::Down, false);
        let mut log = RecLog::default();
        assert_eq!(home(&sim, &mut log), Err(HomingError::DownLimitNotReached));
        assert_eq!(sim.pulses(), 500);
        assert_eq!(log.values(Debug::HomingPhase), [1, 2]);
    }

    #[test]
    fn test_down_limit_returns_while_settling() {
        let sim = Sim::new(500, 0, 2000);
        sim.stick_on_settle(3, Switch::Down, true);
        let mut log = RecLog::default();
        assert_eq!(home(&sim, &mut log), Err(HomingError::DownLimitStuck));
        assert_eq!(sim.pulses(), 501);
        assert_eq!(log.values(Debug::HomingPhase), [1, 2, 3]);
    }

    #[test]
    fn test_both_limits_while_settling() {
        let sim = Sim::new(500, 0, 2000);
        sim.stick_on_settle(2, Switch::Up, true);
        assert_eq!(
            home(&sim, &mut RecLog::default()),
            Err(HomingError::BothLimits)
        );
        assert_eq!(sim.limits.snapshot(), LimitState::new(true, true));
    }

    #[test]
    fn test_both_limits() {
        let sim = Sim::new(100, 0, 2000);
        sim.stick_up(true);
        sim.stick_down(true);
        assert_eq!(
            home(&sim, &mut RecLog::default()),
            Err(HomingError::BothLimits)
        );
        assert_eq!(sim.pulses(), 0);
    }

    #[test]
    fn test_small_budget() {
        let params = HomingParams {
            max_seek: 50,
            ..HOMING_PARAMS
        };
        let sim = Sim::new(80, 0, 2000);
        let mut stepper = sim.stepper();
        let mut delay = sim.delay();
        let res = Homing::new(&params).run(&mut stepper, &mut delay, &sim.limits, &mut ());
        assert_eq!(res, Err(HomingError::DownSeekExhausted));

        let sim = Sim::new(50, 0, 2000);
        let mut stepper = sim.stepper();
        let mut delay = sim.delay();
        let res = Homing::new(&params).run(&mut stepper, &mut delay, &sim.limits, &mut ());
        assert_eq!(res, Ok(()));
    }

    #[test]
    fn test_phase_order() {
        let mut phases = Vec::new();
        let mut phase = Some(HomingPhase::UpBackoff);
        while let Some(p) = phase {
            phases.push(p as u8);
            phase = p.next();
        }
        assert_eq!(phases, [1, 2, 3, 4]);
    }
}

// vim: ts=4 sw=4 expandtab
