//! Round scoring: the timer, the paint budget, the score, and the customer the
//! player is currently painting.
//!
//! `Idle -> RoundActive` on [`RoundScorer::start_game`], back to `Idle` on game
//! over. While `Idle` every other operation is a no-op returning
//! [`RoundOutcome::Inactive`].

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::attributes::{Submission, TargetAttributes};
use crate::config::{GameConfig, TimeoutPolicy};
use crate::error::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    RoundActive,
}

/// What a scorer call did, for the UI layer to react to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Called while no game is running; nothing changed.
    Inactive,
    Continue,
    Matched,
    Mismatched,
    /// Timer ran out and the next customer came in.
    CustomerTimedOut,
    GameOver { final_score: u32 },
}

impl RoundOutcome {
    /// A new customer (and a cleared canvas) follows this outcome.
    pub fn advances_round(self) -> bool {
        matches!(self, RoundOutcome::Matched | RoundOutcome::Mismatched | RoundOutcome::CustomerTimedOut)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    pub phase: Phase,
    pub remaining_time: f32,
    pub score: u32,
    pub paint_budget: f32,
    pub final_score: Option<u32>,
}

impl RoundState {
    fn idle() -> Self {
        Self { phase: Phase::Idle, remaining_time: 0.0, score: 0, paint_budget: 0.0, final_score: None }
    }
}

pub struct RoundScorer<R: RngCore = StdRng> {
    config: GameConfig,
    state: RoundState,
    target: Option<TargetAttributes>,
    rng: R,
}

impl RoundScorer<StdRng> {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }
}

impl<R: RngCore> RoundScorer<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self { config, state: RoundState::idle(), target: None, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.phase == Phase::RoundActive
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn final_score(&self) -> Option<u32> {
        self.state.final_score
    }

    pub fn remaining_time(&self) -> f32 {
        self.state.remaining_time
    }

    /// Whole seconds for the timer label, rounded up, never negative.
    pub fn remaining_seconds_display(&self) -> u32 {
        self.state.remaining_time.max(0.0).ceil() as u32
    }

    pub fn paint_budget(&self) -> f32 {
        self.state.paint_budget
    }

    /// Budget as a fill amount in [0,1] for the paint meter.
    pub fn budget_fraction(&self) -> f32 {
        (self.state.paint_budget / self.config.max_paint_budget).clamp(0.0, 1.0)
    }

    /// The current customer, if a round is running.
    pub fn target(&self) -> Result<&TargetAttributes, Error> {
        match (&self.state.phase, &self.target) {
            (Phase::RoundActive, Some(t)) => Ok(t),
            _ => Err(Error::NoActiveRound),
        }
    }

    pub fn start_game(&mut self) {
        self.state = RoundState {
            phase: Phase::RoundActive,
            remaining_time: self.config.round_duration_seconds,
            score: 0,
            paint_budget: self.config.max_paint_budget / 2.0,
            final_score: None,
        };
        log::info!("game started (budget {:.1}, {:.0}s per customer)", self.state.paint_budget, self.state.remaining_time);
        self.next_customer(true);
    }

    fn next_customer(&mut self, reset_timer: bool) {
        if reset_timer {
            self.state.remaining_time = self.config.round_duration_seconds;
        }
        let target = TargetAttributes::random(&mut self.rng);
        log::debug!("new customer: {target}");
        self.target = Some(target);
    }

    pub fn tick(&mut self, dt: f32) -> RoundOutcome {
        if !self.is_active() {
            return RoundOutcome::Inactive;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.state.remaining_time -= dt;
        self.state.paint_budget = (self.state.paint_budget - self.config.paint_drain_per_second * dt).max(0.0);

        if let Some(outcome) = self.check_budget() {
            return outcome;
        }
        if self.state.remaining_time <= 0.0 {
            return self.timeout();
        }
        RoundOutcome::Continue
    }

    pub fn submit(&mut self, submission: &Submission) -> RoundOutcome {
        let Ok(target) = self.target().copied() else {
            log::debug!("submission ignored, no game running");
            return RoundOutcome::Inactive;
        };
        if submission.is_malformed() {
            log::warn!("malformed submission counted as a mismatch: {submission:?}");
        }

        let mut overflowed = false;
        let outcome = if target.matches(submission, self.config.color_match_threshold) {
            self.state.score = self.state.score.saturating_add(self.config.score_per_match);
            let budget = self.state.paint_budget + self.config.match_reward;
            overflowed = budget > self.config.max_paint_budget;
            self.state.paint_budget = budget.min(self.config.max_paint_budget);
            self.state.remaining_time += self.config.match_time_bonus;
            log::info!("customer matched, score {}", self.state.score);
            RoundOutcome::Matched
        } else {
            self.state.paint_budget = (self.state.paint_budget - self.config.mismatch_penalty).max(0.0);
            log::info!("customer mismatched (wanted {target}), budget {:.1}", self.state.paint_budget);
            RoundOutcome::Mismatched
        };

        self.next_customer(self.config.timer_resets_per_customer);

        if overflowed && self.config.budget_overflow_ends_round {
            log::info!("paint budget overflowed");
            return self.game_over();
        }
        self.check_budget().unwrap_or(outcome)
    }

    /// Timer ran out before a submission.
    pub fn timeout(&mut self) -> RoundOutcome {
        if !self.is_active() {
            return RoundOutcome::Inactive;
        }
        match self.config.timeout_policy {
            TimeoutPolicy::EndGame => {
                log::info!("time is up");
                self.game_over()
            }
            TimeoutPolicy::NextCustomer => {
                self.state.paint_budget = (self.state.paint_budget - self.config.mismatch_penalty / 2.0).max(0.0);
                log::info!("customer left, budget {:.1}", self.state.paint_budget);
                self.next_customer(true);
                self.check_budget().unwrap_or(RoundOutcome::CustomerTimedOut)
            }
        }
    }

    pub fn game_over(&mut self) -> RoundOutcome {
        if !self.is_active() {
            return RoundOutcome::Inactive;
        }
        let final_score = self.state.score;
        self.state.phase = Phase::Idle;
        self.state.final_score = Some(final_score);
        self.target = None;
        log::info!("game over, final score {final_score}");
        RoundOutcome::GameOver { final_score }
    }

    fn check_budget(&mut self) -> Option<RoundOutcome> {
        if self.config.budget_depletion_ends_round && self.state.paint_budget <= 0.0 {
            log::info!("out of paint");
            return Some(self.game_over());
        }
        None
    }
}
