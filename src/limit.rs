/*
 * Lodestone, a UCI chess engine
 * Copyright (C) 2025 nlsn
 *
 * Lodestone is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Lodestone is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Lodestone. If not, see <https://www.gnu.org/licenses/>.
 */

//! Search limits: raw `go` parameters and their resolution into a depth
//! cap plus an optional soft time budget.

use crate::core::Color;
use std::time::Duration;

pub const MIN_DEPTH: i32 = 1;
pub const MAX_DEPTH: i32 = 30;

const INFINITE_DEPTH: i32 = 20;
const DEFAULT_MOVESTOGO: u64 = 40;

/// Raw values parsed from a `go` command. All times in milliseconds.
#[derive(Debug, Default, Clone)]
pub struct SearchLimits {
    pub depth: Option<i32>,
    pub movetime: Option<u64>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u64>,
    pub infinite: bool,
}

#[derive(Debug, Copy, Clone)]
pub struct SearchLimiter {
    max_depth: i32,
    allocated_ms: Option<u64>,
}

impl SearchLimiter {
    #[must_use]
    pub fn resolve(limits: &SearchLimits, stm: Color, default_depth: i32) -> Self {
        if limits.infinite {
            return Self {
                max_depth: INFINITE_DEPTH,
                allocated_ms: None,
            };
        }

        let max_depth = limits
            .depth
            .unwrap_or(default_depth)
            .clamp(MIN_DEPTH, MAX_DEPTH);

        let allocated_ms = if let Some(movetime) = limits.movetime {
            Some(movetime * 95 / 100)
        } else {
            let (time_left, increment) = if stm == Color::WHITE {
                (limits.wtime, limits.winc)
            } else {
                (limits.btime, limits.binc)
            };

            time_left.map(|time_left| {
                let movestogo = limits.movestogo.unwrap_or(DEFAULT_MOVESTOGO).max(1);
                let target = time_left / movestogo + increment.unwrap_or(0) * 8 / 10;
                target.min(time_left / 3)
            })
        };

        Self {
            max_depth,
            allocated_ms,
        }
    }

    #[must_use]
    pub fn depth_only(depth: i32) -> Self {
        Self {
            max_depth: depth.clamp(MIN_DEPTH, MAX_DEPTH),
            allocated_ms: None,
        }
    }

    #[must_use]
    pub fn max_depth(&self) -> i32 {
        self.max_depth
    }

    /// Soft limit, polled between completed iterations: stop once 40%
    /// of the budget is gone and the search is past depth 4. A single
    /// deep iteration may overrun; completed depths are preferred over
    /// partial ones.
    #[must_use]
    pub fn should_stop(&self, elapsed: Duration, completed_depth: i32) -> bool {
        match self.allocated_ms {
            Some(allocated) => {
                completed_depth > 4 && elapsed.as_millis() as u64 * 5 > allocated * 2
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movetime_keeps_a_safety_margin() {
        let limits = SearchLimits {
            movetime: Some(1000),
            ..SearchLimits::default()
        };

        let limiter = SearchLimiter::resolve(&limits, Color::WHITE, 10);
        assert!(limiter.should_stop(Duration::from_millis(950), 5));
        assert!(!limiter.should_stop(Duration::from_millis(100), 5));
    }

    #[test]
    fn clock_allocation_uses_movestogo_and_increment() {
        let limits = SearchLimits {
            wtime: Some(60_000),
            winc: Some(1000),
            movestogo: Some(40),
            ..SearchLimits::default()
        };

        // 60000/40 + 0.8*1000 = 2300ms; 40% of that is 920ms
        let limiter = SearchLimiter::resolve(&limits, Color::WHITE, 10);
        assert!(!limiter.should_stop(Duration::from_millis(900), 10));
        assert!(limiter.should_stop(Duration::from_millis(940), 10));
    }

    #[test]
    fn clock_allocation_is_clamped_to_a_third() {
        let limits = SearchLimits {
            btime: Some(3000),
            movestogo: Some(1),
            ..SearchLimits::default()
        };

        // 3000/1 clamps to 3000/3 = 1000ms
        let limiter = SearchLimiter::resolve(&limits, Color::BLACK, 10);
        assert!(limiter.should_stop(Duration::from_millis(401), 5));
        assert!(!limiter.should_stop(Duration::from_millis(399), 5));
    }

    #[test]
    fn early_depths_never_stop() {
        let limits = SearchLimits {
            movetime: Some(10),
            ..SearchLimits::default()
        };

        let limiter = SearchLimiter::resolve(&limits, Color::WHITE, 10);
        assert!(!limiter.should_stop(Duration::from_secs(5), 4));
        assert!(limiter.should_stop(Duration::from_secs(5), 5));
    }

    #[test]
    fn infinite_means_depth_twenty_without_a_clock() {
        let limits = SearchLimits {
            infinite: true,
            wtime: Some(1),
            depth: Some(3),
            ..SearchLimits::default()
        };

        let limiter = SearchLimiter::resolve(&limits, Color::WHITE, 10);
        assert_eq!(limiter.max_depth(), 20);
        assert!(!limiter.should_stop(Duration::from_secs(3600), 19));
    }

    #[test]
    fn depth_defaults_and_clamps() {
        let limiter = SearchLimiter::resolve(&SearchLimits::default(), Color::WHITE, 10);
        assert_eq!(limiter.max_depth(), 10);
        assert!(!limiter.should_stop(Duration::from_secs(3600), 9));

        let limits = SearchLimits {
            depth: Some(99),
            ..SearchLimits::default()
        };
        assert_eq!(SearchLimiter::resolve(&limits, Color::WHITE, 10).max_depth(), 30);
    }
}
