//! Cycle clock - day/night phases and seasonal progression
//!
//! One cycle is a full day/night period and the base unit for aging and
//! cyclic consumption. Seasons derive deterministically from the cycle
//! index, day/night from elapsed time within the cycle.

use crate::core::config::SimulationConfig;
use serde::{Deserialize, Serialize};

/// Season of the year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Autumn,
    Winter,
}

/// Events emitted by the clock as time advances
#[derive(Debug, Clone, PartialEq)]
pub enum ClockEvent {
    /// Fired on every advance with the elapsed delta
    Tick(f32),
    /// A new cycle has begun (carries the new cycle index)
    NewDay(u32),
    Daybreak,
    /// Day phase ended; fires exactly once per cycle
    Nightfall,
    /// A cycle finished (carries the index of the cycle that just ended)
    CycleEnd(u32),
    SeasonChanged(Season),
}

/// Tracks cycle index, elapsed time, day/night and season
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiveClock {
    cycle: u32,
    elapsed: f32,
    is_day: bool,
    season: Season,

    cycle_duration: f32,
    day_duration: f32,
    spring_cycles: u32,
    summer_cycles: u32,
    autumn_cycles: u32,
    winter_cycles: u32,
    total_cycles_in_year: u32,
    winter_honey_multiplier: f32,
}

impl HiveClock {
    pub fn new(config: &SimulationConfig) -> Self {
        let mut clock = Self {
            cycle: 1,
            elapsed: 0.0,
            is_day: true,
            season: Season::Spring,
            cycle_duration: config.cycle_duration,
            day_duration: config.day_duration(),
            spring_cycles: config.spring_cycles,
            summer_cycles: config.summer_cycles,
            autumn_cycles: config.autumn_cycles,
            winter_cycles: config.winter_cycles,
            total_cycles_in_year: config.total_cycles_in_year(),
            winter_honey_multiplier: config.winter_honey_multiplier,
        };
        clock.season = clock.season_for_cycle(1);
        clock
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_day(&self) -> bool {
        self.is_day
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn cycle_progress(&self) -> f32 {
        self.elapsed / self.cycle_duration
    }

    /// Events fired when the simulation starts, before any time passes
    pub fn startup_events(&self) -> Vec<ClockEvent> {
        vec![ClockEvent::NewDay(self.cycle), ClockEvent::Daybreak]
    }

    /// Advance the clock by `dt` seconds, emitting transition events
    pub fn advance(&mut self, dt: f32) -> Vec<ClockEvent> {
        let mut events = vec![ClockEvent::Tick(dt)];

        self.elapsed += dt;

        if self.is_day && self.elapsed >= self.day_duration {
            self.is_day = false;
            events.push(ClockEvent::Nightfall);
        }

        if self.elapsed >= self.cycle_duration {
            events.push(ClockEvent::CycleEnd(self.cycle));

            self.cycle += 1;
            self.elapsed = 0.0;
            self.is_day = true;

            let new_season = self.season_for_cycle(self.cycle);
            if new_season != self.season {
                self.season = new_season;
                events.push(ClockEvent::SeasonChanged(new_season));
            }

            events.push(ClockEvent::NewDay(self.cycle));
            events.push(ClockEvent::Daybreak);
        }

        events
    }

    /// Season for a given cycle index (1-based)
    pub fn season_for_cycle(&self, cycle: u32) -> Season {
        let year_cycle = ((cycle - 1) % self.total_cycles_in_year) + 1;

        if year_cycle <= self.spring_cycles {
            Season::Spring
        } else if year_cycle <= self.spring_cycles + self.summer_cycles {
            Season::Summer
        } else if year_cycle <= self.spring_cycles + self.summer_cycles + self.autumn_cycles {
            Season::Autumn
        } else {
            Season::Winter
        }
    }

    /// Foraging is only possible during daytime outside winter
    pub fn can_forage(&self) -> bool {
        self.is_day && self.season != Season::Winter
    }

    /// Colony burns honey faster through winter
    pub fn honey_consumption_multiplier(&self) -> f32 {
        if self.season == Season::Winter {
            self.winter_honey_multiplier
        } else {
            1.0
        }
    }
}
