//! # Auxiliary Engine
//!
//! Forward thrust along the hull with a fuel tank and random breakdowns.
//! Failure odds scale with running time and throttle; a broken engine
//! produces nothing until its repair timer runs out.

use bevy::math::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::body::RigidBody;

/// Throttle magnitude below which the engine counts as idle
const IDLE_THROTTLE: f32 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Thrust at full throttle (N)
    pub max_power: f32,
    /// Lowest throttle; negative runs astern
    pub min_throttle: f32,
    pub max_fuel: f32,
    /// Fuel per second at full throttle
    pub fuel_consumption: f32,
    /// Breakdown probability per minute at full throttle
    pub failure_chance_per_minute: f32,
    /// Seconds a breakdown lasts
    pub repair_time: f32,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_power: 250.0,
            min_throttle: -0.5,
            max_fuel: 100.0,
            fuel_consumption: 0.1,
            failure_chance_per_minute: 0.01,
            repair_time: 10.0,
            seed: 0xE461,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineReport {
    pub thrust: Vec3,
    pub running: bool,
    /// True on the step the engine broke down
    pub failed: bool,
}

pub struct BoatEngine {
    config: EngineConfig,
    throttle: f32,
    fuel: f32,
    running_time: f32,
    repair_timer: f32,
    broken: bool,
    running: bool,
    rng: ChaCha8Rng,
}

impl BoatEngine {
    pub fn new(config: EngineConfig) -> Self {
        info!(
            "Engine: {} N max, {} fuel",
            config.max_power, config.max_fuel
        );
        Self {
            throttle: 0.0,
            fuel: config.max_fuel,
            running_time: 0.0,
            repair_timer: 0.0,
            broken: false,
            running: false,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
        }
    }

    /// Full tank, repaired and idle
    pub fn reset(&mut self) {
        self.fuel = self.config.max_fuel;
        self.broken = false;
        self.repair_timer = 0.0;
        self.running_time = 0.0;
        self.throttle = 0.0;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Clamped to `[min_throttle, 1]`
    pub fn set_throttle(&mut self, throttle: f32) {
        self.throttle = throttle.clamp(self.config.min_throttle.min(0.0), 1.0);
    }

    pub fn throttle(&self) -> f32 {
        self.throttle
    }

    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    /// Remaining fuel as a fraction of the tank, 0 for a tankless engine
    pub fn fuel_percentage(&self) -> f32 {
        if self.config.max_fuel > 0.0 {
            self.fuel / self.config.max_fuel
        } else {
            0.0
        }
    }

    pub fn refuel(&mut self, amount: f32) {
        self.fuel = (self.fuel + amount).clamp(0.0, self.config.max_fuel.max(0.0));
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn repair_time_remaining(&self) -> f32 {
        self.repair_timer.max(0.0)
    }

    pub fn step(&mut self, body: &mut dyn RigidBody, dt: f32) -> EngineReport {
        let mut report = EngineReport::default();

        if !self.broken && self.throttle.abs() > IDLE_THROTTLE && self.fuel > 0.0 {
            let demand = self.throttle.abs();
            self.fuel = (self.fuel - self.config.fuel_consumption * demand * dt).max(0.0);

            self.running_time += dt;
            let minutes = self.running_time / 60.0;
            let survive = (1.0 - self.config.failure_chance_per_minute).clamp(0.0, 1.0);
            let fail_probability = 1.0 - survive.powf(minutes * demand);

            if self.rng.gen::<f32>() < fail_probability {
                self.broken = true;
                self.repair_timer = self.config.repair_time;
                report.failed = true;
                info!(
                    "Engine failed after {:.1} s running, repair takes {:.1} s",
                    self.running_time, self.config.repair_time
                );
            } else {
                report.thrust = body.forward() * (self.config.max_power * self.throttle);
                body.add_force(report.thrust);
            }
            self.running = true;
        } else {
            self.running = false;
            if self.fuel <= 0.0 && self.throttle != 0.0 {
                warn!("Engine out of fuel, throttle cut");
                self.throttle = 0.0;
            }
        }

        if self.broken {
            self.repair_timer -= dt;
            if self.repair_timer <= 0.0 {
                self.broken = false;
                self.running_time = 0.0;
                info!("Engine repaired");
            }
        }

        report.running = self.running;
        report
    }
}
