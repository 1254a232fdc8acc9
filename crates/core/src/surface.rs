//! # Water Surface Sampling
//!
//! The water system is an external collaborator: it answers batched
//! height/velocity queries asynchronously. Simulators submit positions, poll
//! for readiness and never block.
//!
//! ## Table of Contents
//!
//! 1. **SurfaceSample / QueryHandle** - Data exchanged with the water system
//! 2. **SurfaceSampler** - Query trait
//! 3. **SurfaceRequest** - Per-simulator submit/poll bookkeeping
//! 4. **FlatWater / WaveField** - Immediate samplers
//! 5. **LatentSampler** - Delays readiness by a number of ticks

use std::collections::HashMap;
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bevy::math::{Vec2, Vec3};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

// ============================================================================
// 1. Samples
// ============================================================================

/// Water surface state at a queried XZ location
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceSample {
    /// World-space surface point; `y` is the water height
    pub position: Vec3,
    /// Surface velocity (m/s)
    pub velocity: Vec3,
    /// Foam coverage in [0, 1]
    pub foam: f32,
}

/// Opaque id of a submitted batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryHandle(u64);

// ============================================================================
// 2. Sampler trait
// ============================================================================

/// Batched, possibly latent, water surface queries.
pub trait SurfaceSampler: Send + Sync {
    /// Submits world positions for sampling
    fn submit(&self, positions: &[Vec3]) -> QueryHandle;

    /// Whether results for `handle` are available
    fn is_ready(&self, handle: QueryHandle) -> bool;

    /// Removes and returns the results for `handle`, parallel to the submitted
    /// positions. `None` while not ready or once already taken.
    fn take_results(&self, handle: QueryHandle) -> Option<Vec<SurfaceSample>>;
}

/// Result storage shared by the bundled samplers
#[derive(Debug, Default)]
struct QueryStore {
    next_id: AtomicU64,
    results: Mutex<HashMap<u64, Vec<SurfaceSample>>>,
}

impl QueryStore {
    fn insert(&self, samples: Vec<SurfaceSample>) -> QueryHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.results.lock().insert(id, samples);
        QueryHandle(id)
    }

    fn contains(&self, handle: QueryHandle) -> bool {
        self.results.lock().contains_key(&handle.0)
    }

    fn take(&self, handle: QueryHandle) -> Option<Vec<SurfaceSample>> {
        self.results.lock().remove(&handle.0)
    }
}

// ============================================================================
// 3. Surface request
// ============================================================================

/// Tracks one simulator's in-flight query and the latest completed batch.
///
/// Each poll collects a finished batch, submits the current positions if
/// nothing is in flight and returns the freshest batch whose length matches
/// the positions. With a latent sampler the returned data lags the
/// positions by the sampler latency.
#[derive(Debug, Default)]
pub struct SurfaceRequest {
    pending: Option<QueryHandle>,
    latest: Option<Vec<SurfaceSample>>,
}

impl SurfaceRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(
        &mut self,
        sampler: &dyn SurfaceSampler,
        positions: &[Vec3],
    ) -> Option<&[SurfaceSample]> {
        if let Some(handle) = self.pending {
            if sampler.is_ready(handle) {
                if let Some(results) = sampler.take_results(handle) {
                    self.latest = Some(results);
                }
                self.pending = None;
            }
        }

        if self.pending.is_none() {
            let handle = sampler.submit(positions);
            if sampler.is_ready(handle) {
                if let Some(results) = sampler.take_results(handle) {
                    self.latest = Some(results);
                }
            } else {
                self.pending = Some(handle);
            }
        }

        match &self.latest {
            Some(samples) if samples.len() == positions.len() => Some(samples.as_slice()),
            _ => None,
        }
    }

    /// Whether a completed batch has ever been received
    pub fn has_data(&self) -> bool {
        self.latest.is_some()
    }
}

// ============================================================================
// 4. Immediate samplers
// ============================================================================

/// Still water at a fixed height with an optional uniform current.
#[derive(Debug, Default)]
pub struct FlatWater {
    pub height: f32,
    pub current: Vec3,
    store: QueryStore,
}

impl FlatWater {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            ..Default::default()
        }
    }

    pub fn with_current(mut self, current: Vec3) -> Self {
        self.current = current;
        self
    }
}

impl SurfaceSampler for FlatWater {
    fn submit(&self, positions: &[Vec3]) -> QueryHandle {
        let samples = positions
            .iter()
            .map(|p| SurfaceSample {
                position: Vec3::new(p.x, self.height, p.z),
                velocity: self.current,
                foam: 0.0,
            })
            .collect();
        self.store.insert(samples)
    }

    fn is_ready(&self, handle: QueryHandle) -> bool {
        self.store.contains(handle)
    }

    fn take_results(&self, handle: QueryHandle) -> Option<Vec<SurfaceSample>> {
        self.store.take(handle)
    }
}

/// A single travelling sine wave
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    /// Crest height above mean level (m)
    pub amplitude: f32,
    /// Crest-to-crest distance (m)
    pub wavelength: f32,
    /// Phase speed (m/s)
    pub speed: f32,
    /// Travel direction in the XZ plane
    pub direction: Vec2,
}

impl Wave {
    fn wavenumber(&self) -> f32 {
        if self.wavelength > 0.0 {
            TAU / self.wavelength
        } else {
            0.0
        }
    }
}

/// Sum of sine waves over a mean level, advanced by the host clock.
#[derive(Debug, Default)]
pub struct WaveField {
    pub mean_level: f32,
    pub waves: Vec<Wave>,
    time: RwLock<f32>,
    store: QueryStore,
}

impl WaveField {
    pub fn new(mean_level: f32, waves: Vec<Wave>) -> Self {
        Self {
            mean_level,
            waves,
            ..Default::default()
        }
    }

    pub fn advance(&self, dt: f32) {
        *self.time.write() += dt;
    }

    pub fn time(&self) -> f32 {
        *self.time.read()
    }

    /// Evaluates the surface at an XZ location
    pub fn sample_at(&self, position: Vec3) -> SurfaceSample {
        let t = self.time();
        let xz = Vec2::new(position.x, position.z);
        let mut height = self.mean_level;
        let mut velocity = Vec3::ZERO;
        let mut slope = Vec2::ZERO;

        for wave in &self.waves {
            let dir = wave.direction.normalize_or_zero();
            let k = wave.wavenumber();
            let omega = k * wave.speed;
            let phase = k * dir.dot(xz) - omega * t;
            let (sin, cos) = phase.sin_cos();

            height += wave.amplitude * sin;
            // orbital motion: forward at the crest, vertical through the mean level
            velocity += Vec3::new(dir.x, 0.0, dir.y) * (wave.amplitude * omega * sin);
            velocity.y -= wave.amplitude * omega * cos;
            slope += dir * (wave.amplitude * k * cos);
        }

        SurfaceSample {
            position: Vec3::new(position.x, height, position.z),
            velocity,
            foam: slope.length().clamp(0.0, 1.0),
        }
    }
}

impl SurfaceSampler for WaveField {
    fn submit(&self, positions: &[Vec3]) -> QueryHandle {
        let samples = positions.iter().map(|&p| self.sample_at(p)).collect();
        self.store.insert(samples)
    }

    fn is_ready(&self, handle: QueryHandle) -> bool {
        self.store.contains(handle)
    }

    fn take_results(&self, handle: QueryHandle) -> Option<Vec<SurfaceSample>> {
        self.store.take(handle)
    }
}

// ============================================================================
// 5. Latent sampler
// ============================================================================

/// Wraps a sampler so results only become ready `latency` ticks after
/// submission, like a GPU readback.
pub struct LatentSampler<S> {
    inner: Arc<S>,
    latency: u64,
    tick: AtomicU64,
    ready_at: Mutex<HashMap<QueryHandle, u64>>,
}

impl<S: SurfaceSampler> LatentSampler<S> {
    pub fn new(inner: Arc<S>, latency: u64) -> Self {
        Self {
            inner,
            latency,
            tick: AtomicU64::new(0),
            ready_at: Mutex::new(HashMap::new()),
        }
    }

    /// Advances the readback clock by one frame
    pub fn tick(&self) {
        self.tick.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }
}

impl<S: SurfaceSampler> SurfaceSampler for LatentSampler<S> {
    fn submit(&self, positions: &[Vec3]) -> QueryHandle {
        let handle = self.inner.submit(positions);
        let due = self.tick.load(Ordering::Relaxed).saturating_add(self.latency);
        self.ready_at.lock().insert(handle, due);
        handle
    }

    fn is_ready(&self, handle: QueryHandle) -> bool {
        let now = self.tick.load(Ordering::Relaxed);
        match self.ready_at.lock().get(&handle) {
            Some(&due) => now >= due && self.inner.is_ready(handle),
            None => false,
        }
    }

    fn take_results(&self, handle: QueryHandle) -> Option<Vec<SurfaceSample>> {
        if !self.is_ready(handle) {
            return None;
        }
        self.ready_at.lock().remove(&handle);
        self.inner.take_results(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_water_is_immediate() {
        let water = FlatWater::new(1.5);
        let mut request = SurfaceRequest::new();
        let samples = request
            .poll(&water, &[Vec3::new(3.0, -2.0, 4.0)])
            .map(|s| s.to_vec());
        let samples = samples.unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].position, Vec3::new(3.0, 1.5, 4.0));
    }

    #[test]
    fn test_latent_sampler_waits_for_ticks() {
        let water = Arc::new(FlatWater::new(0.0));
        let sampler = LatentSampler::new(water, 2);
        let mut request = SurfaceRequest::new();
        let positions = [Vec3::ZERO, Vec3::X];

        assert!(request.poll(&sampler, &positions).is_none());
        sampler.tick();
        assert!(request.poll(&sampler, &positions).is_none());
        sampler.tick();
        assert!(request.poll(&sampler, &positions).is_some());
        assert!(request.has_data());
    }

    #[test]
    fn test_results_are_taken_once() {
        let water = FlatWater::new(0.0);
        let handle = water.submit(&[Vec3::ZERO]);
        assert!(water.take_results(handle).is_some());
        assert!(water.take_results(handle).is_none());
        assert!(!water.is_ready(handle));
    }

    #[test]
    fn test_wave_field_height_bounded_by_amplitude() {
        let field = WaveField::new(
            0.0,
            vec![Wave {
                amplitude: 0.5,
                wavelength: 20.0,
                speed: 4.0,
                direction: Vec2::X,
            }],
        );
        for i in 0..50 {
            field.advance(0.1);
            let s = field.sample_at(Vec3::new(i as f32, 0.0, 0.0));
            assert!(s.position.y.abs() <= 0.5 + 1e-5);
            assert!((0.0..=1.0).contains(&s.foam));
        }
    }
}
