//! Growth-based disc packing for a single depth band.
//!
//! A band starts from one large seed disc in the middle of the canvas. Every
//! tick the growing discs expand by a fixed step and freeze as soon as they
//! touch a neighbour or the canvas edge, then a batch of tiny discs is
//! scattered into the remaining free space. The batch size ramps up over time
//! and the band stops scattering once a whole batch of attempts misses.
//!
//! Each disc except the seed is shadowed by [`MIRROR_GENERATIONS`] copies one
//! and two depth ranges further back, so that the band repeats seamlessly when
//! the camera travels past its far end.

use glam::DVec2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::{
    config::{CanvasConfig, PackingConfig},
    Circle,
};

/// Number of depth-shifted copies kept for every scattered disc.
pub const MIRROR_GENERATIONS: usize = 2;

const SCATTERED_RADIUS: f64 = 1.0;

/// Counters describing what a single [`PackingSet::advance_one_tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub grown: usize,
    pub frozen: usize,
    pub placed: usize,
}

#[derive(Debug, Clone)]
pub struct PackingSet {
    canvas: CanvasConfig,
    config: PackingConfig,
    depth_offset: f64,
    circles: Vec<Circle>,
    mirrors: Vec<Circle>,
    active: bool,
    rng: StdRng,
}

impl PackingSet {
    /// Creates a band holding only the seed disc: canvas centre, a third of
    /// the shorter side as radius, sitting exactly at `depth_offset`.
    pub fn new(canvas: CanvasConfig, depth_offset: f64, config: PackingConfig, seed: u64) -> Self {
        let center = DVec2::new(canvas.width / 2.0, canvas.height / 2.0);
        let radius = canvas.width.min(canvas.height) / 3.0;

        Self {
            canvas,
            config,
            depth_offset,
            circles: vec![Circle::new(center, depth_offset, radius)],
            mirrors: Vec::new(),
            active: true,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn mirrors(&self) -> &[Circle] {
        &self.mirrors
    }

    /// Originals first, then mirrors.
    pub fn discs(&self) -> impl Iterator<Item = &Circle> {
        self.circles.iter().chain(self.mirrors.iter())
    }

    /// Whether the band still scatters new discs.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Saturated and no disc left growing; further ticks are no-ops.
    pub fn is_settled(&self) -> bool {
        !self.active && self.circles.iter().all(|circle| !circle.is_growing())
    }

    pub fn depth_offset(&self) -> f64 {
        self.depth_offset
    }

    pub fn depth_range(&self) -> f64 {
        self.config.depth_range
    }

    pub fn canvas(&self) -> CanvasConfig {
        self.canvas
    }

    /// Number of placements the band aims for on `frame_index`.
    pub fn placement_target(&self, frame_index: u64) -> u32 {
        let ramp = 1 + frame_index / self.config.ramp_interval;
        ramp.min(u64::from(self.config.max_target)) as u32
    }

    /// Draws one random candidate and keeps it if it lands in free space.
    pub fn attempt_placement(&mut self) -> bool {
        let x = self.rng.gen_range(0.0..self.canvas.width);
        let y = self.rng.gen_range(0.0..self.canvas.height);
        let depth = self
            .rng
            .gen_range(self.depth_offset - self.config.depth_range..self.depth_offset);
        let center = DVec2::new(x, y);

        let margin = self.config.margin;
        let blocked = self
            .circles
            .iter()
            .any(|other| center.distance(other.center) < other.radius + margin);
        if blocked {
            return false;
        }

        self.insert(center, depth);
        true
    }

    /// Runs the growth pass followed by the placement pass.
    pub fn advance_one_tick(&mut self, frame_index: u64) -> TickReport {
        let mut report = TickReport::default();
        let step = self.config.growth_step;
        let tolerance = self.config.contact_tolerance;

        // Discs scattered below are not part of this pass.
        let existing = self.circles.len();
        for index in 0..existing {
            if !self.circles[index].is_growing() {
                continue;
            }

            self.circles[index].grow(step);
            for mirror in self.mirrors_of_mut(index) {
                mirror.grow(step);
            }
            report.grown += 1;

            let circle = &self.circles[index];
            let touching = self.circles.iter().enumerate().any(|(other_index, other)| {
                other_index != index && circle.overlaps(other, tolerance)
            });

            if touching || circle.has_left_bounds(self.canvas.width, self.canvas.height) {
                self.freeze(index);
                report.frozen += 1;
            }
        }

        if self.active {
            let target = self.placement_target(frame_index);
            for _ in 0..self.config.max_attempts {
                if report.placed as u32 >= target {
                    break;
                }
                if self.attempt_placement() {
                    report.placed += 1;
                }
            }

            if report.placed == 0 {
                self.active = false;
                tracing::debug!(
                    depth_offset = self.depth_offset,
                    circles = self.circles.len(),
                    frame_index,
                    "packing band saturated"
                );
            }
        }

        report
    }

    /// Appends a scattered disc together with its mirrors.
    pub(crate) fn insert(&mut self, center: DVec2, depth: f64) {
        let circle = Circle::new(center, depth, SCATTERED_RADIUS);
        let range = self.config.depth_range;
        self.mirrors.extend(
            (1..=MIRROR_GENERATIONS)
                .map(|generation| circle.shifted_back(generation as f64 * range)),
        );
        self.circles.push(circle);
    }

    fn mirrors_of_mut(&mut self, index: usize) -> &mut [Circle] {
        // The seed at index 0 owns no mirrors.
        match index.checked_sub(1) {
            Some(slot) => {
                let start = slot * MIRROR_GENERATIONS;
                &mut self.mirrors[start..start + MIRROR_GENERATIONS]
            }
            None => &mut [],
        }
    }

    fn freeze(&mut self, index: usize) {
        self.circles[index].freeze();
        for mirror in self.mirrors_of_mut(index) {
            mirror.freeze();
        }
    }
}
