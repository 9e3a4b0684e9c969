use crate::{config::TunnelConfig, PackingSet, TickReport};

/// Fixed stack of packing bands at successive depths with a cyclic cursor
/// selecting the band that is currently grown and drawn.
#[derive(Debug, Clone)]
pub struct DepthStack {
    sets: Vec<PackingSet>,
    current: usize,
}

impl DepthStack {
    /// Builds `config.stack.layers` bands, band `k` sitting at
    /// `-k * config.stack.spacing`.
    pub fn new(config: &TunnelConfig) -> Self {
        let sets = (0..config.stack.layers.max(1))
            .map(|layer| {
                PackingSet::new(
                    config.canvas,
                    -(layer as f64) * config.stack.spacing,
                    config.packing.clone(),
                    layer_seed(config.seed, layer),
                )
            })
            .collect();

        Self { sets, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn sets(&self) -> &[PackingSet] {
        &self.sets
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_set(&self) -> &PackingSet {
        &self.sets[self.current]
    }

    pub fn current_set_mut(&mut self) -> &mut PackingSet {
        &mut self.sets[self.current]
    }

    /// Moves the cursor to the next band, wrapping after the last one.
    pub fn advance_current(&mut self) -> usize {
        self.current = (self.current + 1) % self.sets.len();
        tracing::trace!(current = self.current, "switched depth band");
        self.current
    }

    /// Advances only the current band by one tick.
    pub fn advance_one_tick(&mut self, frame_index: u64) -> TickReport {
        self.current_set_mut().advance_one_tick(frame_index)
    }
}

// Distinct, well mixed seeds per band.
fn layer_seed(seed: u64, layer: usize) -> u64 {
    seed ^ (layer as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StackConfig;

    fn config(layers: usize) -> TunnelConfig {
        TunnelConfig {
            stack: StackConfig {
                layers,
                spacing: 1000.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn bands_step_back_by_spacing() {
        let stack = DepthStack::new(&config(3));

        let offsets: Vec<f64> = stack.sets().iter().map(PackingSet::depth_offset).collect();
        assert_eq!(offsets, vec![0.0, -1000.0, -2000.0]);
        assert_eq!(stack.current_index(), 0);
    }

    #[test]
    fn cursor_wraps_around() {
        let mut stack = DepthStack::new(&config(3));

        assert_eq!(stack.advance_current(), 1);
        assert_eq!(stack.advance_current(), 2);
        assert_eq!(stack.advance_current(), 0);
        assert_eq!(stack.current_set().depth_offset(), 0.0);
    }

    #[test]
    fn only_current_band_advances() {
        let mut stack = DepthStack::new(&config(2));
        stack.advance_current();

        for frame in 0..5 {
            stack.advance_one_tick(frame);
        }

        assert_eq!(stack.sets()[0].circles().len(), 1);
        assert!(stack.sets()[1].circles().len() > 1);
    }
}
