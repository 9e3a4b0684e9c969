use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::{Circle, PackingSet, Simulation};

/// Surface treatment requested from the renderer for every disc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Emissive,
    Ambient,
    Specular,
    Normal,
}

/// A torus to draw, expressed relative to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscInstance {
    pub center: DVec2,
    /// Depth relative to the camera; the camera moves towards positive depth.
    pub depth: f64,
    pub radius: f64,
    pub tube_radius: f64,
    pub material: Material,
}

impl DiscInstance {
    fn from_circle(circle: &Circle, camera_depth: f64, material: Material) -> Self {
        Self {
            center: circle.center,
            depth: circle.depth + camera_depth,
            radius: circle.radius,
            tube_radius: (circle.radius * 0.12).max(1.0),
            material,
        }
    }
}

/// Rendering backend abstraction. It only produces the draw list; the GPU
/// side lives in the host application.
#[derive(Debug, Default)]
pub struct RenderGraph {
    material: Material,
    instances: Vec<DiscInstance>,
}

impl RenderGraph {
    pub fn new(material: Material) -> Self {
        Self {
            material,
            instances: Vec::new(),
        }
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn instances(&self) -> &[DiscInstance] {
        &self.instances
    }

    /// Rebuilds the draw list from one band, originals followed by mirrors.
    pub fn collect_set(&mut self, set: &PackingSet, camera_depth: f64) -> &[DiscInstance] {
        self.instances.clear();
        let material = self.material;
        self.instances.extend(
            set.discs()
                .map(|circle| DiscInstance::from_circle(circle, camera_depth, material)),
        );
        &self.instances
    }

    /// Draw list for the band and camera position of `simulation`.
    pub fn collect(&mut self, simulation: &Simulation) -> &[DiscInstance] {
        self.collect_set(
            simulation.stack().current_set(),
            simulation.camera().depth(),
        )
    }
}
