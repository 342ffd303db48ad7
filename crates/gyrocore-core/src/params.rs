//! Parameters describing one heat-exchanger core generation request

use serde::{Deserialize, Serialize};

/// Structural enclosure style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Hollow shell with selective channel ports on Z and X faces.
    Shell,
    /// Twelve edge beams and eight corner blocks, all six faces open.
    Frame,
}

/// Immutable input record for one `generate` call.
///
/// Field names and defaults mirror the external API contract: every
/// field is validated once by the orchestrator, never mutated after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Cube edge length in mm.
    pub size: f32,
    /// Target gyroid period in mm (snapped to an integer cell count).
    pub cell_size: f32,
    /// Gyroid isovalue τ (unitless, typically 0.10–0.80).
    pub wall_threshold: f32,
    /// Structural enclosure style.
    pub mode: Mode,
    /// Shell wall thickness in mm (Shell mode only).
    pub shell_thickness: f32,
    /// Frame beam width in mm (Frame mode only).
    pub frame_beam_width: f32,
    /// Voxels per axis.
    pub resolution: u32,
    /// Taubin smoothing passes.
    pub smoothing_iterations: u32,
    /// Seal all ports in Shell mode (ignored in Frame mode).
    pub make_manifold: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            size: 100.0,
            cell_size: 25.0,
            wall_threshold: 0.35,
            mode: Mode::Shell,
            shell_thickness: 3.0,
            frame_beam_width: 10.0,
            resolution: 60,
            smoothing_iterations: 8,
            make_manifold: false,
        }
    }
}

impl Parameters {
    /// Validate the record, returning `Err(Error::InvalidParameter(_))`
    /// for the first violated constraint.
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.size > 0.0) {
            return Err(crate::Error::InvalidParameter(format!(
                "size must be > 0, got {}",
                self.size
            )));
        }
        if !(self.cell_size > 0.0) {
            return Err(crate::Error::InvalidParameter(format!(
                "cell_size must be > 0, got {}",
                self.cell_size
            )));
        }
        if self.resolution < 1 {
            return Err(crate::Error::InvalidParameter(format!(
                "resolution must be >= 1, got {}",
                self.resolution
            )));
        }
        if self.mode == Mode::Frame && !(self.frame_beam_width > 0.0) {
            return Err(crate::Error::InvalidParameter(format!(
                "frame_beam_width must be > 0, got {}",
                self.frame_beam_width
            )));
        }
        if self.mode == Mode::Frame && self.frame_beam_width >= self.size / 2.0 {
            return Err(crate::Error::InvalidParameter(format!(
                "frame_beam_width {} must be < size/2 ({})",
                self.frame_beam_width,
                self.size / 2.0
            )));
        }
        if self.shell_thickness < 0.0 {
            return Err(crate::Error::InvalidParameter(format!(
                "shell_thickness must be >= 0, got {}",
                self.shell_thickness
            )));
        }
        Ok(())
    }

    /// Number of gyroid cells across the cube, computed as
    /// `max(1, round(size / cell_size))`.
    pub fn cell_count(&self) -> u32 {
        (self.size / self.cell_size).round().max(1.0) as u32
    }

    /// `cell_size` snapped so `cell_count` periods tile the cube exactly.
    pub fn snapped_cell_size(&self) -> f32 {
        self.size / self.cell_count() as f32
    }
}
