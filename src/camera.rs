//! Orbit camera pose: distance, two angles, and a look-at target.
//!
//! The pose is mutated synchronously by pointer handlers and read by the
//! outbound sync to compute a Cartesian eye/target pair. It is initialized
//! from the engine's reported camera on connect and locally authoritative
//! afterwards, until a remote pick overwrites the center.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

/// Keeps `phi` away from the poles so the view never gimbal-flips.
const PHI_EPSILON: f32 = 1e-3;

pub const MIN_RADIUS: f32 = 0.01;
pub const MAX_RADIUS: f32 = 10_000.0;

const DEFAULT_RADIUS: f32 = 10.0;
const DEFAULT_FOV: f32 = std::f32::consts::FRAC_PI_4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
    pub center: Vec3,
    pub field_of_view: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            theta: 0.0,
            phi: 0.0,
            center: Vec3::ZERO,
            field_of_view: DEFAULT_FOV,
        }
    }
}

/// Camera as the engine reports it at connect time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub field_of_view: f32,
}

impl CameraPose {
    /// Recover an orbit pose from the engine's eye/target pair.
    pub fn from_engine(camera: &EngineCamera) -> Self {
        let offset = camera.eye - camera.target;
        let radius = offset.length().clamp(MIN_RADIUS, MAX_RADIUS);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).asin();
        let theta = offset.x.atan2(offset.z);
        Self {
            radius,
            theta,
            phi: clamp_phi(phi),
            center: camera.target,
            field_of_view: camera.field_of_view,
        }
    }

    /// Cartesian eye position for the current pose.
    pub fn eye(&self) -> Vec3 {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        Vec3::new(
            self.radius * cos_phi * sin_theta + self.center.x,
            self.radius * sin_phi + self.center.y,
            self.radius * cos_phi * cos_theta + self.center.z,
        )
    }

    /// Eye and target, computed together so a push hands the engine one
    /// consistent pair.
    pub fn look_at(&self) -> (Vec3, Vec3) {
        (self.eye(), self.center)
    }

    /// Rotate around the target. `d_phi` is clamped short of the poles.
    pub fn orbit(&mut self, d_theta: f32, d_phi: f32) {
        self.theta += d_theta;
        self.phi = clamp_phi(self.phi + d_phi);
    }

    /// Move the target within the current view plane.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.center - self.eye()).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        self.center += right * dx + up * dy;
    }

    /// Scale the orbit distance, clamped to the working range.
    pub fn zoom_by(&mut self, factor: f32) {
        self.set_radius(self.radius * factor);
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.clamp(MIN_RADIUS, MAX_RADIUS);
    }

    /// Retarget the orbit, as the remote pick operation does.
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }
}

fn clamp_phi(phi: f32) -> f32 {
    phi.clamp(-FRAC_PI_2 + PHI_EPSILON, FRAC_PI_2 - PHI_EPSILON)
}
