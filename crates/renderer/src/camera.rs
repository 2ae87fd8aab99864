use glam::{Mat4, Vec2, Vec3};

pub const DEFAULT_CAMERA_DISTANCE: f32 = 0.3;
pub const DEFAULT_FOV_Y_DEGREES: f32 = 75.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1000.0;

/// Perspective camera on the +z axis looking down -z at a plane in z = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    fov_y: f32,
    aspect: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, DEFAULT_CAMERA_DISTANCE),
            fov_y: DEFAULT_FOV_Y_DEGREES.to_radians(),
            aspect: sanitize_aspect(aspect),
        }
    }

    pub fn with_distance(mut self, distance: f32) -> Self {
        self.position.z = distance;
        self
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y);
        let projection = Mat4::perspective_rh(self.fov_y, self.aspect, NEAR_PLANE, FAR_PLANE);
        projection * view
    }

    /// Casts a ray through `ndc` (x right, y up, both in [-1, 1]) and returns
    /// the uv of the hit on a `size` plane centred at the origin, if any.
    pub fn pick(&self, ndc: Vec2, size: Vec2) -> Option<Vec2> {
        self.picker().pick(ndc, size)
    }

    /// Pre-inverts the camera matrix for repeated picking.
    pub fn picker(&self) -> PlanePicker {
        PlanePicker {
            inverse: self.view_proj().inverse(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlanePicker {
    inverse: Mat4,
}

impl PlanePicker {
    pub fn pick(&self, ndc: Vec2, size: Vec2) -> Option<Vec2> {
        let near = self.inverse.project_point3(ndc.extend(0.0));
        let far = self.inverse.project_point3(ndc.extend(1.0));
        let direction = far - near;
        if direction.z.abs() <= f32::EPSILON {
            return None;
        }
        let t = -near.z / direction.z;
        if t < 0.0 {
            return None;
        }
        let hit = near + direction * t;
        let uv = Vec2::new(hit.x / size.x + 0.5, hit.y / size.y + 0.5);
        let inside = (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y);
        inside.then_some(uv)
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLANE: Vec2 = Vec2::new(3.0, 2.0);

    #[test]
    fn centre_of_view_hits_centre_of_plane() {
        let uv = Camera::new(1.5).pick(Vec2::ZERO, PLANE).unwrap();
        assert!((uv - Vec2::splat(0.5)).length() < 1e-4, "{uv:?}");
    }

    #[test]
    fn close_camera_sees_only_the_middle_of_the_plane() {
        let camera = Camera::new(1.5);
        let half_height = DEFAULT_CAMERA_DISTANCE * (DEFAULT_FOV_Y_DEGREES.to_radians() / 2.0).tan();
        let uv = camera.pick(Vec2::ONE, PLANE).unwrap();
        assert!((uv.x - (0.5 + half_height * 1.5 / PLANE.x)).abs() < 1e-3, "{uv:?}");
        assert!((uv.y - (0.5 + half_height / PLANE.y)).abs() < 1e-3, "{uv:?}");
    }

    #[test]
    fn distant_camera_misses_outside_the_plane() {
        let camera = Camera::new(1.5).with_distance(10.0);
        assert!(camera.pick(Vec2::new(0.9, 0.0), PLANE).is_none());
        assert!(camera.pick(Vec2::new(0.05, 0.05), PLANE).is_some());
    }

    #[test]
    fn degenerate_aspect_falls_back_to_square() {
        assert_eq!(Camera::new(0.0).aspect(), 1.0);
        assert_eq!(Camera::new(f32::NAN).aspect(), 1.0);
    }
}
