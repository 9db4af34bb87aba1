//! Perspective camera, rays and the probe sphere.
//!
//! This is the minimal scene a frame needs: one camera looking at one unit
//! sphere. Pixel coordinates have their origin at the top-left corner with
//! `y` pointing down; pixel `(i, j)` covers `[i, i+1) × [j, j+1)`.

use glam::{DMat4, DVec3, DVec4};
use normprobe_spec::FrameParams;

/// Default near plane distance.
pub const DEFAULT_NEAR: f64 = 0.1;

/// Default far plane distance.
pub const DEFAULT_FAR: f64 = 10.0;

/// Default vertical field of view in degrees.
pub const DEFAULT_FOV_DEGREES: f64 = 75.0;

/// Smallest ray parameter accepted as a hit.
const HIT_EPSILON: f64 = 1e-9;

/// A ray with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a ray, normalizing the direction.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t`.
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Intersection of a ray with a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// World-space hit point.
    pub point: DVec3,
    /// Outward unit geometric normal at the hit.
    pub normal: DVec3,
    /// Ray parameter of the hit.
    pub distance: f64,
}

/// A surface that can be picked with a ray.
pub trait SurfacePick {
    /// Nearest intersection in front of the ray origin, if any.
    fn pick(&self, ray: &Ray) -> Option<SurfaceHit>;
}

/// Sphere of radius 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSphere {
    pub center: DVec3,
}

impl Default for UnitSphere {
    fn default() -> Self {
        Self {
            center: DVec3::ZERO,
        }
    }
}

impl UnitSphere {
    /// Outward normal at a point on (or near) the sphere.
    pub fn normal_at(&self, point: DVec3) -> DVec3 {
        (point - self.center).normalize_or_zero()
    }
}

impl SurfacePick for UnitSphere {
    fn pick(&self, ray: &Ray) -> Option<SurfaceHit> {
        let oc = ray.origin - self.center;
        let b = oc.dot(ray.direction);
        let c = oc.length_squared() - 1.0;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        let t = [-b - root, -b + root]
            .into_iter()
            .find(|&t| t > HIT_EPSILON)?;
        let point = ray.at(t);
        Some(SurfaceHit {
            point,
            normal: self.normal_at(point),
            distance: t,
        })
    }
}

/// Right-handed perspective camera with a `[0, 1]` depth range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: DVec3,
    pub target: DVec3,
    pub up: DVec3,
    /// Vertical field of view in radians.
    pub fov_y: f64,
    pub near: f64,
    pub far: f64,
    pub width: u32,
    pub height: u32,
}

impl PerspectiveCamera {
    /// Camera at `(0, 0, distance)` looking at the origin.
    pub fn looking_at_origin(distance: f64, fov_y_degrees: f64, width: u32, height: u32) -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, distance),
            target: DVec3::ZERO,
            up: DVec3::Y,
            fov_y: fov_y_degrees.to_radians(),
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR.max(distance + 2.0),
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Camera described by a parameter snapshot.
    pub fn from_params(params: &FrameParams) -> Self {
        Self::looking_at_origin(
            params.camera_distance,
            params.fov_y_degrees,
            params.width(),
            params.height(),
        )
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// World to view transform.
    pub fn view(&self) -> DMat4 {
        DMat4::look_at_rh(self.position, self.target, self.up)
    }

    /// View to clip transform.
    pub fn projection(&self) -> DMat4 {
        DMat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far)
    }

    /// World to clip transform.
    pub fn view_projection(&self) -> DMat4 {
        self.projection() * self.view()
    }

    /// Project a world point to continuous pixel coordinates.
    ///
    /// Returns `None` for points at or behind the camera plane.
    pub fn project_to_pixel(&self, world: DVec3) -> Option<[f64; 2]> {
        let clip = self.view_projection() * DVec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= HIT_EPSILON {
            return None;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        Some([
            (ndc_x * 0.5 + 0.5) * self.width as f64,
            (0.5 - ndc_y * 0.5) * self.height as f64,
        ])
    }

    /// World-space ray through continuous pixel coordinates.
    pub fn ray_through(&self, px: f64, py: f64) -> Ray {
        let ndc_x = 2.0 * px / self.width as f64 - 1.0;
        let ndc_y = 1.0 - 2.0 * py / self.height as f64;
        let inv = self.view_projection().inverse();
        let near = inv.project_point3(DVec3::new(ndc_x, ndc_y, 0.0));
        let far = inv.project_point3(DVec3::new(ndc_x, ndc_y, 1.0));
        Ray::new(near, far - near)
    }

    /// World-space ray through the centre of pixel `(x, y)`.
    pub fn ray_through_pixel(&self, x: u32, y: u32) -> Ray {
        self.ray_through(x as f64 + 0.5, y as f64 + 0.5)
    }

    /// Transform a world point into view space.
    pub fn to_view_point(&self, world: DVec3) -> DVec3 {
        self.view().transform_point3(world)
    }

    /// Transform a world direction into view space.
    pub fn to_view_direction(&self, world: DVec3) -> DVec3 {
        self.view().transform_vector3(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::looking_at_origin(2.0, DEFAULT_FOV_DEGREES, 200, 100)
    }

    #[test]
    fn test_origin_projects_to_centre() {
        let p = camera().project_to_pixel(DVec3::ZERO).unwrap();
        assert!((p[0] - 100.0).abs() < 1e-9);
        assert!((p[1] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let p = camera().project_to_pixel(DVec3::new(0.0, 0.5, 0.0)).unwrap();
        assert!(p[1] < 50.0);
        let p = camera().project_to_pixel(DVec3::new(0.5, 0.0, 0.0)).unwrap();
        assert!(p[0] > 100.0);
    }

    #[test]
    fn test_behind_camera_is_none() {
        assert!(camera().project_to_pixel(DVec3::new(0.0, 0.0, 3.0)).is_none());
    }

    #[test]
    fn test_ray_through_projection_round_trip() {
        let cam = camera();
        let world = DVec3::new(0.3, -0.2, 0.4);
        let [px, py] = cam.project_to_pixel(world).unwrap();
        let ray = cam.ray_through(px, py);
        let to_point = (world - ray.origin).normalize();
        assert!(to_point.dot(ray.direction) > 1.0 - 1e-9);
    }

    #[test]
    fn test_centre_ray_hits_front_pole() {
        let cam = camera();
        let ray = cam.ray_through(100.0, 50.0);
        let hit = UnitSphere::default().pick(&ray).unwrap();
        assert!((hit.point - DVec3::Z).length() < 1e-9);
        assert!((hit.normal - DVec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_ray_misses_sphere() {
        let ray = Ray::new(DVec3::new(0.0, 0.0, 2.0), DVec3::X);
        assert!(UnitSphere::default().pick(&ray).is_none());
    }

    #[test]
    fn test_ray_from_inside_hits_far_side() {
        let ray = Ray::new(DVec3::ZERO, DVec3::Y);
        let hit = UnitSphere::default().pick(&ray).unwrap();
        assert!((hit.point - DVec3::Y).length() < 1e-12);
        assert!((hit.distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_view_space_camera_at_origin() {
        let cam = camera();
        assert!(cam.to_view_point(cam.position).length() < 1e-12);
        let forward = cam.to_view_direction(cam.target - cam.position).normalize();
        assert!((forward - DVec3::NEG_Z).length() < 1e-12);
    }
}
