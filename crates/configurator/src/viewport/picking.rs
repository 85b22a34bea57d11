use glam::DVec3;

/// A ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Box that contains nothing; growing it with a point yields that point
    pub const EMPTY: Aabb = Aabb {
        min: DVec3::splat(f64::INFINITY),
        max: DVec3::splat(f64::NEG_INFINITY),
    };

    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Box of the given size centered on `center`
    pub fn from_center_size(center: DVec3, size: DVec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Bounding box of a point set
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.grow(p);
        }
        aabb
    }

    pub fn grow(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Size of the box (zero for an empty box)
    pub fn size(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Center of the bounding box (origin for an empty box)
    pub fn center(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    pub fn translated(&self, offset: DVec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// The 12 edges of the box, for wireframe drawing
    pub fn edges(&self) -> [[DVec3; 2]; 12] {
        let (a, b) = (self.min, self.max);
        let c = |x: f64, y: f64, z: f64| DVec3::new(x, y, z);
        [
            [c(a.x, a.y, a.z), c(b.x, a.y, a.z)],
            [c(b.x, a.y, a.z), c(b.x, a.y, b.z)],
            [c(b.x, a.y, b.z), c(a.x, a.y, b.z)],
            [c(a.x, a.y, b.z), c(a.x, a.y, a.z)],
            [c(a.x, b.y, a.z), c(b.x, b.y, a.z)],
            [c(b.x, b.y, a.z), c(b.x, b.y, b.z)],
            [c(b.x, b.y, b.z), c(a.x, b.y, b.z)],
            [c(a.x, b.y, b.z), c(a.x, b.y, a.z)],
            [c(a.x, a.y, a.z), c(a.x, b.y, a.z)],
            [c(b.x, a.y, a.z), c(b.x, b.y, a.z)],
            [c(b.x, a.y, b.z), c(b.x, b.y, b.z)],
            [c(a.x, a.y, b.z), c(a.x, b.y, b.z)],
        ]
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f64> {
    if aabb.is_empty() {
        return None;
    }

    let inv_dir = DVec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Pick the nearest candidate whose AABB is intersected by the ray.
pub fn pick_nearest<'a, K>(ray: &Ray, candidates: impl IntoIterator<Item = (&'a K, Aabb)>) -> Option<&'a K>
where
    K: 'a,
{
    let mut best: Option<(&K, f64)> = None;

    for (key, aabb) in candidates {
        if let Some(dist) = ray_aabb(ray, &aabb) {
            if best.as_ref().is_none_or(|(_, d)| dist < *d) {
                best = Some((key, dist));
            }
        }
    }

    best.map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_ray(x: f64, z: f64) -> Ray {
        Ray {
            origin: DVec3::new(x, 500.0, z),
            direction: DVec3::NEG_Y,
        }
    }

    #[test]
    fn test_empty_box_has_zero_size() {
        assert!(Aabb::EMPTY.is_empty());
        assert_eq!(Aabb::EMPTY.size(), DVec3::ZERO);
        assert_eq!(Aabb::EMPTY.center(), DVec3::ZERO);
    }

    #[test]
    fn test_from_points() {
        let aabb = Aabb::from_points([DVec3::new(-1.0, 0.0, 2.0), DVec3::new(3.0, 4.0, -2.0)]);
        assert_eq!(aabb.size(), DVec3::new(4.0, 4.0, 4.0));
        assert_eq!(aabb.center(), DVec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_ray_hits_box() {
        let aabb = Aabb::from_center_size(DVec3::new(0.0, 75.0, 0.0), DVec3::new(140.0, 2.5, 70.0));
        let hit = ray_aabb(&down_ray(0.0, 0.0), &aabb).unwrap();
        assert!((hit - (500.0 - 76.25)).abs() < 1e-9);
    }

    #[test]
    fn test_ray_misses_box() {
        let aabb = Aabb::from_center_size(DVec3::ZERO, DVec3::splat(10.0));
        assert!(ray_aabb(&down_ray(50.0, 0.0), &aabb).is_none());
    }

    #[test]
    fn test_pick_nearest_prefers_closest() {
        let low = Aabb::from_center_size(DVec3::new(0.0, 10.0, 0.0), DVec3::splat(4.0));
        let high = Aabb::from_center_size(DVec3::new(0.0, 80.0, 0.0), DVec3::splat(4.0));
        let items = [("low", low), ("high", high)];
        let picked = pick_nearest(&down_ray(0.0, 0.0), items.iter().map(|(k, a)| (k, *a)));
        assert_eq!(picked, Some(&"high"));
    }
}
