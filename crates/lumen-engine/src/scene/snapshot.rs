use crate::math::Vec3;

use super::{DevicePrimitive, Primitive, SceneError};

/// Ordered primitive list with a capacity fixed at creation.
///
/// The device-side primitive buffer is sized from `capacity`, so the list can
/// grow up to it between frames without reallocation.
#[derive(Debug, Clone)]
pub struct Scene {
    items: Vec<Primitive>,
    capacity: usize,
    dirty: bool,
}

impl Scene {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            dirty: false,
        }
    }

    /// Builds a scene holding exactly `primitives`, with capacity equal to their count.
    pub fn from_primitives(primitives: Vec<Primitive>) -> Result<Self, SceneError> {
        for p in &primitives {
            p.validate()?;
        }
        Ok(Self {
            capacity: primitives.len(),
            items: primitives,
            dirty: false,
        })
    }

    /// Ground, two diffuse spheres and an overhead light.
    pub fn default_spheres() -> Self {
        let items = vec![
            Primitive::diffuse(200.0, Vec3::new(0.0, -200.4, 0.0), Vec3::new(0.9, 0.3, 0.0)),
            Primitive::diffuse(0.16, Vec3::new(-0.25, -0.24, -0.1), Vec3::new(0.9, 0.8, 0.7)),
            Primitive::diffuse(0.16, Vec3::new(0.25, -0.24, 0.1), Vec3::new(0.9, 0.8, 0.7)),
            Primitive::light(1.0, Vec3::new(0.0, 1.36, 0.0), Vec3::new(9.0, 8.0, 6.0)),
        ];
        Self {
            capacity: items.len(),
            items,
            dirty: false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn primitives(&self) -> &[Primitive] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Primitive> {
        self.items.get(index)
    }

    /// Appends a primitive. Fails when the scene is at capacity.
    pub fn push(&mut self, primitive: Primitive) -> Result<usize, SceneError> {
        if self.items.len() >= self.capacity {
            return Err(SceneError::Full {
                capacity: self.capacity,
            });
        }
        primitive.validate()?;
        self.items.push(primitive);
        self.dirty = true;
        Ok(self.items.len() - 1)
    }

    /// Replaces the primitive at `index`.
    pub fn set(&mut self, index: usize, primitive: Primitive) -> Result<(), SceneError> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(SceneError::OutOfRange { index, len })?;
        primitive.validate()?;
        *slot = primitive;
        self.dirty = true;
        Ok(())
    }

    /// Moves the primitive at `index` by `offset`.
    pub fn translate(&mut self, index: usize, offset: Vec3) -> Result<(), SceneError> {
        let current = *self
            .get(index)
            .ok_or(SceneError::OutOfRange {
                index,
                len: self.items.len(),
            })?;
        self.set(
            index,
            Primitive {
                position: current.position + offset,
                ..current
            },
        )
    }

    pub fn remove(&mut self, index: usize) -> Result<Primitive, SceneError> {
        if index >= self.items.len() {
            return Err(SceneError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.dirty = true;
        Ok(self.items.remove(index))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns and clears the mutation flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Packs all primitives into `out`, reusing its allocation.
    pub fn pack_into(&self, out: &mut Vec<DevicePrimitive>) {
        out.clear();
        out.extend(self.items.iter().map(Primitive::to_device));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey(r: f32) -> Primitive {
        Primitive::diffuse(r, Vec3::zero(), Vec3::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn default_scene_has_ground_first_and_light_last() {
        let scene = Scene::default_spheres();
        assert_eq!(scene.len(), 4);
        assert!(scene.get(0).unwrap().radius > 100.0);
        assert!(scene.get(3).unwrap().is_emissive());
        assert!(!scene.is_dirty());
        assert!(scene.primitives().iter().all(|p| p.validate().is_ok()));
    }

    #[test]
    fn push_respects_capacity() {
        let mut scene = Scene::with_capacity(2);
        assert_eq!(scene.push(grey(1.0)), Ok(0));
        assert_eq!(scene.push(grey(2.0)), Ok(1));
        assert_eq!(scene.push(grey(3.0)), Err(SceneError::Full { capacity: 2 }));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn invalid_primitive_is_not_inserted() {
        let mut scene = Scene::with_capacity(2);
        assert!(scene.push(grey(-1.0)).is_err());
        assert!(scene.is_empty());
        assert!(!scene.is_dirty());
    }

    #[test]
    fn mutation_marks_dirty_once() {
        let mut scene = Scene::default_spheres();
        scene.translate(1, Vec3::new(0.0, 0.01, 0.0)).unwrap();
        assert!(scene.take_dirty());
        assert!(!scene.take_dirty());
        assert!((scene.get(1).unwrap().position.y - (-0.23)).abs() < 1.0e-6);
    }

    #[test]
    fn set_out_of_range_fails() {
        let mut scene = Scene::default_spheres();
        assert_eq!(
            scene.set(9, grey(1.0)),
            Err(SceneError::OutOfRange { index: 9, len: 4 })
        );
        assert!(!scene.is_dirty());
    }

    #[test]
    fn remove_frees_capacity() {
        let mut scene = Scene::default_spheres();
        scene.remove(1).unwrap();
        assert_eq!(scene.len(), 3);
        assert!(scene.push(grey(0.1)).is_ok());
    }

    #[test]
    fn pack_reuses_allocation() {
        let scene = Scene::default_spheres();
        let mut out = Vec::new();
        scene.pack_into(&mut out);
        assert_eq!(out.len(), 4);
        assert_eq!(out[3].emission, [9.0, 8.0, 6.0]);

        let ptr = out.as_ptr();
        scene.pack_into(&mut out);
        assert_eq!(out.as_ptr(), ptr);
    }
}
