use crate::accum::{AccumulationController, FrameTick, ResetReason};
use crate::camera::{DeviceCameraRecord, OrbitCamera};
use crate::scene::{DevicePrimitive, Scene};

use super::{
    kernel_args, BufferLayout, ComputeBackend, DeviceBuffer, DeviceError, FrameParams,
    FrameSeeds, PresentationLease, SeedSource, WorkSize,
};

/// What one dispatched frame did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    pub tick: FrameTick,
    pub seeds: FrameSeeds,
    pub work: WorkSize,
    pub camera: DeviceCameraRecord,
}

impl FrameReport {
    pub fn frame_index(&self) -> u32 {
        self.tick.frame_index
    }

    pub fn sample_count(&self) -> u64 {
        self.tick.sample_count()
    }

    pub fn cleared(&self) -> bool {
        self.tick.clear
    }
}

/// Issues one frame's uploads and kernel dispatch in the fixed order.
pub struct FrameDispatcher {
    seeds: SeedSource,
    layout: Option<BufferLayout>,
    packed: Vec<DevicePrimitive>,
}

impl FrameDispatcher {
    pub fn new(seeds: SeedSource) -> Self {
        Self {
            seeds,
            layout: None,
            packed: Vec::new(),
        }
    }

    /// Forgets the configured layout so the next frame reallocates.
    pub fn invalidate_layout(&mut self) {
        self.layout = None;
    }

    /// Runs one frame against `backend`.
    ///
    /// The accumulation controller is ticked exactly once, before seeds are
    /// derived. The presentation buffer is released on every path once acquired.
    pub fn dispatch_frame<B: ComputeBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        camera: &OrbitCamera,
        scene: &Scene,
        accum: &mut AccumulationController,
    ) -> Result<FrameReport, DeviceError> {
        let resolution = camera.resolution();
        let layout = BufferLayout {
            resolution,
            primitive_capacity: scene.capacity().max(1),
        };
        if self.layout != Some(layout) {
            log::info!(
                "allocating device buffers: {}x{}, {} primitive slots",
                resolution.width,
                resolution.height,
                layout.primitive_capacity
            );
            backend.configure(layout)?;
            self.layout = Some(layout);
            accum.request_reset(ResetReason::ResolutionChanged);
        }

        // 1. primitives
        scene.pack_into(&mut self.packed);
        backend.upload(DeviceBuffer::Primitives, bytemuck::cast_slice(&self.packed))?;

        // 2. accumulation history
        let tick = accum.tick();
        if tick.clear {
            backend.clear(DeviceBuffer::Accumulation)?;
        }

        // 3. camera
        let record = camera.build_device_record();
        backend.upload(DeviceBuffer::Camera, record.as_bytes())?;

        // 4. scalars
        let seeds = self.seeds.derive(tick.frame_index);
        let params = FrameParams {
            width: resolution.width,
            height: resolution.height,
            primitive_count: scene.len() as u32,
            frame_index: tick.frame_index,
            seed_a: seeds.seed_a,
            seed_b: seeds.seed_b,
            frame_hash: seeds.frame_hash,
            _pad: 0,
        };
        backend.set_scalars(&params)?;

        // 5. acquire → dispatch → release
        let work = WorkSize::new(
            resolution,
            backend.group_size(),
            backend.max_groups_per_dimension(),
        );
        let args = kernel_args(&params);

        let mut lease = PresentationLease::acquire(backend)?;
        let dispatched = lease.dispatch(&args, work);
        let released = lease.release();
        dispatched?;
        released?;

        Ok(FrameReport {
            tick,
            seeds,
            work,
            camera: record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraCommand, Resolution};
    use crate::dispatch::recording::{Call, RecordingBackend};
    use crate::dispatch::{mix, KernelArg, Ownership};

    fn setup() -> (FrameDispatcher, OrbitCamera, Scene, AccumulationController) {
        let camera = OrbitCamera::new(Resolution::new(64, 48).unwrap(), 45.0).unwrap();
        (
            FrameDispatcher::new(SeedSource::from_seed(1)),
            camera,
            Scene::default_spheres(),
            AccumulationController::new(),
        )
    }

    #[test]
    fn first_frame_configures_then_runs_steps_in_order() {
        let (mut d, camera, scene, mut accum) = setup();
        let mut backend = RecordingBackend::new();

        let report = d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).unwrap();
        assert!(report.cleared());
        assert_eq!(report.frame_index(), 0);

        let layout = BufferLayout {
            resolution: camera.resolution(),
            primitive_capacity: 4,
        };
        let kinds: Vec<&Call> = backend.calls.iter().collect();
        assert_eq!(*kinds[0], Call::Configure(layout));
        assert_eq!(
            *kinds[1],
            Call::Upload {
                buffer: DeviceBuffer::Primitives,
                len: 4 * 64,
            }
        );
        assert_eq!(*kinds[2], Call::Clear(DeviceBuffer::Accumulation));
        assert_eq!(
            *kinds[3],
            Call::Upload {
                buffer: DeviceBuffer::Camera,
                len: 80,
            }
        );
        assert!(matches!(kinds[4], Call::SetScalars(_)));
        assert_eq!(*kinds[5], Call::Acquire);
        assert!(matches!(kinds[6], Call::Dispatch { .. }));
        assert_eq!(*kinds[7], Call::Release);
        assert_eq!(kinds.len(), 8);
    }

    #[test]
    fn consecutive_unchanged_frames_never_clear() {
        let (mut d, camera, scene, mut accum) = setup();
        let mut backend = RecordingBackend::new();
        d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).unwrap();
        backend.calls.clear();

        for expected in 1..=5u32 {
            let report = d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).unwrap();
            assert!(!report.cleared());
            assert_eq!(report.frame_index(), expected);
        }
        assert_eq!(backend.clears(DeviceBuffer::Accumulation), 0);
        assert!(!backend.calls.iter().any(|c| matches!(c, Call::Configure(_))));
    }

    #[test]
    fn scalars_carry_frame_index_and_mixed_hash() {
        let (mut d, camera, scene, mut accum) = setup();
        let mut backend = RecordingBackend::new();
        for _ in 0..3 {
            d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).unwrap();
        }
        let scalars = backend.scalars();
        for (i, p) in scalars.iter().enumerate() {
            assert_eq!(p.frame_index, i as u32);
            assert_eq!(p.frame_hash, mix(i as u32));
            assert_eq!((p.width, p.height, p.primitive_count), (64, 48, 4));
        }

        let (args, work) = &backend.dispatches()[2];
        assert_eq!(args[5], KernelArg::Uint(2));
        assert_eq!(args[10], KernelArg::Uint(mix(2)));
        assert_eq!(work.global, 64 * 48);
    }

    #[test]
    fn reset_request_clears_before_dispatch() {
        let (mut d, mut camera, scene, mut accum) = setup();
        let mut backend = RecordingBackend::new();
        d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).unwrap();
        d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).unwrap();

        camera.apply(CameraCommand::Strafe(0.05)).unwrap();
        if camera.take_dirty() {
            accum.request_reset(ResetReason::CameraChanged);
        }
        backend.calls.clear();

        let report = d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).unwrap();
        assert!(report.cleared());
        assert_eq!(report.frame_index(), 0);

        let clear_at = backend
            .calls
            .iter()
            .position(|c| *c == Call::Clear(DeviceBuffer::Accumulation))
            .unwrap();
        let dispatch_at = backend
            .calls
            .iter()
            .position(|c| matches!(c, Call::Dispatch { .. }))
            .unwrap();
        assert!(clear_at < dispatch_at);
    }

    #[test]
    fn resolution_change_reallocates_and_clears() {
        let (mut d, mut camera, scene, mut accum) = setup();
        let mut backend = RecordingBackend::new();
        d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).unwrap();
        d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).unwrap();

        camera.set_resolution(32, 32).unwrap();
        backend.calls.clear();
        let report = d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).unwrap();

        assert!(report.cleared());
        assert!(matches!(backend.calls[0], Call::Configure(l) if l.resolution.width == 32));
        assert_eq!(report.work.pixel_count, 32 * 32);
    }

    #[test]
    fn dispatch_always_runs_under_compute_ownership() {
        let (mut d, camera, scene, mut accum) = setup();
        let mut backend = RecordingBackend::new();
        for _ in 0..4 {
            d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).unwrap();
        }
        assert_eq!(backend.violations, 0);
        assert_eq!(backend.owner, Ownership::Display);
    }

    #[test]
    fn failed_dispatch_still_releases() {
        let (mut d, camera, scene, mut accum) = setup();
        let mut backend = RecordingBackend::new();
        backend.fail_dispatch = true;

        let err = d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).unwrap_err();
        assert!(matches!(err, DeviceError::Dispatch(_)));
        assert_eq!(backend.calls.last(), Some(&Call::Release));
        assert_eq!(backend.owner, Ownership::Display);
    }

    #[test]
    fn failed_acquire_skips_dispatch() {
        let (mut d, camera, scene, mut accum) = setup();
        let mut backend = RecordingBackend::new();
        backend.fail_acquire = true;

        assert!(d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).is_err());
        assert!(backend.dispatches().is_empty());
        assert!(!backend.calls.contains(&Call::Release));
    }

    #[test]
    fn uploaded_camera_matches_built_record() {
        let (mut d, camera, scene, mut accum) = setup();
        let mut backend = RecordingBackend::new();
        let report = d.dispatch_frame(&mut backend, &camera, &scene, &mut accum).unwrap();
        assert_eq!(backend.last_camera, report.camera.as_bytes());
        assert_eq!(report.camera, camera.build_device_record());
    }
}
