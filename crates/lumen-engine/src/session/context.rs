use crate::accum::{AccumulationController, ResetReason};
use crate::camera::{CameraCommand, CameraError, ConfigError, OrbitCamera};
use crate::dispatch::{ComputeBackend, DeviceError, FrameDispatcher, FrameReport, SeedSource};
use crate::scene::Scene;

use super::SessionConfig;

/// Totals reported when a session ends.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SessionSummary {
    pub frames_dispatched: u64,
    /// Samples per pixel in the image on screen when the session ended.
    pub samples_per_pixel: u64,
}

/// Owns the camera, scene snapshot, accumulation state and dispatcher for one
/// interactive run.
///
/// Camera and scene edits are observed through their dirty flags at the start
/// of [`render_frame`](Self::render_frame), so any change made between two
/// frames discards the accumulated history exactly once.
pub struct Session {
    config: SessionConfig,
    camera: OrbitCamera,
    fov_degrees: f32,
    scene: Scene,
    accum: AccumulationController,
    dispatcher: FrameDispatcher,
    last_report: Option<FrameReport>,
}

impl Session {
    pub fn new(config: SessionConfig, scene: Scene) -> Result<Self, ConfigError> {
        let resolution = config.validate()?;
        let camera =
            OrbitCamera::from_pose(config.pose, resolution, config.horizontal_fov_degrees)?;

        match config.seed {
            Some(seed) => log::info!("session seed fixed at {seed}"),
            None => log::debug!("session seed drawn from OS entropy"),
        }
        log::info!(
            "session start: {}x{}, fov {:.1}°, {} primitive(s)",
            resolution.width,
            resolution.height,
            config.horizontal_fov_degrees,
            scene.len()
        );

        Ok(Self {
            dispatcher: FrameDispatcher::new(SeedSource::new(config.seed)),
            fov_degrees: config.horizontal_fov_degrees,
            config,
            camera,
            scene,
            accum: AccumulationController::new(),
            last_report: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Direct camera access. Any successful mutation resets accumulation on
    /// the next frame.
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Direct scene access. Any successful edit resets accumulation on the
    /// next frame.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn accumulation(&self) -> &AccumulationController {
        &self.accum
    }

    pub fn last_report(&self) -> Option<&FrameReport> {
        self.last_report.as_ref()
    }

    pub fn apply(&mut self, command: CameraCommand) -> Result<(), CameraError> {
        self.camera.apply(command)
    }

    /// Replaces the camera with a fresh one built from the configured pose,
    /// keeping the current resolution and field of view.
    pub fn reset_camera(&mut self) -> Result<(), ConfigError> {
        self.camera =
            OrbitCamera::from_pose(self.config.pose, self.camera.resolution(), self.fov_degrees)?;
        self.accum.request_reset(ResetReason::CameraReinitialized);
        log::info!("camera reset to initial pose");
        Ok(())
    }

    /// Changes the render resolution. Returns `false` when the size is
    /// unchanged.
    ///
    /// Device buffers are reallocated and accumulation restarts on the next
    /// frame.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<bool, ConfigError> {
        let current = self.camera.resolution();
        if (current.width, current.height) == (width, height) {
            return Ok(false);
        }
        self.camera.set_resolution(width, height)?;
        self.accum.request_reset(ResetReason::ResolutionChanged);
        log::debug!("resolution {}x{} -> {width}x{height}", current.width, current.height);
        Ok(true)
    }

    pub fn set_horizontal_fov(&mut self, degrees: f32) -> Result<(), ConfigError> {
        self.camera.set_horizontal_fov(degrees)?;
        self.fov_degrees = degrees;
        Ok(())
    }

    /// Forces buffer reallocation on the next frame, e.g. after the backend
    /// was rebuilt on a new device.
    pub fn invalidate_device(&mut self) {
        self.dispatcher.invalidate_layout();
        self.accum.request_reset(ResetReason::ResolutionChanged);
    }

    /// Produces one frame: folds pending camera and scene edits into the
    /// accumulation state, then dispatches.
    pub fn render_frame<B: ComputeBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<FrameReport, DeviceError> {
        if self.camera.take_dirty() {
            self.accum.request_reset(ResetReason::CameraChanged);
        }
        if self.scene.take_dirty() {
            self.accum.request_reset(ResetReason::SceneChanged);
        }

        let report =
            self.dispatcher
                .dispatch_frame(backend, &self.camera, &self.scene, &mut self.accum)?;
        if report.cleared() {
            log::trace!("frame {} restarted accumulation", report.frame_index());
        }
        self.last_report = Some(report);
        Ok(report)
    }

    /// Ends the session and reports its totals.
    pub fn finish(self) -> SessionSummary {
        let summary = SessionSummary {
            frames_dispatched: self.accum.frames_dispatched(),
            samples_per_pixel: self.accum.sample_count(),
        };
        log::info!(
            "session end: {} frame(s) dispatched, {} spp on screen",
            summary.frames_dispatched,
            summary.samples_per_pixel
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accum::AccumPhase;
    use crate::dispatch::recording::RecordingBackend;
    use crate::dispatch::DeviceBuffer;
    use crate::math::Vec3;
    use crate::scene::Primitive;

    fn session() -> Session {
        let config = SessionConfig {
            width: 64,
            height: 48,
            seed: Some(7),
            ..SessionConfig::default()
        };
        Session::new(config, Scene::default_spheres()).unwrap()
    }

    fn warm(session: &mut Session, backend: &mut RecordingBackend) {
        session.render_frame(backend).unwrap();
        session.render_frame(backend).unwrap();
        backend.calls.clear();
    }

    // ── frame sequencing ──────────────────────────────────────────────────

    #[test]
    fn first_frame_clears_then_frames_count_up() {
        let mut s = session();
        let mut backend = RecordingBackend::new();

        let reports: Vec<_> = (0..4).map(|_| s.render_frame(&mut backend).unwrap()).collect();
        assert!(reports[0].cleared());
        assert!(reports[1..].iter().all(|r| !r.cleared()));
        let indices: Vec<u32> = reports.iter().map(FrameReport::frame_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(backend.clears(DeviceBuffer::Accumulation), 1);
        assert_eq!(s.accumulation().sample_count(), 4);
    }

    #[test]
    fn unchanged_camera_keeps_accumulating() {
        let mut s = session();
        let mut backend = RecordingBackend::new();
        warm(&mut s, &mut backend);

        let a = s.render_frame(&mut backend).unwrap();
        let b = s.render_frame(&mut backend).unwrap();
        assert!(!a.cleared() && !b.cleared());
        assert_eq!(b.frame_index(), a.frame_index() + 1);
        assert_eq!(a.camera, b.camera);
        assert_eq!(backend.clears(DeviceBuffer::Accumulation), 0);
    }

    #[test]
    fn every_camera_command_restarts_accumulation() {
        let commands = [
            CameraCommand::Yaw(0.1),
            CameraCommand::Pitch(0.1),
            CameraCommand::Radius(0.1),
            CameraCommand::Altitude(0.1),
            CameraCommand::Strafe(0.1),
            CameraCommand::Forward(0.1),
            CameraCommand::ApertureDiameter(0.1),
            CameraCommand::FocalDistance(0.1),
        ];
        for command in commands {
            let mut s = session();
            let mut backend = RecordingBackend::new();
            warm(&mut s, &mut backend);

            s.apply(command).unwrap();
            let report = s.render_frame(&mut backend).unwrap();
            assert!(report.cleared(), "{command:?} did not restart accumulation");
            assert_eq!(report.frame_index(), 0);
            assert_eq!(backend.clears(DeviceBuffer::Accumulation), 1);
        }
    }

    #[test]
    fn several_edits_between_frames_clear_once() {
        let mut s = session();
        let mut backend = RecordingBackend::new();
        warm(&mut s, &mut backend);

        s.apply(CameraCommand::Yaw(0.2)).unwrap();
        s.apply(CameraCommand::Radius(-0.5)).unwrap();
        s.scene_mut().translate(1, Vec3::X).unwrap();
        s.render_frame(&mut backend).unwrap();
        s.render_frame(&mut backend).unwrap();
        assert_eq!(backend.clears(DeviceBuffer::Accumulation), 1);
    }

    #[test]
    fn rejected_command_does_not_reset() {
        let mut s = session();
        let mut backend = RecordingBackend::new();
        warm(&mut s, &mut backend);

        assert!(s.apply(CameraCommand::Pitch(f32::NAN)).is_err());
        let report = s.render_frame(&mut backend).unwrap();
        assert!(!report.cleared());
    }

    // ── reconfiguration ───────────────────────────────────────────────────

    #[test]
    fn scene_edit_restarts_accumulation() {
        let mut s = session();
        let mut backend = RecordingBackend::new();
        warm(&mut s, &mut backend);

        s.scene_mut()
            .set(2, Primitive::diffuse(0.1, Vec3::Y, Vec3::new(1.0, 1.0, 1.0)))
            .unwrap();
        assert_eq!(s.accumulation().phase(), AccumPhase::Accumulating);
        let report = s.render_frame(&mut backend).unwrap();
        assert!(report.cleared());
        assert_eq!(backend.scalars()[0].primitive_count, 4);
    }

    #[test]
    fn resize_reallocates_and_restarts() {
        let mut s = session();
        let mut backend = RecordingBackend::new();
        warm(&mut s, &mut backend);

        assert_eq!(s.resize(64, 48), Ok(false));
        assert!(s.resize(32, 32).unwrap());
        assert!(s.resize(0, 32).is_err());

        let report = s.render_frame(&mut backend).unwrap();
        assert!(report.cleared());
        assert_eq!(report.work.pixel_count, 32 * 32);
        assert_eq!(s.camera().resolution().width, 32);
        assert_eq!(backend.clears(DeviceBuffer::Accumulation), 1);
    }

    #[test]
    fn reset_camera_restores_pose_and_clears() {
        let mut s = session();
        let mut backend = RecordingBackend::new();
        warm(&mut s, &mut backend);
        let initial = s.camera().build_device_record();

        s.apply(CameraCommand::Yaw(1.0)).unwrap();
        s.apply(CameraCommand::Strafe(0.3)).unwrap();
        s.render_frame(&mut backend).unwrap();
        assert_ne!(s.camera().build_device_record(), initial);

        s.reset_camera().unwrap();
        let report = s.render_frame(&mut backend).unwrap();
        assert!(report.cleared());
        assert_eq!(report.camera, initial);
    }

    #[test]
    fn fov_change_restarts_accumulation() {
        let mut s = session();
        let mut backend = RecordingBackend::new();
        warm(&mut s, &mut backend);

        s.set_horizontal_fov(60.0).unwrap();
        assert!(s.render_frame(&mut backend).unwrap().cleared());
    }

    #[test]
    fn invalidate_device_reconfigures() {
        let mut s = session();
        let mut backend = RecordingBackend::new();
        warm(&mut s, &mut backend);

        s.invalidate_device();
        let report = s.render_frame(&mut backend).unwrap();
        assert!(report.cleared());
        assert!(matches!(backend.calls[0], crate::dispatch::recording::Call::Configure(_)));
    }

    #[test]
    fn failed_frame_keeps_previous_report() {
        let mut s = session();
        let mut backend = RecordingBackend::new();
        let first = s.render_frame(&mut backend).unwrap();

        backend.fail_dispatch = true;
        assert!(s.render_frame(&mut backend).is_err());
        assert_eq!(s.last_report(), Some(&first));
        assert_eq!(backend.owner, crate::dispatch::Ownership::Display);
    }

    #[test]
    fn finish_reports_totals() {
        let mut s = session();
        let mut backend = RecordingBackend::new();
        for _ in 0..3 {
            s.render_frame(&mut backend).unwrap();
        }
        let summary = s.finish();
        assert_eq!(summary.frames_dispatched, 3);
        assert_eq!(summary.samples_per_pixel, 3);
    }
}
