use std::time::{Duration, Instant};

/// One throughput sample covering a reporting window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Throughput {
    pub frames_per_second: f32,
    /// Samples per pixel in the image at the end of the window.
    pub samples_per_pixel: u64,
    /// Pixel samples computed per second across the window.
    pub samples_per_second: f64,
}

/// Aggregates dispatched frames into periodic throughput reports.
#[derive(Debug, Clone)]
pub struct ThroughputMeter {
    interval: Duration,
    window_start: Option<Instant>,
    frames: u32,
    pixel_samples: u64,
}

impl ThroughputMeter {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_start: None,
            frames: 0,
            pixel_samples: 0,
        }
    }

    /// Records one dispatched frame of `pixel_count` samples. Returns a report
    /// once per interval and logs it.
    pub fn record(
        &mut self,
        now: Instant,
        pixel_count: u64,
        samples_per_pixel: u64,
    ) -> Option<Throughput> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        self.pixel_samples += pixel_count;

        let elapsed = now.saturating_duration_since(start);
        if elapsed < self.interval || elapsed.is_zero() {
            return None;
        }

        let secs = elapsed.as_secs_f64();
        let report = Throughput {
            frames_per_second: (self.frames as f64 / secs) as f32,
            samples_per_pixel,
            samples_per_second: self.pixel_samples as f64 / secs,
        };
        log::info!(
            "{:.1} frames/s, {:.2} Msamples/s, {} spp",
            report.frames_per_second,
            report.samples_per_second / 1.0e6,
            report.samples_per_pixel
        );

        self.window_start = Some(now);
        self.frames = 0;
        self.pixel_samples = 0;
        Some(report)
    }
}

impl Default for ThroughputMeter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_interval() {
        let start = Instant::now();
        let mut meter = ThroughputMeter::new(Duration::from_secs(1));
        let at = |ms| start + Duration::from_millis(ms);

        assert_eq!(meter.record(at(0), 100, 1), None);
        for i in 1..4 {
            assert_eq!(meter.record(at(i * 250), 100, i + 1), None);
        }
        let report = meter.record(at(1000), 100, 5).unwrap();
        assert_eq!(report.frames_per_second, 5.0);
        assert_eq!(report.samples_per_second, 500.0);
        assert_eq!(report.samples_per_pixel, 5);

        assert_eq!(meter.record(at(1500), 100, 6), None);
    }
}
