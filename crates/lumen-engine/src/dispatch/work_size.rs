use crate::camera::Resolution;

/// Per-dimension workgroup limit guaranteed by wgpu's default limits.
pub const MAX_GROUPS_PER_DIMENSION: u32 = 65_535;

/// Total work items for a `width × height` image, rounded up to a multiple of
/// `preferred_group_size`.
///
/// The kernel runs over a superset of the pixels and must ignore indices
/// `>= width * height`. A group size of zero is treated as one.
pub fn compute_work_size(width: u32, height: u32, preferred_group_size: u32) -> u64 {
    debug_assert!(preferred_group_size > 0);
    let group = preferred_group_size.max(1) as u64;
    let items = width as u64 * height as u64;
    items.div_ceil(group) * group
}

/// Work partitioning for one dispatch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WorkSize {
    /// Work items requested, a multiple of `group_size`.
    pub global: u64,
    /// Items per workgroup.
    pub group_size: u32,
    /// Workgroup grid `[x, y]`. `x * y * group_size >= global`.
    pub groups: [u32; 2],
    /// Pixels actually covered; the kernel's bounds check.
    pub pixel_count: u64,
}

impl WorkSize {
    /// Partitions `resolution` into groups of `group_size`, folding the group
    /// count into a second grid dimension when it exceeds `max_per_dimension`.
    pub fn new(resolution: Resolution, group_size: u32, max_per_dimension: u32) -> Self {
        let group_size = group_size.max(1);
        let max_per_dimension = max_per_dimension.max(1) as u64;

        let global = compute_work_size(resolution.width, resolution.height, group_size);
        let group_count = global / group_size as u64;

        let (x, y) = if group_count <= max_per_dimension {
            (group_count, 1)
        } else {
            (max_per_dimension, group_count.div_ceil(max_per_dimension))
        };

        Self {
            global,
            group_size,
            groups: [x as u32, y as u32],
            pixel_count: resolution.pixel_count(),
        }
    }

    /// Work items launched by the grid, including folding slack.
    pub fn launched(&self) -> u64 {
        self.groups[0] as u64 * self.groups[1] as u64 * self.group_size as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_hd_rounds_up_to_group_multiple() {
        let n = compute_work_size(1920, 1080, 256);
        let pixels = 1920 * 1080;
        assert_eq!(n % 256, 0);
        assert!(n >= pixels);
        assert!(n < pixels + 256);
    }

    #[test]
    fn exact_multiple_is_unchanged() {
        assert_eq!(compute_work_size(16, 16, 64), 256);
    }

    #[test]
    fn odd_sizes_round_up() {
        assert_eq!(compute_work_size(3, 3, 4), 12);
        assert_eq!(compute_work_size(1, 1, 64), 64);
    }

    #[test]
    fn small_grid_stays_one_dimensional() {
        let res = Resolution::new(640, 480).unwrap();
        let work = WorkSize::new(res, 64, MAX_GROUPS_PER_DIMENSION);
        assert_eq!(work.groups, [4800, 1]);
        assert_eq!(work.launched(), work.global);
        assert_eq!(work.pixel_count, 640 * 480);
    }

    #[test]
    fn large_grid_folds_into_second_dimension() {
        let res = Resolution::new(7680, 4320).unwrap();
        let work = WorkSize::new(res, 64, MAX_GROUPS_PER_DIMENSION);
        assert_eq!(work.groups[0], MAX_GROUPS_PER_DIMENSION);
        assert!(work.groups[1] > 1);
        assert!(work.launched() >= work.global);
        assert!(work.launched() >= work.pixel_count);
    }
}
