use std::mem::size_of;

use crate::camera::{DeviceCameraRecord, Resolution};
use crate::dispatch::{
    BufferLayout, ComputeBackend, DeviceBuffer, DeviceError, FrameParams, KernelArg, Ownership,
    WorkSize, KERNEL_ARG_COUNT,
};
use crate::scene::DevicePrimitive;

use super::common::{buffer_entry, storage_entry, uniform_entry, wait_idle};

/// Workgroup size every kernel must declare with `@workgroup_size(64)`.
pub const KERNEL_WORKGROUP_SIZE: u32 = 64;

/// Bytes per accumulation texel (`vec4<f32>`).
const ACCUM_TEXEL: u64 = 16;
/// Bytes per presentation pixel (packed RGBA8).
const PRESENT_TEXEL: u64 = 4;

/// WGSL source of a path-tracing kernel.
///
/// The kernel binds group 0 as: 0 primitives (read), 1 frame scalars
/// (uniform), 2 presentation (read_write, one `u32` per pixel), 3 camera
/// (uniform), 4 accumulation (read_write, one `vec4<f32>` per pixel). Its
/// entry point must bounds-check the linearized invocation index against
/// `width * height`.
#[derive(Debug, Clone, Copy)]
pub struct KernelSource<'a> {
    pub label: &'a str,
    pub wgsl: &'a str,
    pub entry_point: &'a str,
}

/// Read access to the presentation buffer for the display pipeline.
pub struct PresentationView<'a> {
    pub buffer: &'a wgpu::Buffer,
    pub resolution: Resolution,
    /// Bumped on every reallocation so dependent bind groups can be rebuilt.
    pub generation: u64,
}

struct Allocation {
    layout: BufferLayout,
    primitives: wgpu::Buffer,
    accumulation: wgpu::Buffer,
    presentation: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// wgpu compute backend.
///
/// Shares the window's device and queue. Every operation waits for the queue
/// to drain before returning, so the display pipeline never observes a
/// half-written presentation buffer.
pub struct WgpuCompute {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params_ubo: wgpu::Buffer,
    camera_ubo: wgpu::Buffer,
    allocation: Option<Allocation>,
    owner: Ownership,
    generation: u64,
}

impl WgpuCompute {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        kernel: KernelSource<'_>,
    ) -> Result<Self, DeviceError> {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(kernel.label),
            source: wgpu::ShaderSource::Wgsl(kernel.wgsl.into()),
        });

        let info = pollster::block_on(module.get_compilation_info());
        let errors: Vec<String> = info
            .messages
            .iter()
            .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
            .map(|m| m.message.clone())
            .collect();
        if !errors.is_empty() {
            return Err(DeviceError::Kernel(errors.join("; ")));
        }

        let stage = wgpu::ShaderStages::COMPUTE;
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen kernel bgl"),
            entries: &[
                storage_entry(0, stage, true),
                uniform_entry(1, stage, size_of::<FrameParams>() as u64),
                storage_entry(2, stage, false),
                uniform_entry(3, stage, size_of::<DeviceCameraRecord>() as u64),
                storage_entry(4, stage, false),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen kernel pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(kernel.label),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: Some(kernel.entry_point),
            compilation_options: Default::default(),
            cache: None,
        });

        let params_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen frame params ubo"),
            size: size_of::<FrameParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen camera ubo"),
            size: size_of::<DeviceCameraRecord>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::debug!("kernel `{}` built", kernel.label);

        Ok(Self {
            device: device.clone(),
            queue: queue.clone(),
            pipeline,
            bind_group_layout,
            params_ubo,
            camera_ubo,
            allocation: None,
            owner: Ownership::Display,
            generation: 0,
        })
    }

    /// The presentation buffer, or `None` while unallocated or compute-owned.
    pub fn presentation(&self) -> Option<PresentationView<'_>> {
        if self.owner != Ownership::Display {
            return None;
        }
        let alloc = self.allocation.as_ref()?;
        Some(PresentationView {
            buffer: &alloc.presentation,
            resolution: alloc.layout.resolution,
            generation: self.generation,
        })
    }

    fn allocation(&self) -> Result<&Allocation, DeviceError> {
        self.allocation.as_ref().ok_or(DeviceError::NotConfigured)
    }

    fn buffer(&self, buffer: DeviceBuffer) -> Result<&wgpu::Buffer, DeviceError> {
        if buffer == DeviceBuffer::Camera {
            return Ok(&self.camera_ubo);
        }
        let alloc = self.allocation()?;
        Ok(match buffer {
            DeviceBuffer::Primitives => &alloc.primitives,
            DeviceBuffer::Accumulation => &alloc.accumulation,
            DeviceBuffer::Presentation => &alloc.presentation,
            DeviceBuffer::Camera => &self.camera_ubo,
        })
    }

    fn create_storage(&self, label: &str, size: u64) -> Result<wgpu::Buffer, DeviceError> {
        let limits = self.device.limits();
        let max = u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size);
        if size > max {
            return Err(DeviceError::Allocation(format!(
                "{label} needs {size} bytes, device allows {max}"
            )));
        }
        Ok(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }))
    }

    /// Submits queued writes and waits for the device.
    fn flush(&self) -> Result<(), String> {
        self.queue.submit(std::iter::empty());
        wait_idle(&self.device)
    }
}

impl ComputeBackend for WgpuCompute {
    fn group_size(&self) -> u32 {
        KERNEL_WORKGROUP_SIZE
    }

    fn max_groups_per_dimension(&self) -> u32 {
        self.device.limits().max_compute_workgroups_per_dimension
    }

    fn configure(&mut self, layout: BufferLayout) -> Result<(), DeviceError> {
        if self.owner != Ownership::Display {
            return Err(DeviceError::Ownership("reallocation while compute-owned"));
        }

        // Release the old buffers before asking for new ones.
        self.allocation = None;

        let pixels = layout.resolution.pixel_count();
        let primitives = self.create_storage(
            "lumen primitives",
            layout.primitive_capacity as u64 * size_of::<DevicePrimitive>() as u64,
        )?;
        let accumulation = self.create_storage("lumen accumulation", pixels * ACCUM_TEXEL)?;
        let presentation = self.create_storage("lumen presentation", pixels * PRESENT_TEXEL)?;

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen kernel bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                buffer_entry(0, &primitives),
                buffer_entry(1, &self.params_ubo),
                buffer_entry(2, &presentation),
                buffer_entry(3, &self.camera_ubo),
                buffer_entry(4, &accumulation),
            ],
        });

        self.allocation = Some(Allocation {
            layout,
            primitives,
            accumulation,
            presentation,
            bind_group,
        });
        self.generation += 1;
        Ok(())
    }

    fn upload(&mut self, buffer: DeviceBuffer, bytes: &[u8]) -> Result<(), DeviceError> {
        let target = self.buffer(buffer)?;
        let len = bytes.len() as u64;
        if len > target.size() {
            return Err(DeviceError::Overflow {
                buffer,
                len,
                capacity: target.size(),
            });
        }
        if len % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
            return Err(DeviceError::Upload {
                buffer,
                reason: format!("{len} bytes is not a multiple of {}", wgpu::COPY_BUFFER_ALIGNMENT),
            });
        }
        if len == 0 {
            return Ok(());
        }

        self.queue.write_buffer(target, 0, bytes);
        self.flush()
            .map_err(|reason| DeviceError::Upload { buffer, reason })
    }

    fn clear(&mut self, buffer: DeviceBuffer) -> Result<(), DeviceError> {
        let target = self.buffer(buffer)?;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen clear encoder"),
            });
        encoder.clear_buffer(target, 0, None);
        self.queue.submit(std::iter::once(encoder.finish()));
        wait_idle(&self.device).map_err(|reason| DeviceError::Clear { buffer, reason })
    }

    fn set_scalars(&mut self, params: &FrameParams) -> Result<(), DeviceError> {
        self.queue
            .write_buffer(&self.params_ubo, 0, bytemuck::bytes_of(params));
        self.flush().map_err(DeviceError::Scalars)
    }

    fn acquire_presentation(&mut self) -> Result<(), DeviceError> {
        if self.owner == Ownership::Compute {
            return Err(DeviceError::Ownership("acquired twice"));
        }
        self.allocation()?;
        // Pending present passes read the buffer; let them finish first.
        wait_idle(&self.device).map_err(DeviceError::Acquire)?;
        self.owner = Ownership::Compute;
        Ok(())
    }

    fn dispatch(&mut self, args: &[KernelArg], work: WorkSize) -> Result<(), DeviceError> {
        if self.owner != Ownership::Compute {
            return Err(DeviceError::Ownership("dispatch while display-owned"));
        }
        if args.len() != KERNEL_ARG_COUNT {
            return Err(DeviceError::Dispatch(format!(
                "expected {KERNEL_ARG_COUNT} kernel arguments, got {}",
                args.len()
            )));
        }
        if work.group_size != KERNEL_WORKGROUP_SIZE {
            return Err(DeviceError::Dispatch(format!(
                "work sized for groups of {}, kernel uses {KERNEL_WORKGROUP_SIZE}",
                work.group_size
            )));
        }

        let alloc = self.allocation()?;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen kernel encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("lumen path trace"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &alloc.bind_group, &[]);
            pass.dispatch_workgroups(work.groups[0], work.groups[1], 1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        wait_idle(&self.device).map_err(DeviceError::Dispatch)
    }

    fn release_presentation(&mut self) -> Result<(), DeviceError> {
        if self.owner != Ownership::Compute {
            return Err(DeviceError::Ownership("released while display-owned"));
        }
        // Hand the buffer back even if the wait fails; the error is fatal anyway.
        self.owner = Ownership::Display;
        wait_idle(&self.device).map_err(DeviceError::Release)
    }
}
