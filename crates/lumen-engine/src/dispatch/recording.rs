//! Call-recording backend for tests.

use super::{
    BufferLayout, ComputeBackend, DeviceBuffer, DeviceError, FrameParams, KernelArg, Ownership,
    WorkSize,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Configure(BufferLayout),
    Upload {
        buffer: DeviceBuffer,
        len: usize,
    },
    Clear(DeviceBuffer),
    SetScalars(FrameParams),
    Acquire,
    Dispatch {
        args: Vec<KernelArg>,
        work: WorkSize,
    },
    Release,
}

/// Records every backend call in order and tracks presentation ownership.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub calls: Vec<Call>,
    pub owner: Ownership,
    /// Dispatches issued while the display pipeline owned the buffer.
    pub violations: usize,
    pub group_size: u32,
    pub fail_acquire: bool,
    pub fail_dispatch: bool,
    pub last_camera: Vec<u8>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            group_size: 64,
            ..Self::default()
        }
    }

    pub fn clears(&self, buffer: DeviceBuffer) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == Call::Clear(buffer))
            .count()
    }

    pub fn dispatches(&self) -> Vec<(Vec<KernelArg>, WorkSize)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Dispatch { args, work } => Some((args.clone(), *work)),
                _ => None,
            })
            .collect()
    }

    pub fn scalars(&self) -> Vec<FrameParams> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::SetScalars(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

impl ComputeBackend for RecordingBackend {
    fn group_size(&self) -> u32 {
        self.group_size
    }

    fn configure(&mut self, layout: BufferLayout) -> Result<(), DeviceError> {
        self.calls.push(Call::Configure(layout));
        Ok(())
    }

    fn upload(&mut self, buffer: DeviceBuffer, bytes: &[u8]) -> Result<(), DeviceError> {
        if buffer == DeviceBuffer::Camera {
            self.last_camera = bytes.to_vec();
        }
        self.calls.push(Call::Upload {
            buffer,
            len: bytes.len(),
        });
        Ok(())
    }

    fn clear(&mut self, buffer: DeviceBuffer) -> Result<(), DeviceError> {
        self.calls.push(Call::Clear(buffer));
        Ok(())
    }

    fn set_scalars(&mut self, params: &FrameParams) -> Result<(), DeviceError> {
        self.calls.push(Call::SetScalars(*params));
        Ok(())
    }

    fn acquire_presentation(&mut self) -> Result<(), DeviceError> {
        if self.fail_acquire {
            return Err(DeviceError::Acquire("injected".into()));
        }
        if self.owner == Ownership::Compute {
            return Err(DeviceError::Ownership("acquired twice"));
        }
        self.owner = Ownership::Compute;
        self.calls.push(Call::Acquire);
        Ok(())
    }

    fn dispatch(&mut self, args: &[KernelArg], work: WorkSize) -> Result<(), DeviceError> {
        if self.owner != Ownership::Compute {
            self.violations += 1;
        }
        self.calls.push(Call::Dispatch {
            args: args.to_vec(),
            work,
        });
        if self.fail_dispatch {
            return Err(DeviceError::Dispatch("injected".into()));
        }
        Ok(())
    }

    fn release_presentation(&mut self) -> Result<(), DeviceError> {
        if self.owner != Ownership::Compute {
            return Err(DeviceError::Ownership("released while display-owned"));
        }
        self.owner = Ownership::Display;
        self.calls.push(Call::Release);
        Ok(())
    }
}
