use super::{ComputeBackend, DeviceError, KernelArg, WorkSize};

/// Current owner of the shared presentation buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Ownership {
    #[default]
    Display,
    Compute,
}

/// Scoped compute ownership of the presentation buffer.
///
/// Acquired on construction and released exactly once: explicitly through
/// [`release`](Self::release), or on drop if an error path skipped it.
pub struct PresentationLease<'a, B: ComputeBackend + ?Sized> {
    backend: &'a mut B,
    released: bool,
}

impl<'a, B: ComputeBackend + ?Sized> PresentationLease<'a, B> {
    pub fn acquire(backend: &'a mut B) -> Result<Self, DeviceError> {
        backend.acquire_presentation()?;
        Ok(Self {
            backend,
            released: false,
        })
    }

    pub fn dispatch(&mut self, args: &[KernelArg], work: WorkSize) -> Result<(), DeviceError> {
        self.backend.dispatch(args, work)
    }

    pub fn release(mut self) -> Result<(), DeviceError> {
        self.released = true;
        self.backend.release_presentation()
    }
}

impl<B: ComputeBackend + ?Sized> Drop for PresentationLease<'_, B> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.backend.release_presentation() {
            log::error!("presentation buffer release on unwind failed: {e}");
        }
    }
}
