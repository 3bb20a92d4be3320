//! Mock backend and fixtures shared by the unit tests.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use spin::Mutex;

use prism_core::types::{CommandQueueProperties, DeviceType};
use prism_core::{Error, PropertyList, Result};

use crate::backend::*;
use crate::config::PlatformConfig;
use crate::context::Context;
use crate::device::DeviceInfo;
use crate::platform::Platform;

// =============================================================================
// MOCK STATE
// =============================================================================

/// One-shot failures and call counters, shared by every mock object of a platform
#[derive(Default)]
pub(crate) struct MockState {
    context_failure: Mutex<Option<Error>>,
    queue_failure: Mutex<Option<Error>>,
    set_property_failure: Mutex<Option<Error>>,
    memory_failure: Mutex<Option<Error>>,
    set_property_calls: AtomicUsize,
    set_property_hook: Mutex<Option<Hook>>,
}

type Hook = Arc<dyn Fn() + Send + Sync>;

impl MockState {
    pub(crate) fn fail_next_context(&self, error: Error) {
        *self.context_failure.lock() = Some(error);
    }

    pub(crate) fn fail_next_queue(&self, error: Error) {
        *self.queue_failure.lock() = Some(error);
    }

    pub(crate) fn fail_next_set_property(&self, error: Error) {
        *self.set_property_failure.lock() = Some(error);
    }

    pub(crate) fn fail_next_memory(&self, error: Error) {
        *self.memory_failure.lock() = Some(error);
    }

    /// Run `hook` inside every backend `set_property` call
    pub(crate) fn on_set_property(&self, hook: Hook) {
        *self.set_property_hook.lock() = Some(hook);
    }

    pub(crate) fn set_property_calls(&self) -> usize {
        self.set_property_calls.load(Ordering::SeqCst)
    }
}

fn take(slot: &Mutex<Option<Error>>) -> Result<()> {
    match slot.lock().take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

// =============================================================================
// MOCK BACKEND
// =============================================================================

struct MockPlatform {
    devices: Vec<DeviceInfo>,
    state: Arc<MockState>,
}

impl PlatformImpl for MockPlatform {
    fn create_devices(&self) -> Result<Vec<DeviceInfo>> {
        Ok(self.devices.clone())
    }

    fn create_context(&self, _desc: &ContextDesc<'_>) -> Result<Box<dyn ContextImpl>> {
        take(&self.state.context_failure)?;
        Ok(Box::new(MockContext {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockContext {
    state: Arc<MockState>,
}

impl ContextImpl for MockContext {
    fn create_command_queue(
        &self,
        _desc: &CommandQueueDesc<'_>,
    ) -> Result<Box<dyn CommandQueueImpl>> {
        take(&self.state.queue_failure)?;
        Ok(Box::new(MockQueue {
            state: Arc::clone(&self.state),
        }))
    }

    fn create_buffer(&self, _desc: &BufferDesc<'_>) -> Result<Box<dyn MemoryImpl>> {
        take(&self.state.memory_failure)?;
        Ok(Box::new(MockObject))
    }

    fn create_image(&self, _desc: &ImageDesc<'_>) -> Result<Box<dyn MemoryImpl>> {
        take(&self.state.memory_failure)?;
        Ok(Box::new(MockObject))
    }

    fn create_sampler(&self, _desc: &SamplerDesc<'_>) -> Result<Box<dyn SamplerImpl>> {
        Ok(Box::new(MockObject))
    }

    fn create_program(&self, _source: &ProgramSource<'_>) -> Result<Box<dyn ProgramImpl>> {
        Ok(Box::new(MockObject))
    }
}

struct MockQueue {
    state: Arc<MockState>,
}

impl CommandQueueImpl for MockQueue {
    fn set_property(&self, _properties: CommandQueueProperties, _enable: bool) -> Result<()> {
        take(&self.state.set_property_failure)?;
        let hook = self.state.set_property_hook.lock().clone();
        if let Some(hook) = hook {
            hook();
        }
        self.state.set_property_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct MockObject;

impl MemoryImpl for MockObject {}
impl SamplerImpl for MockObject {}
impl ProgramImpl for MockObject {}

/// A backend whose device enumeration fails
pub(crate) struct FailingPlatform;

impl PlatformImpl for FailingPlatform {
    fn create_devices(&self) -> Result<Vec<DeviceInfo>> {
        Err(Error::OutOfHostMemory)
    }

    fn create_context(&self, _desc: &ContextDesc<'_>) -> Result<Box<dyn ContextImpl>> {
        Err(Error::OutOfHostMemory)
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

/// A GPU with images, SPIR-V, two built-in kernels and on-device queues
pub(crate) fn gpu(name: &str) -> DeviceInfo {
    DeviceInfo {
        device_type: DeviceType::GPU,
        name: String::from(name),
        version: String::from("OpenCL 3.0 mock"),
        image_support: true,
        il_version: String::from("SPIR-V_1.0"),
        built_in_kernels: String::from("blit;fill"),
        queue_on_device_preferred_size: 16 * 1024,
        queue_on_device_max_size: 256 * 1024,
    }
}

/// A CPU without images, IL, built-in kernels or on-device queues
pub(crate) fn cpu(name: &str) -> DeviceInfo {
    DeviceInfo {
        device_type: DeviceType::CPU,
        name: String::from(name),
        version: String::from("OpenCL 3.0 mock"),
        ..DeviceInfo::default()
    }
}

/// Register a mock platform with the default configuration
pub(crate) fn platform(devices: Vec<DeviceInfo>) -> (Arc<Platform>, Arc<MockState>) {
    platform_with_config(devices, PlatformConfig::default())
}

/// Register a mock platform
pub(crate) fn platform_with_config(
    devices: Vec<DeviceInfo>,
    config: PlatformConfig,
) -> (Arc<Platform>, Arc<MockState>) {
    let state = Arc::new(MockState::default());
    let imp = MockPlatform {
        devices,
        state: Arc::clone(&state),
    };
    let platform = Platform::register(Box::new(imp), config).expect("mock platform registers");
    (platform, state)
}

/// A context over every device of `platform`
pub(crate) fn context(platform: &Arc<Platform>) -> Arc<Context> {
    platform
        .create_context(
            PropertyList::empty(),
            platform.devices(),
            None,
            core::ptr::null_mut(),
        )
        .expect("mock context")
}
