//! # Command Queues
//!
//! A command queue is bound to one context and one device for its whole
//! life. Its property set can be changed later through
//! [`CommandQueue::set_property`]; the extended property list it was
//! created with never changes.
//!
//! A queue created with `CL_QUEUE_ON_DEVICE_DEFAULT` becomes its device's
//! default queue. A later queue with the same property silently takes the
//! slot over. Dropping the queue clears the slot only if it still names
//! that queue.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use spin::Mutex;

use prism_core::types::*;
use prism_core::{cl_enum, Error, GetInfo, InfoValue, PropertyList, Ref, RefCount, RefCounted, Result};

use crate::backend::{CommandQueueDesc, CommandQueueImpl};
use crate::context::Context;
use crate::device::Device;
use crate::platform;

/// Properties accepted by `clCreateCommandQueue` and `clSetCommandQueueProperty`
pub const HOST_QUEUE_PROPERTIES: CommandQueueProperties =
    CommandQueueProperties::OUT_OF_ORDER_EXEC_MODE_ENABLE.union(CommandQueueProperties::PROFILING_ENABLE);

// =============================================================================
// SET PROPERTY OUTCOME
// =============================================================================

/// Result of [`CommandQueue::set_property`]
///
/// `old` is always the property set from before the call, whether or not
/// the change was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SetPropertyOutcome {
    /// Properties before the call
    pub old: CommandQueueProperties,
    /// Whether the change was committed
    pub result: Result<()>,
}

// =============================================================================
// COMMAND QUEUE
// =============================================================================

/// An OpenCL command queue
#[repr(C)]
pub struct CommandQueue {
    dispatch: IcdDispatch,
    refs: RefCount,
    context: Ref<Context>,
    device: Ref<Device>,
    properties: Mutex<CommandQueueProperties>,
    /// Serializes `set_property` calls
    update: Mutex<()>,
    property_array: PropertyList<cl_queue_properties>,
    /// On-device queue size, 0 for host queues
    size: cl_uint,
    imp: Box<dyn CommandQueueImpl>,
}

static_assertions::const_assert_eq!(core::mem::offset_of!(CommandQueue, dispatch), 0);
static_assertions::assert_impl_all!(CommandQueue: Send, Sync);

impl CommandQueue {
    /// Create a queue from a plain property bit field
    pub(crate) fn new(
        context: &Arc<Context>,
        device: Arc<Device>,
        properties: cl_command_queue_properties,
    ) -> Result<Arc<Self>> {
        let properties = CommandQueueProperties::from_bits(properties)
            .filter(|p| HOST_QUEUE_PROPERTIES.contains(*p))
            .ok_or(Error::InvalidValue)?;

        Self::create(context, device, properties, PropertyList::empty(), None)
    }

    /// Create a queue from an extended property list
    pub(crate) fn with_properties(
        context: &Arc<Context>,
        device: Arc<Device>,
        property_array: PropertyList<cl_queue_properties>,
    ) -> Result<Arc<Self>> {
        let (properties, size) = parse_properties(&device, &property_array)?;
        Self::create(context, device, properties, property_array, size)
    }

    fn create(
        context: &Arc<Context>,
        device: Arc<Device>,
        properties: CommandQueueProperties,
        property_array: PropertyList<cl_queue_properties>,
        size: Option<cl_uint>,
    ) -> Result<Arc<Self>> {
        let desc = CommandQueueDesc {
            device: &device,
            properties,
            property_array: property_array.as_slice(),
            size,
        };
        let imp = context.backend().create_command_queue(&desc).map_err(|e| {
            log::warn!("Backend failed to create command queue: {}", e);
            e
        })?;

        let queue = Arc::new(Self {
            dispatch: context.dispatch(),
            refs: RefCount::new(),
            context: Ref::new(Arc::clone(context)),
            device: Ref::new(device),
            properties: Mutex::new(properties),
            update: Mutex::new(()),
            property_array,
            size: size.unwrap_or(0),
            imp,
        });

        if properties.contains(CommandQueueProperties::ON_DEVICE_DEFAULT) {
            queue.device.set_default_queue(&queue);
        }
        Ok(queue)
    }

    /// Handle given to the application
    pub fn handle(&self) -> cl_command_queue {
        self as *const Self as cl_command_queue
    }

    /// The live command queue behind `handle`, if any
    pub fn lookup(handle: cl_command_queue) -> Option<Arc<Self>> {
        let ptr = handle as *const Self;
        platform::scan(|p| p.scan_contexts(|c| c.find_command_queue(ptr)))
    }

    /// `true` if `handle` names a live command queue
    pub fn is_valid(handle: cl_command_queue) -> bool {
        Self::lookup(handle).is_some()
    }

    /// Owning context
    pub fn context(&self) -> &Arc<Context> {
        self.context.arc()
    }

    /// Target device
    pub fn device(&self) -> &Arc<Device> {
        self.device.arc()
    }

    /// Current properties
    pub fn properties(&self) -> CommandQueueProperties {
        *self.properties.lock()
    }

    /// `clSetCommandQueueProperty`
    ///
    /// The backend sees the whole mask at once and the mask is committed
    /// only if it accepts. Calls are serialized against each other, but the
    /// property set stays readable while the backend runs.
    pub fn set_property(&self, properties: CommandQueueProperties, enable: bool) -> SetPropertyOutcome {
        let _update = self.update.lock();
        let old = self.properties();

        let result = if HOST_QUEUE_PROPERTIES.contains(properties) {
            self.imp.set_property(properties, enable)
        } else {
            Err(Error::InvalidValue)
        };

        if result.is_ok() {
            self.properties.lock().set(properties, enable);
        }
        SetPropertyOutcome { old, result }
    }
}

/// Parse a queue property list into properties and on-device size
fn parse_properties(
    device: &Device,
    list: &PropertyList<cl_queue_properties>,
) -> Result<(CommandQueueProperties, Option<cl_uint>)> {
    list.check_unique_keys(Error::InvalidValue)?;

    let mut properties = CommandQueueProperties::empty();
    let mut size = None;
    for (key, value) in list.pairs() {
        match key {
            k if k == cl_queue_properties::from(CL_QUEUE_PROPERTIES) => {
                properties = CommandQueueProperties::from_bits(value).ok_or(Error::InvalidValue)?;
            }
            k if k == cl_queue_properties::from(CL_QUEUE_SIZE) => {
                size = Some(cl_uint::try_from(value).map_err(|_| Error::InvalidValue)?);
            }
            _ => {
                log::trace!("Unknown queue property {:#x}", key);
                return Err(Error::InvalidValue);
            }
        }
    }

    let on_device = properties.contains(CommandQueueProperties::ON_DEVICE);
    if properties.contains(CommandQueueProperties::ON_DEVICE_DEFAULT) && !on_device {
        return Err(Error::InvalidValue);
    }
    if on_device && !properties.contains(CommandQueueProperties::OUT_OF_ORDER_EXEC_MODE_ENABLE) {
        return Err(Error::InvalidValue);
    }
    if !on_device {
        return match size {
            Some(_) => Err(Error::InvalidValue),
            None => Ok((properties, None)),
        };
    }

    if !device.supports_on_device_queues() {
        return Err(Error::InvalidQueueProperties);
    }
    let info = device.info();
    let size = size.unwrap_or(info.queue_on_device_preferred_size);
    if size > info.queue_on_device_max_size {
        return Err(Error::InvalidValue);
    }
    Ok((properties, Some(size)))
}

impl RefCounted for CommandQueue {
    fn ref_count(&self) -> &RefCount {
        &self.refs
    }

    fn release(&self) -> bool {
        let released = self.refs.remove_ref();
        if released {
            self.context.destroy_command_queue(self);
        }
        released
    }
}

impl Drop for CommandQueue {
    fn drop(&mut self) {
        log::debug!("Destroying command queue {:p}", self);
        self.device.clear_default_queue(self);
    }
}

// =============================================================================
// INFO
// =============================================================================

cl_enum! {
    /// `clGetCommandQueueInfo` parameters
    pub enum CommandQueueParam {
        /// `CL_QUEUE_CONTEXT`
        Context = CL_QUEUE_CONTEXT,
        /// `CL_QUEUE_DEVICE`
        Device = CL_QUEUE_DEVICE,
        /// `CL_QUEUE_REFERENCE_COUNT`
        ReferenceCount = CL_QUEUE_REFERENCE_COUNT,
        /// `CL_QUEUE_PROPERTIES`
        Properties = CL_QUEUE_PROPERTIES,
        /// `CL_QUEUE_SIZE`
        Size = CL_QUEUE_SIZE,
        /// `CL_QUEUE_DEVICE_DEFAULT`
        DeviceDefault = CL_QUEUE_DEVICE_DEFAULT,
        /// `CL_QUEUE_PROPERTIES_ARRAY`
        PropertiesArray = CL_QUEUE_PROPERTIES_ARRAY,
    }
}

impl GetInfo for CommandQueue {
    type Param = CommandQueueParam;

    fn info(&self, param: CommandQueueParam) -> Result<InfoValue<'_>> {
        Ok(match param {
            CommandQueueParam::Context => InfoValue::handle(self.context.as_ptr()),
            CommandQueueParam::Device => InfoValue::handle(self.device.as_ptr()),
            CommandQueueParam::ReferenceCount => InfoValue::Uint(self.refs.count()),
            CommandQueueParam::Properties => InfoValue::Ulong(self.properties().bits()),
            CommandQueueParam::Size => InfoValue::Uint(self.size),
            CommandQueueParam::DeviceDefault => InfoValue::handle(self.device.default_queue()),
            CommandQueueParam::PropertiesArray => InfoValue::Bytes(self.property_array.as_bytes()),
        })
    }
}

impl fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandQueue")
            .field("refs", &self.refs)
            .field("device", &self.device)
            .field("properties", &self.properties())
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use alloc::vec;
    use alloc::vec::Vec;

    const OOO: cl_queue_properties = CommandQueueProperties::OUT_OF_ORDER_EXEC_MODE_ENABLE.bits();
    const ON_DEVICE: cl_queue_properties = CommandQueueProperties::ON_DEVICE.bits();
    const ON_DEVICE_DEFAULT: cl_queue_properties = CommandQueueProperties::ON_DEVICE_DEFAULT.bits();
    const PROPERTIES: cl_queue_properties = CL_QUEUE_PROPERTIES as cl_queue_properties;
    const SIZE: cl_queue_properties = CL_QUEUE_SIZE as cl_queue_properties;

    fn default_queue_props() -> PropertyList<cl_queue_properties> {
        PropertyList::from_slice(&[PROPERTIES, OOO | ON_DEVICE | ON_DEVICE_DEFAULT, 0]).unwrap()
    }

    fn query_ptr(queue: &CommandQueue, param: cl_uint) -> usize {
        let mut raw = [0u8; core::mem::size_of::<usize>()];
        queue.get_info(param, Some(&mut raw), None).unwrap();
        usize::from_ne_bytes(raw)
    }

    #[test]
    fn test_retain_release_round_trip() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let queue = context.create_command_queue(&platform.devices()[0], 0).unwrap();

        queue.retain();
        assert!(!queue.release());
        assert!(CommandQueue::is_valid(queue.handle()));
        assert!(context.has_command_queue(Arc::as_ptr(&queue)));
        assert!(queue.set_property(CommandQueueProperties::PROFILING_ENABLE, true).result.is_ok());
    }

    #[test]
    fn test_release_to_zero_unregisters() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let queue = context.create_command_queue(&platform.devices()[0], 0).unwrap();
        let handle = queue.handle();

        assert!(queue.release());
        assert!(!CommandQueue::is_valid(handle));
        assert_eq!(context.num_command_queues(), 0);
    }

    #[test]
    fn test_backend_failure_creates_nothing() {
        let (platform, mock) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        mock.fail_next_queue(Error::OutOfResources);

        let result = context.create_command_queue(&platform.devices()[0], 0);
        assert_eq!(result.err(), Some(Error::OutOfResources));
        assert_eq!(context.num_command_queues(), 0);
        // No counted reference leaked onto the context
        assert_eq!(context.ref_count().count(), 1);
    }

    #[test]
    fn test_legacy_rejects_device_properties() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let device = &platform.devices()[0];
        assert_eq!(
            context.create_command_queue(device, ON_DEVICE | OOO).err(),
            Some(Error::InvalidValue)
        );
        assert_eq!(context.create_command_queue(device, 1 << 20).err(), Some(Error::InvalidValue));
    }

    #[test]
    fn test_property_array_is_kept_verbatim() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let raw = [PROPERTIES, OOO | ON_DEVICE, SIZE, 4096, 0];
        let queue = context
            .create_command_queue_with_properties(
                &platform.devices()[0],
                PropertyList::from_slice(&raw).unwrap(),
            )
            .unwrap();

        let mut size = 0;
        queue.get_info(CL_QUEUE_PROPERTIES_ARRAY, None, Some(&mut size)).unwrap();
        assert_eq!(size, core::mem::size_of_val(&raw));

        let mut bytes = vec![0u8; size];
        queue.get_info(CL_QUEUE_PROPERTIES_ARRAY, Some(&mut bytes), None).unwrap();
        assert_eq!(&bytes[..], bytemuck::cast_slice::<u64, u8>(&raw));

        let mut queue_size = [0u8; 4];
        queue.get_info(CL_QUEUE_SIZE, Some(&mut queue_size), None).unwrap();
        assert_eq!(u32::from_ne_bytes(queue_size), 4096);
    }

    #[test]
    fn test_on_device_size_defaults_to_preferred() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let device = &platform.devices()[0];
        let queue = context
            .create_command_queue_with_properties(
                device,
                PropertyList::from_slice(&[PROPERTIES, OOO | ON_DEVICE, 0]).unwrap(),
            )
            .unwrap();

        let mut queue_size = [0u8; 4];
        queue.get_info(CL_QUEUE_SIZE, Some(&mut queue_size), None).unwrap();
        assert_eq!(u32::from_ne_bytes(queue_size), device.info().queue_on_device_preferred_size);
    }

    #[test]
    fn test_invalid_property_lists() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu"), testing::cpu("cpu")]);
        let context = testing::context(&platform);
        let gpu = &platform.devices()[0];
        let cpu = &platform.devices()[1];

        let cases: Vec<(&Arc<Device>, Vec<cl_queue_properties>, Error)> = vec![
            (gpu, vec![0x9999, 1, 0], Error::InvalidValue),
            (gpu, vec![PROPERTIES, ON_DEVICE, 0], Error::InvalidValue),
            (gpu, vec![PROPERTIES, OOO | ON_DEVICE_DEFAULT, 0], Error::InvalidValue),
            (gpu, vec![SIZE, 16, 0], Error::InvalidValue),
            (gpu, vec![PROPERTIES, OOO | ON_DEVICE, SIZE, 1 << 30, 0], Error::InvalidValue),
            (gpu, vec![PROPERTIES, 0, PROPERTIES, OOO, 0], Error::InvalidValue),
            (cpu, vec![PROPERTIES, OOO | ON_DEVICE, 0], Error::InvalidQueueProperties),
        ];

        for (device, raw, expected) in cases {
            let list = PropertyList::from_slice(&raw).unwrap();
            let result = context.create_command_queue_with_properties(device, list);
            assert_eq!(result.err(), Some(expected), "properties {:x?}", raw);
        }
        assert_eq!(context.num_command_queues(), 0);
    }

    #[test]
    fn test_host_queue_reports_zero_size() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let queue = context.create_command_queue(&platform.devices()[0], 0).unwrap();

        let mut size = 0;
        queue.get_info(CL_QUEUE_SIZE, None, Some(&mut size)).unwrap();
        assert_eq!(size, 4);

        let mut value = [0xffu8; 4];
        queue.get_info(CL_QUEUE_SIZE, Some(&mut value), None).unwrap();
        assert_eq!(u32::from_ne_bytes(value), 0);
    }

    #[test]
    fn test_info_handles() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let device = &platform.devices()[0];
        let queue = context.create_command_queue(device, 0).unwrap();

        assert_eq!(query_ptr(&queue, CL_QUEUE_CONTEXT), context.handle() as usize);
        assert_eq!(query_ptr(&queue, CL_QUEUE_DEVICE), device.handle() as usize);
        assert_eq!(query_ptr(&queue, CL_QUEUE_DEVICE_DEFAULT), 0);
    }

    #[test]
    fn test_size_probe_matches_copy_for_every_param() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let queue = context
            .create_command_queue_with_properties(&platform.devices()[0], default_queue_props())
            .unwrap();

        let params = [
            CL_QUEUE_CONTEXT,
            CL_QUEUE_DEVICE,
            CL_QUEUE_REFERENCE_COUNT,
            CL_QUEUE_PROPERTIES,
            CL_QUEUE_SIZE,
            CL_QUEUE_DEVICE_DEFAULT,
            CL_QUEUE_PROPERTIES_ARRAY,
        ];
        for param in params {
            let mut size = 0;
            queue.get_info(param, None, Some(&mut size)).unwrap();

            let mut exact = vec![0u8; size];
            let mut copied = usize::MAX;
            queue.get_info(param, Some(&mut exact), Some(&mut copied)).unwrap();
            assert_eq!(copied, size);

            if size > 0 {
                let mut short = vec![0xeeu8; size - 1];
                assert_eq!(queue.get_info(param, Some(&mut short), None), Err(Error::InvalidValue));
                assert!(short.iter().all(|b| *b == 0xee));
            }
        }
    }

    #[test]
    fn test_default_queue_last_writer_wins() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let device = &platform.devices()[0];

        let q1 = context
            .create_command_queue_with_properties(device, default_queue_props())
            .unwrap();
        assert_eq!(device.default_queue(), Arc::as_ptr(&q1));
        assert_eq!(query_ptr(&q1, CL_QUEUE_DEVICE_DEFAULT), q1.handle() as usize);

        let q2 = context
            .create_command_queue_with_properties(device, default_queue_props())
            .unwrap();
        assert_eq!(device.default_queue(), Arc::as_ptr(&q2));
        assert_eq!(query_ptr(&q1, CL_QUEUE_DEVICE_DEFAULT), q2.handle() as usize);
    }

    #[test]
    fn test_destroying_default_queue_clears_slot() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let device = &platform.devices()[0];

        let queue = context
            .create_command_queue_with_properties(device, default_queue_props())
            .unwrap();
        assert!(queue.release());
        drop(queue);
        assert!(device.default_queue().is_null());
    }

    #[test]
    fn test_destroying_other_queue_keeps_slot() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let device = &platform.devices()[0];

        let default = context
            .create_command_queue_with_properties(device, default_queue_props())
            .unwrap();
        let other = context.create_command_queue(device, 0).unwrap();
        assert!(other.release());
        drop(other);
        assert_eq!(device.default_queue(), Arc::as_ptr(&default));

        // A displaced default queue does not clear its successor either
        let old = Arc::clone(&default);
        let successor = context
            .create_command_queue_with_properties(device, default_queue_props())
            .unwrap();
        assert!(default.release());
        drop(default);
        drop(old);
        assert_eq!(device.default_queue(), Arc::as_ptr(&successor));
    }

    #[test]
    fn test_set_property_round_trip() {
        let (platform, mock) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let queue = context.create_command_queue(&platform.devices()[0], 0).unwrap();
        let ooo = CommandQueueProperties::OUT_OF_ORDER_EXEC_MODE_ENABLE;

        let outcome = queue.set_property(ooo, true);
        assert_eq!(outcome.old, CommandQueueProperties::empty());
        assert_eq!(outcome.result, Ok(()));

        let mut bits = [0u8; 8];
        queue.get_info(CL_QUEUE_PROPERTIES, Some(&mut bits), None).unwrap();
        assert_eq!(u64::from_ne_bytes(bits), ooo.bits());

        let outcome = queue.set_property(ooo, false);
        assert_eq!(outcome.old, ooo);
        assert_eq!(outcome.result, Ok(()));
        assert_eq!(queue.properties(), CommandQueueProperties::empty());
        assert_eq!(mock.set_property_calls(), 2);
    }

    #[test]
    fn test_set_property_failure_reports_old_and_keeps_bits() {
        let (platform, mock) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let profiling = CommandQueueProperties::PROFILING_ENABLE;
        let queue = context
            .create_command_queue(&platform.devices()[0], profiling.bits())
            .unwrap();

        mock.fail_next_set_property(Error::InvalidOperation);
        let outcome = queue.set_property(CommandQueueProperties::OUT_OF_ORDER_EXEC_MODE_ENABLE, true);
        assert_eq!(outcome.old, profiling);
        assert_eq!(outcome.result, Err(Error::InvalidOperation));
        assert_eq!(queue.properties(), profiling);

        let outcome = queue.set_property(CommandQueueProperties::ON_DEVICE, true);
        assert_eq!(outcome.old, profiling);
        assert_eq!(outcome.result, Err(Error::InvalidValue));
    }

    #[test]
    fn test_set_property_mask_is_applied_together() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let queue = context.create_command_queue(&platform.devices()[0], 0).unwrap();

        let outcome = queue.set_property(HOST_QUEUE_PROPERTIES, true);
        assert_eq!(outcome.result, Ok(()));
        assert_eq!(queue.properties(), HOST_QUEUE_PROPERTIES);

        let outcome = queue.set_property(HOST_QUEUE_PROPERTIES, false);
        assert_eq!(outcome.old, HOST_QUEUE_PROPERTIES);
        assert_eq!(queue.properties(), CommandQueueProperties::empty());
    }

    #[test]
    fn test_backend_reads_properties_during_set_property() {
        use core::sync::atomic::{AtomicU64, Ordering};

        let (platform, state) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let queue = context
            .create_command_queue(&platform.devices()[0], CommandQueueProperties::PROFILING_ENABLE.bits())
            .unwrap();

        let handle = queue.handle() as usize;
        let seen = Arc::new(AtomicU64::new(u64::MAX));
        let observed = Arc::clone(&seen);
        state.on_set_property(Arc::new(move || {
            let queue = CommandQueue::lookup(handle as cl_command_queue).unwrap();
            let mut raw = [0u8; 8];
            queue.get_info(CL_QUEUE_PROPERTIES, Some(&mut raw), None).unwrap();
            observed.store(u64::from_ne_bytes(raw), Ordering::SeqCst);
        }));

        let outcome = queue.set_property(CommandQueueProperties::OUT_OF_ORDER_EXEC_MODE_ENABLE, true);
        assert_eq!(outcome.result, Ok(()));
        // The backend saw the set from before the change
        assert_eq!(seen.load(Ordering::SeqCst), CommandQueueProperties::PROFILING_ENABLE.bits());
        assert_eq!(
            queue.properties(),
            CommandQueueProperties::PROFILING_ENABLE | CommandQueueProperties::OUT_OF_ORDER_EXEC_MODE_ENABLE
        );
    }
}
