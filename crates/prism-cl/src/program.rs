//! # Programs
//!
//! A program records where it came from (source, IL, per-device binaries
//! or built-in kernel names) and the devices it targets. Building is the
//! backend's business.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use prism_core::types::*;
use prism_core::{cl_enum, GetInfo, InfoValue, Ref, RefCount, RefCounted, Result};

use crate::backend::{ProgramImpl, ProgramSource};
use crate::context::Context;
use crate::device::Device;
use crate::platform;

/// An OpenCL program
#[repr(C)]
pub struct Program {
    dispatch: IcdDispatch,
    refs: RefCount,
    context: Ref<Context>,
    devices: Vec<Ref<Device>>,
    source: Vec<u8>,
    il: Vec<u8>,
    /// One per device, empty unless created from binaries
    binaries: Vec<Vec<u8>>,
    kernel_names: String,
    imp: Box<dyn ProgramImpl>,
}

static_assertions::const_assert_eq!(core::mem::offset_of!(Program, dispatch), 0);
static_assertions::assert_impl_all!(Program: Send, Sync);

/// What a program is built from, owned
enum Origin {
    Source(Vec<u8>),
    Il(Vec<u8>),
    Binaries(Vec<Vec<u8>>),
    BuiltInKernels(String),
}

impl Program {
    pub(crate) fn with_source(context: &Arc<Context>, source: Vec<u8>) -> Result<Arc<Self>> {
        let devices = context_devices(context);
        Self::create(context, devices, Origin::Source(source))
    }

    pub(crate) fn with_il(context: &Arc<Context>, il: Vec<u8>) -> Result<Arc<Self>> {
        let devices = context_devices(context);
        Self::create(context, devices, Origin::Il(il))
    }

    pub(crate) fn with_binaries(
        context: &Arc<Context>,
        devices: Vec<Arc<Device>>,
        binaries: Vec<Vec<u8>>,
    ) -> Result<Arc<Self>> {
        Self::create(context, devices, Origin::Binaries(binaries))
    }

    pub(crate) fn with_built_in_kernels(
        context: &Arc<Context>,
        devices: Vec<Arc<Device>>,
        kernel_names: String,
    ) -> Result<Arc<Self>> {
        Self::create(context, devices, Origin::BuiltInKernels(kernel_names))
    }

    fn create(context: &Arc<Context>, devices: Vec<Arc<Device>>, origin: Origin) -> Result<Arc<Self>> {
        let source = match &origin {
            Origin::Source(source) => ProgramSource::Source(source),
            Origin::Il(il) => ProgramSource::Il(il),
            Origin::Binaries(binaries) => ProgramSource::Binary {
                devices: &devices,
                binaries,
            },
            Origin::BuiltInKernels(names) => ProgramSource::BuiltInKernels {
                devices: &devices,
                names,
            },
        };
        let imp = context.backend().create_program(&source).map_err(|e| {
            log::warn!("Backend failed to create program: {}", e);
            e
        })?;

        let mut program = Self {
            dispatch: context.dispatch(),
            refs: RefCount::new(),
            context: Ref::new(Arc::clone(context)),
            devices: devices.into_iter().map(Ref::new).collect(),
            source: Vec::new(),
            il: Vec::new(),
            binaries: Vec::new(),
            kernel_names: String::new(),
            imp,
        };
        match origin {
            Origin::Source(source) => program.source = source,
            Origin::Il(il) => program.il = il,
            Origin::Binaries(binaries) => program.binaries = binaries,
            Origin::BuiltInKernels(names) => program.kernel_names = names,
        }
        Ok(Arc::new(program))
    }

    /// Handle given to the application
    pub fn handle(&self) -> cl_program {
        self as *const Self as cl_program
    }

    /// The live program behind `handle`, if any
    pub fn lookup(handle: cl_program) -> Option<Arc<Self>> {
        let ptr = handle as *const Self;
        platform::scan(|p| p.scan_contexts(|c| c.find_program(ptr)))
    }

    /// `true` if `handle` names a live program
    pub fn is_valid(handle: cl_program) -> bool {
        Self::lookup(handle).is_some()
    }

    /// Owning context
    pub fn context(&self) -> &Arc<Context> {
        self.context.arc()
    }

    /// Target devices
    pub fn devices(&self) -> &[Ref<Device>] {
        &self.devices
    }

    /// Backend object
    pub fn backend(&self) -> &dyn ProgramImpl {
        self.imp.as_ref()
    }
}

fn context_devices(context: &Context) -> Vec<Arc<Device>> {
    context.devices().iter().map(|d| Arc::clone(d.arc())).collect()
}

impl RefCounted for Program {
    fn ref_count(&self) -> &RefCount {
        &self.refs
    }

    fn release(&self) -> bool {
        let released = self.refs.remove_ref();
        if released {
            self.context.destroy_program(self);
        }
        released
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        log::debug!("Destroying program {:p}", self);
    }
}

cl_enum! {
    /// `clGetProgramInfo` parameters
    pub enum ProgramParam {
        /// `CL_PROGRAM_REFERENCE_COUNT`
        ReferenceCount = CL_PROGRAM_REFERENCE_COUNT,
        /// `CL_PROGRAM_CONTEXT`
        Context = CL_PROGRAM_CONTEXT,
        /// `CL_PROGRAM_NUM_DEVICES`
        NumDevices = CL_PROGRAM_NUM_DEVICES,
        /// `CL_PROGRAM_DEVICES`
        Devices = CL_PROGRAM_DEVICES,
        /// `CL_PROGRAM_SOURCE`
        Source = CL_PROGRAM_SOURCE,
        /// `CL_PROGRAM_BINARY_SIZES`
        BinarySizes = CL_PROGRAM_BINARY_SIZES,
        /// `CL_PROGRAM_KERNEL_NAMES`
        KernelNames = CL_PROGRAM_KERNEL_NAMES,
        /// `CL_PROGRAM_IL`
        Il = CL_PROGRAM_IL,
    }
}

impl GetInfo for Program {
    type Param = ProgramParam;

    fn info(&self, param: ProgramParam) -> Result<InfoValue<'_>> {
        Ok(match param {
            ProgramParam::ReferenceCount => InfoValue::Uint(self.refs.count()),
            ProgramParam::Context => InfoValue::handle(self.context.as_ptr()),
            ProgramParam::NumDevices => InfoValue::Uint(self.devices.len() as cl_uint),
            ProgramParam::Devices => InfoValue::handles(self.devices.iter().map(Ref::as_ptr)),
            ProgramParam::Source => {
                let mut source = Vec::with_capacity(self.source.len() + 1);
                source.extend_from_slice(&self.source);
                source.push(0);
                InfoValue::Owned(source)
            }
            ProgramParam::BinarySizes => {
                let sizes: Vec<usize> = if self.binaries.is_empty() {
                    alloc::vec![0; self.devices.len()]
                } else {
                    self.binaries.iter().map(Vec::len).collect()
                };
                InfoValue::sizes(&sizes)
            }
            ProgramParam::KernelNames => InfoValue::string(&self.kernel_names),
            ProgramParam::Il => InfoValue::Bytes(&self.il),
        })
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("refs", &self.refs)
            .field("devices", &self.devices.len())
            .field("source_len", &self.source.len())
            .field("il_len", &self.il.len())
            .field("binaries", &self.binaries.len())
            .finish()
    }
}
