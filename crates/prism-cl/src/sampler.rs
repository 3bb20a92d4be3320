//! # Samplers
//!
//! Immutable sampler state. Only contexts with at least one image-capable
//! device can create samplers.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use prism_core::types::*;
use prism_core::{cl_enum, Error, GetInfo, InfoValue, PropertyList, Ref, RefCount, RefCounted, Result};

use crate::backend::{SamplerDesc, SamplerImpl};
use crate::context::Context;
use crate::platform;

/// An OpenCL sampler
#[repr(C)]
pub struct Sampler {
    dispatch: IcdDispatch,
    refs: RefCount,
    context: Ref<Context>,
    normalized_coords: bool,
    addressing_mode: AddressingMode,
    filter_mode: FilterMode,
    properties: PropertyList<cl_sampler_properties>,
    imp: Box<dyn SamplerImpl>,
}

static_assertions::const_assert_eq!(core::mem::offset_of!(Sampler, dispatch), 0);
static_assertions::assert_impl_all!(Sampler: Send, Sync);

impl Sampler {
    pub(crate) fn new(
        context: &Arc<Context>,
        properties: PropertyList<cl_sampler_properties>,
        normalized_coords: bool,
        addressing_mode: AddressingMode,
        filter_mode: FilterMode,
    ) -> Result<Arc<Self>> {
        let desc = SamplerDesc {
            normalized_coords,
            addressing_mode,
            filter_mode,
            properties: properties.as_slice(),
        };
        let imp = context.backend().create_sampler(&desc).map_err(|e| {
            log::warn!("Backend failed to create sampler: {}", e);
            e
        })?;

        Ok(Arc::new(Self {
            dispatch: context.dispatch(),
            refs: RefCount::new(),
            context: Ref::new(Arc::clone(context)),
            normalized_coords,
            addressing_mode,
            filter_mode,
            properties,
            imp,
        }))
    }

    /// Create a sampler from an extended property list
    ///
    /// Keys left out take their defaults: normalized coordinates,
    /// `CL_ADDRESS_CLAMP` and `CL_FILTER_NEAREST`.
    pub(crate) fn with_properties(
        context: &Arc<Context>,
        properties: PropertyList<cl_sampler_properties>,
    ) -> Result<Arc<Self>> {
        properties.check_unique_keys(Error::InvalidValue)?;

        let mut normalized_coords = true;
        let mut addressing_mode = AddressingMode::Clamp;
        let mut filter_mode = FilterMode::Nearest;
        for (key, value) in properties.pairs() {
            let value = cl_uint::try_from(value).map_err(|_| Error::InvalidValue)?;
            match cl_uint::try_from(key) {
                Ok(CL_SAMPLER_NORMALIZED_COORDS) => {
                    normalized_coords = match value {
                        CL_TRUE => true,
                        CL_FALSE => false,
                        _ => return Err(Error::InvalidValue),
                    };
                }
                Ok(CL_SAMPLER_ADDRESSING_MODE) => addressing_mode = AddressingMode::try_from(value)?,
                Ok(CL_SAMPLER_FILTER_MODE) => filter_mode = FilterMode::try_from(value)?,
                _ => {
                    log::trace!("Unknown sampler property {:#x}", key);
                    return Err(Error::InvalidValue);
                }
            }
        }

        Self::new(context, properties, normalized_coords, addressing_mode, filter_mode)
    }

    /// Handle given to the application
    pub fn handle(&self) -> cl_sampler {
        self as *const Self as cl_sampler
    }

    /// The live sampler behind `handle`, if any
    pub fn lookup(handle: cl_sampler) -> Option<Arc<Self>> {
        let ptr = handle as *const Self;
        platform::scan(|p| p.scan_contexts(|c| c.find_sampler(ptr)))
    }

    /// `true` if `handle` names a live sampler
    pub fn is_valid(handle: cl_sampler) -> bool {
        Self::lookup(handle).is_some()
    }

    /// Owning context
    pub fn context(&self) -> &Arc<Context> {
        self.context.arc()
    }

    /// `true` if coordinates are normalized
    pub fn normalized_coords(&self) -> bool {
        self.normalized_coords
    }

    /// Addressing mode
    pub fn addressing_mode(&self) -> AddressingMode {
        self.addressing_mode
    }

    /// Filter mode
    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    /// Backend object
    pub fn backend(&self) -> &dyn SamplerImpl {
        self.imp.as_ref()
    }
}

impl RefCounted for Sampler {
    fn ref_count(&self) -> &RefCount {
        &self.refs
    }

    fn release(&self) -> bool {
        let released = self.refs.remove_ref();
        if released {
            self.context.destroy_sampler(self);
        }
        released
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        log::debug!("Destroying sampler {:p}", self);
    }
}

cl_enum! {
    /// `clGetSamplerInfo` parameters
    pub enum SamplerParam {
        /// `CL_SAMPLER_REFERENCE_COUNT`
        ReferenceCount = CL_SAMPLER_REFERENCE_COUNT,
        /// `CL_SAMPLER_CONTEXT`
        Context = CL_SAMPLER_CONTEXT,
        /// `CL_SAMPLER_NORMALIZED_COORDS`
        NormalizedCoords = CL_SAMPLER_NORMALIZED_COORDS,
        /// `CL_SAMPLER_ADDRESSING_MODE`
        AddressingMode = CL_SAMPLER_ADDRESSING_MODE,
        /// `CL_SAMPLER_FILTER_MODE`
        FilterMode = CL_SAMPLER_FILTER_MODE,
        /// `CL_SAMPLER_PROPERTIES`
        Properties = CL_SAMPLER_PROPERTIES,
    }
}

impl GetInfo for Sampler {
    type Param = SamplerParam;

    fn info(&self, param: SamplerParam) -> Result<InfoValue<'_>> {
        Ok(match param {
            SamplerParam::ReferenceCount => InfoValue::Uint(self.refs.count()),
            SamplerParam::Context => InfoValue::handle(self.context.as_ptr()),
            SamplerParam::NormalizedCoords => InfoValue::bool(self.normalized_coords),
            SamplerParam::AddressingMode => InfoValue::Uint(self.addressing_mode.raw()),
            SamplerParam::FilterMode => InfoValue::Uint(self.filter_mode.raw()),
            SamplerParam::Properties => InfoValue::Bytes(self.properties.as_bytes()),
        })
    }
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sampler")
            .field("refs", &self.refs)
            .field("normalized_coords", &self.normalized_coords)
            .field("addressing_mode", &self.addressing_mode)
            .field("filter_mode", &self.filter_mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use alloc::vec;

    const NORMALIZED: cl_sampler_properties = CL_SAMPLER_NORMALIZED_COORDS as cl_sampler_properties;
    const ADDRESSING: cl_sampler_properties = CL_SAMPLER_ADDRESSING_MODE as cl_sampler_properties;
    const FILTER: cl_sampler_properties = CL_SAMPLER_FILTER_MODE as cl_sampler_properties;

    fn query_uint(sampler: &Sampler, param: cl_uint) -> cl_uint {
        let mut raw = [0u8; 4];
        sampler.get_info(param, Some(&mut raw), None).unwrap();
        cl_uint::from_ne_bytes(raw)
    }

    #[test]
    fn test_legacy_sampler() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let sampler = context
            .create_sampler(CL_FALSE, CL_ADDRESS_REPEAT, CL_FILTER_LINEAR)
            .unwrap();

        assert!(Sampler::is_valid(sampler.handle()));
        assert!(!sampler.normalized_coords());
        assert_eq!(query_uint(&sampler, CL_SAMPLER_ADDRESSING_MODE), CL_ADDRESS_REPEAT);
        assert_eq!(query_uint(&sampler, CL_SAMPLER_FILTER_MODE), CL_FILTER_LINEAR);
        assert_eq!(query_uint(&sampler, CL_SAMPLER_NORMALIZED_COORDS), CL_FALSE);

        let mut size = usize::MAX;
        sampler.get_info(CL_SAMPLER_PROPERTIES, None, Some(&mut size)).unwrap();
        assert_eq!(size, 0);
    }

    #[test]
    fn test_legacy_sampler_rejects_unknown_modes() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        assert_eq!(
            context.create_sampler(CL_TRUE, 0x9999, CL_FILTER_NEAREST).err(),
            Some(Error::InvalidValue)
        );
        assert_eq!(
            context.create_sampler(CL_TRUE, CL_ADDRESS_CLAMP, 0x9999).err(),
            Some(Error::InvalidValue)
        );
        assert_eq!(context.num_samplers(), 0);
    }

    #[test]
    fn test_property_defaults() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let sampler = context
            .create_sampler_with_properties(PropertyList::empty())
            .unwrap();
        assert!(sampler.normalized_coords());
        assert_eq!(sampler.addressing_mode(), AddressingMode::Clamp);
        assert_eq!(sampler.filter_mode(), FilterMode::Nearest);
    }

    #[test]
    fn test_property_list_is_parsed_and_kept() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let raw = [
            NORMALIZED,
            0,
            ADDRESSING,
            CL_ADDRESS_MIRRORED_REPEAT as cl_sampler_properties,
            FILTER,
            CL_FILTER_LINEAR as cl_sampler_properties,
            0,
        ];
        let sampler = context
            .create_sampler_with_properties(PropertyList::from_slice(&raw).unwrap())
            .unwrap();
        assert!(!sampler.normalized_coords());
        assert_eq!(sampler.addressing_mode(), AddressingMode::MirroredRepeat);
        assert_eq!(sampler.filter_mode(), FilterMode::Linear);

        let mut bytes = [0u8; 7 * 8];
        sampler.get_info(CL_SAMPLER_PROPERTIES, Some(&mut bytes), None).unwrap();
        assert_eq!(&bytes[..], bytemuck::cast_slice::<u64, u8>(&raw));
    }

    #[test]
    fn test_invalid_property_lists() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let cases = [
            vec![0x4242, 1, 0],
            vec![NORMALIZED, 2, 0],
            vec![FILTER, 0x9999, 0],
            vec![NORMALIZED, 1, NORMALIZED, 0, 0],
        ];
        for raw in cases {
            let list = PropertyList::from_slice(&raw).unwrap();
            assert_eq!(
                context.create_sampler_with_properties(list).err(),
                Some(Error::InvalidValue),
                "properties {:x?}",
                raw
            );
        }
        assert_eq!(context.num_samplers(), 0);
    }

    #[test]
    fn test_requires_image_support() {
        let (platform, _) = testing::platform(vec![testing::cpu("cpu")]);
        let context = testing::context(&platform);
        assert_eq!(
            context.create_sampler(CL_TRUE, CL_ADDRESS_CLAMP, CL_FILTER_NEAREST).err(),
            Some(Error::InvalidOperation)
        );
        assert_eq!(
            context.create_sampler_with_properties(PropertyList::empty()).err(),
            Some(Error::InvalidOperation)
        );
    }

    #[test]
    fn test_context_is_counted_until_release() {
        let (platform, _) = testing::platform(vec![testing::gpu("gpu")]);
        let context = testing::context(&platform);
        let sampler = context.create_sampler_with_properties(PropertyList::empty()).unwrap();
        let handle = sampler.handle();
        assert_eq!(context.ref_count().count(), 2);

        assert!(sampler.release());
        assert!(!Sampler::is_valid(handle));
        drop(sampler);
        assert_eq!(context.ref_count().count(), 1);
    }
}
