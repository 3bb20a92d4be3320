//! Declarative helpers shared by the CL object crates.

/// Define a `cl_uint`-backed enum that converts from the raw OpenCL value.
///
/// Unknown values map to [`Error::InvalidValue`](crate::error::Error), which
/// is what every CL query and creation call reports for an unrecognized
/// enumerant. Matching on the generated enum is exhaustive, so adding a
/// parameter forces every `getInfo` table to handle it.
#[macro_export]
macro_rules! cl_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value,
            )+
        }

        impl $name {
            /// Raw OpenCL enumerant
            pub const fn raw(self) -> $crate::types::cl_uint {
                self as $crate::types::cl_uint
            }
        }

        impl ::core::convert::TryFrom<$crate::types::cl_uint> for $name {
            type Error = $crate::error::Error;

            fn try_from(value: $crate::types::cl_uint) -> $crate::error::Result<Self> {
                match value {
                    $(v if v == $value => Ok(Self::$variant),)+
                    _ => Err($crate::error::Error::InvalidValue),
                }
            }
        }
    };
}
