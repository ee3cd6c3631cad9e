/// Declare a closed enumeration of wire codes.
///
/// Generates the enum with its explicit discriminants, an `ALL` table, a
/// `code()` accessor and a `TryFrom<i64>` that rejects unknown codes with
/// [`FgenError::UnknownCode`](fgen_core::FgenError::UnknownCode).
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr($repr)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value
            ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Integer transmitted on the wire.
            pub fn code(self) -> $repr {
                self as $repr
            }
        }

        impl TryFrom<i64> for $name {
            type Error = fgen_core::FgenError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(fgen_core::FgenError::UnknownCode {
                        what: stringify!($name),
                        value,
                    }),
                }
            }
        }
    };
}
