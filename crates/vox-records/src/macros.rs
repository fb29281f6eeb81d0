/// Declare a closed enum whose members travel as lowercase wire strings.
///
/// Generates the enum (with serde renames), its [`WireEnum`] impl,
/// `Display` and `FromStr`. Parsing is case-insensitive and ignores
/// surrounding whitespace.
///
/// [`WireEnum`]: crate::record::WireEnum
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $crate::record::WireEnum for $name {
            const KIND: &'static str = $kind;
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];
            const NAMES: &'static [&'static str] = &[$($wire),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::record::WireEnum::as_str(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::vox_core::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::record::WireEnum>::parse_wire(s)
            }
        }
    };
}
