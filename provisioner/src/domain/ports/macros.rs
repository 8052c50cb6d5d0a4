//! Defines helper macros for generating domain port error enums.
//!
//! Each invocation produces the error enum, snake-case constructors for every
//! variant and a payload-free `<Name>Kind` enum so callers can branch on the
//! classification without matching message fields.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        ::paste::paste! {
            #[doc = "Payload-free classification of [`" $name "`]."]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum [<$name Kind>] {
                $(
                    $(#[$variant_meta])*
                    $variant,
                )*
            }

            impl [<$name Kind>] {
                /// Stable snake-case label used in logs and reports.
                pub const fn as_str(self) -> &'static str {
                    match self {
                        $( Self::$variant => stringify!([<$variant:snake>]), )*
                    }
                }
            }

            impl ::std::fmt::Display for [<$name Kind>] {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            ::paste::paste! {
                /// Classification of this error without its payload.
                pub fn kind(&self) -> [<$name Kind>] {
                    match self {
                        $( Self::$variant { .. } => [<$name Kind>]::$variant, )*
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;
