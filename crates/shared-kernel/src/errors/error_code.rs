// crates/shared-kernel/src/errors/error_code.rs

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainKind {
    /// Declared by a service's protocol definition, allowed on the wire.
    Protocol,
    /// Private to a process, only used to carry a tentative classification.
    Internal,
}

/// Namespace of error identifiers owned by one service (or one internal component).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorDomain {
    name: &'static str,
    kind: DomainKind,
}

impl ErrorDomain {
    pub const fn protocol(name: &'static str) -> Self {
        Self { name, kind: DomainKind::Protocol }
    }

    pub const fn internal(name: &'static str) -> Self {
        Self { name, kind: DomainKind::Internal }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> DomainKind {
        self.kind
    }

    pub fn is_protocol(&self) -> bool {
        self.kind == DomainKind::Protocol
    }
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error code name {name:?} must only contain visible ASCII characters")]
pub struct InvalidErrorName {
    pub name: String,
}

/// Named error identifier, unique within its [`ErrorDomain`].
///
/// Two codes are equal when both the domain and the name match. Only the name
/// travels between processes: it is what gets written to the response trailer
/// and what `serde` emits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    domain: ErrorDomain,
    name: Cow<'static, str>,
}

impl ErrorCode {
    /// Builds a code from a static name.
    ///
    /// Panics when the name contains anything but visible ASCII, which turns
    /// into a compile error when used in a `const` context.
    pub const fn from_static(domain: ErrorDomain, name: &'static str) -> Self {
        assert!(
            Self::is_valid_name(name),
            "error code names must only contain visible ASCII characters"
        );
        Self { domain, name: Cow::Borrowed(name) }
    }

    pub fn new(
        domain: ErrorDomain,
        name: impl Into<Cow<'static, str>>,
    ) -> Result<Self, InvalidErrorName> {
        let name = name.into();
        if !Self::is_valid_name(&name) {
            return Err(InvalidErrorName { name: name.into_owned() });
        }
        Ok(Self { domain, name })
    }

    /// Empty names are valid: "classified as empty" differs from "unclassified".
    pub const fn is_valid_name(name: &str) -> bool {
        let bytes = name.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if !is_visible_ascii(bytes[i]) {
                return false;
            }
            i += 1;
        }
        true
    }

    pub fn domain(&self) -> ErrorDomain {
        self.domain
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_protocol(&self) -> bool {
        self.domain.is_protocol()
    }
}

const fn is_visible_ascii(byte: u8) -> bool {
    byte >= 0x20 && byte <= 0x7E
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// Implemented by the enums generated with [`error_codes!`](crate::error_codes).
pub trait ErrorCodeEnum: Copy + Send + Sync + 'static {
    const DOMAIN: ErrorDomain;

    fn name(&self) -> &'static str;

    fn code(&self) -> ErrorCode {
        ErrorCode::from_static(Self::DOMAIN, self.name())
    }
}

/// Declares the closed list of error codes of one domain.
///
/// ```rust,ignore
/// error_codes! {
///     pub enum GreeterError in protocol "greeter.v1.GreeterError" {
///         Unspecified => "GREETER_ERROR_UNSPECIFIED",
///         UserNotFound => "GREETER_ERROR_USER_NOT_FOUND",
///     }
/// }
/// ```
///
/// `in protocol` marks codes that may be written to a response trailer,
/// `in internal` codes that only ever travel inside a propagation marker.
/// A name that is not visible ASCII fails the build.
#[macro_export]
macro_rules! error_codes {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $kind:ident $domain:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        const _: () = {
            $(
                assert!(
                    $crate::errors::ErrorCode::is_valid_name($code),
                    concat!("invalid error code name for ", stringify!($name), "::", stringify!($variant))
                );
            )*
        };

        impl $crate::errors::ErrorCodeEnum for $name {
            const DOMAIN: $crate::errors::ErrorDomain = $crate::errors::ErrorDomain::$kind($domain);

            fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $code ),*
                }
            }
        }

        impl ::std::convert::From<$name> for $crate::errors::ErrorCode {
            fn from(value: $name) -> Self {
                $crate::errors::ErrorCodeEnum::code(&value)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::errors::ErrorCodeEnum::name(self))
            }
        }
    };
}
