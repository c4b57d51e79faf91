// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error type shared by every marshalling operation.
//!
//! Error constructors sit on the failure path of each field callback, so they
//! are `#[cold]` and `#[track_caller]` to keep the successful paths lean.
//!
//! Running out of buffer space is deliberately *not* represented here: the
//! encoder reports it through [`crate::serializer::Written::Overflow`] and
//! the retry loop consumes it before anything reaches the caller.

use std::borrow::Cow;

use thiserror::Error;

/// Set `SPROTO_PANIC_ON_ERROR` at compile time to panic where an error is created.
pub const PANIC_ON_ERROR: bool = option_env!("SPROTO_PANIC_ON_ERROR").is_some();

#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for schema loading, lookups, encoding, decoding and packing.
///
/// Build errors through the static constructors ([`Error::not_found`],
/// [`Error::type_mismatch`], ...) rather than the variants directly, so the
/// `SPROTO_PANIC_ON_ERROR` debugging switch sees every error.
///
/// ```rust
/// use sproto_core::error::Error;
///
/// let err = Error::not_found("protocol", "login");
/// assert_eq!(err.to_string(), "protocol not found: login");
///
/// let err = Error::type_mismatch("items", 0, "array", "integer");
/// assert!(err.to_string().contains("items"));
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A type or protocol name/tag is not part of the schema.
    #[error("{what} not found: {ident}")]
    NotFound { what: &'static str, ident: String },

    /// A field's bound value does not match its declared kind or array-ness.
    #[error("type mismatch on field `{field}` (index {index}): expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// A nested struct failed to decode.
    #[error("failed to decode field `{field}` (index {index})")]
    Decode {
        field: String,
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// The packed byte stream is malformed.
    #[error("malformed packed stream: {0}")]
    PackStream(Cow<'static, str>),

    /// The schema bundle could not be loaded.
    #[error("invalid schema: {0}")]
    InvalidSchema(Cow<'static, str>),

    /// Wire data is truncated or inconsistent with the type being decoded.
    #[error("invalid data: {0}")]
    InvalidData(Cow<'static, str>),

    /// Buffer boundary violation.
    #[error("buffer out of bound: {0} + {1} > {2}")]
    BufferOutOfBound(usize, usize, usize),

    /// Decoding nested deeper than the configured limit.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    #[error("{0}")]
    Unsupported(Cow<'static, str>),
}

impl Error {
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn not_found<S: Into<String>>(what: &'static str, ident: S) -> Self {
        Self::checked(Error::NotFound {
            what,
            ident: ident.into(),
        })
    }

    /// Creates an [`Error::TypeMismatch`] for `field` at array `index`
    /// (0 when the mismatch concerns the field binding itself).
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_mismatch<S: Into<String>>(
        field: S,
        index: usize,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::checked(Error::TypeMismatch {
            field: field.into(),
            index,
            expected,
            found,
        })
    }

    /// Wraps the failure of a nested struct decode with the enclosing field.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn decode<S: Into<String>>(field: S, index: usize, source: Error) -> Self {
        Self::checked(Error::Decode {
            field: field.into(),
            index,
            source: Box::new(source),
        })
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn pack_stream<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Self::checked(Error::PackStream(s.into()))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_schema<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Self::checked(Error::InvalidSchema(s.into()))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_data<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Self::checked(Error::InvalidData(s.into()))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn buffer_out_of_bound(offset: usize, length: usize, capacity: usize) -> Self {
        Self::checked(Error::BufferOutOfBound(offset, length, capacity))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Self::checked(Error::DepthExceed(s.into()))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unsupported<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Self::checked(Error::Unsupported(s.into()))
    }

    #[inline(always)]
    #[track_caller]
    fn checked(err: Error) -> Self {
        if PANIC_ON_ERROR {
            panic!("SPROTO_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Walks [`Error::Decode`] wrappers down to the error that started it.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Decode { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// ```
/// use sproto_core::ensure;
/// use sproto_core::error::Error;
///
/// fn check_len(n: usize) -> Result<(), Error> {
///     ensure!(n >= 2, "header needs 2 bytes, got {}", n);
///     ensure!(n < 0x10000, Error::unsupported("too large"));
///     Ok(())
/// }
/// assert!(check_len(1).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`Error::InvalidData`].
///
/// ```
/// use sproto_core::bail;
/// use sproto_core::error::Error;
///
/// fn reject(width: u8) -> Result<(), Error> {
///     bail!("unsupported integer width {}", width);
/// }
/// assert!(reject(3).is_err());
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::invalid_data($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)))
    };
}
