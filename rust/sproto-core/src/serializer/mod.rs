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

//! Field callback contracts and their implementations.
//!
//! [`engine`] walks a [`TypeDescriptor`]'s field table and calls a
//! [`FieldEncoder`] or [`FieldDecoder`] once per field (once per element for
//! array fields). [`ValueEncoder`] and [`ValueDecoder`] bind those callbacks
//! to the dynamic [`crate::value::Value`] model.

pub mod engine;
mod value_decoder;
mod value_encoder;

pub use value_decoder::ValueDecoder;
pub use value_encoder::ValueEncoder;

use crate::buffer::GrowableBuffer;
use crate::error::Error;
use crate::meta::{Field, TypeDescriptor};
use crate::resolver::Schema;
use crate::types::FieldKind;
use crate::value::Struct;
use tracing::debug;

/// Outcome of one encode callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Written {
    /// No value for this field (or no element at this index).
    Nil,
    /// This many bytes were written into the destination.
    Bytes(usize),
    /// The destination budget is too small; the session must grow and retry.
    Overflow,
}

impl Written {
    /// Bytes written, `0` for `Nil` and `Overflow`.
    pub fn len(&self) -> usize {
        match self {
            Written::Bytes(n) => *n,
            Written::Nil | Written::Overflow => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything a callback learns about the field being marshalled.
#[derive(Clone, Copy, Debug)]
pub struct FieldArg<'s> {
    pub schema: &'s Schema,
    pub field: &'s Field,
    /// `0` for non-array fields, 1-based element index otherwise.
    pub index: usize,
    /// The nested type when the field kind is `Struct`.
    pub nested: Option<&'s TypeDescriptor>,
}

impl<'s> FieldArg<'s> {
    #[inline(always)]
    pub fn name(&self) -> &'s str {
        &self.field.name
    }

    #[inline(always)]
    pub fn kind(&self) -> FieldKind {
        self.field.kind
    }

    #[inline(always)]
    pub fn is_array(&self) -> bool {
        self.field.array
    }

    pub(crate) fn at(self, index: usize) -> FieldArg<'s> {
        FieldArg { index, ..self }
    }
}

/// Supplies field values to [`engine::encode`].
///
/// `out.len()` is the length budget. Integers are written as 4 or 8
/// little-endian bytes, booleans as a 4-byte 0/1.
pub trait FieldEncoder {
    fn encode_field(&mut self, arg: &FieldArg<'_>, out: &mut [u8]) -> Result<Written, Error>;
}

/// Receives field values from [`engine::decode`].
///
/// Integer spans are 4 bytes (sign-extended on read) or 8 bytes; boolean
/// spans are true when any byte is nonzero; string and struct spans are the
/// raw payload.
pub trait FieldDecoder {
    fn decode_field(&mut self, arg: &FieldArg<'_>, raw: &[u8]) -> Result<(), Error>;
}

/// Encodes `value` as `ty` into `buffer`, growing the buffer until the whole
/// message fits. Returns the encoded length; the message is the first that
/// many bytes of `buffer`.
pub fn encode_into(
    schema: &Schema,
    ty: &TypeDescriptor,
    value: &Struct,
    buffer: &mut GrowableBuffer,
) -> Result<usize, Error> {
    if buffer.capacity() == 0 {
        buffer.grow();
    }
    loop {
        let mut encoder = ValueEncoder::new(value);
        match engine::encode(schema, ty, buffer.as_mut_slice(), &mut encoder)? {
            Written::Overflow => {
                let capacity = buffer.grow();
                debug!(type_name = ty.name(), capacity, "encode buffer exhausted, retrying");
            }
            written => return Ok(written.len()),
        }
    }
}
