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

use super::{engine, FieldArg, FieldEncoder, Written};
use crate::error::Error;
use crate::types::{FieldKind, SIZEOF_INT32, SIZEOF_INT64};
use crate::value::{Struct, Value};
use byteorder::{ByteOrder, LittleEndian};

/// Reads field values out of a [`Struct`] for the wire engine.
pub struct ValueEncoder<'v> {
    current: &'v Struct,
}

impl<'v> ValueEncoder<'v> {
    pub fn new(current: &'v Struct) -> ValueEncoder<'v> {
        ValueEncoder { current }
    }

    /// Picks the value addressed by `arg`, or `None` when there is none.
    fn select(&self, arg: &FieldArg<'_>) -> Result<Option<&'v Value>, Error> {
        let Some(bound) = self.current.get(arg.name()) else {
            return Ok(None);
        };
        if !arg.is_array() {
            return Ok(Some(bound));
        }
        match bound {
            Value::Array(items) => Ok(arg.index.checked_sub(1).and_then(|i| items.get(i))),
            other => Err(Error::type_mismatch(arg.name(), 0, "array", other.type_name())),
        }
    }
}

impl FieldEncoder for ValueEncoder<'_> {
    fn encode_field(&mut self, arg: &FieldArg<'_>, out: &mut [u8]) -> Result<Written, Error> {
        let Some(value) = self.select(arg)? else {
            return Ok(Written::Nil);
        };
        let mismatch = |expected: &'static str| {
            Error::type_mismatch(arg.name(), arg.index, expected, value.type_name())
        };
        match arg.kind() {
            FieldKind::Integer => {
                let Value::Integer(v) = value else {
                    return Err(mismatch("integer"));
                };
                let high = v >> 31;
                if high == 0 || high == -1 {
                    if out.len() < SIZEOF_INT32 {
                        return Ok(Written::Overflow);
                    }
                    LittleEndian::write_u32(&mut out[..SIZEOF_INT32], *v as u32);
                    Ok(Written::Bytes(SIZEOF_INT32))
                } else {
                    if out.len() < SIZEOF_INT64 {
                        return Ok(Written::Overflow);
                    }
                    LittleEndian::write_i64(&mut out[..SIZEOF_INT64], *v);
                    Ok(Written::Bytes(SIZEOF_INT64))
                }
            }
            FieldKind::Boolean => {
                let Value::Boolean(v) = value else {
                    return Err(mismatch("boolean"));
                };
                if out.len() < SIZEOF_INT32 {
                    return Ok(Written::Overflow);
                }
                LittleEndian::write_u32(&mut out[..SIZEOF_INT32], u32::from(*v));
                Ok(Written::Bytes(SIZEOF_INT32))
            }
            FieldKind::String => {
                let Value::Bytes(bytes) = value else {
                    return Err(mismatch("bytes"));
                };
                if bytes.len() > out.len() {
                    return Ok(Written::Overflow);
                }
                out[..bytes.len()].copy_from_slice(bytes);
                Ok(Written::Bytes(bytes.len()))
            }
            FieldKind::Struct(_) => {
                let Value::Struct(nested) = value else {
                    return Err(mismatch("struct"));
                };
                let ty = arg.nested.ok_or_else(|| {
                    Error::invalid_schema(format!("struct field `{}` has no type", arg.name()))
                })?;
                engine::encode(arg.schema, ty, out, &mut ValueEncoder::new(nested))
            }
        }
    }
}
