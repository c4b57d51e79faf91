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

use super::{engine, FieldArg, FieldDecoder};
use crate::error::Error;
use crate::types::{FieldKind, SIZEOF_INT32, SIZEOF_INT64};
use crate::value::{Struct, Value};
use byteorder::{ByteOrder, LittleEndian};

/// Installs decoded field values into a [`Struct`].
pub struct ValueDecoder<'v> {
    target: &'v mut Struct,
    depth: u32,
    max_depth: u32,
}

impl<'v> ValueDecoder<'v> {
    pub fn new(target: &'v mut Struct, max_depth: u32) -> ValueDecoder<'v> {
        ValueDecoder {
            target,
            depth: 0,
            max_depth,
        }
    }

    fn build(&self, arg: &FieldArg<'_>, raw: &[u8]) -> Result<Value, Error> {
        Ok(match arg.kind() {
            FieldKind::Integer => Value::Integer(match raw.len() {
                SIZEOF_INT32 => i64::from(LittleEndian::read_i32(raw)),
                SIZEOF_INT64 => LittleEndian::read_i64(raw),
                n => {
                    return Err(Error::invalid_data(format!(
                        "field `{}` (index {}) has integer width {}",
                        arg.name(),
                        arg.index,
                        n
                    )))
                }
            }),
            FieldKind::Boolean => Value::Boolean(raw.iter().any(|b| *b != 0)),
            FieldKind::String => Value::Bytes(raw.to_vec()),
            FieldKind::Struct(_) => {
                if self.depth >= self.max_depth {
                    return Err(Error::depth_exceed(format!(
                        "field `{}` nests deeper than {} structs",
                        arg.name(),
                        self.max_depth
                    )));
                }
                let ty = arg.nested.ok_or_else(|| {
                    Error::invalid_schema(format!("struct field `{}` has no type", arg.name()))
                })?;
                let mut fields = Struct::new();
                let mut decoder = ValueDecoder {
                    target: &mut fields,
                    depth: self.depth + 1,
                    max_depth: self.max_depth,
                };
                engine::decode(arg.schema, ty, raw, &mut decoder)
                    .map_err(|err| Error::decode(arg.name(), arg.index, err))?;
                Value::Struct(fields)
            }
        })
    }
}

impl FieldDecoder for ValueDecoder<'_> {
    fn decode_field(&mut self, arg: &FieldArg<'_>, raw: &[u8]) -> Result<(), Error> {
        let value = self.build(arg, raw)?;
        if arg.index == 0 {
            self.target.insert(arg.name().to_owned(), value);
            return Ok(());
        }
        let slot = self
            .target
            .entry(arg.name().to_owned())
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(items) => items.push(value),
            other => *other = Value::Array(vec![value]),
        }
        Ok(())
    }
}
