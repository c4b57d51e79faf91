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

//! The sproto wire engine.
//!
//! An encoded struct is a `u16` slot count, the `u16` slots, then the data
//! part. A slot holding an even nonzero `v` is the inline value `v / 2 - 1`,
//! a zero slot means "next data chunk", and an odd slot skips `(v + 1) / 2`
//! tags. Data chunks are prefixed with their `u32` length.

use super::{FieldArg, FieldDecoder, FieldEncoder, Written};
use crate::buffer::{Overflow, Reader, Writer};
use crate::error::Error;
use crate::meta::{Field, TypeDescriptor};
use crate::resolver::Schema;
use crate::types::{
    FieldKind, INLINE_LIMIT, SIZEOF_FIELD, SIZEOF_HEADER, SIZEOF_INT32, SIZEOF_INT64,
    SIZEOF_LENGTH,
};
use byteorder::{ByteOrder, LittleEndian};

enum Fault {
    Overflow,
    Error(Error),
}

impl From<Overflow> for Fault {
    fn from(_: Overflow) -> Self {
        Fault::Overflow
    }
}

impl From<Error> for Fault {
    fn from(err: Error) -> Self {
        Fault::Error(err)
    }
}

/// Encodes one struct of type `ty` into `out`, pulling field values from
/// `encoder`.
///
/// Returns [`Written::Bytes`] on success and [`Written::Overflow`] when
/// `out` is too small. Partial output of an overflowed pass is garbage.
pub fn encode<E: FieldEncoder + ?Sized>(
    schema: &Schema,
    ty: &TypeDescriptor,
    out: &mut [u8],
    encoder: &mut E,
) -> Result<Written, Error> {
    match encode_struct(schema, ty, out, encoder) {
        Ok(n) => Ok(Written::Bytes(n)),
        Err(Fault::Overflow) => Ok(Written::Overflow),
        Err(Fault::Error(err)) => Err(err),
    }
}

fn encode_struct<E: FieldEncoder + ?Sized>(
    schema: &Schema,
    ty: &TypeDescriptor,
    out: &mut [u8],
    encoder: &mut E,
) -> Result<usize, Fault> {
    let header_len = SIZEOF_HEADER + ty.max_slots() * SIZEOF_FIELD;
    if out.len() < header_len {
        return Err(Fault::Overflow);
    }

    let mut slots: Vec<u16> = Vec::with_capacity(ty.max_slots());
    let data_len = {
        let mut data = Writer::new(&mut out[header_len..]);
        let mut last_tag: i64 = -1;
        for field in ty.fields() {
            let arg = FieldArg {
                schema,
                field,
                index: 0,
                nested: nested_type(schema, field)?,
            };
            let slot = if field.array {
                encode_array(&arg, &mut data, encoder)?
            } else {
                encode_single(&arg, &mut data, encoder)?
            };
            let Some(slot) = slot else {
                continue;
            };
            let gap = i64::from(field.tag) - last_tag - 1;
            if gap > 0 {
                let skip = (gap - 1) * 2 + 1;
                if skip > 0xffff {
                    return Err(Error::unsupported(format!(
                        "tag gap before field `{}` is too large",
                        field.name
                    ))
                    .into());
                }
                slots.push(skip as u16);
            }
            slots.push(slot);
            last_tag = i64::from(field.tag);
        }
        data.len()
    };

    LittleEndian::write_u16(&mut out[..SIZEOF_HEADER], slots.len() as u16);
    for (i, slot) in slots.iter().enumerate() {
        let at = SIZEOF_HEADER + i * SIZEOF_FIELD;
        LittleEndian::write_u16(&mut out[at..at + SIZEOF_FIELD], *slot);
    }
    let used_header = SIZEOF_HEADER + slots.len() * SIZEOF_FIELD;
    if used_header != header_len {
        out.copy_within(header_len..header_len + data_len, used_header);
    }
    Ok(used_header + data_len)
}

fn nested_type<'s>(schema: &'s Schema, field: &Field) -> Result<Option<&'s TypeDescriptor>, Error> {
    match field.kind {
        FieldKind::Struct(index) => schema.type_at(index).map(Some).ok_or_else(|| {
            Error::invalid_schema(format!(
                "field `{}` refers to unknown type index {}",
                field.name, index
            ))
        }),
        _ => Ok(None),
    }
}

/// Returns the slot value for a present field, `None` when absent.
fn encode_single<E: FieldEncoder + ?Sized>(
    arg: &FieldArg<'_>,
    data: &mut Writer<'_>,
    encoder: &mut E,
) -> Result<Option<u16>, Fault> {
    match arg.kind() {
        FieldKind::Integer | FieldKind::Boolean => {
            let mut scratch = [0u8; SIZEOF_INT64];
            match encoder.encode_field(arg, &mut scratch)? {
                Written::Nil => Ok(None),
                Written::Overflow => Err(Fault::Overflow),
                Written::Bytes(SIZEOF_INT32) => {
                    let v = LittleEndian::read_u32(&scratch[..SIZEOF_INT32]);
                    if v < INLINE_LIMIT {
                        Ok(Some(((v + 1) * 2) as u16))
                    } else {
                        data.write_u32(SIZEOF_INT32 as u32)?;
                        data.write_bytes(&scratch[..SIZEOF_INT32])?;
                        Ok(Some(0))
                    }
                }
                Written::Bytes(SIZEOF_INT64) => {
                    data.write_u32(SIZEOF_INT64 as u32)?;
                    data.write_bytes(&scratch)?;
                    Ok(Some(0))
                }
                Written::Bytes(n) => Err(bad_width(arg, n).into()),
            }
        }
        FieldKind::String | FieldKind::Struct(_) => {
            if data.remaining() < SIZEOF_LENGTH {
                return Err(Fault::Overflow);
            }
            match encoder.encode_field(arg, &mut data.spare()[SIZEOF_LENGTH..])? {
                Written::Nil => Ok(None),
                Written::Overflow => Err(Fault::Overflow),
                Written::Bytes(n) => {
                    data.write_u32(n as u32)?;
                    data.skip(n)?;
                    Ok(Some(0))
                }
            }
        }
    }
}

/// Array fields always live in the data part. An array whose first element
/// is `Nil` is left out of the message.
fn encode_array<E: FieldEncoder + ?Sized>(
    arg: &FieldArg<'_>,
    data: &mut Writer<'_>,
    encoder: &mut E,
) -> Result<Option<u16>, Fault> {
    let start = data.len();
    data.skip(SIZEOF_LENGTH)?;
    let count = match arg.kind() {
        FieldKind::Integer => encode_integer_array(arg, data, encoder)?,
        FieldKind::Boolean => {
            let mut count = 0;
            loop {
                let mut scratch = [0u8; SIZEOF_INT64];
                match encoder.encode_field(&arg.at(count + 1), &mut scratch)? {
                    Written::Nil => break,
                    Written::Overflow => return Err(Fault::Overflow),
                    Written::Bytes(n) => {
                        let truthy = scratch[..n.min(SIZEOF_INT64)].iter().any(|b| *b != 0);
                        data.write_u8(u8::from(truthy))?;
                    }
                }
                count += 1;
            }
            count
        }
        FieldKind::String | FieldKind::Struct(_) => {
            let mut count = 0;
            loop {
                if data.remaining() < SIZEOF_LENGTH {
                    return Err(Fault::Overflow);
                }
                let element = arg.at(count + 1);
                match encoder.encode_field(&element, &mut data.spare()[SIZEOF_LENGTH..])? {
                    Written::Nil => break,
                    Written::Overflow => return Err(Fault::Overflow),
                    Written::Bytes(n) => {
                        data.write_u32(n as u32)?;
                        data.skip(n)?;
                    }
                }
                count += 1;
            }
            count
        }
    };
    if count == 0 {
        data.truncate(start);
        return Ok(None);
    }
    let body = data.len() - start - SIZEOF_LENGTH;
    data.set_u32(start, body as u32);
    Ok(Some(0))
}

/// Integer arrays share one element width: 8 bytes as soon as any element
/// needs it, else 4. The width byte leads the array body.
fn encode_integer_array<E: FieldEncoder + ?Sized>(
    arg: &FieldArg<'_>,
    data: &mut Writer<'_>,
    encoder: &mut E,
) -> Result<usize, Fault> {
    let mut values: Vec<i64> = Vec::new();
    let mut wide = false;
    loop {
        let element = arg.at(values.len() + 1);
        let mut scratch = [0u8; SIZEOF_INT64];
        match encoder.encode_field(&element, &mut scratch)? {
            Written::Nil => break,
            Written::Overflow => return Err(Fault::Overflow),
            Written::Bytes(SIZEOF_INT32) => {
                values.push(i64::from(LittleEndian::read_i32(&scratch[..SIZEOF_INT32])));
            }
            Written::Bytes(SIZEOF_INT64) => {
                wide = true;
                values.push(LittleEndian::read_i64(&scratch));
            }
            Written::Bytes(n) => return Err(bad_width(&element, n).into()),
        }
    }
    if values.is_empty() {
        return Ok(0);
    }
    if wide {
        data.write_u8(SIZEOF_INT64 as u8)?;
        for v in &values {
            data.write_i64(*v)?;
        }
    } else {
        data.write_u8(SIZEOF_INT32 as u8)?;
        for v in &values {
            data.write_u32(*v as u32)?;
        }
    }
    Ok(values.len())
}

fn bad_width(arg: &FieldArg<'_>, width: usize) -> Error {
    Error::invalid_data(format!(
        "field `{}` (index {}) written with integer width {}",
        arg.name(),
        arg.index,
        width
    ))
}

/// Decodes one struct of type `ty` from `data`, handing every known field to
/// `decoder`. Unknown tags are skipped. Returns the number of bytes consumed;
/// trailing bytes (such as unpack padding) are left alone.
pub fn decode<D: FieldDecoder + ?Sized>(
    schema: &Schema,
    ty: &TypeDescriptor,
    data: &[u8],
    decoder: &mut D,
) -> Result<usize, Error> {
    let mut reader = Reader::new(data);
    let slot_count = reader.read_u16()? as usize;
    let slots = reader.read_bytes(slot_count * SIZEOF_FIELD)?;
    let mut tag: i64 = -1;
    for slot in slots.chunks_exact(SIZEOF_FIELD) {
        let v = LittleEndian::read_u16(slot);
        tag += 1;
        if v & 1 == 1 {
            tag += i64::from(v / 2);
            continue;
        }
        let chunk = if v == 0 {
            let len = reader.read_u32()? as usize;
            Some(reader.read_bytes(len)?)
        } else {
            None
        };
        let Some(field) = ty.field_by_tag(tag as u32) else {
            continue;
        };
        let arg = FieldArg {
            schema,
            field,
            index: 0,
            nested: nested_type(schema, field)?,
        };
        match chunk {
            None => {
                if field.array || !matches!(field.kind, FieldKind::Integer | FieldKind::Boolean) {
                    return Err(Error::invalid_data(format!(
                        "field `{}` cannot hold an inline value",
                        field.name
                    )));
                }
                let raw = (u32::from(v / 2) - 1).to_le_bytes();
                decoder.decode_field(&arg, &raw)?;
            }
            Some(bytes) if field.array => decode_array(&arg, bytes, decoder)?,
            Some(bytes) => match field.kind {
                FieldKind::Integer => {
                    if bytes.len() != SIZEOF_INT32 && bytes.len() != SIZEOF_INT64 {
                        return Err(bad_width(&arg, bytes.len()));
                    }
                    decoder.decode_field(&arg, bytes)?;
                }
                FieldKind::Boolean => {
                    return Err(Error::invalid_data(format!(
                        "boolean field `{}` must be inline",
                        field.name
                    )));
                }
                FieldKind::String | FieldKind::Struct(_) => decoder.decode_field(&arg, bytes)?,
            },
        }
    }
    Ok(reader.get_cursor())
}

fn decode_array<D: FieldDecoder + ?Sized>(
    arg: &FieldArg<'_>,
    bytes: &[u8],
    decoder: &mut D,
) -> Result<(), Error> {
    if bytes.is_empty() {
        return Ok(());
    }
    match arg.kind() {
        FieldKind::Integer => {
            let mut reader = Reader::new(bytes);
            let width = reader.read_u8()? as usize;
            let body = reader.read_bytes(reader.remaining())?;
            if (width != SIZEOF_INT32 && width != SIZEOF_INT64) || body.len() % width != 0 {
                return Err(bad_width(arg, width));
            }
            for (i, raw) in body.chunks_exact(width).enumerate() {
                decoder.decode_field(&arg.at(i + 1), raw)?;
            }
        }
        FieldKind::Boolean => {
            for (i, raw) in bytes.chunks_exact(1).enumerate() {
                decoder.decode_field(&arg.at(i + 1), raw)?;
            }
        }
        FieldKind::String | FieldKind::Struct(_) => {
            let mut reader = Reader::new(bytes);
            let mut index = 1;
            while reader.remaining() > 0 {
                let len = reader.read_u32()? as usize;
                let raw = reader.read_bytes(len)?;
                decoder.decode_field(&arg.at(index), raw)?;
                index += 1;
            }
        }
    }
    Ok(())
}
