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

//! Zero-run packing of encoded messages.
//!
//! The input is split into 8-byte groups. A group is written as a bitmap
//! byte (bit `i` set when byte `i` is nonzero) followed by its nonzero
//! bytes. A group with no zero byte opens a raw run instead: `0xff`, the
//! number of groups minus one, then the groups verbatim. Later groups with at
//! most two zero bytes extend the run, up to 256 groups.
//!
//! A short trailing group extends an open run with its real bytes only, so
//! a final run may end early and unpacks to exactly the bytes it carries.
//! Any other trailing group is zero-padded to a whole group.

use crate::buffer::GrowableBuffer;
use crate::error::Error;
use crate::types::DEFAULT_BUFFER_CAPACITY;
use tracing::{debug, trace};

const GROUP: usize = 8;
const RUN_MARK: u8 = 0xff;
const MAX_RUN: usize = 256;
/// Nonzero bytes a group needs to extend an open run.
const RUN_EXTEND: usize = 6;

/// Worst-case packed length of `len` input bytes.
#[inline(always)]
pub fn max_packed_len(len: usize) -> usize {
    len.div_ceil(MAX_RUN * GROUP) * 2 + len
}

/// Packs `src` into `dst` and returns the packed length.
///
/// # Errors
///
/// [`Error::BufferOutOfBound`] when `dst` is shorter than
/// [`max_packed_len`] of the input.
pub fn pack_into(src: &[u8], dst: &mut [u8]) -> Result<usize, Error> {
    let bound = max_packed_len(src.len());
    if dst.len() < bound {
        return Err(Error::buffer_out_of_bound(0, bound, dst.len()));
    }
    Ok(pack_groups(src, dst))
}

fn pack_groups(src: &[u8], dst: &mut [u8]) -> usize {
    let mut out = 0;
    // (position of the run mark, groups in the run)
    let mut run: Option<(usize, usize)> = None;
    for chunk in src.chunks(GROUP) {
        let nonzero = chunk.iter().filter(|b| **b != 0).count();
        let partial = chunk.len() < GROUP;

        if let Some((mark, count)) = run {
            if nonzero >= RUN_EXTEND || partial {
                dst[out..out + chunk.len()].copy_from_slice(chunk);
                out += chunk.len();
                dst[mark + 1] = count as u8;
                run = if count + 1 == MAX_RUN {
                    None
                } else {
                    Some((mark, count + 1))
                };
                continue;
            }
            run = None;
        }

        if nonzero == GROUP {
            dst[out] = RUN_MARK;
            dst[out + 1] = 0;
            dst[out + 2..out + 2 + GROUP].copy_from_slice(chunk);
            run = Some((out, 1));
            out += 2 + GROUP;
            continue;
        }

        let header = out;
        out += 1;
        let mut bits = 0u8;
        for (i, b) in chunk.iter().enumerate() {
            if *b != 0 {
                bits |= 1 << i;
                dst[out] = *b;
                out += 1;
            }
        }
        dst[header] = bits;
    }
    trace!(input = src.len(), packed = out, "packed");
    out
}

/// Packs `src` into `buffer`, sizing it to the worst case first. Returns the
/// packed length.
pub fn pack_with_buffer(src: &[u8], buffer: &mut GrowableBuffer) -> usize {
    buffer.grow_to(max_packed_len(src.len()));
    pack_groups(src, buffer.as_mut_slice())
}

/// Packs `src`.
///
/// ```rust
/// use sproto_core::pack::pack;
///
/// let msg = [0x08, 0, 0, 0, 0x03, 0, 0x02, 0, 0x19, 0, 0, 0, 0xaa, 0x01, 0, 0];
/// assert_eq!(pack(&msg), [0x51, 0x08, 0x03, 0x02, 0x31, 0x19, 0xaa, 0x01]);
/// ```
pub fn pack(src: &[u8]) -> Vec<u8> {
    let mut buffer = GrowableBuffer::new();
    let len = pack_with_buffer(src, &mut buffer);
    buffer.dump(len)
}

/// Unpacks `src` into `dst`.
///
/// Returns the full unpacked length. Only the bytes that fit in `dst` are
/// written, so a result larger than `dst.len()` tells the caller how much
/// room a second pass needs.
///
/// # Errors
///
/// [`Error::PackStream`] when `src` is not a valid packed stream.
pub fn unpack_into(src: &[u8], dst: &mut [u8]) -> Result<usize, Error> {
    let mut put = |at: usize, byte: u8| {
        if let Some(slot) = dst.get_mut(at) {
            *slot = byte;
        }
    };
    let mut size = 0;
    let mut cursor = 0;
    while cursor < src.len() {
        let header = src[cursor];
        cursor += 1;
        if header == RUN_MARK {
            let Some(count) = src.get(cursor) else {
                return Err(Error::pack_stream(format!(
                    "run mark at offset {} has no length",
                    cursor - 1
                )));
            };
            cursor += 1;
            let want = (*count as usize + 1) * GROUP;
            let have = want.min(src.len() - cursor);
            if want - have >= GROUP {
                return Err(Error::pack_stream(format!(
                    "run of {} bytes truncated to {}",
                    want, have
                )));
            }
            for (i, b) in src[cursor..cursor + have].iter().enumerate() {
                put(size + i, *b);
            }
            cursor += have;
            size += have;
        } else {
            for i in 0..GROUP {
                let byte = if header & (1 << i) != 0 {
                    let Some(b) = src.get(cursor) else {
                        return Err(Error::pack_stream(format!(
                            "group at offset {} is missing bytes",
                            size
                        )));
                    };
                    cursor += 1;
                    *b
                } else {
                    0
                };
                put(size + i, byte);
            }
            size += GROUP;
        }
    }
    Ok(size)
}

/// Unpacks `src` into `buffer`, growing it to the required length when the
/// first pass does not fit. Returns the unpacked length.
pub fn unpack_with_buffer(src: &[u8], buffer: &mut GrowableBuffer) -> Result<usize, Error> {
    let need = unpack_into(src, buffer.as_mut_slice())?;
    if need <= buffer.capacity() {
        return Ok(need);
    }
    debug!(
        need,
        capacity = buffer.capacity(),
        "unpack buffer too small, growing to required length"
    );
    buffer.grow_to(need);
    let written = unpack_into(src, buffer.as_mut_slice())?;
    crate::ensure!(
        written == need,
        "unpack produced {} bytes after probing {}",
        written,
        need
    );
    Ok(written)
}

/// Unpacks `src`.
pub fn unpack(src: &[u8]) -> Result<Vec<u8>, Error> {
    let mut buffer = GrowableBuffer::with_capacity(DEFAULT_BUFFER_CAPACITY.min(src.len() * GROUP));
    let len = unpack_with_buffer(src, &mut buffer)?;
    Ok(buffer.dump(len))
}
