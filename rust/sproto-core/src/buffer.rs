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

use crate::error::Error;
use crate::types::DEFAULT_BUFFER_CAPACITY;
use byteorder::{ByteOrder, LittleEndian};

/// Byte storage owned by one marshalling session.
///
/// The whole capacity is addressable (`as_mut_slice().len() == capacity()`)
/// so the wire engine can be handed a fixed budget. Capacity never shrinks.
#[derive(Debug, Default, Clone)]
pub struct GrowableBuffer {
    data: Vec<u8>,
}

impl GrowableBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        GrowableBuffer {
            data: vec![0; capacity],
        }
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Doubles the capacity, or jumps to [`DEFAULT_BUFFER_CAPACITY`] when the
    /// buffer is still empty. Returns the new capacity.
    pub fn grow(&mut self) -> usize {
        let next = match self.data.len() {
            0 => DEFAULT_BUFFER_CAPACITY,
            n => n * 2,
        };
        self.data.resize(next, 0);
        next
    }

    /// Grows to exactly `capacity` bytes if the buffer is smaller.
    pub fn grow_to(&mut self, capacity: usize) -> usize {
        if self.data.len() < capacity {
            self.data.resize(capacity, 0);
        }
        self.data.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Copies the first `len` bytes out of the session.
    pub fn dump(&self, len: usize) -> Vec<u8> {
        self.data[..len.min(self.data.len())].to_vec()
    }
}

/// Marker returned when a write does not fit the remaining budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow;

/// Little-endian writer over a fixed budget.
pub struct Writer<'a> {
    bf: &'a mut [u8],
    cursor: usize,
}

impl<'a> Writer<'a> {
    pub fn new(bf: &'a mut [u8]) -> Writer<'a> {
        Writer { bf, cursor: 0 }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.bf.len() - self.cursor
    }

    /// Reserves `len` bytes and returns them for the caller to fill.
    pub fn claim(&mut self, len: usize) -> Result<&mut [u8], Overflow> {
        if self.remaining() < len {
            return Err(Overflow);
        }
        let start = self.cursor;
        self.cursor += len;
        Ok(&mut self.bf[start..start + len])
    }

    /// The unwritten tail, without advancing.
    pub fn spare(&mut self) -> &mut [u8] {
        &mut self.bf[self.cursor..]
    }

    /// Drops everything written after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.cursor = self.cursor.min(len);
    }

    pub fn skip(&mut self, len: usize) -> Result<(), Overflow> {
        self.claim(len).map(|_| ())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), Overflow> {
        self.claim(1)?[0] = value;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), Overflow> {
        LittleEndian::write_u16(self.claim(2)?, value);
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), Overflow> {
        LittleEndian::write_u32(self.claim(4)?, value);
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<(), Overflow> {
        LittleEndian::write_i64(self.claim(8)?, value);
        Ok(())
    }

    pub fn write_bytes(&mut self, v: &[u8]) -> Result<(), Overflow> {
        self.claim(v.len())?.copy_from_slice(v);
        Ok(())
    }

    /// Overwrites already-written bytes at `offset`.
    pub fn set_u32(&mut self, offset: usize, value: u32) {
        LittleEndian::write_u32(&mut self.bf[offset..offset + 4], value);
    }
}

/// Bounds-checked little-endian reader.
pub struct Reader<'a> {
    bf: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bf: &'a [u8]) -> Reader<'a> {
        Reader { bf, cursor: 0 }
    }

    #[inline(always)]
    pub fn get_cursor(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.bf.len() - self.cursor
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < len {
            return Err(Error::buffer_out_of_bound(self.cursor, len, self.bf.len()));
        }
        let s = &self.bf[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(s)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }
}
