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

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Size of the field-count word that opens every encoded struct.
pub const SIZEOF_HEADER: usize = 2;
/// Size of one field slot in the header.
pub const SIZEOF_FIELD: usize = 2;
/// Size of the length prefix of a data chunk.
pub const SIZEOF_LENGTH: usize = 4;
pub const SIZEOF_INT32: usize = 4;
pub const SIZEOF_INT64: usize = 8;

/// Inline slot values must stay below this bound.
pub const INLINE_LIMIT: u32 = 0x7fff;

/// Capacity an empty [`crate::buffer::GrowableBuffer`] grows to first.
pub const DEFAULT_BUFFER_CAPACITY: usize = 2048;

/// Builtin field type ids as they appear in a compiled schema bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum BuiltinType {
    Integer = 0,
    Boolean = 1,
    String = 2,
}

/// The declared kind of a field.
///
/// `Struct` carries the index of the nested type inside its owning
/// [`crate::resolver::Schema`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Integer,
    Boolean,
    String,
    Struct(usize),
}

impl FieldKind {
    /// Name used in error messages and schema dumps.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::String => "string",
            FieldKind::Struct(_) => "struct",
        }
    }
}

impl From<BuiltinType> for FieldKind {
    fn from(builtin: BuiltinType) -> Self {
        match builtin {
            BuiltinType::Integer => FieldKind::Integer,
            BuiltinType::Boolean => FieldKind::Boolean,
            BuiltinType::String => FieldKind::String,
        }
    }
}
