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

use crate::types::FieldKind;

/// One entry of a type's field table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub tag: u16,
    pub name: String,
    pub kind: FieldKind,
    pub array: bool,
}

impl Field {
    pub fn new<S: Into<String>>(tag: u16, name: S, kind: FieldKind, array: bool) -> Field {
        Field {
            tag,
            name: name.into(),
            kind,
            array,
        }
    }
}

/// A named, tag-ordered table of fields.
///
/// Descriptors are only ever handed out as borrows of the
/// [`crate::resolver::Schema`] that owns them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    name: String,
    fields: Vec<Field>,
}

impl TypeDescriptor {
    pub(crate) fn new(name: String, fields: Vec<Field>) -> TypeDescriptor {
        TypeDescriptor { name, fields }
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields are sorted by tag, so this is a binary search.
    pub fn field_by_tag(&self, tag: u32) -> Option<&Field> {
        self.fields
            .binary_search_by(|f| u32::from(f.tag).cmp(&tag))
            .ok()
            .map(|i| &self.fields[i])
    }

    /// Upper bound on header slots: one per field plus one skip slot for
    /// every gap in the tag sequence.
    pub(crate) fn max_slots(&self) -> usize {
        let mut last: i64 = -1;
        let mut slots = 0;
        for field in &self.fields {
            if i64::from(field.tag) > last + 1 {
                slots += 1;
            }
            slots += 1;
            last = i64::from(field.tag);
        }
        slots
    }
}

/// A tagged request/response pairing. Types are indices into the owning schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Protocol {
    pub tag: u16,
    pub name: String,
    pub request: Option<usize>,
    pub response: Option<usize>,
}
