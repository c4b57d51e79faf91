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

//! Compiled schema bundles.
//!
//! A bundle is itself a sproto message of the `group` type below, encoded
//! with the regular wire engine:
//!
//! ```text
//! .type {
//!     .field {
//!         name 0 : string
//!         buildin 1 : integer
//!         type 2 : integer
//!         tag 3 : integer
//!         array 4 : boolean
//!     }
//!     name 0 : string
//!     fields 1 : *field
//! }
//! .protocol {
//!     name 0 : string
//!     tag 1 : integer
//!     request 2 : integer
//!     response 3 : integer
//! }
//! .group {
//!     type 0 : *type
//!     protocol 1 : *protocol
//! }
//! ```
//!
//! `buildin` names a builtin type; when it is absent, `type` is the index
//! of a struct type in the group. `request` and `response` are type indices.

use super::Schema;
use crate::buffer::GrowableBuffer;
use crate::error::Error;
use crate::meta::{Field, Protocol, TypeDescriptor};
use crate::serializer::{encode_into, engine, ValueDecoder};
use crate::types::{BuiltinType, FieldKind};
use crate::value::{Struct, Value};
use std::collections::HashMap;

const GROUP: usize = 0;
const TYPE: usize = 1;
const FIELD: usize = 2;
const PROTOCOL: usize = 3;

const BUNDLE_MAX_DEPTH: u32 = 4;

fn meta_schema() -> Result<Schema, Error> {
    let types = vec![
        TypeDescriptor::new(
            "group".to_string(),
            vec![
                Field::new(0, "type", FieldKind::Struct(TYPE), true),
                Field::new(1, "protocol", FieldKind::Struct(PROTOCOL), true),
            ],
        ),
        TypeDescriptor::new(
            "type".to_string(),
            vec![
                Field::new(0, "name", FieldKind::String, false),
                Field::new(1, "fields", FieldKind::Struct(FIELD), true),
            ],
        ),
        TypeDescriptor::new(
            "field".to_string(),
            vec![
                Field::new(0, "name", FieldKind::String, false),
                Field::new(1, "buildin", FieldKind::Integer, false),
                Field::new(2, "type", FieldKind::Integer, false),
                Field::new(3, "tag", FieldKind::Integer, false),
                Field::new(4, "array", FieldKind::Boolean, false),
            ],
        ),
        TypeDescriptor::new(
            "protocol".to_string(),
            vec![
                Field::new(0, "name", FieldKind::String, false),
                Field::new(1, "tag", FieldKind::Integer, false),
                Field::new(2, "request", FieldKind::Integer, false),
                Field::new(3, "response", FieldKind::Integer, false),
            ],
        ),
    ];
    Schema::from_parts(types, vec![])
}

impl Schema {
    /// Loads a compiled schema bundle.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSchema`] when the bytes are not a well-formed bundle
    /// or describe an inconsistent schema (duplicate names, descending tags,
    /// dangling type indices).
    pub fn from_bytes(bytes: &[u8]) -> Result<Schema, Error> {
        let meta = meta_schema()?;
        let group = &meta.types()[GROUP];
        let mut root = Struct::new();
        engine::decode(
            &meta,
            group,
            bytes,
            &mut ValueDecoder::new(&mut root, BUNDLE_MAX_DEPTH),
        )
        .map_err(|err| Error::invalid_schema(format!("malformed schema bundle: {err}")))?;

        let types = records(&root, "type")?
            .iter()
            .map(read_type)
            .collect::<Result<Vec<_>, _>>()?;
        let protocols = records(&root, "protocol")?
            .iter()
            .map(read_protocol)
            .collect::<Result<Vec<_>, _>>()?;
        Schema::from_parts(types, protocols)
    }
}

fn records<'v>(record: &'v Struct, name: &str) -> Result<Vec<&'v Struct>, Error> {
    let Some(value) = record.get(name) else {
        return Ok(Vec::new());
    };
    let items = value
        .as_array()
        .ok_or_else(|| Error::invalid_schema(format!("bundle `{name}` is not a list")))?;
    items
        .iter()
        .map(|item| {
            item.as_struct()
                .ok_or_else(|| Error::invalid_schema(format!("bundle `{name}` entry is not a struct")))
        })
        .collect()
}

fn name_of(record: &Struct) -> Result<String, Error> {
    let bytes = record
        .get("name")
        .and_then(Value::as_bytes)
        .ok_or_else(|| Error::invalid_schema("bundle entry without a name"))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| Error::invalid_schema("bundle entry name is not UTF-8"))
}

fn index_of(record: &Struct, key: &str, owner: &str) -> Result<Option<usize>, Error> {
    match record.get(key).and_then(Value::as_integer) {
        None => Ok(None),
        Some(v) => usize::try_from(v)
            .map(Some)
            .map_err(|_| Error::invalid_schema(format!("`{owner}` has negative {key} {v}"))),
    }
}

fn tag_of(record: &Struct, owner: &str) -> Result<u16, Error> {
    let tag = record
        .get("tag")
        .and_then(Value::as_integer)
        .ok_or_else(|| Error::invalid_schema(format!("`{owner}` has no tag")))?;
    u16::try_from(tag).map_err(|_| Error::invalid_schema(format!("`{owner}` has tag {tag} out of range")))
}

fn read_type(record: &&Struct) -> Result<TypeDescriptor, Error> {
    let name = name_of(record)?;
    let mut fields = Vec::new();
    for field in records(record, "fields")? {
        let field_name = name_of(field)?;
        let owner = format!("{name}.{field_name}");
        let kind = match field.get("buildin").and_then(Value::as_integer) {
            Some(id) => u8::try_from(id)
                .ok()
                .and_then(|id| BuiltinType::try_from(id).ok())
                .map(FieldKind::from)
                .ok_or_else(|| {
                    Error::unsupported(format!("`{owner}` has unknown builtin type {id}"))
                })?,
            None => match index_of(field, "type", &owner)? {
                Some(index) => FieldKind::Struct(index),
                None => {
                    return Err(Error::invalid_schema(format!("`{owner}` has no type")));
                }
            },
        };
        let array = field.get("array").and_then(Value::as_bool).unwrap_or(false);
        fields.push(Field::new(tag_of(field, &owner)?, field_name, kind, array));
    }
    Ok(TypeDescriptor::new(name, fields))
}

fn read_protocol(record: &&Struct) -> Result<Protocol, Error> {
    let name = name_of(record)?;
    Ok(Protocol {
        tag: tag_of(record, &name)?,
        request: index_of(record, "request", &name)?,
        response: index_of(record, "response", &name)?,
        name,
    })
}

/// The type of a field declared through [`TypeBuilder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Boolean,
    String,
    /// A struct type, by name.
    Struct(String),
}

impl FieldType {
    pub fn of<S: Into<String>>(type_name: S) -> FieldType {
        FieldType::Struct(type_name.into())
    }
}

#[derive(Clone, Debug)]
struct FieldDecl {
    tag: u16,
    name: String,
    field_type: FieldType,
    array: bool,
}

/// Declares one struct type for a [`SchemaBuilder`].
#[derive(Clone, Debug)]
pub struct TypeBuilder {
    name: String,
    fields: Vec<FieldDecl>,
}

impl TypeBuilder {
    pub fn new<S: Into<String>>(name: S) -> TypeBuilder {
        TypeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field<S: Into<String>>(mut self, tag: u16, name: S, field_type: FieldType) -> Self {
        self.fields.push(FieldDecl {
            tag,
            name: name.into(),
            field_type,
            array: false,
        });
        self
    }

    pub fn array<S: Into<String>>(mut self, tag: u16, name: S, field_type: FieldType) -> Self {
        self.fields.push(FieldDecl {
            tag,
            name: name.into(),
            field_type,
            array: true,
        });
        self
    }
}

#[derive(Clone, Debug)]
struct ProtocolDecl {
    name: String,
    tag: u16,
    request: Option<String>,
    response: Option<String>,
}

/// Produces compiled schema bundles.
///
/// ```rust
/// use sproto_core::resolver::{FieldType, Schema, SchemaBuilder, TypeBuilder};
///
/// let bundle = SchemaBuilder::new()
///     .add_type(
///         TypeBuilder::new("Person")
///             .field(0, "name", FieldType::String)
///             .field(1, "age", FieldType::Integer),
///     )
///     .add_protocol("hello", 1, Some("Person"), None)
///     .build()
///     .unwrap();
/// let schema = Schema::from_bytes(&bundle).unwrap();
/// assert_eq!(schema.query_type("Person").unwrap().fields().len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SchemaBuilder {
    types: Vec<TypeBuilder>,
    protocols: Vec<ProtocolDecl>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(mut self, ty: TypeBuilder) -> Self {
        self.types.push(ty);
        self
    }

    pub fn add_protocol<S: Into<String>>(
        mut self,
        name: S,
        tag: u16,
        request: Option<&str>,
        response: Option<&str>,
    ) -> Self {
        self.protocols.push(ProtocolDecl {
            name: name.into(),
            tag,
            request: request.map(str::to_owned),
            response: response.map(str::to_owned),
        });
        self
    }

    /// Encodes the declared types and protocols as a bundle.
    ///
    /// Fields are emitted in ascending tag order regardless of declaration
    /// order. Struct references are resolved by type name.
    pub fn build(&self) -> Result<Vec<u8>, Error> {
        let index: HashMap<&str, usize> = self
            .types
            .iter()
            .enumerate()
            .map(|(i, ty)| (ty.name.as_str(), i))
            .collect();
        let resolve = |name: &str| {
            index
                .get(name)
                .map(|i| *i as i64)
                .ok_or_else(|| Error::not_found("type", name))
        };

        let mut types = Vec::with_capacity(self.types.len());
        for ty in &self.types {
            let mut decls: Vec<&FieldDecl> = ty.fields.iter().collect();
            decls.sort_by_key(|decl| decl.tag);
            let mut fields = Vec::with_capacity(decls.len());
            for decl in decls {
                let mut field = Struct::new();
                field.insert("name".into(), Value::from(decl.name.as_str()));
                field.insert("tag".into(), Value::from(u32::from(decl.tag)));
                let builtin = match &decl.field_type {
                    FieldType::Integer => Some(BuiltinType::Integer),
                    FieldType::Boolean => Some(BuiltinType::Boolean),
                    FieldType::String => Some(BuiltinType::String),
                    FieldType::Struct(name) => {
                        field.insert("type".into(), Value::Integer(resolve(name)?));
                        None
                    }
                };
                if let Some(builtin) = builtin {
                    field.insert("buildin".into(), Value::from(u32::from(u8::from(builtin))));
                }
                if decl.array {
                    field.insert("array".into(), Value::Boolean(true));
                }
                fields.push(Value::Struct(field));
            }
            let mut record = Struct::new();
            record.insert("name".into(), Value::from(ty.name.as_str()));
            if !fields.is_empty() {
                record.insert("fields".into(), Value::Array(fields));
            }
            types.push(Value::Struct(record));
        }

        let mut protocols = Vec::with_capacity(self.protocols.len());
        for protocol in &self.protocols {
            let mut record = Struct::new();
            record.insert("name".into(), Value::from(protocol.name.as_str()));
            record.insert("tag".into(), Value::from(u32::from(protocol.tag)));
            if let Some(request) = &protocol.request {
                record.insert("request".into(), Value::Integer(resolve(request)?));
            }
            if let Some(response) = &protocol.response {
                record.insert("response".into(), Value::Integer(resolve(response)?));
            }
            protocols.push(Value::Struct(record));
        }

        let mut group = Struct::new();
        group.insert("type".into(), Value::Array(types));
        group.insert("protocol".into(), Value::Array(protocols));

        let meta = meta_schema()?;
        let mut buffer = GrowableBuffer::new();
        let len = encode_into(&meta, &meta.types()[GROUP], &group, &mut buffer)?;
        Ok(buffer.dump(len))
    }
}
