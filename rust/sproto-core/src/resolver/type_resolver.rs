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
use crate::meta::{Protocol, TypeDescriptor};
use crate::types::FieldKind;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A protocol identifier: its name or its numeric tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtocolKey<'a> {
    Name(&'a str),
    Tag(u16),
}

impl<'a> From<&'a str> for ProtocolKey<'a> {
    fn from(name: &'a str) -> Self {
        ProtocolKey::Name(name)
    }
}

impl From<u16> for ProtocolKey<'_> {
    fn from(tag: u16) -> Self {
        ProtocolKey::Tag(tag)
    }
}

impl fmt::Display for ProtocolKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolKey::Name(name) => f.write_str(name),
            ProtocolKey::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

/// Result of [`Schema::query_protocol`].
///
/// `counterpart` is the tag when the query was by name, and the name when
/// the query was by tag.
#[derive(Clone, Copy, Debug)]
pub struct ProtocolQuery<'s> {
    pub protocol: &'s Protocol,
    pub request: Option<&'s TypeDescriptor>,
    pub response: Option<&'s TypeDescriptor>,
    pub counterpart: ProtocolKey<'s>,
}

/// A compiled schema: every type and protocol, immutable once loaded.
///
/// Types and protocols are handed out as borrows, so they cannot outlive the
/// schema. A `Schema` is `Send + Sync` and can be read from many threads.
#[derive(Clone, Debug)]
pub struct Schema {
    types: Vec<TypeDescriptor>,
    type_index_by_name: HashMap<String, usize>,
    protocols: Vec<Protocol>,
    protocol_by_name: HashMap<String, usize>,
    protocol_by_tag: HashMap<u16, usize>,
}

impl Schema {
    /// Indexes and validates a set of types and protocols.
    pub(crate) fn from_parts(
        types: Vec<TypeDescriptor>,
        protocols: Vec<Protocol>,
    ) -> Result<Schema, Error> {
        let mut type_index_by_name = HashMap::with_capacity(types.len());
        for (index, ty) in types.iter().enumerate() {
            if type_index_by_name.insert(ty.name().to_owned(), index).is_some() {
                return Err(Error::invalid_schema(format!(
                    "duplicate type `{}`",
                    ty.name()
                )));
            }
            let mut names = HashSet::with_capacity(ty.fields().len());
            let mut last_tag: Option<u16> = None;
            for field in ty.fields() {
                if !names.insert(field.name.as_str()) {
                    return Err(Error::invalid_schema(format!(
                        "duplicate field `{}` in type `{}`",
                        field.name,
                        ty.name()
                    )));
                }
                if last_tag.is_some_and(|last| field.tag <= last) {
                    return Err(Error::invalid_schema(format!(
                        "field `{}` in type `{}` breaks ascending tag order",
                        field.name,
                        ty.name()
                    )));
                }
                last_tag = Some(field.tag);
                if let FieldKind::Struct(nested) = field.kind {
                    if nested >= types.len() {
                        return Err(Error::invalid_schema(format!(
                            "field `{}` in type `{}` refers to unknown type index {}",
                            field.name,
                            ty.name(),
                            nested
                        )));
                    }
                }
            }
        }

        let mut protocol_by_name = HashMap::with_capacity(protocols.len());
        let mut protocol_by_tag = HashMap::with_capacity(protocols.len());
        for (index, protocol) in protocols.iter().enumerate() {
            if protocol_by_name
                .insert(protocol.name.clone(), index)
                .is_some()
                || protocol_by_tag.insert(protocol.tag, index).is_some()
            {
                return Err(Error::invalid_schema(format!(
                    "duplicate protocol `{}` ({})",
                    protocol.name, protocol.tag
                )));
            }
            for ty in [protocol.request, protocol.response].into_iter().flatten() {
                if ty >= types.len() {
                    return Err(Error::invalid_schema(format!(
                        "protocol `{}` refers to unknown type index {}",
                        protocol.name, ty
                    )));
                }
            }
        }

        Ok(Schema {
            types,
            type_index_by_name,
            protocols,
            protocol_by_name,
            protocol_by_tag,
        })
    }

    #[inline(always)]
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    #[inline(always)]
    pub fn protocols(&self) -> &[Protocol] {
        &self.protocols
    }

    #[inline(always)]
    pub fn type_at(&self, index: usize) -> Option<&TypeDescriptor> {
        self.types.get(index)
    }

    /// Looks a type up by name.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] carrying `name` when the schema has no such type.
    pub fn query_type(&self, name: &str) -> Result<&TypeDescriptor, Error> {
        self.type_index_by_name
            .get(name)
            .map(|index| &self.types[*index])
            .ok_or_else(|| Error::not_found("type", name))
    }

    /// Looks a protocol up by name or tag.
    ///
    /// Either direction may be missing from the result when the protocol
    /// only defines one of them.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] carrying the requested name or tag.
    pub fn query_protocol<'k, K: Into<ProtocolKey<'k>>>(
        &self,
        key: K,
    ) -> Result<ProtocolQuery<'_>, Error> {
        let key = key.into();
        let index = match key {
            ProtocolKey::Name(name) => self.protocol_by_name.get(name),
            ProtocolKey::Tag(tag) => self.protocol_by_tag.get(&tag),
        }
        .ok_or_else(|| Error::not_found("protocol", key.to_string()))?;
        let protocol = &self.protocols[*index];
        let counterpart = match key {
            ProtocolKey::Name(_) => ProtocolKey::Tag(protocol.tag),
            ProtocolKey::Tag(_) => ProtocolKey::Name(&protocol.name),
        };
        Ok(ProtocolQuery {
            protocol,
            request: protocol.request.and_then(|i| self.type_at(i)),
            response: protocol.response.and_then(|i| self.type_at(i)),
            counterpart,
        })
    }
}

/// Renders the schema in sproto text form.
impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ty in &self.types {
            writeln!(f, ".{} {{", ty.name())?;
            for field in ty.fields() {
                let type_name = match field.kind {
                    FieldKind::Struct(index) => self.types[index].name(),
                    kind => kind.type_name(),
                };
                let star = if field.array { "*" } else { "" };
                writeln!(f, "    {} {} : {}{}", field.name, field.tag, star, type_name)?;
            }
            writeln!(f, "}}")?;
        }
        for protocol in &self.protocols {
            writeln!(f, "{} {} {{", protocol.name, protocol.tag)?;
            if let Some(index) = protocol.request {
                writeln!(f, "    request {}", self.types[index].name())?;
            }
            if let Some(index) = protocol.response {
                writeln!(f, "    response {}", self.types[index].name())?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}
