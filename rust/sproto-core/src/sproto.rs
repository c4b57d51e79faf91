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

use crate::buffer::GrowableBuffer;
use crate::config::Config;
use crate::error::Error;
use crate::meta::TypeDescriptor;
use crate::pack;
use crate::resolver::{ProtocolKey, ProtocolQuery, Schema};
use crate::serializer::{encode_into, engine, ValueDecoder};
use crate::value::Struct;
use tracing::trace;

/// A loaded schema together with the settings of its marshalling sessions.
///
/// `Sproto` binds the dynamic [`Struct`] model to the sproto wire format:
/// it encodes and decodes values of the schema's types and packs or unpacks
/// the resulting messages.
///
/// Every call runs in its own session buffer, so a `Sproto` can be shared
/// between threads. The `*_with_buffer` variants let a caller keep one buffer
/// alive across calls instead.
///
/// # Examples
///
/// ```rust
/// use sproto_core::resolver::{FieldType, SchemaBuilder, TypeBuilder};
/// use sproto_core::value::Value;
/// use sproto_core::Sproto;
///
/// let bundle = SchemaBuilder::new()
///     .add_type(
///         TypeBuilder::new("Person")
///             .field(0, "name", FieldType::String)
///             .field(1, "age", FieldType::Integer),
///     )
///     .build()
///     .unwrap();
/// let sproto = Sproto::new(&bundle).unwrap();
///
/// let alice = Value::from_fields([("name", Value::from("Alice")), ("age", Value::from(13))]);
/// let person = sproto.query_type("Person").unwrap();
/// let bytes = sproto.encode(person, alice.as_struct().unwrap()).unwrap();
/// let (decoded, consumed) = sproto.decode(person, &bytes).unwrap();
/// assert_eq!(consumed, bytes.len());
/// assert_eq!(Value::Struct(decoded), alice);
/// ```
///
/// Custom configuration:
///
/// ```rust
/// # use sproto_core::resolver::SchemaBuilder;
/// use sproto_core::Sproto;
///
/// # let bundle = SchemaBuilder::new().build().unwrap();
/// let sproto = Sproto::new(&bundle)
///     .unwrap()
///     .initial_capacity(256)
///     .max_depth(8);
/// ```
#[derive(Clone, Debug)]
pub struct Sproto {
    schema: Schema,
    config: Config,
}

impl Sproto {
    /// Loads a compiled schema bundle with the default [`Config`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSchema`] when `bundle` is not a valid compiled schema.
    pub fn new(bundle: &[u8]) -> Result<Sproto, Error> {
        Ok(Sproto::from_schema(Schema::from_bytes(bundle)?))
    }

    pub fn from_schema(schema: Schema) -> Sproto {
        Sproto {
            schema,
            config: Config::default(),
        }
    }

    /// Sets the capacity a fresh encode session starts with.
    ///
    /// Messages larger than this still encode; the session buffer doubles
    /// until they fit.
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Sets the deepest struct nesting `decode` accepts.
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    #[inline(always)]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// See [`Schema::query_type`].
    pub fn query_type(&self, name: &str) -> Result<&TypeDescriptor, Error> {
        self.schema.query_type(name)
    }

    /// See [`Schema::query_protocol`].
    pub fn query_protocol<'k, K: Into<ProtocolKey<'k>>>(
        &self,
        key: K,
    ) -> Result<ProtocolQuery<'_>, Error> {
        self.schema.query_protocol(key)
    }

    /// Encodes `value` as a message of type `ty`.
    ///
    /// # Arguments
    ///
    /// * `ty` - A type of this schema, usually from [`Sproto::query_type`].
    /// * `value` - Field name to value. Fields the type does not declare are
    ///   ignored, and absent fields are left out of the message.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] naming the field and array index whose value
    /// does not fit the declared kind.
    pub fn encode(&self, ty: &TypeDescriptor, value: &Struct) -> Result<Vec<u8>, Error> {
        let mut buffer = GrowableBuffer::with_capacity(self.config.initial_capacity);
        let len = self.encode_with_buffer(ty, value, &mut buffer)?;
        Ok(buffer.dump(len))
    }

    /// Encodes into a caller-owned buffer and returns the message length.
    ///
    /// The buffer keeps any capacity it grew to, so reusing it for messages
    /// of similar size avoids the retry passes.
    pub fn encode_with_buffer(
        &self,
        ty: &TypeDescriptor,
        value: &Struct,
        buffer: &mut GrowableBuffer,
    ) -> Result<usize, Error> {
        let len = encode_into(&self.schema, ty, value, buffer)?;
        trace!(type_name = ty.name(), len, "encoded");
        Ok(len)
    }

    /// Decodes a message of type `ty`.
    ///
    /// # Returns
    ///
    /// The decoded struct and the number of bytes the message occupied.
    /// Bytes after the message, such as unpack padding, are not read.
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] wrapping the failure of a nested struct, or the
    /// underlying error for a malformed top level.
    pub fn decode(&self, ty: &TypeDescriptor, data: &[u8]) -> Result<(Struct, usize), Error> {
        let mut value = Struct::new();
        let consumed = engine::decode(
            &self.schema,
            ty,
            data,
            &mut ValueDecoder::new(&mut value, self.config.max_depth),
        )?;
        trace!(type_name = ty.name(), consumed, "decoded");
        Ok((value, consumed))
    }

    /// [`Sproto::encode`] with the type looked up by name.
    pub fn encode_by_name(&self, type_name: &str, value: &Struct) -> Result<Vec<u8>, Error> {
        self.encode(self.query_type(type_name)?, value)
    }

    /// [`Sproto::decode`] with the type looked up by name.
    pub fn decode_by_name(&self, type_name: &str, data: &[u8]) -> Result<(Struct, usize), Error> {
        self.decode(self.query_type(type_name)?, data)
    }

    /// See [`pack::pack`].
    pub fn pack(&self, data: &[u8]) -> Vec<u8> {
        pack::pack(data)
    }

    /// See [`pack::unpack`].
    pub fn unpack(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        pack::unpack(data)
    }

    pub fn pack_with_buffer(&self, data: &[u8], buffer: &mut GrowableBuffer) -> usize {
        pack::pack_with_buffer(data, buffer)
    }

    pub fn unpack_with_buffer(
        &self,
        data: &[u8],
        buffer: &mut GrowableBuffer,
    ) -> Result<usize, Error> {
        pack::unpack_with_buffer(data, buffer)
    }
}
