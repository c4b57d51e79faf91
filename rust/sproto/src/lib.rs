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

//! # Sproto
//!
//! Encode, decode and pack sproto messages from dynamically typed values.
//!
//! A compiled schema bundle is loaded once into a [`Sproto`] handle. Values
//! are [`Struct`]s mapping field names to [`Value`]s; the handle checks each
//! value against the declared field kind while it writes the message.
//!
//! ## Key Features
//!
//! - **Schema lookup**: types by name, protocols by name or tag
//! - **Dynamic values**: no generated code, any [`Struct`] can be encoded
//! - **Self-sizing sessions**: buffers grow until the message fits
//! - **Zero packing**: the sproto 0-pack transform for encoded messages
//!
//! ## Protocols
//!
//! ```rust
//! use sproto::{FieldType, ProtocolKey, SchemaBuilder, Sproto, TypeBuilder};
//!
//! let bundle = SchemaBuilder::new()
//!     .add_type(TypeBuilder::new("Login").field(0, "user", FieldType::String))
//!     .add_type(TypeBuilder::new("Session").field(0, "id", FieldType::Integer))
//!     .add_protocol("login", 1, Some("Login"), Some("Session"))
//!     .build()?;
//! let sproto = Sproto::new(&bundle)?;
//!
//! let login = sproto.query_protocol("login")?;
//! assert_eq!(login.counterpart, ProtocolKey::Tag(1));
//! assert_eq!(login.response.map(|t| t.name()), Some("Session"));
//! # Ok::<(), sproto::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Every fallible call returns [`Error`]. Type mismatches name the field
//! and array index; nested decode failures keep the inner error as their
//! source.

pub use sproto_core::{
    buffer::GrowableBuffer,
    error::Error,
    meta::{Field, Protocol, TypeDescriptor},
    pack::{max_packed_len, pack, unpack},
    resolver::{FieldType, ProtocolKey, ProtocolQuery, Schema, SchemaBuilder, TypeBuilder},
    types::FieldKind,
    value::{Struct, Value},
    Sproto,
};
