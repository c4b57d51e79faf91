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

//! # Sproto Core
//!
//! Binds a dynamically typed value model to the sproto binary wire format.
//!
//! ## Architecture
//!
//! - **`sproto`**: The [`Sproto`] handle: encode, decode, pack and unpack
//! - **`resolver`**: Compiled schemas, type/protocol lookup, bundle loading
//! - **`serializer`**: The wire engine and its field callbacks
//! - **`pack`**: Zero-run packing of encoded messages
//! - **`buffer`**: Growable session buffers and bounded readers/writers
//! - **`meta`**: Type, field and protocol descriptors
//! - **`value`**: The dynamic [`value::Value`] model
//! - **`types`**: Wire constants and field kinds
//! - **`config`**: Session settings
//! - **`error`**: Error handling
//!
//! ## Encoding
//!
//! A message is encoded against a [`meta::TypeDescriptor`] by walking its
//! fields in tag order and asking a [`serializer::FieldEncoder`] for each
//! value. The encoder writes into a fixed budget; when a value does not fit
//! it answers [`serializer::Written::Overflow`] and the session buffer is
//! doubled before the whole message is encoded again. Decoding is the mirror
//! image through [`serializer::FieldDecoder`].
//!
//! ## Usage
//!
//! ```rust
//! use sproto_core::resolver::{FieldType, SchemaBuilder, TypeBuilder};
//! use sproto_core::value::{Struct, Value};
//! use sproto_core::Sproto;
//!
//! let bundle = SchemaBuilder::new()
//!     .add_type(
//!         TypeBuilder::new("Data")
//!             .array(0, "numbers", FieldType::Integer)
//!             .field(2, "number", FieldType::Integer),
//!     )
//!     .build()
//!     .unwrap();
//! let sproto = Sproto::new(&bundle).unwrap();
//!
//! let mut data = Struct::new();
//! data.insert("numbers".into(), Value::from(vec![Value::from(1), Value::from(2)]));
//! data.insert("number".into(), Value::from(100000));
//!
//! let packed = sproto.pack(&sproto.encode_by_name("Data", &data).unwrap());
//! let unpacked = sproto.unpack(&packed).unwrap();
//! let (decoded, _) = sproto.decode_by_name("Data", &unpacked).unwrap();
//! assert_eq!(decoded, data);
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod meta;
pub mod pack;
pub mod resolver;
pub mod serializer;
pub mod sproto;
pub mod types;
pub mod value;

pub use crate::sproto::Sproto;
