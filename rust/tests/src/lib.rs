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

//! Schemas shared by the integration tests.

use sproto::{FieldType, SchemaBuilder, Sproto, TypeBuilder};

/// `.Person { name 0 : string  age 1 : integer  marital 2 : boolean  children 3 : *Person }`
/// and `.Data { numbers 0 : *integer  bools 1 : *boolean  number 2 : integer  bignumber 3 : integer }`.
pub fn reference_bundle() -> Vec<u8> {
    SchemaBuilder::new()
        .add_type(
            TypeBuilder::new("Person")
                .field(0, "name", FieldType::String)
                .field(1, "age", FieldType::Integer)
                .field(2, "marital", FieldType::Boolean)
                .array(3, "children", FieldType::of("Person")),
        )
        .add_type(
            TypeBuilder::new("Data")
                .array(0, "numbers", FieldType::Integer)
                .array(1, "bools", FieldType::Boolean)
                .field(2, "number", FieldType::Integer)
                .field(3, "bignumber", FieldType::Integer),
        )
        .build()
        .unwrap()
}

pub fn reference() -> Sproto {
    Sproto::new(&reference_bundle()).unwrap()
}

/// sprotoparser output for:
///
/// ```text
/// .Person {
///     name 0 : string
///     id 1 : integer
///     email 2 : string
///     .PhoneNumber {
///         number 0 : string
///         type 1 : integer
///     }
///     phone 3 : *PhoneNumber
/// }
/// .AddressBook {
///     person 0 : *Person(id)
/// }
/// foobar 1 {
///     request Person
///     response AddressBook
/// }
/// foo 2 {
///     response Person
/// }
/// bar 3 {
///     response nil
/// }
/// blackhole 4 {
/// }
/// ```
///
/// Types are sorted by name, `person` carries a `key` entry and `bar` a
/// `confirm` entry.
pub const COMPILED_ADDRESS_BOOK: &[u8] = &[
    0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xfd, 0x00, 0x00, 0x00, 0x35, 0x00,
    0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0b, 0x00, 0x00, 0x00,
    0x41, 0x64, 0x64, 0x72, 0x65, 0x73, 0x73, 0x42, 0x6f, 0x6f, 0x6b, 0x1c,
    0x00, 0x00, 0x00, 0x18, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x01,
    0x00, 0x04, 0x00, 0x02, 0x00, 0x04, 0x00, 0x04, 0x00, 0x06, 0x00, 0x00,
    0x00, 0x70, 0x65, 0x72, 0x73, 0x6f, 0x6e, 0x6e, 0x00, 0x00, 0x00, 0x02,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x50, 0x65, 0x72,
    0x73, 0x6f, 0x6e, 0x5a, 0x00, 0x00, 0x00, 0x12, 0x00, 0x00, 0x00, 0x04,
    0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x02, 0x00, 0x04, 0x00, 0x00,
    0x00, 0x6e, 0x61, 0x6d, 0x65, 0x10, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00,
    0x00, 0x02, 0x00, 0x01, 0x00, 0x04, 0x00, 0x02, 0x00, 0x00, 0x00, 0x69,
    0x64, 0x13, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01,
    0x00, 0x06, 0x00, 0x05, 0x00, 0x00, 0x00, 0x65, 0x6d, 0x61, 0x69, 0x6c,
    0x15, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x01, 0x00, 0x06, 0x00,
    0x08, 0x00, 0x04, 0x00, 0x05, 0x00, 0x00, 0x00, 0x70, 0x68, 0x6f, 0x6e,
    0x65, 0x4e, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x12,
    0x00, 0x00, 0x00, 0x50, 0x65, 0x72, 0x73, 0x6f, 0x6e, 0x2e, 0x50, 0x68,
    0x6f, 0x6e, 0x65, 0x4e, 0x75, 0x6d, 0x62, 0x65, 0x72, 0x2e, 0x00, 0x00,
    0x00, 0x14, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01,
    0x00, 0x02, 0x00, 0x06, 0x00, 0x00, 0x00, 0x6e, 0x75, 0x6d, 0x62, 0x65,
    0x72, 0x12, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01,
    0x00, 0x04, 0x00, 0x04, 0x00, 0x00, 0x00, 0x74, 0x79, 0x70, 0x65, 0x5b,
    0x00, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x04,
    0x00, 0x04, 0x00, 0x02, 0x00, 0x06, 0x00, 0x00, 0x00, 0x66, 0x6f, 0x6f,
    0x62, 0x61, 0x72, 0x11, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x06,
    0x00, 0x01, 0x00, 0x04, 0x00, 0x03, 0x00, 0x00, 0x00, 0x66, 0x6f, 0x6f,
    0x13, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x08, 0x00, 0x01, 0x00,
    0x01, 0x00, 0x04, 0x00, 0x03, 0x00, 0x00, 0x00, 0x62, 0x61, 0x72, 0x13,
    0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x0a, 0x00, 0x09, 0x00, 0x00,
    0x00, 0x62, 0x6c, 0x61, 0x63, 0x6b, 0x68, 0x6f, 0x6c, 0x65,
];

/// sprotoparser output for the `Person` / `Data` schema of
/// [`reference_bundle`].
pub const COMPILED_REFERENCE: &[u8] = &[
    0x01, 0x00, 0x00, 0x00, 0xf5, 0x00, 0x00, 0x00, 0x79, 0x00, 0x00, 0x00,
    0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x44, 0x61,
    0x74, 0x61, 0x67, 0x00, 0x00, 0x00, 0x17, 0x00, 0x00, 0x00, 0x05, 0x00,
    0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x02, 0x00, 0x04, 0x00, 0x07, 0x00,
    0x00, 0x00, 0x6e, 0x75, 0x6d, 0x62, 0x65, 0x72, 0x73, 0x15, 0x00, 0x00,
    0x00, 0x05, 0x00, 0x00, 0x00, 0x04, 0x00, 0x01, 0x00, 0x04, 0x00, 0x04,
    0x00, 0x05, 0x00, 0x00, 0x00, 0x62, 0x6f, 0x6f, 0x6c, 0x73, 0x14, 0x00,
    0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x06, 0x00,
    0x06, 0x00, 0x00, 0x00, 0x6e, 0x75, 0x6d, 0x62, 0x65, 0x72, 0x17, 0x00,
    0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x08, 0x00,
    0x09, 0x00, 0x00, 0x00, 0x62, 0x69, 0x67, 0x6e, 0x75, 0x6d, 0x62, 0x65,
    0x72, 0x74, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x06,
    0x00, 0x00, 0x00, 0x50, 0x65, 0x72, 0x73, 0x6f, 0x6e, 0x60, 0x00, 0x00,
    0x00, 0x12, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01,
    0x00, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x6e, 0x61, 0x6d, 0x65, 0x11,
    0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x04,
    0x00, 0x03, 0x00, 0x00, 0x00, 0x61, 0x67, 0x65, 0x15, 0x00, 0x00, 0x00,
    0x04, 0x00, 0x00, 0x00, 0x04, 0x00, 0x01, 0x00, 0x06, 0x00, 0x07, 0x00,
    0x00, 0x00, 0x6d, 0x61, 0x72, 0x69, 0x74, 0x61, 0x6c, 0x18, 0x00, 0x00,
    0x00, 0x05, 0x00, 0x00, 0x00, 0x01, 0x00, 0x04, 0x00, 0x08, 0x00, 0x04,
    0x00, 0x08, 0x00, 0x00, 0x00, 0x63, 0x68, 0x69, 0x6c, 0x64, 0x72, 0x65,
    0x6e,
];

/// An address book with a login protocol and a tag gap in `Person`.
pub fn address_book_bundle() -> Vec<u8> {
    SchemaBuilder::new()
        .add_type(
            TypeBuilder::new("AddressBook").array(0, "person", FieldType::of("Person")),
        )
        .add_type(
            TypeBuilder::new("Person")
                .field(0, "name", FieldType::String)
                .field(1, "id", FieldType::Integer)
                .field(2, "email", FieldType::String)
                .array(3, "phone", FieldType::of("PhoneNumber"))
                .field(7, "vip", FieldType::Boolean)
                .array(8, "tags", FieldType::String),
        )
        .add_type(
            TypeBuilder::new("PhoneNumber")
                .field(0, "number", FieldType::String)
                .field(1, "type", FieldType::Integer),
        )
        .add_type(TypeBuilder::new("Login").field(0, "user", FieldType::String))
        .add_type(TypeBuilder::new("LoginResult").field(0, "ok", FieldType::Boolean))
        .add_protocol("login", 1, Some("Login"), Some("LoginResult"))
        .add_protocol("logout", 2, Some("Login"), None)
        .add_protocol("heartbeat", 3, None, None)
        .build()
        .unwrap()
}

pub fn address_book() -> Sproto {
    Sproto::new(&address_book_bundle()).unwrap()
}
