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

use sproto::{Struct, Value};
use tests::reference;

fn person(name: &str, age: i64) -> Value {
    Value::from_fields([("name", Value::from(name)), ("age", Value::from(age))])
}

#[test]
fn test_inline_fields() {
    let sproto = reference();
    let mut alice = person("Alice", 13).into_struct().unwrap();
    alice.insert("marital".into(), Value::from(false));
    let bytes = sproto.encode_by_name("Person", &alice).unwrap();
    assert_eq!(
        bytes,
        [
            0x03, 0x00, 0x00, 0x00, 0x1c, 0x00, 0x02, 0x00, 0x05, 0x00, 0x00, 0x00, 0x41, 0x6c,
            0x69, 0x63, 0x65,
        ]
    );
    let (decoded, consumed) = sproto.decode_by_name("Person", &bytes).unwrap();
    assert_eq!(consumed, bytes.len());
    assert_eq!(decoded, alice);
}

#[test]
fn test_nested_array_with_skip_slot() {
    let sproto = reference();
    let mut bob = person("Bob", 40).into_struct().unwrap();
    bob.insert(
        "children".into(),
        Value::from(vec![person("Alice", 13), person("Carol", 5)]),
    );
    let bytes = sproto.encode_by_name("Person", &bob).unwrap();
    let expected: Vec<u8> = vec![
        0x04, 0x00, 0x00, 0x00, 0x52, 0x00, 0x01, 0x00, 0x00, 0x00, // header
        0x03, 0x00, 0x00, 0x00, 0x42, 0x6f, 0x62, // "Bob"
        0x26, 0x00, 0x00, 0x00, // children
        0x0f, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x1c, 0x00, 0x05, 0x00, 0x00, 0x00,
        0x41, 0x6c, 0x69, 0x63, 0x65, // Alice
        0x0f, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x0c, 0x00, 0x05, 0x00, 0x00, 0x00,
        0x43, 0x61, 0x72, 0x6f, 0x6c, // Carol
    ];
    assert_eq!(bytes, expected);
    assert_eq!(sproto.decode_by_name("Person", &bytes).unwrap().0, bob);
}

#[test]
fn test_integer_array() {
    let sproto = reference();
    let data = Struct::from([(
        "numbers".to_string(),
        Value::from((1i64..=5).map(Value::from).collect::<Vec<_>>()),
    )]);
    let bytes = sproto.encode_by_name("Data", &data).unwrap();
    let mut expected = vec![0x01, 0x00, 0x00, 0x00, 0x15, 0x00, 0x00, 0x00, 0x04];
    for i in 1u8..=5 {
        expected.extend_from_slice(&[i, 0, 0, 0]);
    }
    assert_eq!(bytes, expected);
    assert_eq!(sproto.decode_by_name("Data", &bytes).unwrap().0, data);
}

#[test]
fn test_wide_integer_array() {
    let sproto = reference();
    let numbers: Vec<Value> = (1..=3).map(|i| Value::from((1i64 << 32) + i)).collect();
    let data = Struct::from([("numbers".to_string(), Value::from(numbers))]);
    let bytes = sproto.encode_by_name("Data", &data).unwrap();
    let mut expected = vec![0x01, 0x00, 0x00, 0x00, 0x19, 0x00, 0x00, 0x00, 0x08];
    for i in 1u8..=3 {
        expected.extend_from_slice(&[i, 0, 0, 0, 1, 0, 0, 0]);
    }
    assert_eq!(bytes, expected);
    assert_eq!(sproto.decode_by_name("Data", &bytes).unwrap().0, data);
}

#[test]
fn test_mixed_width_array_widens_every_element() {
    let sproto = reference();
    let numbers = vec![Value::from(-1), Value::from(i64::MAX)];
    let data = Struct::from([("numbers".to_string(), Value::from(numbers))]);
    let bytes = sproto.encode_by_name("Data", &data).unwrap();
    assert_eq!(bytes[8], 0x08);
    assert_eq!(bytes.len(), 2 + 2 + 4 + 1 + 16);
    assert_eq!(sproto.decode_by_name("Data", &bytes).unwrap().0, data);
}

#[test]
fn test_boolean_array() {
    let sproto = reference();
    let bools = vec![Value::from(false), Value::from(true), Value::from(false)];
    let data = Struct::from([("bools".to_string(), Value::from(bools))]);
    let bytes = sproto.encode_by_name("Data", &data).unwrap();
    assert_eq!(
        bytes,
        [0x02, 0x00, 0x01, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00]
    );
    assert_eq!(sproto.decode_by_name("Data", &bytes).unwrap().0, data);
}

#[test]
fn test_large_integers_go_to_data_part() {
    let sproto = reference();
    let data = Struct::from([
        ("number".to_string(), Value::from(100000)),
        ("bignumber".to_string(), Value::from(-10000000000i64)),
    ]);
    let bytes = sproto.encode_by_name("Data", &data).unwrap();
    assert_eq!(
        bytes,
        [
            0x03, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, // header
            0x04, 0x00, 0x00, 0x00, 0xa0, 0x86, 0x01, 0x00, // number
            0x08, 0x00, 0x00, 0x00, 0x00, 0x1c, 0xf4, 0xab, 0xfd, 0xff, 0xff, 0xff, // bignumber
        ]
    );
    assert_eq!(sproto.decode_by_name("Data", &bytes).unwrap().0, data);
}

#[test]
fn test_inline_limit() {
    let sproto = reference();
    for (value, inline) in [(0x7ffe, true), (0x7fff, false), (-1, false)] {
        let data = Struct::from([("number".to_string(), Value::from(value))]);
        let bytes = sproto.encode_by_name("Data", &data).unwrap();
        // one skip slot plus the field slot
        let slot = u16::from_le_bytes([bytes[4], bytes[5]]);
        assert_eq!(slot != 0, inline, "value {value}");
        assert_eq!(sproto.decode_by_name("Data", &bytes).unwrap().0, data);
    }
}

#[test]
fn test_empty_string_has_zero_length() {
    let sproto = reference();
    let value = Struct::from([("name".to_string(), Value::from(""))]);
    let bytes = sproto.encode_by_name("Person", &value).unwrap();
    assert_eq!(bytes, [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    let (decoded, _) = sproto.decode_by_name("Person", &bytes).unwrap();
    assert_eq!(decoded.get("name"), Some(&Value::Bytes(Vec::new())));
}

#[test]
fn test_decode_ignores_trailing_bytes() {
    let sproto = reference();
    let value = person("Alice", 13).into_struct().unwrap();
    let mut bytes = sproto.encode_by_name("Person", &value).unwrap();
    let len = bytes.len();
    bytes.extend_from_slice(&[0; 7]);
    let (decoded, consumed) = sproto.decode_by_name("Person", &bytes).unwrap();
    assert_eq!(consumed, len);
    assert_eq!(decoded, value);
}
