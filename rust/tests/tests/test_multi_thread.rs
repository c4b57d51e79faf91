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
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use tests::address_book;

#[test]
fn test_shared_handle_across_threads() {
    let sproto = Arc::new(address_book());
    let src: HashSet<i64> = [41, 42, 43, 45, 46, 47, 1 << 40].into_iter().collect();
    // encode
    let mut handles = vec![];
    for id in &src {
        let sproto = Arc::clone(&sproto);
        let id = *id;
        let handle = thread::spawn(move || {
            let person = Struct::from([
                ("id".to_string(), Value::from(id)),
                ("name".to_string(), Value::from(format!("person {id}"))),
            ]);
            sproto.pack(&sproto.encode_by_name("Person", &person).unwrap())
        });
        handles.push(handle);
    }
    let packed: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    // decode
    let mut handles = vec![];
    for bytes in packed {
        let sproto = Arc::clone(&sproto);
        let handle = thread::spawn(move || {
            let unpacked = sproto.unpack(&bytes).unwrap();
            let (person, _) = sproto.decode_by_name("Person", &unpacked).unwrap();
            let id = person["id"].as_integer().unwrap();
            assert_eq!(person["name"], Value::from(format!("person {id}")));
            id
        });
        handles.push(handle);
    }
    let dest: HashSet<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(dest, src);
}
