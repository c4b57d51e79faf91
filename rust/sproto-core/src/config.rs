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

use crate::types::DEFAULT_BUFFER_CAPACITY;

/// Configuration for marshalling sessions.
///
/// Held by [`crate::sproto::Sproto`] and consulted at the start of every
/// encode/decode call.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the buffer a fresh encode session starts with.
    pub initial_capacity: usize,
    /// Maximum struct nesting accepted while decoding.
    pub max_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_capacity: DEFAULT_BUFFER_CAPACITY,
            max_depth: 64,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    #[inline(always)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
