// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test module for the engine crate.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod cascade_tests;
mod concurrency_tests;
mod helpers;
