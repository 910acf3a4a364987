// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates connection setup, migration execution and
//! `PRAGMA` configuration, none of which Diesel's DSL expresses. Snapshot
//! reads and writes live in `sqlite_store` and use the DSL only.

pub mod sqlite;
