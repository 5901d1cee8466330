// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutations.
//!
//! - `reference` — inserts for reference entities and availability upserts
//! - `schedules` — transactional roster persistence, publishing, locking
//!   and run deletion

pub mod reference;
pub mod schedules;
