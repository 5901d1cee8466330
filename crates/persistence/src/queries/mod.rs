// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `reference` — profiles, ministries, roles, bands, memberships,
//!   celebrations and availabilities
//! - `schedules` — schedule runs, their assignments and the joined roster
//! - `members` — name search and each member's upcoming assignments

pub mod members;
pub mod reference;
pub mod schedules;
