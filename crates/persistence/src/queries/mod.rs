// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `students`: students, their achievements and the filter lists
//! - `admins`: admin accounts and sessions

pub mod admins;
pub mod students;
