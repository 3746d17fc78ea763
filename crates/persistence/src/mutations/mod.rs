// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `students`: student create/update/delete, each in one `IMMEDIATE` transaction
//! - `achievements`: achievement rows and applying a reconciliation plan
//! - `admins`: admin accounts and sessions

pub mod achievements;
pub mod admins;
pub mod students;
