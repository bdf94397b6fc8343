// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side queries.
//!
//! All queries use Diesel DSL. Rows are converted into domain records
//! here so callers never see JSON columns or integer flags.

pub mod catalog;
pub mod operation_log;
pub mod operators;
