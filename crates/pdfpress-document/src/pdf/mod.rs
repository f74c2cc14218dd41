// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — assembling the output document and inspecting input pages.

pub mod assembler;
pub mod inspect;

pub use assembler::{PageAssembler, PageLayout, SealedDocument};
pub use inspect::{LopdfInspector, PageInfo, PageInspector};
