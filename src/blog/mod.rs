// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod repo;
pub mod schema;
pub mod types;

pub use repo::BlogRepo;
pub use types::{BlogError, DEFAULT_IMAGE_URL, Post, PostTag, Tag, User};
