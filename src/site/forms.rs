// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug)]
pub struct FormError {
    message: String,
}

impl FormError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FormError {}

/// Decoded application/x-www-form-urlencoded body. Keeps every pair, so
/// repeated keys (the tag checkboxes) stay addressable.
#[derive(Debug, Default)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        let text = std::str::from_utf8(body)
            .map_err(|_| FormError::new("Form body is not valid UTF-8"))?;
        let mut pairs = Vec::new();
        for piece in text.split('&') {
            if piece.is_empty() {
                continue;
            }
            let (raw_key, raw_value) = piece.split_once('=').unwrap_or((piece, ""));
            pairs.push((decode_component(raw_key)?, decode_component(raw_value)?));
        }
        Ok(Self { pairs })
    }

    /// First value for the key, or the empty string when absent.
    pub fn value(&self, key: &str) -> &str {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn values(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// All values for the key parsed as ids. Duplicates collapse; a
    /// non-numeric value is a malformed submission.
    pub fn id_set(&self, key: &str) -> Result<BTreeSet<i64>, FormError> {
        let mut ids = BTreeSet::new();
        for value in self.values(key) {
            let id = value
                .parse::<i64>()
                .map_err(|_| FormError::new(format!("Invalid id value '{}' for '{}'", value, key)))?;
            ids.insert(id);
        }
        Ok(ids)
    }
}

fn decode_component(raw: &str) -> Result<String, FormError> {
    let unplussed = raw.replace('+', " ");
    urlencoding::decode(&unplussed)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| FormError::new("Form field is not valid percent-encoded UTF-8"))
}
