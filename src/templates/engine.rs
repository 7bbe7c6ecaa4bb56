// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use minijinja::{Environment, Value, default_auto_escape_callback};

pub trait TemplateEngine: Send + Sync {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error>;
}

pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        env.set_loader(embedded_template_loader);
        Self { env }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template_name)?;
        tmpl.render(context)
    }
}

/// Template loader for minijinja that loads from embedded sources
fn embedded_template_loader(name: &str) -> Result<Option<String>, minijinja::Error> {
    let template_content = match name {
        "base.html" => Some(include_str!("../site/templates/base.html")),

        // User pages
        "users_index.html" => Some(include_str!("../site/templates/users_index.html")),
        "user_new.html" => Some(include_str!("../site/templates/user_new.html")),
        "user_show.html" => Some(include_str!("../site/templates/user_show.html")),
        "user_edit.html" => Some(include_str!("../site/templates/user_edit.html")),

        // Post pages
        "post_new.html" => Some(include_str!("../site/templates/post_new.html")),
        "post_show.html" => Some(include_str!("../site/templates/post_show.html")),
        "post_edit.html" => Some(include_str!("../site/templates/post_edit.html")),

        // Tag pages
        "tags_index.html" => Some(include_str!("../site/templates/tags_index.html")),
        "tag_new.html" => Some(include_str!("../site/templates/tag_new.html")),
        "tag_show.html" => Some(include_str!("../site/templates/tag_show.html")),
        "tag_edit.html" => Some(include_str!("../site/templates/tag_edit.html")),

        // Error pages
        "error_404.html" => Some(include_str!("../site/templates/error_404.html")),
        "error_500.html" => Some(include_str!("../site/templates/error_500.html")),

        _ => None,
    };

    Ok(template_content.map(|content| content.to_string()))
}
