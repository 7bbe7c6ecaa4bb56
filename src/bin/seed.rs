// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

// Populates a runtime root with demo data: two users, two posts, two tags.

use actix_web::rt::System;
use inklet::blog::{BlogError, BlogRepo, schema};
use inklet::bootstrap;
use std::collections::BTreeSet;
use std::path::PathBuf;

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let runtime_root = match parse_args() {
        Ok(root) => root,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Usage: seed [-C <root>]");
            return 1;
        }
    };

    let bootstrap = match bootstrap::bootstrap_runtime(&runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            return 1;
        }
    };

    let database_file = bootstrap.runtime_paths.database_file.clone();
    let result = System::new().block_on(async move {
        let pool = schema::connect(&database_file, 2).await?;
        schema::init_schema(&pool).await?;
        seed_demo_data(&BlogRepo::new(pool)).await
    });

    match result {
        Ok(()) => {
            eprintln!("[seed] demo data created");
            0
        }
        Err(error) => {
            eprintln!("❌ Seeding failed: {}", error);
            1
        }
    }
}

fn parse_args() -> Result<PathBuf, String> {
    let mut runtime_root = PathBuf::from(".");

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-C" => {
                let value = args
                    .next()
                    .ok_or_else(|| "-C requires a directory argument".to_string())?;
                runtime_root = PathBuf::from(value);
            }
            other => return Err(format!("Unknown argument '{}'", other)),
        }
    }

    Ok(runtime_root)
}

async fn seed_demo_data(repo: &BlogRepo) -> Result<(), BlogError> {
    let chantal = repo.create_user("Chantal", "Yuen", None).await?;
    let joanne = repo.create_user("Joanne", "Wu", None).await?;
    eprintln!("[seed] users: {}, {}", chantal.id, joanne.id);

    let cat = repo.create_tag("Cat").await?;
    let dog = repo.create_tag("Dog").await?;
    eprintln!("[seed] tags: {}, {}", cat.name, dog.name);

    let first = repo
        .create_post(chantal.id, "Cat Post!", "Hello Cat", &tag_set(&[cat.id]))
        .await?;
    let second = repo
        .create_post(chantal.id, "Dog Post!", "Hello Dog", &tag_set(&[dog.id]))
        .await?;
    eprintln!("[seed] posts: {}, {}", first.id, second.id);

    Ok(())
}

fn tag_set(ids: &[i64]) -> BTreeSet<i64> {
    ids.iter().copied().collect()
}
