// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use inklet::app_state::AppState;
use inklet::blog::{BlogRepo, schema};
use inklet::bootstrap::{self, BootstrapResult};
use inklet::site;
use log::{LevelFilter, info};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

struct ParsedArgs {
    runtime_root: PathBuf,
    show_help: bool,
}

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if parsed_args.show_help {
        print!("{}", help_text());
        return 0;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&parsed_args.runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    let result = System::new().block_on(run_server(bootstrap));
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

fn parse_args() -> Result<ParsedArgs, String> {
    let mut runtime_root = PathBuf::from(".");
    let mut show_help = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-C" => {
                let value = args
                    .next()
                    .ok_or_else(|| "-C requires a directory argument".to_string())?;
                runtime_root = PathBuf::from(value);
            }
            "-h" | "--help" => show_help = true,
            other => return Err(format!("Unknown argument '{}'", other)),
        }
    }

    Ok(ParsedArgs {
        runtime_root,
        show_help,
    })
}

fn help_text() -> String {
    [
        "Inklet - a small multi-user blogging engine",
        "",
        "Usage: inklet [-C <root>]",
        "",
        "  -C <root>    Runtime directory (default: current directory)",
        "  -h, --help   Show this help",
        "",
        "On first run a default config.yaml is written into the runtime",
        "directory; edit it and restart to change host, port or database.",
        "",
    ]
    .join("\n")
}

async fn run_server(bootstrap: BootstrapResult) -> std::io::Result<()> {
    let validated_config = Arc::new(bootstrap.validated_config);
    let runtime_paths = bootstrap.runtime_paths;

    let log_level = match validated_config.logging.level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };

    // Configure logging with a stable format
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .map_err(|error| {
            eprintln!("❌ Failed to initialize logger: {}", error);
            std::io::Error::other(error.to_string())
        })?;

    info!(
        "Starting {} v{}",
        validated_config.app.name,
        env!("CARGO_PKG_VERSION")
    );
    info!("Runtime root: {}", runtime_paths.root.display());
    info!("Database file: {}", runtime_paths.database_file.display());

    let pool = schema::connect(
        &runtime_paths.database_file,
        validated_config.database.max_connections,
    )
    .await
    .map_err(|error| {
        eprintln!("❌ Failed to open database: {}", error);
        std::io::Error::other(error.to_string())
    })?;

    schema::init_schema(&pool).await.map_err(|error| {
        eprintln!("❌ Failed to initialize database schema: {}", error);
        std::io::Error::other(error.to_string())
    })?;
    info!("✅ Database schema initialized successfully");

    let repo = BlogRepo::new(pool);
    let app_state = Arc::new(AppState::new(&validated_config.app.name));
    info!(
        "✅ App state initialized with app name: {}",
        validated_config.app.name
    );

    let (host, port) = validated_config.bind_addr();
    let workers = validated_config.server.workers as usize;
    let config_for_app = validated_config.clone();

    info!("Listening on http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(config_for_app.clone()))
            .app_data(web::Data::from(app_state.clone()))
            .app_data(web::Data::new(repo.clone()))
            .wrap(Logger::default())
            .configure(site::configure)
            .default_service(web::route().to(site::default_not_found))
    })
    .workers(workers)
    .bind((host.as_str(), port))?
    .run()
    .await
}
