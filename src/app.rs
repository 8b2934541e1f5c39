use crate::{cli, context, storage};
use anyhow::{Context as AnyhowContext, Result};
use std::path::Path;

fn log_startup_info(ctx: &context::Context) {
    log::info!("🚀 Starting groupcount");
    log::info!("📂 Data dir: {}", ctx.data_dir.to_string_lossy());
    if ctx.reset {
        log::info!("🧹 Reset requested");
    }
}

fn init_storage(data_dir: &Path, reset: bool) -> Result<storage::SqliteStore> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.to_string_lossy()))?;
    let db_path = data_dir.join(context::DB_FILE_NAME);

    let sqlite = storage::SqliteStore::new(&db_path);
    if reset {
        sqlite.reset_all().context("resetting storage")?;
    }
    sqlite.init().context("initializing storage")?;

    Ok(sqlite)
}

pub async fn run() -> Result<()> {
    let cli = cli::parse();

    crate::logging::set_log_file(cli.log_file.as_deref().map(Path::new));

    let ctx = context::Context::from_cli(&cli);
    log_startup_info(&ctx);

    let store = init_storage(&ctx.data_dir, ctx.reset)?;
    log::debug!("🗄️ SQLite store at {}", ctx.db_path().to_string_lossy());

    cli.cmd.run(&ctx, store).await
}
