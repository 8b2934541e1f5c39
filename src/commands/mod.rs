use crate::cli::Command;
use crate::context;
use crate::storage::SqliteStore;

mod count;
mod seed;
mod serve;

impl Command {
    pub async fn run(&self, ctx: &context::Context, store: SqliteStore) -> anyhow::Result<()> {
        match self {
            Command::Seed => seed::run(store),
            Command::Count { by, filter } => count::run(store, *by, &filter.to_filter()),
            Command::Serve { api_listen } => serve::run(ctx, store, *api_listen).await,
        }
    }
}
