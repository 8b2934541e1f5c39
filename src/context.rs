use std::path::PathBuf;

pub const DB_FILE_NAME: &str = "groupcount.sqlite";

/// Settings resolved from the command line and the environment.
#[derive(Clone, Debug)]
pub struct Context {
    pub data_dir: PathBuf,
    pub reset: bool,
    pub log_file: Option<PathBuf>,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            data_dir: PathBuf::from(&cli.data_dir),
            reset: cli.reset,
            log_file: cli.log_file.as_ref().map(PathBuf::from),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn resolves_paths_from_cli() {
        let cli = crate::cli::Cli::try_parse_from([
            "groupcount",
            "--data-dir",
            "/var/lib/gc",
            "--log-file",
            "/var/log/gc.log",
            "--reset",
            "seed",
        ])
        .unwrap();

        let ctx = Context::from_cli(&cli);
        assert!(ctx.reset);
        assert_eq!(ctx.db_path(), PathBuf::from("/var/lib/gc/groupcount.sqlite"));
        assert_eq!(ctx.log_file, Some(PathBuf::from("/var/log/gc.log")));
    }
}
