use anyhow::Result;
use env_logger::{Builder, Env};

mod cli;
mod util;
mod cmd_insert;
mod cmd_get;
mod cmd_update;
mod cmd_del;
mod cmd_scan;
mod cmd_check;
mod cmd_status;
mod cmd_rebuild;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info.
    // Пример: RUST_LOG=debug ./sheafdb ...
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Insert { path, value, value_file } =>
            cmd_insert::exec(path, value, value_file),

        cli::Cmd::Get { path, id, out } =>
            cmd_get::exec(path, id, out),

        cli::Cmd::Update { path, id, value, value_file } =>
            cmd_update::exec(path, id, value, value_file),

        cli::Cmd::Del { path, id } =>
            cmd_del::exec(path, id),

        cli::Cmd::Scan { path, limit, json } =>
            cmd_scan::exec(path, limit, json),

        cli::Cmd::Check { path, json } =>
            cmd_check::exec(path, json),

        cli::Cmd::Status { path, json } =>
            cmd_status::exec(path, json),

        cli::Cmd::Rebuild { path, to, json } =>
            cmd_rebuild::exec(path, to, json),
    }
}
