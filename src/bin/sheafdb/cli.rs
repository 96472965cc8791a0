use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Минимальный CLI для SheafDB
#[derive(Parser, Debug)]
#[command(name = "sheafdb", version, about = "SheafDB document store CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Insert a document (value as string, hex:, @file, - for stdin)
    ///
    /// Печатает id нового документа (смещение его слота в файле).
    Insert {
        #[arg(long)]
        path: PathBuf,
        /// Literal value (also `hex:..`, `@file`, `-` for stdin); --value-file wins if both given
        #[arg(long)]
        value: Option<String>,
        /// Take value bytes from this file
        #[arg(long)]
        value_file: Option<PathBuf>,
    },
    /// Get a document by id
    ///
    /// Отдаются все room байт слота (контент + заполнитель).
    Get {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        id: u64,
        /// Optional file to write the raw payload into
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Update a document by id (prints the new id)
    ///
    /// Контент в пределах room слота остаётся на месте (id не меняется),
    /// больший контент переезжает в новый слот.
    Update {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        id: u64,
        /// Literal value (also `hex:..`, `@file`, `-` for stdin); --value-file wins if both given
        #[arg(long)]
        value: Option<String>,
        /// Take value bytes from this file
        #[arg(long)]
        value_file: Option<PathBuf>,
    },
    /// Delete a document by id (idempotent)
    Del {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        id: u64,
    },
    /// Scan all live documents in offset order. --json prints JSONL.
    Scan {
        #[arg(long)]
        path: PathBuf,
        /// Stop after N documents (early-exit)
        #[arg(long)]
        limit: Option<u64>,
        /// JSON output (one object per line)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Integrity check: full scan with corruption counters (use --json for JSON)
    ///
    /// Пример:
    ///   sheafdb check --path ./docs.sheaf
    ///   sheafdb check --path ./docs.sheaf --json
    Check {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print file/metrics summary
    Status {
        #[arg(long)]
        path: PathBuf,
        /// JSON output (single object)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Rebuild into a fresh file: live documents only, offsets not preserved
    ///
    /// Примечания:
    /// - Исходный файл не меняется.
    /// - Целевой путь обязан быть свободен.
    /// - Внешние индексы по старым id надо перестроить.
    Rebuild {
        #[arg(long)]
        path: PathBuf,
        /// Target file for the rebuilt store
        #[arg(long)]
        to: PathBuf,
        /// JSON output
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Cli as Parser>::parse()
    }
}
