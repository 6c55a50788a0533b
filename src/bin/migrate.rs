//! 按顺序执行建表与变更脚本。
//!
//! 用法：`migrate [file.sql ...]`，不传参数时执行内置的全部脚本。

use inkwell::storage::{MIGRATIONS, init_db_from_env, migrate};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    inkwell::init_tracing();

    let files: Vec<String> = std::env::args().skip(1).collect();
    let files: Vec<&str> = if files.is_empty() {
        MIGRATIONS.to_vec()
    } else {
        files.iter().map(String::as_str).collect()
    };

    let db = init_db_from_env().await;

    for file in files {
        if let Err(e) = migrate(&db, file).await {
            tracing::error!(%e, file, "migration failed");
            std::process::exit(1);
        }
        tracing::info!(file, "migration applied");
    }
}
