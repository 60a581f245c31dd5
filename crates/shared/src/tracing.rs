use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// トレーシングサブスクライバーを初期化
/// TUIが端末を占有するため、ログは標準出力ではなくファイルへ書き出す
pub fn init_tracing(log_file: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .with(EnvFilter::from_default_env())
        .try_init()?;

    Ok(())
}
