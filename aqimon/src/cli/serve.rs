//! serve サブコマンド
//!
//! サンプリングループとHTTPサーバーを起動します。

use clap::{Args, Command, FromArgMatches};

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long, default_value = "8080", env = "AQIMON_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "AQIMON_HOST")]
    pub host: String,
}

impl ServeArgs {
    /// フラグなしで解決した引数（環境変数と既定値のみ）
    ///
    /// サブコマンド省略時に使う。`serve` と同じ定義から解決される。
    pub fn from_env() -> Result<Self, clap::Error> {
        let matches = Self::augment_args(Command::new("serve")).try_get_matches_from(["serve"])?;
        Self::from_arg_matches(&matches)
    }

    /// `host:port` 形式のバインドアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
