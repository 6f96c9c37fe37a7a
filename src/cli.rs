use crate::report::review::DEFAULT_USERNAME;
use crate::unlink::ExecutionMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gwas-trait")]
#[command(about = "GWAS Catalog 形質ラベルの類似照合・メンテナンスツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力（--log-level debug と同じ）
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ログレベル (trace/debug/info/warn/error)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 候補ラベルを参照語彙と照合してCSVを出力
    Match {
        /// 参照語彙CSV（ID,TRAIT）
        #[arg(long, required = true)]
        vocabulary: PathBuf,

        /// 候補ファイル（1行1件、空行は無視）
        #[arg(short, long, conflicts_with = "interactive", required_unless_present = "interactive")]
        candidates: Option<PathBuf>,

        /// 候補を対話式で入力
        #[arg(short, long)]
        interactive: bool,

        /// 類似度の閾値（0.0-1.0、必須）
        #[arg(short, long, required = true, allow_negative_numbers = true)]
        threshold: f64,

        /// 出力CSV（ファイルまたはディレクトリ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 結果列の区切り文字（省略時は設定ファイルの値）
        #[arg(long)]
        separator: Option<String>,

        /// 進捗バーを表示しない
        #[arg(long)]
        no_progress: bool,
    },

    /// 参照語彙のラベル一覧をソートしてCSVに出力
    ExportTraits {
        /// 参照語彙CSV（ID,TRAIT）
        #[arg(long, required = true)]
        vocabulary: PathBuf,

        /// 出力CSV（省略時は reported_trait.csv）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 研究からバックグラウンド形質のリンクを削除
    Unlink {
        /// リンク表CSV（STUDY_ID,EFO_TRAIT_ID）
        #[arg(long, required = true)]
        links: PathBuf,

        /// 研究一覧CSV（ID,ACCESSION_ID）
        #[arg(long, required = true)]
        studies: PathBuf,

        /// EFO形質CSV（ID,TRAIT）
        #[arg(long, required = true)]
        efo: PathBuf,

        /// バックグラウンド形質TSV
        #[arg(long, required = true)]
        background: PathBuf,

        /// 実行モード (dry-run/commit)
        #[arg(long, default_value = "dry-run")]
        mode: ExecutionMode,

        /// コミット時の確認を省略
        #[arg(short, long)]
        yes: bool,
    },

    /// 未公開研究のキュー一覧 data_queue_YYYY-MM-DD.csv を出力
    CurationQueue {
        /// テーブルダンプのディレクトリ（study.csv など）
        #[arg(long, required = true)]
        tables: PathBuf,

        /// 出力CSV（ファイルまたはディレクトリ）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// PubMed IDの研究をレビューシートに出力
    Review {
        /// テーブルダンプのディレクトリ（study.csv など）
        #[arg(long, required = true)]
        tables: PathBuf,

        /// PubMed ID
        #[arg(long, required = true)]
        pmid: String,

        /// ファイル名に入れるユーザー名
        #[arg(long, default_value = DEFAULT_USERNAME)]
        username: String,

        /// 出力CSV（ファイルまたはディレクトリ）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 結果列の区切り文字を設定
        #[arg(long)]
        set_separator: Option<String>,

        /// 出力先ディレクトリを設定
        #[arg(long)]
        set_output_dir: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

impl Cli {
    /// ログレベル（--verbose 優先）
    pub fn tracing_level(&self) -> tracing::Level {
        if self.verbose {
            return tracing::Level::DEBUG;
        }
        match self.log_level.to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::WARN,
        }
    }
}
