use boardcheck_common::{HistoryFilter, Language};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "boardcheck")]
#[command(about = "PCB欠陥検出サービスのクライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 表示言語 (en/ar)。未指定なら保存済みの設定
    #[arg(long, global = true)]
    pub lang: Option<Language>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を送信して欠陥を検出
    Detect {
        /// PCB画像 (JPG/PNG/BMP, 10MBまで)
        #[arg(required = true)]
        image: PathBuf,

        /// 結果を履歴に保存
        #[arg(short, long)]
        save: bool,

        /// 失敗時に再試行を確認しない
        #[arg(long)]
        no_retry: bool,
    },

    /// サーバーの稼働確認
    Health,

    /// 保存済みの解析履歴
    History {
        /// 絞り込み (all/defects/clean)
        #[arg(short, long, default_value = "all")]
        filter: HistoryFilter,

        /// 指定IDの結果を表示
        #[arg(long, conflicts_with_all = ["delete", "clear"])]
        show: Option<String>,

        /// 指定IDを削除
        #[arg(long, conflicts_with = "clear")]
        delete: Option<String>,

        /// すべて削除
        #[arg(long)]
        clear: bool,

        /// 確認なしで削除
        #[arg(short, long)]
        yes: bool,
    },

    /// サーバー側の解析履歴（対応サーバーのみ）
    RemoteHistory {
        #[arg(short, long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "20")]
        per_page: u32,
    },

    /// サーバー側の統計（対応サーバーのみ）
    Statistics,

    /// サーバー側の解析詳細（対応サーバーのみ）
    Detection {
        #[arg(required = true)]
        id: u64,
    },

    /// 設定
    Config {
        /// サーバーのベースURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 表示言語を保存 (en/ar)
        #[arg(long)]
        set_language: Option<Language>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
