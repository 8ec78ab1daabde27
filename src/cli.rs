use clap::{Parser, Subcommand};
use ppi_filter_common::DecisionMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ppi-filter")]
#[command(about = "要配慮個人情報（PPI）検出フィルタ", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（省略時: ~/.config/ppi-filter/config.json）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// フォルダ内のJSONLを一括フィルタ
    Filter {
        /// 入力フォルダ
        #[arg(long, required = true)]
        input_dir: PathBuf,

        /// 出力フォルダ
        #[arg(long, default_value = "./tmp_output")]
        output_dir: PathBuf,

        /// ワーカー数
        #[arg(short, long, default_value = "1")]
        n_workers: usize,

        /// 判定対象のキー
        #[arg(long, default_value = "text")]
        filter_key: String,

        /// 除外した文書を出力しない
        #[arg(long)]
        skip_rejected: bool,

        /// filter_is_rejected / filter_reason を出力に付与
        #[arg(long)]
        dump_reason: bool,

        /// 検出した人名・カテゴリ・分類器判定を出力に付与
        #[arg(long)]
        add_ppi_info: bool,

        /// 判定モード（rule_and_classifier/rule_only/classifier_only）
        #[arg(long)]
        mode: Option<DecisionMode>,
    },

    /// 1件のテキストを判定してJSONを出力
    Detect {
        /// 判定するテキスト
        #[arg(required = true)]
        text: String,

        /// 判定モード（rule_and_classifier/rule_only/classifier_only）
        #[arg(long)]
        mode: Option<DecisionMode>,
    },

    /// 1件のテキストの特徴量ベクトルを出力
    Features {
        /// 対象テキスト
        #[arg(required = true)]
        text: String,

        /// 列名も出力
        #[arg(long)]
        with_names: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定値で設定ファイルを作成
        #[arg(long)]
        init: bool,

        /// キーワードリストを設定（複数指定可、指定順が特徴量の並び）
        #[arg(long, num_args = 1..)]
        set_keyword_files: Option<Vec<PathBuf>>,

        /// 人名リソースを設定
        #[arg(long)]
        set_name_dict: Option<PathBuf>,

        /// 分類器モデルを設定
        #[arg(long)]
        set_model: Option<PathBuf>,

        /// mecabコマンドを設定
        #[arg(long)]
        set_mecab: Option<String>,

        /// mecabユーザ辞書を設定（複数指定可）
        #[arg(long, num_args = 1..)]
        set_user_dics: Option<Vec<PathBuf>>,

        /// 既定の判定モードを設定
        #[arg(long)]
        set_mode: Option<DecisionMode>,
    },
}
