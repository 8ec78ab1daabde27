use anyhow::Context;
use clap::Parser;
use ppi_filter::{cli, config, engine, pipeline, scanner, tagger};
use cli::{Cli, Commands};
use config::Config;
use engine::Engine;
use pipeline::FilterOptions;
use serde_json::json;
use tagger::MecabCommandTagger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("設定ファイルを読み込めません: {}", config_path.display()))?;

    match cli.command {
        Commands::Filter {
            input_dir,
            output_dir,
            n_workers,
            filter_key,
            skip_rejected,
            dump_reason,
            add_ppi_info,
            mode,
        } => {
            println!("🔍 ppi-filter - 要配慮個人情報フィルタ\n");

            if let Some(mode) = mode {
                config.decision_mode = mode;
            }

            // 1. 入力ファイル
            println!("[1/3] 入力ファイルをスキャン中...");
            let files = scanner::scan_folder(&input_dir)?;
            println!("✔ {}件のファイルを検出\n", files.len());

            // 2. リソース読み込み
            println!("[2/3] 辞書・モデルを読み込み中...");
            let engine = Engine::load(&config).context("リソースの読み込みに失敗しました")?;
            let tagger = MecabCommandTagger::from_config(&config);
            let version = tagger.probe()?;
            println!(
                "✔ 読み込み完了（キーワード {}件, {}, モード: {}）\n",
                engine.keywords().len(),
                version,
                engine.mode().as_str()
            );

            // 3. フィルタ
            println!("[3/3] フィルタ中...（ワーカー数: {}）", n_workers);
            let options = FilterOptions {
                filter_key,
                skip_rejected,
                dump_reason,
                add_ppi_info,
                n_workers,
            };
            let stats = pipeline::run_filter(
                &files,
                &output_dir,
                &engine,
                || tagger.clone(),
                &options,
                !cli.verbose,
            )?;

            let total = pipeline::summarize(&stats);
            println!(
                "✔ {}件中 {}件を除外（{:.2}%）、不正行 {}件",
                total.total,
                total.rejected,
                total.reject_rate(),
                total.invalid
            );
            println!("\n✅ 完了: {}", output_dir.display());
        }

        Commands::Detect { text, mode } => {
            if let Some(mode) = mode {
                config.decision_mode = mode;
            }

            let engine = Engine::load(&config).context("リソースの読み込みに失敗しました")?;
            let detector = engine.detector()?;
            let mut tagger = MecabCommandTagger::from_config(&config);

            let result = detector.detect(&text, &mut tagger)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Features { text, with_names } => {
            let engine = Engine::load(&config).context("リソースの読み込みに失敗しました")?;
            let detector = engine.detector()?;
            let mut tagger = MecabCommandTagger::from_config(&config);

            let vector = detector.features(&text, &mut tagger);
            if with_names {
                let rows: Vec<_> = detector
                    .assembler()
                    .schema()
                    .feature_names()
                    .into_iter()
                    .zip(vector.as_slice())
                    .map(|(name, value)| json!({ "name": name, "value": value }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{}", serde_json::to_string(&vector)?);
            }
        }

        Commands::Config {
            show,
            init,
            set_keyword_files,
            set_name_dict,
            set_model,
            set_mecab,
            set_user_dics,
            set_mode,
        } => {
            if init {
                config = Config::default_config();
            }

            let mut changed = init;
            if let Some(files) = set_keyword_files {
                config.keyword_files = files;
                changed = true;
            }
            if let Some(path) = set_name_dict {
                config.name_dict_path = path;
                changed = true;
            }
            if let Some(path) = set_model {
                config.model_path = path;
                changed = true;
            }
            if let Some(command) = set_mecab {
                config.mecab_command = command;
                changed = true;
            }
            if let Some(dics) = set_user_dics {
                config.mecab_user_dics = dics;
                changed = true;
            }
            if let Some(mode) = set_mode {
                config.decision_mode = mode;
                changed = true;
            }

            if changed {
                config.save_to(&config_path)?;
                println!("✔ 設定を保存しました: {}", config_path.display());
            }

            if show || !changed {
                println!("設定: {}", config_path.display());
                println!("  キーワードリスト:");
                for path in &config.keyword_files {
                    println!("    - {}", path.display());
                }
                println!("  人名リソース: {}", config.name_dict_path.display());
                println!("  分類器モデル: {}", config.model_path.display());
                println!("  mecab: {}", config.mecab_command);
                for path in &config.mecab_user_dics {
                    println!("    -u {}", path.display());
                }
                println!("  判定モード: {}", config.decision_mode.as_str());
            }
        }
    }

    Ok(())
}

/// ログ初期化（RUST_LOG 優先、既定は info、--verbose で debug）
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}
