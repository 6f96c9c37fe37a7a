use clap::Parser;
use dialoguer::Confirm;
use gwas_trait_common::MatchThreshold;
use gwas_trait_tools::{cli, config, export, matcher, report, source, unlink};
use cli::{Cli, Commands};
use config::Config;
use source::VocabularySource;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.tracing_level())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load()?;

    match cli.command {
        Commands::Match { vocabulary, candidates, interactive, threshold, output, separator, no_progress } => {
            println!("🔎 gwas-trait - 形質ラベル照合\n");

            // 閾値は読み込み前に検証
            let threshold = MatchThreshold::new(threshold)?;

            println!("[1/3] 参照語彙を読み込み中...");
            let labels = source::CsvVocabulary::new(&vocabulary).load_vocabulary()?;
            println!("✔ {}件の形質ラベル\n", labels.len());

            let candidates = match candidates {
                Some(path) => source::read_candidates(&path)?,
                None if interactive => source::prompt_candidates()?,
                None => anyhow::bail!("--candidates か --interactive を指定してください"),
            };
            println!("- 候補: {}件", candidates.len());

            println!("[2/3] 照合中... (閾値: {})", threshold);
            let options = matcher::MatchOptions {
                show_progress: config.show_progress && !no_progress,
                cancel: None,
            };
            let report = matcher::match_parallel(&labels, &candidates, threshold.value(), &options)?;
            println!("✔ {}件中{}件に一致あり\n", report.len(), report.matched_count());

            println!("[3/3] 結果を保存中...");
            let default_name = export::dated_file_name_today("trait_matches", "csv");
            let output_path = match output {
                Some(path) => export::output_path_for(&path, &default_name),
                None => config.resolve_output(&default_name),
            };
            let separator = separator.unwrap_or_else(|| config.separator.clone());
            export::write_match_file(&report, &output_path, &separator)?;
            println!("✔ 結果を保存: {}", output_path.display());

            println!("\n✅ 照合完了");
        }

        Commands::ExportTraits { vocabulary, output } => {
            println!("📄 gwas-trait - 形質一覧エクスポート\n");

            let labels = source::CsvVocabulary::new(&vocabulary).load_vocabulary()?;
            let output_path = match output {
                Some(path) => export::output_path_for(&path, export::REPORTED_TRAIT_FILE),
                None => config.resolve_output(export::REPORTED_TRAIT_FILE),
            };
            export::write_reported_trait_file(&labels, &output_path)?;
            info!(count = labels.len(), path = %output_path.display(), "reported traits exported");
            println!("✔ {}件を出力: {}", labels.len(), output_path.display());
        }

        Commands::Unlink { links, studies, efo, background, mode, yes } => {
            println!("🧹 gwas-trait - バックグラウンド形質リンク削除 ({})\n", mode);

            println!("[1/3] 入力を読み込み中...");
            let rows = unlink::read_background_file(&background)?;
            let study_index = unlink::StudyIndex::load(&studies)?;
            let efo_labels = source::CsvVocabulary::new(&efo).load_vocabulary()?;
            let efo_index = unlink::EfoIndex::new(&efo_labels);
            println!("✔ バックグラウンド形質を持つ研究: {}件\n", rows.len());

            println!("[2/3] 削除計画を作成中...");
            let plan = unlink::plan_removals(&rows, &study_index, &efo_index);
            for removal in &plan.removals {
                println!(
                    "  - {} (STUDY_ID={}) × {} (EFO_TRAIT_ID={})",
                    removal.accession, removal.study_id, removal.trait_label, removal.efo_trait_id
                );
            }
            for unresolved in &plan.unresolved {
                println!("  ⚠ {}", unresolved);
            }
            println!("✔ 削除予定: {}件\n", plan.removals.len());

            if plan.is_empty() {
                println!("削除対象はありません");
                return Ok(());
            }

            println!("[3/3] リンク表に適用中...");
            let outcome = unlink::execute_plan(&plan, &links, mode, |plan| {
                if yes {
                    return Ok(true);
                }
                let confirmed = Confirm::new()
                    .with_prompt(format!("{}件のリンクを削除します。よろしいですか?", plan.removals.len()))
                    .default(false)
                    .interact()?;
                Ok(confirmed)
            })?;

            match outcome.mode {
                unlink::ExecutionMode::DryRun => {
                    println!("✔ ドライラン: {}件が削除対象（リンク表に無いもの {}件）", outcome.removed, outcome.missing);
                    println!("  反映するには --mode commit を指定してください");
                }
                unlink::ExecutionMode::Commit => {
                    println!("✔ {}件を削除しました（リンク表に無いもの {}件）", outcome.removed, outcome.missing);
                }
            }
        }

        Commands::CurationQueue { tables, output } => {
            println!("📋 gwas-trait - キュレーションキュー\n");

            println!("[1/2] テーブルを読み込み中...");
            let catalog = report::CatalogTables::load(&tables)?;
            println!("✔ {}件の研究\n", catalog.studies().len());

            println!("[2/2] キュー一覧を作成中...");
            let rows = report::build_curation_queue(&catalog);
            let default_name = report::queue_file_name(chrono::Local::now().date_naive());
            let output_path = match output {
                Some(path) => export::output_path_for(&path, &default_name),
                None => config.resolve_output(&default_name),
            };
            report::write_curation_queue_file(&rows, &output_path)?;
            info!(count = rows.len(), path = %output_path.display(), "curation queue written");
            println!("✔ 未公開の研究 {}件を保存: {}", rows.len(), output_path.display());
        }

        Commands::Review { tables, pmid, username, output } => {
            println!("📝 gwas-trait - レビューシート (PMID {})\n", pmid);

            let default_name = report::review_file_name(&pmid, &username, chrono::Local::now().naive_local())?;
            let catalog = report::CatalogTables::load(&tables)?;
            let rows = report::build_review(&catalog, &pmid)?;

            let output_path = match output {
                Some(path) => export::output_path_for(&path, &default_name),
                None => config.resolve_output(&default_name),
            };
            report::write_review_file(&rows, &output_path)?;

            print!("{}", report::render_table(&rows));
            println!("\n✔ {}件を保存: {}", rows.len(), output_path.display());
        }

        Commands::Config { set_separator, set_output_dir, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(separator) = set_separator {
                config.separator = separator;
                changed = true;
            }

            if let Some(dir) = set_output_dir {
                config.output_dir = Some(dir);
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show {
                println!("設定:");
                println!("  区切り文字: {:?}", config.separator);
                println!(
                    "  出力先: {}",
                    config
                        .output_dir
                        .as_ref()
                        .unwrap_or(&PathBuf::from("."))
                        .display()
                );
                println!("  進捗バー: {}", if config.show_progress { "表示" } else { "非表示" });
            }
        }
    }

    Ok(())
}
