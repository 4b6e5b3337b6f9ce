use anyhow::Context;
use boardcheck::{cli, config, error, image_input, report, FileStore, ReqwestBackend};
use boardcheck_common::{ApiClient, AppContext, HealthStatus, Screen, Translator};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = boardcheck_common::validate_catalog() {
        tracing::error!(error = %err, "Translation catalog is invalid, falling back to keys");
    }

    let mut config = Config::load().context("failed to load config")?;
    let store_path = config.store_path()?;
    let mut ctx = AppContext::load(FileStore::new(&store_path));
    let translator = Translator::new(cli.lang.unwrap_or(ctx.language()));
    let t = |key: &'static str| -> &'static str { translator.t(key) };
    let api = ApiClient::new(ReqwestBackend::new(), config.client_config());

    match cli.command {
        Commands::Detect { image, save, no_retry } => {
            println!("🔍 boardcheck - {}\n", t("hero.title"));

            // 1. 画像読み込み
            println!("[1/3] {}", image.display());
            let request = image_input::load_image(&image)?;
            println!("✔ {} ({} bytes)\n", request.file_name, request.size());

            // 2. 解析（失敗時は確認のうえ同じ画像で再試行）
            println!("[2/3] {}", t("upload.analyzing"));
            let preview = image
                .canonicalize()
                .unwrap_or_else(|_| image.clone())
                .display()
                .to_string();
            let mut screen = with_spinner(t("upload.analyzing"), ctx.submit(&api, request, preview)).await;

            while screen == Screen::Upload {
                let message = ctx
                    .error_message_in(translator.language)
                    .unwrap_or(t("errors.unexpectedError"));
                eprintln!("✘ {}", message);

                if no_retry || !confirm(t("actions.retry")) {
                    return Err(error::BoardCheckError::Detection(message.to_string()).into());
                }
                screen = with_spinner(t("upload.analyzing"), ctx.retry_with(&api)).await;
            }
            println!("✔ {}\n", t("results.title"));

            // 3. 結果表示・保存
            println!("[3/3] {}", t("results.title"));
            print_current_result(&ctx, &api, translator);

            if save {
                if let Some(entry) = ctx.save_to_history() {
                    tracing::debug!(id = %entry.id, path = %store_path.display(), "Saved to history");
                }
                if let Some(notice) = ctx.take_notice() {
                    println!("\n✔ {}", t(notice.message_key()));
                }
            }
        }

        Commands::Health => {
            let healthy = with_spinner(t("header.checking"), api.check_health()).await;
            let status = HealthStatus::from(healthy);
            println!("{} {} ({})", if healthy { "✔" } else { "✘" }, t(status.label_key()), api.config().base_url);
            if !healthy {
                anyhow::bail!("{}", t(status.label_key()));
            }
        }

        Commands::History { filter, show, delete, clear, yes } => {
            if let Some(id) = show {
                ctx.view_history();
                if !ctx.select_history_entry(&id) {
                    return Err(error::BoardCheckError::HistoryEntryNotFound(id).into());
                }
                if let Some(original) = &ctx.session().preview_reference {
                    println!("{}: {}", t("results.original"), original);
                }
                print_current_result(&ctx, &api, translator);
            } else if let Some(id) = delete {
                if !ctx.delete_history_entry(&id) {
                    return Err(error::BoardCheckError::HistoryEntryNotFound(id).into());
                }
                println!("✔ {}: {}", t("history.delete"), id);
            } else if clear {
                let confirmed = yes || confirm(t("confirmations.clearHistory"));
                if ctx.clear_history(confirmed) {
                    println!("✔ {}", t("history.clearAll"));
                } else {
                    println!("{}", t("actions.cancel"));
                }
            } else {
                println!("{} ({})", t("history.title"), t(filter.label_key()));
                let entries = ctx.filtered_history(filter);
                if ctx.history().is_empty() {
                    println!("{}", t("history.empty"));
                } else if entries.is_empty() {
                    println!("{}", t("history.noResultsForFilter"));
                } else {
                    for entry in entries {
                        println!("{}", report::format_history_line(entry, translator));
                    }
                }
            }
        }

        Commands::RemoteHistory { page, per_page } => {
            let value = api.get_history(page, per_page).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }

        Commands::Statistics => {
            let value = api.get_statistics().await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }

        Commands::Detection { id } => {
            let value = api.get_detection_details(id).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }

        Commands::Config { set_base_url, set_language, show } => {
            let changed = set_base_url.is_some() || set_language.is_some();

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ base URL: {}", config.base_url());
            }

            if let Some(language) = set_language {
                ctx.set_language(language);
                println!("✔ language: {}", language);
            }

            if show || !changed {
                let client = config.client_config();
                println!("Config:");
                println!("  base URL: {}", client.base_url);
                println!("  config file: {}", Config::config_path()?.display());
                println!("  store file: {}", store_path.display());
                println!("  language: {}", ctx.language());
                println!("  saved analyses: {}", ctx.history().len());
                println!("  detect timeout: {}s", client.detect_timeout_secs);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_current_result(ctx: &AppContext<FileStore>, api: &ApiClient<ReqwestBackend>, translator: Translator) {
    if let Some(result) = &ctx.session().current_result {
        let url = result
            .result_image_reference
            .as_deref()
            .map(|reference| api.resolve_image_url(reference));
        println!("{}", report::format_result(result, url.as_deref(), translator));
    }
}

/// 端末でなければ確認なし（false）
fn confirm(prompt: &str) -> bool {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}

async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));

    let output = future.await;
    spinner.finish_and_clear();
    output
}
