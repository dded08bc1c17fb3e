// Native binary for tgcatalog - command-line client for the catalog backend

use anyhow::{anyhow, Context, Result};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tgcatalog::{
    config::{load, Command, Config},
    confirm::ConfirmGate,
    models::Upload,
    navigation::NavOrigin,
    platform::headless_surfaces,
    plural::item_count_label,
    storage::MemoryStorage,
    ApiClient, AppController, ReqwestTransport, Session, SystemClock, UiAction,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    let (cfg, args) = load().context("Failed to load configuration")?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();
    if log::log_enabled!(log::Level::Debug) {
        cfg.print_summary();
    }

    let api = build_client(&cfg)?;
    run(args.command, api, &cfg).await
}

fn build_client(cfg: &Config) -> Result<ApiClient> {
    let transport = ReqwestTransport::new(cfg.timeout_ms).context("Failed to build HTTP client")?;
    let mut api = ApiClient::new(&cfg.api_base_url, Arc::new(transport), Arc::new(SystemClock));
    api.set_init_data(cfg.init_data.clone());
    if !api.has_init_data() {
        log::info!("[main] no init data configured; requests are anonymous");
    }
    Ok(api)
}

async fn run(command: Command, api: ApiClient, cfg: &Config) -> Result<()> {
    match command {
        Command::Categories { include_inactive } => {
            let categories = api.get_categories(include_inactive).await?;
            if categories.is_empty() {
                println!("(no categories)");
            }
            for c in categories {
                let status = if c.is_active { "" } else { "  [inactive]" };
                println!(
                    "{:>5}  {:<32}  {}{}",
                    c.id,
                    c.title,
                    item_count_label(u64::from(c.items_count)),
                    status
                );
            }
        }
        Command::Category {
            id,
            include_inactive,
        } => {
            let category = api.get_category(id, include_inactive).await?;
            print_json(&category)?;
        }
        Command::Me => {
            let user = api.get_current_user().await?;
            print_json(&user)?;
        }
        Command::Browse { category } => {
            let surfaces = headless_surfaces(MemoryStorage::new());
            let app = AppController::new(api, surfaces, cfg.mode);
            let mut session = Session::new(app, ConfirmGate::new());
            session.start().await;
            if let Some(id) = category {
                session
                    .dispatch(UiAction::SelectCategory {
                        id,
                        origin: NavOrigin::Direct,
                    })
                    .await;
            }
            print_json(&session.snapshot(Vec::new()))?;
        }
        Command::ReorderCategories { ids } => {
            api.reorder_categories(&ids).await?;
            println!("Порядок обновлён");
        }
        Command::ReorderItems { category_id, ids } => {
            api.reorder_items(category_id, &ids).await?;
            println!("Порядок обновлён");
        }
        Command::DeleteCategory { id, soft, yes } => {
            if yes || confirm(&format!("Удалить категорию {id}?"))? {
                api.delete_category(id, !soft).await?;
                println!("Категория удалена");
            }
        }
        Command::DeleteItem {
            category_id,
            item_id,
            soft,
            yes,
        } => {
            if yes || confirm(&format!("Удалить элемент {item_id}?"))? {
                api.delete_item(category_id, item_id, !soft).await?;
                println!("Элемент удалён");
            }
        }
        Command::Upload {
            path,
            description,
            tag,
            mime,
        } => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow!("invalid file name: {}", path.display()))?
                .to_string();
            let info = api
                .upload_file(Upload {
                    file_name,
                    mime_type: mime,
                    bytes,
                    description,
                    tag,
                })
                .await?;
            println!("Файл загружен (ID: {})", info.id);
        }
        Command::DeleteFile { id, yes } => {
            if yes || confirm(&format!("Удалить файл {id}?"))? {
                api.delete_file(id).await?;
                println!("Файл удалён");
            }
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Ask on stdin; anything but "y"/"yes"/"д"/"да" declines.
fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes" | "д" | "да"))
}
