use addons_mirror::config::MirrorConfig;
use addons_mirror::{MemoryStore, Mirror, MirrorReport, WordPressClient};
use clap::Parser;

mod args;
use args::{Args, convert_fetcher};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match MirrorConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration {}: {}", args.config, e);
            std::process::exit(1);
        }
    };
    if let Some(fetcher) = args.fetcher {
        config.fetcher = convert_fetcher(fetcher, config.fetcher);
    }
    config.apply_env_overrides();

    let mut mirror = Mirror::new(&args.url).with_config(&config);
    if let Some(root_page) = args.root_page {
        mirror = mirror.with_root_page(root_page);
    }
    if let Some(template) = &args.template {
        mirror = mirror.with_template_file(template);
    }

    ::log::info!("Mirroring {} with {:?}", args.url, mirror.fetcher_config());
    let start_time = std::time::Instant::now();

    let result = if args.dry_run {
        let store = MemoryStore::new();
        let result = mirror.run(&store).await;
        for page in store.pages().await {
            println!("#{} parent={} {}", page.id, page.parent, page.title);
        }
        result
    } else {
        let store = WordPressClient::new(&config.wordpress);
        mirror.run(&store).await
    };

    match result {
        Ok(report) => summarize(&report, start_time.elapsed()),
        Err(e) => {
            ::log::error!("Mirror failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn summarize(report: &MirrorReport, elapsed: std::time::Duration) {
    for outcome in &report.pages {
        ::log::info!(
            "{:?} '{}' -> page {} (parent {}, {} images)",
            outcome.action,
            outcome.title,
            outcome.page_id,
            outcome.parent_id,
            outcome.images
        );
    }
    ::log::info!(
        "Mirror complete - {} pages, {} extraction misses in {:.2} seconds",
        report.pages.len(),
        report.diagnostics.len(),
        elapsed.as_secs_f64()
    );
}
