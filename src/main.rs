use anyhow::Context;
use eframe::egui;
use histgraph::git::GitRepository;
use histgraph::graph::PlotCommitList;
use histgraph::render::text::render_to_string;
use histgraph::state::AppConfig;
use histgraph::HistoryApp;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn print_history(path: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    let repo = GitRepository::discover(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut walk = repo.walk()?;
    let list = PlotCommitList::build(&mut walk, config.commit_limit);
    println!("{}", render_to_string(&list));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let mut text = false;
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--text" => text = true,
            _ => path = Some(PathBuf::from(arg)),
        }
    }

    let config = AppConfig::load();
    if text {
        return print_history(path.unwrap_or_else(|| PathBuf::from(".")), &config);
    }

    let (width, height) = config.window_size;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "histgraph",
        options,
        Box::new(move |cc| Ok(Box::new(HistoryApp::new(cc, path)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
}
