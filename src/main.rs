use std::sync::Arc;

use clap::Parser;
use egui::Vec2;
use gpxsplit::{
    AppConfig, GpxSplitApp, GpxSplitError, LoaderContext, LocalFileStore, SplitMapParams,
};
use log::{error, info, warn};

const LOADER_THREAD_NAME: &str = "gpxsplit-loader";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// GPX file to split, as a path or a file:// URI. Opens a file picker when omitted.
    #[arg(short, long)]
    input: Option<String>,

    /// Access token handed over to the screen after the split
    #[arg(
        short = 't',
        long,
        env = "GPXSPLIT_ACCESS_TOKEN",
        default_value = "",
        hide_env_values = true
    )]
    access_token: String,
}

fn pick_input() -> Result<String, GpxSplitError> {
    rfd::FileDialog::new()
        .set_title("Open GPX track")
        .add_filter("GPX", &["gpx"])
        .pick_file()
        .map(|path| path.display().to_string())
        .ok_or(GpxSplitError::NoInputFile)
}

fn load_config() -> AppConfig {
    match AppConfig::from_local_file() {
        Ok(Some(config)) => config,
        Ok(None) => AppConfig::default(),
        Err(e) => {
            warn!("Ignoring config file: {}", e);
            AppConfig::default()
        }
    }
}

fn run(args: Args) -> Result<(), GpxSplitError> {
    let config = load_config();
    let file_reference = match args.input {
        Some(input) => input,
        None => pick_input()?,
    };
    info!("Opening {}", file_reference);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name(LOADER_THREAD_NAME)
        .build()
        .map_err(|e| GpxSplitError::Runtime { source: e })?;
    let loader_context = LoaderContext::new(runtime.handle().clone(), Arc::new(LocalFileStore::new()));
    let params = SplitMapParams {
        file_reference,
        access_token: args.access_token,
    };

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_title("gpxsplit")
        .with_inner_size(Vec2::new(config.window_width, config.window_height));

    eframe::run_native(
        "gpxsplit",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(
                GpxSplitApp::new(params, loader_context, config).with_creation_context(cc),
            ))
        }),
    )
    .map_err(|e| GpxSplitError::Gui {
        reason: e.to_string(),
    })
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let args = Args::parse();
    if let Err(e) = ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    }) {
        warn!("Could not set Ctrl-C handler: {}", e);
    }

    match run(args) {
        Ok(()) => {}
        Err(GpxSplitError::NoInputFile) => info!("No GPX file selected, nothing to do"),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
