// src/main.rs
use std::env;

use artpick::app::prefs::{FilePrefs, PreferenceStore};
use artpick::app::{initial_window_size, Candidate, ImageCategory, PickerApp};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Size of the window the picker would be laid over.
const REFERENCE_PARENT: (u32, u32) = (1300, 900);

fn pick_renderer() -> eframe::Renderer {
    match env::var("ARTPICK_RENDERER").as_deref() {
        Ok("glow") => eframe::Renderer::Glow,
        Ok("wgpu") => eframe::Renderer::Wgpu,
        _ => {
            // Default: Windows = WGPU (DX12), Others = Glow (GL)
            #[cfg(target_os = "windows")]
            {
                eframe::Renderer::Wgpu
            }
            #[cfg(not(target_os = "windows"))]
            {
                eframe::Renderer::Glow
            }
        }
    }
}

/// `[--category <name>] <url|path>...`
fn parse_args(args: impl IntoIterator<Item = String>) -> (ImageCategory, Vec<Candidate>) {
    let mut category = ImageCategory::default();
    let mut candidates = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--category" {
            match args.next().as_deref().and_then(ImageCategory::from_str) {
                Some(c) => category = c,
                None => warn!("unknown --category; using {}", category.as_str()),
            }
        } else if arg.contains("://") {
            candidates.push(Candidate::single(arg));
        } else {
            // plain paths are read through the transport as file URLs
            let thumb = format!("file://{}", urlencoding::encode(&arg));
            candidates.push(Candidate::new(arg, thumb));
        }
    }
    (category, candidates)
}

fn main() -> eframe::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let cfg = artpick::config::load_config();
    let (category, candidates) = parse_args(env::args().skip(1));

    let prefs = FilePrefs::load(&cfg.prefs_path);
    info!("prefs at {}", prefs.path().display());
    let (w, h) = prefs
        .window_size()
        .unwrap_or_else(|| initial_window_size(REFERENCE_PARENT));

    let app = match PickerApp::new(&cfg, Box::new(prefs), category, candidates) {
        Ok(app) => app,
        Err(e) => {
            error!("cannot start picker: {e}");
            std::process::exit(2);
        }
    };

    let options = eframe::NativeOptions {
        renderer: pick_renderer(),
        multisampling: 0,
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([w.max(320) as f32, h.max(240) as f32])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Choose Image",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    );
    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("eframe failed to start: {e:?}");
            error!("Hint: on WSL use X/Wayland; on Windows try ARTPICK_RENDERER=wgpu or glow.");
            Err(e)
        }
    }
}
