// Prevents additional console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Module declarations
mod analyze;
mod canvas;
mod config;
mod gemini;
mod image_adapter;
mod models;
mod prompts;
mod session;

use analyze::analyze_drawing;
use canvas::{CanvasCapture, CanvasSettings, PenSettings};
use config::AppConfig;
use gemini::GeminiClient;
use models::{AnalysisRecord, AnalyzeOutcome};
use session::SessionState;

use log::{error, info, warn};
use tauri::{command, State};

pub struct AppState {
    pub client: GeminiClient,
    pub session: SessionState,
}

// ============ Canvas Commands ============

#[command]
fn get_canvas_settings() -> CanvasSettings {
    CanvasSettings::default()
}

#[command]
fn get_pen_settings(state: State<'_, AppState>) -> PenSettings {
    state.session.pen()
}

#[command]
fn set_pen_settings(state: State<'_, AppState>, color: String, width: i64) -> PenSettings {
    let pen = PenSettings::new(&color, width);
    state.session.set_pen(pen.clone());
    pen
}

// ============ Analysis Commands ============

#[command]
async fn analyze_equation(
    state: State<'_, AppState>,
    capture: Option<CanvasCapture>,
) -> Result<AnalyzeOutcome, String> {
    Ok(analyze_drawing(capture, &state.client, &state.session).await)
}

#[command]
fn get_last_result(state: State<'_, AppState>) -> Option<AnalysisRecord> {
    state.session.last_result()
}

// ============ Frontend Logging ============

#[command]
fn log_from_frontend(level: String, message: String) {
    match level.as_str() {
        "error" => error!("[Frontend] {}", message),
        "warn" => warn!("[Frontend] {}", message),
        _ => info!("[Frontend] {}", message),
    }
}

// ============ Main ============

fn main() {
    // No window is created without a credential.
    let client = match AppConfig::from_env().and_then(|config| GeminiClient::from_config(&config)) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("An error occurred: {}", e);
            std::process::exit(1);
        }
    };

    let result = tauri::Builder::default()
        .manage(AppState {
            client,
            session: SessionState::default(),
        })
        .plugin(
            tauri_plugin_log::Builder::new()
                .targets([
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::LogDir {
                        file_name: Some("math-solver".into()),
                    }),
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::Stdout),
                ])
                .level(log::LevelFilter::Info)
                .level_for("reqwest", log::LevelFilter::Warn)
                .level_for("hyper", log::LevelFilter::Warn)
                .level_for("hyper_util", log::LevelFilter::Warn)
                .build(),
        )
        .setup(|app| {
            use tauri::Manager;

            info!("=== AI Math Solver Starting ===");
            let state = app.state::<AppState>();
            info!("[startup] Remote model: {}", state.client.model());
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_canvas_settings,
            get_pen_settings,
            set_pen_settings,
            analyze_equation,
            get_last_result,
            log_from_frontend,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        eprintln!("error while running tauri application: {}", e);
        std::process::exit(1);
    }
}
