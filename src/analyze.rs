//! The analyze button: capture → convert → ask the model → remember the answer

use log::{error, info, warn};

use crate::canvas::CanvasCapture;
use crate::gemini::GeminiClient;
use crate::image_adapter::{encode_for_model, is_blank};
use crate::models::{AnalysisRecord, AnalyzeOutcome};
use crate::prompts::MATH_TUTOR_PROMPT;
use crate::session::SessionState;

/// Runs one analysis. A blank or missing drawing never reaches the model,
/// and a failure never replaces the stored result.
pub async fn analyze_drawing(
    capture: Option<CanvasCapture>,
    client: &GeminiClient,
    session: &SessionState,
) -> AnalyzeOutcome {
    let Some(_guard) = session.begin_analysis() else {
        warn!("[analyze] Ignoring request while another analysis is running");
        return AnalyzeOutcome::failed("An analysis is already in progress");
    };

    let Some(capture) = capture else {
        info!("[analyze] No drawing captured");
        return AnalyzeOutcome::needs_drawing();
    };

    let buffer = match capture.into_buffer() {
        Ok(buffer) => buffer,
        Err(e) => {
            error!("[analyze] {}", e);
            return AnalyzeOutcome::failed(&e);
        }
    };

    if is_blank(&buffer) {
        info!("[analyze] Canvas is blank, skipping model call");
        return AnalyzeOutcome::needs_drawing();
    }

    info!(
        "[analyze] Analyzing {}x{} drawing",
        buffer.width(),
        buffer.height()
    );

    let result = match encode_for_model(&buffer) {
        Ok(image) => client.generate_content(MATH_TUTOR_PROMPT, &image).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(text) => {
            let record = AnalysisRecord {
                text,
                model: client.model().to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
            };
            session.store_result(record.clone());
            info!("[analyze] Analysis complete: {} chars", record.text.len());
            AnalyzeOutcome::Solved { record }
        }
        Err(e) => {
            error!("[analyze] Analysis failed: {}", e);
            AnalyzeOutcome::failed(&e)
        }
    }
}
