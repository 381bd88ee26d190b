use std::path::PathBuf;
use testoloji_layout::{
    LayoutOptions, Question, QuestionManifest, answer_key, calculate_statistics, paginate,
    render_pdf, save_answer_key_csv, save_pdf,
};
use testoloji_runtime::Update;
use tokio::sync::mpsc;

pub async fn handle_load_manifest(path: PathBuf, update_tx: &mpsc::UnboundedSender<Update>) {
    let result = match QuestionManifest::load(&path).await {
        Ok(manifest) => manifest.validate().map(|_| manifest),
        Err(e) => Err(e),
    };

    match result {
        Ok(manifest) => {
            let _ = update_tx.send(Update::ManifestLoaded {
                path,
                title: manifest.title,
                questions: manifest.questions,
            });
        }
        Err(e) => {
            let _ = update_tx.send(Update::Error {
                message: format!("Failed to load question bank: {e}"),
            });
        }
    }
}

pub async fn handle_load_config(path: PathBuf, update_tx: &mpsc::UnboundedSender<Update>) {
    match LayoutOptions::load(&path).await {
        Ok(options) => {
            log::info!("Layout configuration loaded from {}", path.display());
            let _ = update_tx.send(Update::LayoutConfigLoaded { options });
        }
        Err(e) => {
            let _ = update_tx.send(Update::Error {
                message: format!("Failed to load configuration: {e}"),
            });
        }
    }
}

pub async fn handle_calculate_stats(
    questions: Vec<Question>,
    options: LayoutOptions,
    update_tx: &mpsc::UnboundedSender<Update>,
) {
    let result = tokio::task::spawn_blocking(move || {
        let config = options.pagination_config();
        let pages = paginate(&questions, &config);
        calculate_statistics(&pages, &config)
    })
    .await;

    match result {
        Ok(stats) => {
            let _ = update_tx.send(Update::LayoutStatsCalculated { stats });
        }
        Err(e) => {
            let _ = update_tx.send(Update::Error {
                message: format!("Task join error: {e}"),
            });
        }
    }
}

pub async fn handle_export(
    questions: Vec<Question>,
    options: LayoutOptions,
    output_path: PathBuf,
    update_tx: &mpsc::UnboundedSender<Update>,
) {
    let _ = update_tx.send(Update::Progress {
        operation: "Rendering exam PDF...".to_string(),
        current: 0,
        total: 2,
    });

    let doc = match render_pdf(&questions, &options).await {
        Ok(doc) => doc,
        Err(e) => {
            let _ = update_tx.send(Update::Error {
                message: format!("Failed to render PDF: {e}"),
            });
            return;
        }
    };
    let page_count = doc.get_pages().len();

    let _ = update_tx.send(Update::Progress {
        operation: "Saving exam PDF...".to_string(),
        current: 1,
        total: 2,
    });

    match save_pdf(doc, &output_path).await {
        Ok(()) => {
            let _ = update_tx.send(Update::LayoutExported {
                path: output_path,
                page_count,
            });
        }
        Err(e) => {
            let _ = update_tx.send(Update::Error {
                message: format!("Failed to save PDF: {e}"),
            });
        }
    }
}

pub async fn handle_export_answer_key(
    questions: Vec<Question>,
    options: LayoutOptions,
    output_path: PathBuf,
    update_tx: &mpsc::UnboundedSender<Update>,
) {
    let pages = paginate(&questions, &options.pagination_config());
    let entries = answer_key(&pages);

    match save_answer_key_csv(&entries, &output_path).await {
        Ok(()) => {
            let _ = update_tx.send(Update::AnswerKeyExported {
                path: output_path,
                entry_count: entries.len(),
            });
        }
        Err(e) => {
            let _ = update_tx.send(Update::Error {
                message: format!("Failed to export answer key: {e}"),
            });
        }
    }
}
