use crate::paginate::Page;
use crate::types::AnswerLetter;
use crate::Result;
use std::io::Write;
use std::path::Path;

/// One row of the answer key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerKeyEntry {
    /// Printed question number
    pub number: usize,
    pub answer: Option<AnswerLetter>,
    pub project_index: Option<u32>,
}

/// Answer key in printed order
pub fn answer_key(pages: &[Page]) -> Vec<AnswerKeyEntry> {
    pages
        .iter()
        .flat_map(Page::questions)
        .map(|placed| AnswerKeyEntry {
            number: placed.number(),
            answer: placed.question.correct_answer,
            project_index: placed.question.project_index,
        })
        .collect()
}

/// Write the answer key as CSV (columns: number, answer, test)
pub fn write_answer_key_csv<W: Write>(entries: &[AnswerKeyEntry], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["number", "answer", "test"])?;
    for entry in entries {
        csv.write_record([
            entry.number.to_string(),
            entry.answer.map(|a| a.to_string()).unwrap_or_default(),
            entry
                .project_index
                .map(|p| (p + 1).to_string())
                .unwrap_or_default(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Save the answer key as a CSV file
pub async fn save_answer_key_csv(entries: &[AnswerKeyEntry], path: impl AsRef<Path>) -> Result<()> {
    let entries = entries.to_vec();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut buffer = Vec::new();
        write_answer_key_csv(&entries, &mut buffer)?;
        Ok::<_, crate::LayoutError>(buffer)
    })
    .await??;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
