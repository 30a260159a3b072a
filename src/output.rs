//! Rendering classification results and the session history.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::history::{History, HistoryEntry};
use crate::junk_drawer;
use crate::label::ClassLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat
{
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct ResultRecord<'a>
{
    file: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction: Option<ClassLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a Error>,
}

#[derive(Serialize)]
struct HistoryRecord<'a>
{
    #[serde(flatten)]
    entry: &'a HistoryEntry,
    label: &'static str,
}

pub fn write_result(out: &mut impl Write, format: OutputFormat, filename: &str, result: &Result<ClassLabel>) -> io::Result<()>
{
    match format {
        OutputFormat::Text => match result {
            Ok(label) => {
                writeln!(out, "{} {}: The image is classified as: {}", label.emoji(), filename, label)?;
                writeln!(out, "    {}: {}", label, label.description())
            },
            Err(e) => writeln!(out, "✖ {}: classification failed: {}", filename, e),
        },
        OutputFormat::Json => {
            let record = ResultRecord {
                file: filename,
                prediction: result.as_ref().ok().copied(),
                label: result.as_ref().ok().map(|label| label.name()),
                error: result.as_ref().err(),
            };
            serde_json::to_writer(&mut *out, &record)?;
            writeln!(out)
        },
    }
}

/// Writes the history, most recent classification first.
pub fn write_history(out: &mut impl Write, format: OutputFormat, history: &History) -> io::Result<()>
{
    match format {
        OutputFormat::Text => {
            writeln!(out, "📜 Classification History")?;
            if history.is_empty() {
                return writeln!(out, "No classifications yet.");
            }
            for (idx, entry) in history.recent_first().enumerate() {
                writeln!(out, "{}. {} ({})", idx + 1, entry.filename, junk_drawer::local_time_to_string(&entry.classified_at))?;
                writeln!(out, "   ➡️ {}", entry.prediction)?;
                writeln!(out, "   {} Materials: {}", entry.prediction.emoji(), entry.prediction.materials())?;
                writeln!(out, "---")?;
            }
            Ok(())
        },
        OutputFormat::Json => {
            let records: Vec<HistoryRecord> = history.recent_first()
                .map(|entry| HistoryRecord { entry, label: entry.prediction.name() })
                .collect();
            serde_json::to_writer(&mut *out, &records)?;
            writeln!(out)
        },
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn text_result_includes_label_and_description()
    {
        let text = render(|out| write_result(out, OutputFormat::Text, "can.png", &Ok(ClassLabel::Recyclable)));
        assert!(text.contains("can.png: The image is classified as: Recyclable Waste"));
        assert!(text.contains(ClassLabel::Recyclable.description()));
    }

    #[test]
    fn text_failure_names_the_error()
    {
        let result: Result<ClassLabel> = Err(Error::InvalidImage("empty input".to_string()));
        let text = render(|out| write_result(out, OutputFormat::Text, "blank.jpg", &result));
        assert!(text.contains("blank.jpg: classification failed: Invalid image: empty input"));
    }

    #[test]
    fn json_result_records()
    {
        let text = render(|out| write_result(out, OutputFormat::Json, "peel.jpg", &Ok(ClassLabel::Organic)));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["file"], "peel.jpg");
        assert_eq!(value["prediction"], "Organic");
        assert_eq!(value["label"], "Organic Waste");
        assert!(value.get("error").is_none());

        let result: Result<ClassLabel> = Err(Error::InferenceFailure("timed out".to_string()));
        let text = render(|out| write_result(out, OutputFormat::Json, "peel.jpg", &result));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["error"], "Inference failed: timed out");
        assert!(value.get("prediction").is_none());
    }

    #[test]
    fn empty_history_says_so()
    {
        let text = render(|out| write_history(out, OutputFormat::Text, &History::new()));
        assert!(text.contains("No classifications yet."));
    }

    #[test]
    fn text_history_is_numbered_most_recent_first()
    {
        let mut history = History::new();
        history.record("apple.jpg", ClassLabel::Organic);
        history.record("tin.png", ClassLabel::Recyclable);

        let text = render(|out| write_history(out, OutputFormat::Text, &history));
        let tin = text.find("1. tin.png").unwrap();
        let apple = text.find("2. apple.jpg").unwrap();
        assert!(tin < apple);
        assert!(text.contains("Materials: Plastics, Metals, Paper, Glass"));
        assert!(text.contains("Materials: Food Scraps, Yard Waste"));
    }

    #[test]
    fn json_history_is_most_recent_first()
    {
        let mut history = History::new();
        history.record("apple.jpg", ClassLabel::Organic);
        history.record("tin.png", ClassLabel::Recyclable);

        let text = render(|out| write_history(out, OutputFormat::Json, &history));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["filename"], "tin.png");
        assert_eq!(value[0]["label"], "Recyclable Waste");
        assert_eq!(value[1]["filename"], "apple.jpg");
        assert_eq!(value[1]["prediction"], "Organic");
    }
}
