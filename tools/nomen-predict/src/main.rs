use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use candle_core::Device;
use clap::Parser;
use nomen_trainer::{Prediction, Predictor};
use serde::Serialize;

/// Classify surnames read from stdin, one JSON object per line.
#[derive(Parser)]
#[command(name = "nomen-predict")]
#[command(version)]
struct Args {
    /// Trained model directory
    model: PathBuf,

    /// Number of categories reported per name
    #[arg(short = 'k', long, default_value_t = 3)]
    top_k: usize,
}

#[derive(Debug, Serialize)]
pub struct PredictOutput {
    pub input: String,
    pub predictions: Vec<Prediction>,
    pub error: Option<String>,
}

fn to_output(input: &str, result: anyhow::Result<Vec<Prediction>>) -> PredictOutput {
    match result {
        Ok(predictions) => PredictOutput {
            input: input.to_string(),
            predictions,
            error: None,
        },
        Err(e) => PredictOutput {
            input: input.to_string(),
            predictions: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args = Args::parse();
    let predictor = Predictor::load(&args.model, &Device::Cpu)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let output = to_output(line, predictor.predict(line, args.top_k));
        writeln!(stdout, "{}", serde_json::to_string(&output)?)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_output_has_no_predictions() {
        let output = to_output("Ito", Err(anyhow::anyhow!("model not loaded")));
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"error\":\"model not loaded\""));
        assert!(json.contains("\"predictions\":[]"));
    }

    #[test]
    fn success_output_serializes_predictions() {
        let output = to_output(
            "Ito",
            Ok(vec![Prediction {
                category: "Japanese".into(),
                index: 2,
                probability: 0.5,
            }]),
        );
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"category\":\"Japanese\""));
        assert!(json.contains("\"error\":null"));
    }
}
