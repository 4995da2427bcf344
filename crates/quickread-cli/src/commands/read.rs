//! The `quickread read` command.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use quickread_content::config::{create_controller, load_config_from};
use quickread_core::controller::{SessionController, SessionPhase, SessionSnapshot};
use quickread_core::model::{QuizResult, TextInfo};

/// Text to read.
pub enum TextSource {
    Inline(String),
    File(PathBuf),
    Topic(String),
}

/// One answered question in the report.
#[derive(Debug, Serialize)]
struct AnswerReport {
    prompt: String,
    chosen: String,
    correct_answer: String,
    correct: bool,
}

/// Everything printed after a session.
#[derive(Debug, Serialize)]
struct ReadReport {
    text: Option<TextInfo>,
    answers: Vec<AnswerReport>,
    result: QuizResult,
}

pub async fn execute(
    source: TextSource,
    speed: Option<u32>,
    answers: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json"),
        "unknown format: '{format}' (expected text or json)"
    );
    let answers = parse_answers(answers.as_deref())?;

    let config = load_config_from(config_path.as_deref())?;
    tracing::debug!(?config, "config loaded");
    let controller = create_controller(&config);

    let loaded = match source {
        TextSource::Inline(text) => controller.load_custom_text(&text),
        TextSource::File(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read text: {}", path.display()))?;
            controller.load_custom_text(&text)
        }
        TextSource::Topic(topic) => {
            eprintln!("Generating text about '{topic}'...");
            controller.request_generated_text(&topic).await
        }
    };
    fail_on_error(&loaded)?;
    anyhow::ensure!(loaded.phase == SessionPhase::Loaded, "nothing to read");

    if let Some(speed) = speed {
        controller.set_speed(speed);
    }

    let snapshot = play(&controller).await?;
    let report = answer_quiz(&controller, &snapshot, &answers)?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_summary(&report),
    }

    Ok(())
}

/// Parse `"1,0,2"` into option indices.
fn parse_answers(answers: Option<&str>) -> Result<Vec<usize>> {
    let Some(answers) = answers else {
        return Ok(Vec::new());
    };
    answers
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("invalid answer: '{}'", s.trim()))
        })
        .collect()
}

fn fail_on_error(snapshot: &SessionSnapshot) -> Result<()> {
    match &snapshot.ui.error {
        Some(error) => anyhow::bail!("{error}"),
        None => Ok(()),
    }
}

/// Play the session, echoing words to stderr, until the quiz opens.
async fn play(controller: &SessionController) -> Result<SessionSnapshot> {
    let mut snapshots = controller.subscribe();
    let started = controller.start();
    fail_on_error(&started)?;

    let mut stderr = std::io::stderr();
    let mut shown = 0;
    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        if snapshot.session.cursor > shown {
            shown = snapshot.session.cursor;
            if let Some(word) = &snapshot.session.current_word {
                write!(stderr, "{word} ")?;
                stderr.flush()?;
            }
        }
        if snapshot.phase == SessionPhase::QuizActive {
            writeln!(stderr)?;
            return Ok(snapshot);
        }
        snapshots
            .changed()
            .await
            .context("session closed before the quiz opened")?;
    }
}

fn answer_quiz(
    controller: &SessionController,
    snapshot: &SessionSnapshot,
    answers: &[usize],
) -> Result<ReadReport> {
    let questions = &snapshot.quiz.questions;
    let mut last = snapshot.clone();
    for index in 0..questions.len() {
        let option = answers.get(index).copied().unwrap_or(0);
        anyhow::ensure!(
            option < questions[index].options.len(),
            "answer {option} out of range for question {}",
            index + 1
        );
        last = controller.select_answer(index, option);
    }

    let result = last
        .quiz
        .result
        .clone()
        .context("quiz finished without a result")?;

    let answers = questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let chosen = last.quiz.answers.get(&index).copied().unwrap_or(0);
            AnswerReport {
                prompt: question.prompt.clone(),
                chosen: question.options[chosen].clone(),
                correct_answer: question.options[question.correct_option_index].clone(),
                correct: chosen == question.correct_option_index,
            }
        })
        .collect();

    Ok(ReadReport {
        text: last.text,
        answers,
        result,
    })
}

fn print_summary(report: &ReadReport) {
    use comfy_table::{Cell, Table};

    let mut answers = Table::new();
    answers.set_header(vec!["Question", "Your answer", "Correct"]);
    for answer in &report.answers {
        answers.add_row(vec![
            Cell::new(&answer.prompt),
            Cell::new(&answer.chosen),
            Cell::new(if answer.correct { "yes" } else { "no" }),
        ]);
    }
    println!("{answers}");

    let result = &report.result;
    let mut table = Table::new();
    table.set_header(vec!["Reading speed", "Comprehension", "Final score"]);
    table.add_row(vec![
        Cell::new(format!("{} PPM", result.reading_speed)),
        Cell::new(format!("{}%", result.comprehension_rate_percent)),
        Cell::new(result.final_score),
    ]);
    println!("\n{table}");

    println!("\n{}", result.feedback_message);
    for suggestion in &result.suggestions {
        println!("  - {suggestion}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_answers() {
        assert_eq!(parse_answers(None).unwrap(), Vec::<usize>::new());
        assert_eq!(parse_answers(Some("1, 0,2")).unwrap(), vec![1, 0, 2]);
        assert!(parse_answers(Some("1,x")).is_err());
    }
}
