// src/scoring/feedback.rs

use serde::Serialize;

use super::engine::QuizResult;
use crate::config::{EXCELLENT_SCORE_THRESHOLD, FEEDBACK_MAX_RECOMMENDATIONS};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackDetail {
    pub overall: String,
    pub strengths: String,
    pub weaknesses: String,
    pub recommendations: Vec<String>,
}

/// Summarizes a scored attempt for the learner.
pub fn build_feedback(result: &QuizResult, passing_score: f64) -> FeedbackDetail {
    let total = result.total_questions();
    let correct = result.correct_count();
    let missed: Vec<&str> = result
        .question_results
        .iter()
        .filter(|r| !r.is_correct)
        .map(|r| r.question_text.as_str())
        .collect();

    let overall = if result.normalized_score >= EXCELLENT_SCORE_THRESHOLD {
        format!("Excellent work: you scored {:.0}%.", result.normalized_score)
    } else if result.passed {
        format!(
            "You passed with {:.0}% (passing score {:.0}%).",
            result.normalized_score, passing_score
        )
    } else {
        format!(
            "You scored {:.0}%, below the passing score of {:.0}%.",
            result.normalized_score, passing_score
        )
    };

    let strengths = format!("Answered {} of {} questions correctly.", correct, total);

    let weaknesses = if missed.is_empty() {
        "No incorrect answers.".to_string()
    } else {
        format!("Missed {} of {} questions.", missed.len(), total)
    };

    let mut recommendations: Vec<String> = missed
        .iter()
        .take(FEEDBACK_MAX_RECOMMENDATIONS)
        .map(|text| format!("Review: {}", text))
        .collect();
    if recommendations.is_empty() && result.passed {
        recommendations.push("Try a quiz at a higher difficulty level.".to_string());
    }

    FeedbackDetail {
        overall,
        strengths,
        weaknesses,
        recommendations,
    }
}
