// src/scoring/engine.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::category::ReadinessCategory;

/// A quiz as the scoring engine sees it: the ordered question tree plus the
/// readiness dimension resolved from its specialization.
#[derive(Debug, Clone)]
pub struct QuizDefinition {
    pub id: i64,
    pub title: String,
    /// Percentage (0-100) needed to pass.
    pub passing_score: f64,
    pub category: ReadinessCategory,
    pub questions: Vec<QuestionDefinition>,
}

#[derive(Debug, Clone)]
pub struct QuestionDefinition {
    pub id: i64,
    pub text: String,
    pub points: u32,
    pub explanation: Option<String>,
    pub options: Vec<OptionDefinition>,
}

#[derive(Debug, Clone)]
pub struct OptionDefinition {
    pub id: i64,
    pub text: String,
    pub is_correct: bool,
}

impl QuestionDefinition {
    /// The id of the designated correct option, if the question has one.
    pub fn correct_option(&self) -> Option<i64> {
        self.options.iter().find(|o| o.is_correct).map(|o| o.id)
    }
}

/// One answer in a submission. `selected_answer` is an option id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub selected_answer: i64,
}

/// The answers for one attempt, submitted atomically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    pub answers: Vec<SubmittedAnswer>,
}

/// Per-question outcome, in quiz order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: i64,
    pub question_text: String,
    pub user_answer: Option<i64>,
    pub correct_answer: Option<i64>,
    pub is_correct: bool,
    pub points: u32,
    pub earned_points: u32,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub question_results: Vec<QuestionResult>,
    pub raw_score: u32,
    pub max_score: u32,
    /// `100 * raw_score / max_score`, always within `[0, 100]`.
    pub normalized_score: f64,
    pub passed: bool,
}

impl QuizResult {
    pub fn correct_count(&self) -> usize {
        self.question_results.iter().filter(|r| r.is_correct).count()
    }

    pub fn total_questions(&self) -> usize {
        self.question_results.len()
    }
}

/// Scores a submission against a quiz.
///
/// Pure function of its inputs. Answers for questions outside the quiz are
/// ignored, unanswered questions earn nothing, and a question answered twice
/// keeps the last answer.
pub fn score_submission(quiz: &QuizDefinition, submission: &Submission) -> QuizResult {
    let answers: HashMap<i64, i64> = submission
        .answers
        .iter()
        .map(|a| (a.question_id, a.selected_answer))
        .collect();

    let mut raw_score: u32 = 0;
    let mut max_score: u32 = 0;

    let question_results: Vec<QuestionResult> = quiz
        .questions
        .iter()
        .map(|question| {
            let user_answer = answers.get(&question.id).copied();
            let correct_answer = question.correct_option();
            let is_correct = matches!((user_answer, correct_answer), (Some(u), Some(c)) if u == c);
            let earned_points = if is_correct { question.points } else { 0 };

            raw_score = raw_score.saturating_add(earned_points);
            max_score = max_score.saturating_add(question.points);

            QuestionResult {
                question_id: question.id,
                question_text: question.text.clone(),
                user_answer,
                correct_answer,
                is_correct,
                points: question.points,
                earned_points,
                explanation: question.explanation.clone(),
            }
        })
        .collect();

    let normalized_score = normalize(raw_score, max_score);

    QuizResult {
        question_results,
        raw_score,
        max_score,
        normalized_score,
        passed: normalized_score >= quiz.passing_score,
    }
}

fn normalize(raw_score: u32, max_score: u32) -> f64 {
    if max_score == 0 {
        return 0.0;
    }
    (100.0 * f64::from(raw_score) / f64::from(max_score)).clamp(0.0, 100.0)
}
