// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::scoring::{
    OptionDefinition, QuestionDefinition, QuizDefinition, ReadinessCategory, ScoringError,
};

/// Represents the 'quizzes' table joined with the specialization's category.
#[derive(Debug, Clone, FromRow)]
pub struct QuizRow {
    pub id: i64,
    pub specialization_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// 1 (easiest) to 5.
    pub difficulty_level: i32,
    pub time_limit_minutes: i32,
    /// Percentage needed to pass, 0-100.
    pub passing_score: f64,
    pub readiness_category: String,
}

/// Represents the 'questions' table.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub quiz_id: i64,
    pub question_text: String,
    /// e.g. 'multiple_choice' or 'true_false'.
    pub question_type: String,
    pub points: i32,
    pub explanation: Option<String>,
    pub position: i32,
}

/// Represents the 'question_options' table.
#[derive(Debug, Clone, FromRow)]
pub struct OptionRow {
    pub id: i64,
    pub question_id: i64,
    pub option_text: String,
    pub is_correct: bool,
    pub position: i32,
}

/// A quiz with its questions and options, each list in display order.
#[derive(Debug, Clone)]
pub struct QuizTree {
    pub quiz: QuizRow,
    pub questions: Vec<QuestionRow>,
    pub options: Vec<OptionRow>,
}

impl QuizTree {
    fn options_of(&self, question_id: i64) -> impl Iterator<Item = &OptionRow> {
        self.options.iter().filter(move |o| o.question_id == question_id)
    }

    /// Converts the stored tree into what the scoring engine consumes.
    pub fn to_definition(&self) -> Result<QuizDefinition, ScoringError> {
        let category: ReadinessCategory = self.quiz.readiness_category.parse()?;

        let questions = self
            .questions
            .iter()
            .map(|q| QuestionDefinition {
                id: q.id,
                text: q.question_text.clone(),
                points: u32::try_from(q.points).unwrap_or(0),
                explanation: q.explanation.clone(),
                options: self
                    .options_of(q.id)
                    .map(|o| OptionDefinition {
                        id: o.id,
                        text: o.option_text.clone(),
                        is_correct: o.is_correct,
                    })
                    .collect(),
            })
            .collect();

        Ok(QuizDefinition {
            id: self.quiz.id,
            title: self.quiz.title.clone(),
            passing_score: self.quiz.passing_score,
            category,
            questions,
        })
    }

    /// The client-facing view, without correctness flags or explanations.
    pub fn to_public(&self) -> QuizDetail {
        QuizDetail {
            id: self.quiz.id,
            specialization_id: self.quiz.specialization_id,
            title: self.quiz.title.clone(),
            description: self.quiz.description.clone(),
            difficulty_level: self.quiz.difficulty_level,
            time_limit_minutes: self.quiz.time_limit_minutes,
            passing_score: self.quiz.passing_score,
            question_count: self.questions.len(),
            questions: self
                .questions
                .iter()
                .map(|q| PublicQuestion {
                    id: q.id,
                    question_text: q.question_text.clone(),
                    question_type: q.question_type.clone(),
                    points: q.points,
                    options: self
                        .options_of(q.id)
                        .map(|o| PublicOption {
                            id: o.id,
                            text: o.option_text.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Quiz listing item (without questions).
#[derive(Debug, Serialize, FromRow)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub specialization_id: i64,
    pub specialization_name: String,
    pub difficulty_level: i32,
    pub time_limit_minutes: i32,
    pub passing_score: f64,
    pub question_count: i64,
}

/// DTO for sending a quiz to the client.
#[derive(Debug, Serialize)]
pub struct QuizDetail {
    pub id: i64,
    pub specialization_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub difficulty_level: i32,
    pub time_limit_minutes: i32,
    pub passing_score: f64,
    pub question_count: usize,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub question_text: String,
    pub question_type: String,
    pub points: i32,
    pub options: Vec<PublicOption>,
}

#[derive(Debug, Serialize)]
pub struct PublicOption {
    pub id: i64,
    pub text: String,
}

/// Query parameters for listing quizzes.
#[derive(Debug, Deserialize)]
pub struct QuizListParams {
    pub specialization_id: Option<i64>,
}
