// src/scoring/readiness.rs

use serde::{Deserialize, Serialize};

use super::{category::ReadinessCategory, engine::QuizDefinition, engine::QuizResult};
use crate::config::{
    OVERALL_LEADERSHIP_WEIGHT, OVERALL_SOFT_SKILLS_WEIGHT, OVERALL_TECHNICAL_WEIGHT,
    READINESS_UPDATE_WEIGHT,
};

/// A user's rolling competency snapshot. Every field is within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadinessScores {
    pub overall: f64,
    pub technical: f64,
    pub soft_skills: f64,
    pub leadership: f64,
}

/// Before/after values of the dimension a completed attempt moved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreImpact {
    pub category: ReadinessCategory,
    pub old_score: f64,
    pub new_score: f64,
    pub increase: f64,
}

impl ReadinessScores {
    pub fn get(&self, category: ReadinessCategory) -> f64 {
        match category {
            ReadinessCategory::Overall => self.overall,
            ReadinessCategory::Technical => self.technical,
            ReadinessCategory::SoftSkills => self.soft_skills,
            ReadinessCategory::Leadership => self.leadership,
        }
    }

    fn set(&mut self, category: ReadinessCategory, value: f64) {
        let slot = match category {
            ReadinessCategory::Overall => &mut self.overall,
            ReadinessCategory::Technical => &mut self.technical,
            ReadinessCategory::SoftSkills => &mut self.soft_skills,
            ReadinessCategory::Leadership => &mut self.leadership,
        };
        *slot = clamp_score(value);
    }

    /// Copy with every dimension forced into 0..=100.
    pub fn clamped(&self) -> Self {
        Self {
            overall: clamp_score(self.overall),
            technical: clamp_score(self.technical),
            soft_skills: clamp_score(self.soft_skills),
            leadership: clamp_score(self.leadership),
        }
    }

    /// Fixed-weight combination of the three sub-dimensions.
    pub fn weighted_overall(&self) -> f64 {
        clamp_score(
            OVERALL_TECHNICAL_WEIGHT * self.technical
                + OVERALL_SOFT_SKILLS_WEIGHT * self.soft_skills
                + OVERALL_LEADERSHIP_WEIGHT * self.leadership,
        )
    }
}

/// Moves the quiz's readiness dimension toward the attempt's normalized score.
///
/// The step is a convex combination of the old value and the new score, so
/// one bad attempt cannot erase accumulated standing. `overall` is always
/// recomputed from the sub-dimensions afterwards; a quiz mapped to `overall`
/// steps all three sub-dimensions.
///
/// Callers must invoke this at most once per completed attempt.
pub fn apply_readiness_update(
    scores: ReadinessScores,
    quiz: &QuizDefinition,
    result: &QuizResult,
) -> (ReadinessScores, ScoreImpact) {
    let scores = scores.clamped();
    let category = quiz.category;
    let target = clamp_score(result.normalized_score);
    let old_score = scores.get(category);

    let mut updated = scores;
    let dimensions: &[ReadinessCategory] = match category {
        ReadinessCategory::Overall => &ReadinessCategory::SUB_DIMENSIONS,
        ReadinessCategory::Technical => &[ReadinessCategory::Technical],
        ReadinessCategory::SoftSkills => &[ReadinessCategory::SoftSkills],
        ReadinessCategory::Leadership => &[ReadinessCategory::Leadership],
    };
    for &dimension in dimensions {
        updated.set(dimension, damped_step(scores.get(dimension), target));
    }
    updated.overall = updated.weighted_overall();

    let new_score = updated.get(category);
    let impact = ScoreImpact {
        category,
        old_score,
        new_score,
        increase: new_score - old_score,
    };

    (updated, impact)
}

fn damped_step(old: f64, target: f64) -> f64 {
    clamp_score((1.0 - READINESS_UPDATE_WEIGHT) * clamp_score(old) + READINESS_UPDATE_WEIGHT * target)
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::engine::{score_submission, tests as engine_tests, Submission};

    fn result_with(normalized_score: f64) -> QuizResult {
        QuizResult {
            question_results: Vec::new(),
            raw_score: 0,
            max_score: 0,
            normalized_score,
            passed: false,
        }
    }

    fn quiz_for(category: ReadinessCategory) -> QuizDefinition {
        let mut quiz = engine_tests::quiz(50.0, vec![engine_tests::question(1, 10)]);
        quiz.category = category;
        quiz
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn technical_moves_by_damped_step() {
        let scores = ReadinessScores {
            overall: 40.0,
            technical: 40.0,
            soft_skills: 40.0,
            leadership: 40.0,
        };

        let (updated, impact) =
            apply_readiness_update(scores, &quiz_for(ReadinessCategory::Technical), &result_with(100.0));

        let expected = 0.7 * 40.0 + 0.3 * 100.0;
        assert!(approx(updated.technical, expected));
        assert_eq!(updated.soft_skills, 40.0);
        assert_eq!(updated.leadership, 40.0);
        assert!(approx(updated.overall, 0.4 * expected + 0.3 * 40.0 + 0.3 * 40.0));

        assert_eq!(impact.category, ReadinessCategory::Technical);
        assert_eq!(impact.old_score, 40.0);
        assert!(approx(impact.new_score, expected));
        assert!(approx(impact.increase, expected - 40.0));
    }

    #[test]
    fn single_bad_attempt_does_not_erase_standing() {
        let scores = ReadinessScores {
            overall: 90.0,
            technical: 90.0,
            soft_skills: 90.0,
            leadership: 90.0,
        };

        let (updated, impact) =
            apply_readiness_update(scores, &quiz_for(ReadinessCategory::Leadership), &result_with(0.0));

        assert!(approx(updated.leadership, 63.0));
        assert!(impact.increase < 0.0);
    }

    #[test]
    fn overall_category_steps_every_sub_dimension() {
        let scores = ReadinessScores {
            overall: 0.0,
            technical: 10.0,
            soft_skills: 20.0,
            leadership: 30.0,
        };

        let (updated, impact) =
            apply_readiness_update(scores, &quiz_for(ReadinessCategory::Overall), &result_with(50.0));

        assert!(approx(updated.technical, 22.0));
        assert!(approx(updated.soft_skills, 29.0));
        assert!(approx(updated.leadership, 36.0));
        assert!(approx(updated.overall, 0.4 * 22.0 + 0.3 * 29.0 + 0.3 * 36.0));
        assert_eq!(impact.category, ReadinessCategory::Overall);
        assert_eq!(impact.old_score, 0.0);
        assert!(approx(impact.new_score, updated.overall));
    }

    #[test]
    fn output_is_clamped_even_for_out_of_range_input() {
        let scores = ReadinessScores {
            overall: 250.0,
            technical: 180.0,
            soft_skills: -20.0,
            leadership: 100.0,
        };

        for category in ReadinessCategory::ALL {
            for normalized in [-50.0, 0.0, 55.5, 100.0, 400.0] {
                let (updated, impact) =
                    apply_readiness_update(scores, &quiz_for(category), &result_with(normalized));
                for value in [
                    updated.overall,
                    updated.technical,
                    updated.soft_skills,
                    updated.leadership,
                    impact.new_score,
                ] {
                    assert!((0.0..=100.0).contains(&value), "{} out of range", value);
                }
            }
        }
    }

    #[test]
    fn new_value_lies_between_old_value_and_attempt_score() {
        let quiz = engine_tests::quiz(50.0, vec![engine_tests::question(1, 10), engine_tests::question(2, 10)]);
        let result = score_submission(&quiz, &Submission::default());
        let scores = ReadinessScores {
            technical: 64.0,
            ..ReadinessScores::default()
        };

        let (updated, _) = apply_readiness_update(scores, &quiz, &result);

        assert!(updated.technical <= 64.0);
        assert!(updated.technical >= result.normalized_score);
    }
}
