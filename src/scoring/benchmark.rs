// src/scoring/benchmark.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{category::ReadinessCategory, readiness::ReadinessScores};
use crate::config::{BENCHMARK_GAP_BELOW, BENCHMARK_STATUS_MARGIN, BENCHMARK_STRENGTH_AT};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerComparison {
    pub category: ReadinessCategory,
    pub your_score: f64,
    pub peer_average: f64,
    pub difference: f64,
    pub percentile: u32,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonInsight {
    pub area: ReadinessCategory,
    pub percentage: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerBenchmarkData {
    pub specialization_name: String,
    pub total_peers: usize,
    pub comparisons: Vec<PeerComparison>,
    pub overall_percentile: u32,
    pub common_strengths: Vec<CommonInsight>,
    pub common_gaps: Vec<CommonInsight>,
    pub last_updated: DateTime<Utc>,
}

/// Compares a user's readiness scores with those of peers in the same
/// specialization.
pub fn benchmark(
    user: &ReadinessScores,
    peers: &[ReadinessScores],
    specialization_name: &str,
    now: DateTime<Utc>,
) -> PeerBenchmarkData {
    let comparisons: Vec<PeerComparison> = ReadinessCategory::ALL
        .iter()
        .map(|&category| compare(category, user.get(category), peers))
        .collect();

    let overall_percentile = comparisons
        .iter()
        .find(|c| c.category == ReadinessCategory::Overall)
        .map(|c| c.percentile)
        .unwrap_or(50);

    let mut common_strengths = Vec::new();
    let mut common_gaps = Vec::new();
    if !peers.is_empty() {
        for category in ReadinessCategory::SUB_DIMENSIONS {
            let strong = share(peers, |p| p.get(category) >= BENCHMARK_STRENGTH_AT);
            if strong >= 50.0 {
                common_strengths.push(CommonInsight {
                    area: category,
                    percentage: strong,
                    description: format!(
                        "{:.0}% of peers score {:.0} or higher in {}.",
                        strong,
                        BENCHMARK_STRENGTH_AT,
                        category.label().to_lowercase()
                    ),
                });
            }

            let weak = share(peers, |p| p.get(category) < BENCHMARK_GAP_BELOW);
            if weak >= 50.0 {
                common_gaps.push(CommonInsight {
                    area: category,
                    percentage: weak,
                    description: format!(
                        "{:.0}% of peers score below {:.0} in {}.",
                        weak,
                        BENCHMARK_GAP_BELOW,
                        category.label().to_lowercase()
                    ),
                });
            }
        }
    }

    PeerBenchmarkData {
        specialization_name: specialization_name.to_string(),
        total_peers: peers.len(),
        comparisons,
        overall_percentile,
        common_strengths,
        common_gaps,
        last_updated: now,
    }
}

fn compare(category: ReadinessCategory, your_score: f64, peers: &[ReadinessScores]) -> PeerComparison {
    if peers.is_empty() {
        return PeerComparison {
            category,
            your_score,
            peer_average: your_score,
            difference: 0.0,
            percentile: 50,
            status: "average",
        };
    }

    let peer_average = peers.iter().map(|p| p.get(category)).sum::<f64>() / peers.len() as f64;
    let difference = your_score - peer_average;
    let percentile = share(peers, |p| p.get(category) < your_score).round() as u32;
    let status = if difference > BENCHMARK_STATUS_MARGIN {
        "above_average"
    } else if difference < -BENCHMARK_STATUS_MARGIN {
        "below_average"
    } else {
        "average"
    };

    PeerComparison {
        category,
        your_score,
        peer_average,
        difference,
        percentile,
        status,
    }
}

/// Percentage of peers matching `pred`.
fn share(peers: &[ReadinessScores], pred: impl Fn(&ReadinessScores) -> bool) -> f64 {
    if peers.is_empty() {
        return 0.0;
    }
    100.0 * peers.iter().filter(|&p| pred(p)).count() as f64 / peers.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(technical: f64, soft_skills: f64, leadership: f64) -> ReadinessScores {
        let mut s = ReadinessScores {
            overall: 0.0,
            technical,
            soft_skills,
            leadership,
        };
        s.overall = s.weighted_overall();
        s
    }

    #[test]
    fn no_peers_reports_neutral_comparison() {
        let me = scores(60.0, 60.0, 60.0);

        let data = benchmark(&me, &[], "Backend Engineering", Utc::now());

        assert_eq!(data.total_peers, 0);
        assert_eq!(data.overall_percentile, 50);
        assert!(data.comparisons.iter().all(|c| c.status == "average" && c.difference == 0.0));
        assert!(data.common_strengths.is_empty());
        assert!(data.common_gaps.is_empty());
    }

    #[test]
    fn percentile_counts_peers_strictly_below() {
        let me = scores(70.0, 50.0, 50.0);
        let peers = vec![
            scores(40.0, 50.0, 50.0),
            scores(60.0, 50.0, 50.0),
            scores(70.0, 50.0, 50.0),
            scores(90.0, 50.0, 50.0),
        ];

        let data = benchmark(&me, &peers, "Backend Engineering", Utc::now());
        let technical = data
            .comparisons
            .iter()
            .find(|c| c.category == ReadinessCategory::Technical)
            .unwrap();

        assert_eq!(technical.percentile, 50);
        assert_eq!(technical.peer_average, 65.0);
        assert_eq!(technical.difference, 5.0);
        assert_eq!(technical.status, "average");

        let soft = data
            .comparisons
            .iter()
            .find(|c| c.category == ReadinessCategory::SoftSkills)
            .unwrap();
        assert_eq!(soft.percentile, 0);
    }

    #[test]
    fn status_reflects_margin() {
        let peers = vec![scores(50.0, 50.0, 50.0)];

        let above = benchmark(&scores(80.0, 50.0, 50.0), &peers, "QA", Utc::now());
        let below = benchmark(&scores(20.0, 50.0, 50.0), &peers, "QA", Utc::now());

        assert_eq!(above.comparisons[1].status, "above_average");
        assert_eq!(below.comparisons[1].status, "below_average");
    }

    #[test]
    fn common_strengths_and_gaps_use_majority_share() {
        let peers = vec![
            scores(80.0, 30.0, 60.0),
            scores(75.0, 40.0, 60.0),
            scores(20.0, 90.0, 60.0),
        ];

        let data = benchmark(&scores(50.0, 50.0, 50.0), &peers, "QA", Utc::now());

        let strengths: Vec<ReadinessCategory> = data.common_strengths.iter().map(|i| i.area).collect();
        let gaps: Vec<ReadinessCategory> = data.common_gaps.iter().map(|i| i.area).collect();

        assert_eq!(strengths, vec![ReadinessCategory::Technical]);
        assert_eq!(gaps, vec![ReadinessCategory::SoftSkills]);
        assert!((data.common_strengths[0].percentage - 200.0 / 3.0).abs() < 1e-9);
    }
}
