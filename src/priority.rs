//! Keyword-weighted priority scoring for submitted reports.
//!
//! Stateless: the score is a pure function of the issue type, the
//! description text, and the resolved location text.

use serde::{Deserialize, Serialize};

const URGENT_KEYWORDS: [&str; 8] = [
    "danger", "accident", "fire", "blocked", "fallen", "broken", "leak", "flood",
];
const HIGH_KEYWORDS: [&str; 4] = ["pothole", "garbage", "dark", "unsafe"];

const BASE_SCORE: i32 = 50;
const URGENT_BONUS: i32 = 30;
const HIGH_BONUS: i32 = 15;
const TRAFFIC_BONUS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    /// 0..=100.
    pub score: u8,
    pub level: PriorityLevel,
}

/// Scores an issue from its type, description, and location text.
pub fn score_issue(issue_type: Option<&str>, description: &str, location_text: &str) -> Priority {
    let description = description.to_lowercase();
    let mut score = BASE_SCORE;

    if URGENT_KEYWORDS.iter().any(|w| description.contains(w)) {
        score += URGENT_BONUS;
    } else if HIGH_KEYWORDS.iter().any(|w| description.contains(w)) {
        score += HIGH_BONUS;
    }

    // High-traffic corridors get a bump; a GIS lookup would replace this.
    if location_text.contains("Main St") || location_text.contains("Highway") {
        score += TRAFFIC_BONUS;
    }

    score += match issue_type {
        Some("pothole") => 10,
        Some("streetlight") => 5,
        Some("garbage") => 20, // health hazard
        Some("water") => 25,   // resource loss
        _ => 0,
    };

    let score = score.clamp(0, 100) as u8;
    let level = if score >= 80 {
        PriorityLevel::High
    } else if score >= 40 {
        PriorityLevel::Medium
    } else {
        PriorityLevel::Low
    };

    Priority { score, level }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_report_scores_base() {
        let priority = score_issue(None, "minor cosmetic issue", "Koregaon Park");
        assert_eq!(priority.score, 50);
        assert_eq!(priority.level, PriorityLevel::Medium);
    }

    #[test]
    fn test_urgent_keyword_beats_high_keyword() {
        // "leak" (urgent) and "pothole" (high) together only apply the
        // urgent bonus.
        let priority = score_issue(None, "water leak near a pothole", "Lane 5");
        assert_eq!(priority.score, 80);
        assert_eq!(priority.level, PriorityLevel::High);
    }

    #[test]
    fn test_type_weight_and_traffic_bonus_stack() {
        let priority = score_issue(Some("water"), "pipe leak flooding the road", "Main St");
        // 50 base + 30 urgent + 10 traffic + 25 water = 115, capped.
        assert_eq!(priority.score, 100);
        assert_eq!(priority.level, PriorityLevel::High);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let priority = score_issue(None, "DANGEROUS open manhole", "");
        assert_eq!(priority.score, 80);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(
            score_issue(None, "small graffiti", "").level,
            PriorityLevel::Medium
        );
        assert_eq!(
            score_issue(Some("water"), "flooded underpass", "").level,
            PriorityLevel::High
        );
    }
}
