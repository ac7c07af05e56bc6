//! Complexity scoring: rates a request 1-10 to pick a model tier.

use tierline_llm::tiers::score_to_tier;

/// Expected response length, contributing 0-2 points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentLength {
    #[default]
    Short,
    Medium,
    Long,
}

impl ContentLength {
    fn points(self) -> u8 {
        match self {
            ContentLength::Short => 0,
            ContentLength::Medium => 1,
            ContentLength::Long => 2,
        }
    }
}

/// Explicit inputs to the additive scoring formula.
#[derive(Debug, Clone, Default)]
pub struct ComplexityFactors {
    pub requires_web: bool,
    pub requires_file: bool,
    pub requires_code: bool,
    pub requires_multi_domain: bool,
    pub content_length: ContentLength,
    pub accuracy_critical: bool,
    pub num_steps_estimate: u32,
}

/// Result of complexity analysis.
#[derive(Debug, Clone)]
pub struct ComplexityScore {
    /// Final score, clamped to 1-10.
    pub score: u8,
    /// Tier the score maps to, 1-4.
    pub recommended_tier: u8,
    /// Per-factor point breakdown, only non-zero contributions.
    pub factors: Vec<(&'static str, u8)>,
    /// Human-readable summary for logs.
    pub explanation: String,
}

const WEB_KEYWORDS: &[&str] = &[
    "search", "find", "look up", "google", "browse", "fetch", "download", "url",
];

const FILE_KEYWORDS: &[&str] = &[
    "create file",
    "save",
    "write to",
    "docx",
    "pdf",
    "xlsx",
    "pptx",
    "document",
];

const CODE_KEYWORDS: &[&str] = &[
    "code",
    "debug",
    "function",
    "class",
    "api",
    "endpoint",
    "script",
    "deploy",
    "python",
    "javascript",
    "git",
    "commit",
    "push",
];

const MULTI_DOMAIN_KEYWORDS: &[&str] = &[
    "compare", "analyze", "research", "strategy", "plan", "vs", "versus",
];

const LONG_CONTENT_KEYWORDS: &[&str] =
    &["detailed", "comprehensive", "essay", "report", "page"];

const MEDIUM_CONTENT_KEYWORDS: &[&str] = &["summarize", "explain", "describe", "list"];

const ACCURACY_KEYWORDS: &[&str] = &[
    "invoice",
    "bill",
    "tax",
    "gst",
    "financial",
    "legal",
    "payment",
];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Score a task from explicit factors.
///
/// Additive: steps contribute 1-3 points, web and file access 1 each,
/// code execution and multi-domain knowledge 2 each, content length
/// 0-2, accuracy criticality 3. The sum is clamped to 1-10.
pub fn score_complexity(factors: &ComplexityFactors) -> ComplexityScore {
    let mut breakdown: Vec<(&'static str, u8)> = Vec::new();
    let mut score: u32 = 0;

    let step_points = match factors.num_steps_estimate {
        0 | 1 => 1,
        2 | 3 => 2,
        _ => 3,
    };
    breakdown.push(("steps", step_points));
    score += u32::from(step_points);

    if factors.requires_web {
        breakdown.push(("web", 1));
        score += 1;
    }
    if factors.requires_file {
        breakdown.push(("file", 1));
        score += 1;
    }
    if factors.requires_code {
        breakdown.push(("code", 2));
        score += 2;
    }
    if factors.requires_multi_domain {
        breakdown.push(("multi_domain", 2));
        score += 2;
    }

    let length_points = factors.content_length.points();
    if length_points > 0 {
        breakdown.push(("content_length", length_points));
        score += u32::from(length_points);
    }

    if factors.accuracy_critical {
        breakdown.push(("accuracy", 3));
        score += 3;
    }

    let score = score.clamp(1, 10) as u8;
    let tier = score_to_tier(i64::from(score));

    let factor_list = breakdown
        .iter()
        .map(|(name, points)| format!("{name}={points}"))
        .collect::<Vec<_>>()
        .join(", ");
    let explanation = format!("complexity {score}/10, tier {tier}, factors: {factor_list}");

    ComplexityScore {
        score,
        recommended_tier: tier,
        factors: breakdown,
        explanation,
    }
}

/// Score a task from its text alone, inferring factors from keywords.
pub fn quick_score(text: &str) -> ComplexityScore {
    let lower = text.to_lowercase();

    let content_length = if contains_any(&lower, LONG_CONTENT_KEYWORDS) {
        ContentLength::Long
    } else if contains_any(&lower, MEDIUM_CONTENT_KEYWORDS) {
        ContentLength::Medium
    } else {
        ContentLength::Short
    };

    let conjunctions =
        lower.matches(" and ").count() as u32 + lower.matches(" then ").count() as u32;
    let num_steps = if conjunctions > 0 { conjunctions + 1 } else { 1 };

    score_complexity(&ComplexityFactors {
        requires_web: contains_any(&lower, WEB_KEYWORDS),
        requires_file: contains_any(&lower, FILE_KEYWORDS),
        requires_code: contains_any(&lower, CODE_KEYWORDS),
        requires_multi_domain: contains_any(&lower, MULTI_DOMAIN_KEYWORDS),
        content_length,
        accuracy_critical: contains_any(&lower, ACCURACY_KEYWORDS),
        num_steps_estimate: num_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_task_scores_one() {
        let result = score_complexity(&ComplexityFactors::default());
        assert_eq!(result.score, 1);
        assert_eq!(result.recommended_tier, 1);
        assert_eq!(result.factors, vec![("steps", 1)]);
    }

    #[test]
    fn everything_on_clamps_to_ten() {
        let result = score_complexity(&ComplexityFactors {
            requires_web: true,
            requires_file: true,
            requires_code: true,
            requires_multi_domain: true,
            content_length: ContentLength::Long,
            accuracy_critical: true,
            num_steps_estimate: 6,
        });
        // Raw sum is 3+1+1+2+2+2+3 = 14.
        assert_eq!(result.score, 10);
        assert_eq!(result.recommended_tier, 4);
    }

    #[test]
    fn step_count_banding() {
        for (steps, points) in [(0, 1), (1, 1), (2, 2), (3, 2), (4, 3), (20, 3)] {
            let result = score_complexity(&ComplexityFactors {
                num_steps_estimate: steps,
                ..ComplexityFactors::default()
            });
            assert_eq!(result.factors[0], ("steps", points), "steps={steps}");
        }
    }

    #[test]
    fn code_weighs_more_than_web() {
        let web = score_complexity(&ComplexityFactors {
            requires_web: true,
            ..ComplexityFactors::default()
        });
        let code = score_complexity(&ComplexityFactors {
            requires_code: true,
            ..ComplexityFactors::default()
        });
        assert!(code.score > web.score);
    }

    #[test]
    fn accuracy_criticality_adds_three() {
        let result = score_complexity(&ComplexityFactors {
            accuracy_critical: true,
            ..ComplexityFactors::default()
        });
        assert_eq!(result.score, 4);
        assert!(result.factors.contains(&("accuracy", 3)));
    }

    #[test]
    fn quick_score_simple_greeting_is_cheap() {
        let result = quick_score("hello, how are you?");
        assert_eq!(result.score, 1);
        assert_eq!(result.recommended_tier, 1);
    }

    #[test]
    fn quick_score_orders_simple_below_complex() {
        let simple = quick_score("hi there");
        let research = quick_score("search for the latest rust release and summarize it");
        let heavy = quick_score(
            "research kubernetes versus nomad, write a detailed comparison report, \
             and then create a pdf document",
        );
        assert!(simple.score < research.score);
        assert!(research.score < heavy.score);
    }

    #[test]
    fn quick_score_detects_financial_accuracy() {
        let result = quick_score("prepare the gst invoice for march");
        assert!(result.factors.contains(&("accuracy", 3)));
    }

    #[test]
    fn quick_score_counts_conjunction_steps() {
        let result = quick_score("do this and that and then the other thing");
        // Two " and " plus one " then " gives four estimated steps.
        assert_eq!(result.factors[0], ("steps", 3));
    }

    #[test]
    fn explanation_mentions_score_and_tier() {
        let result = quick_score("debug my python function");
        assert!(result.explanation.contains(&format!("{}/10", result.score)));
        assert!(
            result
                .explanation
                .contains(&format!("tier {}", result.recommended_tier))
        );
    }
}
