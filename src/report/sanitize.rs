use std::sync::OnceLock;

use regex::Regex;

use crate::report::schema::{
    BreakdownCandidate, ComponentCandidate, GrowthScoreBreakdown, MarketAnalysisOutput,
    ReportCandidate, ScoreComponent, VisualDatum, VISUAL_AXES,
};

/// Trim a string and collapse blank or sentinel values ("n/a", "na", "null",
/// "undefined", any case) to the empty string.
pub fn cleanse(s: &str) -> String {
    let v = s.trim();
    if v.is_empty() {
        return String::new();
    }
    static SENTINEL: OnceLock<Regex> = OnceLock::new();
    let re = SENTINEL.get_or_init(|| Regex::new(r"(?i)^(n/?a|null|undefined)$").unwrap());
    if re.is_match(v) {
        String::new()
    } else {
        v.to_string()
    }
}

fn sanitize_component(candidate: ComponentCandidate) -> ScoreComponent {
    let score = candidate
        .score
        .filter(|s| s.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 20.0);
    let explanation = cleanse(candidate.explanation.as_deref().unwrap_or(""));
    ScoreComponent {
        score,
        explanation: if explanation.is_empty() {
            "Not analyzed".to_string()
        } else {
            explanation
        },
    }
}

fn not_analyzed_breakdown() -> GrowthScoreBreakdown {
    let component = || ScoreComponent::new(0.0, "Not analyzed");
    GrowthScoreBreakdown {
        market_size: component(),
        competition_pressure: component(),
        technical_feasibility: component(),
        differentiation: component(),
        monetization_potential: component(),
    }
}

/// The five fixed radar axes, all zero.
pub fn zero_visual_data() -> Vec<VisualDatum> {
    VISUAL_AXES
        .iter()
        .map(|name| VisualDatum {
            name: (*name).to_string(),
            value: 0.0,
        })
        .collect()
}

/// Normalize any candidate report into a value satisfying every structural
/// invariant. Total and idempotent; sanitizing a sanitized report changes
/// nothing.
///
/// Field precedence, in one place:
/// - `growthScore`: the breakdown sum wins whenever a breakdown is present
///   and sums above zero; otherwise the candidate's own finite value,
///   clamped to 0-100; otherwise 0. A provider score that disagrees with
///   its breakdown is silently overridden.
/// - breakdown: component scores coerced to finite values in 0-20, blank
///   explanations become "Not analyzed"; a missing breakdown is synthesized
///   with all components at zero.
/// - `riskLevel`: "Medium" when blank after cleansing.
/// - `keyInsights`: each entry cleansed, entries that end up blank dropped,
///   order preserved, duplicates kept.
/// - `visualData`: a missing or empty list becomes the five fixed zero-value
///   axes; a supplied list is cleansed per entry (name cleansed, non-finite
///   values to 0) but neither its length nor its names are forced, to
///   accommodate provider-shaped output.
pub fn sanitize(candidate: ReportCandidate) -> MarketAnalysisOutput {
    let had_breakdown = candidate.growth_score_breakdown.is_some();
    let breakdown = match candidate.growth_score_breakdown {
        Some(b) => sanitize_breakdown(b),
        None => not_analyzed_breakdown(),
    };

    let calculated = if had_breakdown { breakdown.total() } else { 0.0 };
    let growth_score = if calculated > 0.0 {
        calculated
    } else {
        candidate
            .growth_score
            .filter(|s| s.is_finite())
            .unwrap_or(0.0)
            .clamp(0.0, 100.0)
    };

    let risk_level = {
        let v = cleanse(candidate.risk_level.as_deref().unwrap_or(""));
        if v.is_empty() {
            "Medium".to_string()
        } else {
            v
        }
    };

    let key_insights = candidate
        .key_insights
        .unwrap_or_default()
        .iter()
        .map(|s| cleanse(s))
        .filter(|s| !s.is_empty())
        .collect();

    let visual_data = match candidate.visual_data {
        Some(entries) if !entries.is_empty() => entries
            .into_iter()
            .map(|d| VisualDatum {
                name: cleanse(d.name.as_deref().unwrap_or("")),
                value: d.value.filter(|v| v.is_finite()).unwrap_or(0.0),
            })
            .collect(),
        _ => zero_visual_data(),
    };

    MarketAnalysisOutput {
        verdict: cleanse(candidate.verdict.as_deref().unwrap_or("")),
        growth_score,
        growth_score_breakdown: breakdown,
        risk_level,
        summary: cleanse(candidate.summary.as_deref().unwrap_or("")),
        key_insights,
        explanation: cleanse(candidate.explanation.as_deref().unwrap_or("")),
        profit_strategy: cleanse(candidate.profit_strategy.as_deref().unwrap_or("")),
        competitors: cleanse(candidate.competitors.as_deref().unwrap_or("")),
        next_action: cleanse(candidate.next_action.as_deref().unwrap_or("")),
        visual_data,
        footnote: cleanse(candidate.footnote.as_deref().unwrap_or("")),
    }
}

fn sanitize_breakdown(candidate: BreakdownCandidate) -> GrowthScoreBreakdown {
    GrowthScoreBreakdown {
        market_size: sanitize_component(candidate.market_size),
        competition_pressure: sanitize_component(candidate.competition_pressure),
        technical_feasibility: sanitize_component(candidate.technical_feasibility),
        differentiation: sanitize_component(candidate.differentiation),
        monetization_potential: sanitize_component(candidate.monetization_potential),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate_from_json(value: serde_json::Value) -> ReportCandidate {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_cleanse_sentinels() {
        assert_eq!(cleanse("  hello "), "hello");
        assert_eq!(cleanse(""), "");
        assert_eq!(cleanse("   "), "");
        assert_eq!(cleanse("n/a"), "");
        assert_eq!(cleanse("NA"), "");
        assert_eq!(cleanse("null"), "");
        assert_eq!(cleanse("UNDEFINED"), "");
        // Sentinels only match whole values
        assert_eq!(cleanse("not available"), "not available");
        assert_eq!(cleanse("nullable field"), "nullable field");
    }

    #[test]
    fn test_empty_candidate_gets_safe_defaults() {
        let report = sanitize(ReportCandidate::default());
        assert_eq!(report.verdict, "");
        assert_eq!(report.growth_score, 0.0);
        assert_eq!(report.risk_level, "Medium");
        assert!(report.key_insights.is_empty());
        assert_eq!(report.visual_data.len(), 5);
        for (datum, name) in report.visual_data.iter().zip(VISUAL_AXES) {
            assert_eq!(datum.name, name);
            assert_eq!(datum.value, 0.0);
        }
        for component in report.growth_score_breakdown.components() {
            assert_eq!(component.score, 0.0);
            assert_eq!(component.explanation, "Not analyzed");
        }
    }

    #[test]
    fn test_growth_score_recomputed_from_breakdown() {
        let candidate = candidate_from_json(json!({
            "growthScore": 99,
            "growthScoreBreakdown": {
                "marketSize": {"score": 10, "explanation": "a"},
                "competitionPressure": {"score": 10, "explanation": "b"},
                "technicalFeasibility": {"score": 10, "explanation": "c"},
                "differentiation": {"score": 10, "explanation": "d"},
                "monetizationPotential": {"score": 10, "explanation": "e"},
            }
        }));
        let report = sanitize(candidate);
        // The breakdown is the source of truth; the raw 99 is overridden.
        assert_eq!(report.growth_score, 50.0);
    }

    #[test]
    fn test_raw_growth_score_used_when_breakdown_sums_to_zero() {
        let candidate = candidate_from_json(json!({
            "growthScore": 42,
            "growthScoreBreakdown": {
                "marketSize": {"score": 0, "explanation": "a"},
                "competitionPressure": {"score": 0, "explanation": "b"},
                "technicalFeasibility": {"score": 0, "explanation": "c"},
                "differentiation": {"score": 0, "explanation": "d"},
                "monetizationPotential": {"score": 0, "explanation": "e"},
            }
        }));
        assert_eq!(sanitize(candidate).growth_score, 42.0);
    }

    #[test]
    fn test_raw_growth_score_clamped_without_breakdown() {
        let candidate = candidate_from_json(json!({"growthScore": 150}));
        assert_eq!(sanitize(candidate).growth_score, 100.0);
    }

    #[test]
    fn test_component_scores_clamped() {
        let candidate = candidate_from_json(json!({
            "growthScoreBreakdown": {
                "marketSize": {"score": 35, "explanation": "a"},
                "competitionPressure": {"score": -5, "explanation": "b"},
                "technicalFeasibility": {"score": 10, "explanation": "c"},
                "differentiation": {"score": 10, "explanation": "d"},
                "monetizationPotential": {"score": 10, "explanation": "e"},
            }
        }));
        let report = sanitize(candidate);
        assert_eq!(report.growth_score_breakdown.market_size.score, 20.0);
        assert_eq!(report.growth_score_breakdown.competition_pressure.score, 0.0);
        assert_eq!(report.growth_score, 50.0);
        for component in report.growth_score_breakdown.components() {
            assert!((0.0..=20.0).contains(&component.score));
        }
    }

    #[test]
    fn test_risk_level_defaults_to_medium() {
        let candidate = candidate_from_json(json!({"riskLevel": "n/a"}));
        assert_eq!(sanitize(candidate).risk_level, "Medium");

        let candidate = candidate_from_json(json!({"riskLevel": " High "}));
        assert_eq!(sanitize(candidate).risk_level, "High");
    }

    #[test]
    fn test_key_insights_cleansed_order_preserved() {
        let candidate = candidate_from_json(json!({
            "keyInsights": ["  first ", "", "n/a", "second", "second"]
        }));
        let report = sanitize(candidate);
        // Blanks and sentinels dropped, order preserved, duplicates kept
        assert_eq!(report.key_insights, vec!["first", "second", "second"]);
    }

    #[test]
    fn test_supplied_visual_data_not_reshaped() {
        let candidate = candidate_from_json(json!({
            "visualData": [
                {"name": " Market Demand ", "value": 70},
                {"name": "Custom Axis"}
            ]
        }));
        let report = sanitize(candidate);
        // Per-entry cleansing only; length and names are not forced
        assert_eq!(report.visual_data.len(), 2);
        assert_eq!(report.visual_data[0].name, "Market Demand");
        assert_eq!(report.visual_data[0].value, 70.0);
        assert_eq!(report.visual_data[1].name, "Custom Axis");
        assert_eq!(report.visual_data[1].value, 0.0);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let candidate = candidate_from_json(json!({
            "verdict": " Strong Opportunity ",
            "growthScore": 150,
            "riskLevel": "n/a",
            "keyInsights": ["n/a", " keep me "],
            "visualData": [{"name": "null", "value": 3}],
            "footnote": "undefined"
        }));
        let once = sanitize(candidate);
        let twice = sanitize(once.clone().into());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_footnote_cleansed() {
        let candidate = candidate_from_json(json!({"footnote": "  see notes  "}));
        assert_eq!(sanitize(candidate).footnote, "see notes");

        let candidate = candidate_from_json(json!({"footnote": "n/a"}));
        assert_eq!(sanitize(candidate).footnote, "");
    }
}
