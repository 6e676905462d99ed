use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AppError;

/// Fixed radar-chart axes, in display order.
pub const VISUAL_AXES: [&str; 5] = [
    "Market Demand",
    "Competitive Pressure",
    "Differentiation Potential",
    "Profitability Potential",
    "Execution Complexity",
];

/// The product idea to analyze (1-2 lines).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysisInput {
    pub idea_text: String,
}

/// One scored component of the growth score, 0-20 with a short justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub score: f64,
    pub explanation: String,
}

impl ScoreComponent {
    pub fn new(score: f64, explanation: impl Into<String>) -> Self {
        Self {
            score,
            explanation: explanation.into(),
        }
    }
}

/// The five named sub-scores that sum to the growth score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthScoreBreakdown {
    pub market_size: ScoreComponent,
    pub competition_pressure: ScoreComponent,
    pub technical_feasibility: ScoreComponent,
    pub differentiation: ScoreComponent,
    pub monetization_potential: ScoreComponent,
}

impl GrowthScoreBreakdown {
    pub fn components(&self) -> [&ScoreComponent; 5] {
        [
            &self.market_size,
            &self.competition_pressure,
            &self.technical_feasibility,
            &self.differentiation,
            &self.monetization_potential,
        ]
    }

    pub fn total(&self) -> f64 {
        self.components().iter().map(|c| c.score).sum()
    }
}

/// One radar-chart entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualDatum {
    pub name: String,
    pub value: f64,
}

/// The sanitized report handed to rendering and persistence collaborators.
/// Serializes to the camelCase JSON shape those layers rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysisOutput {
    pub verdict: String,
    pub growth_score: f64,
    pub growth_score_breakdown: GrowthScoreBreakdown,
    pub risk_level: String,
    pub summary: String,
    pub key_insights: Vec<String>,
    pub explanation: String,
    pub profit_strategy: String,
    pub competitors: String,
    pub next_action: String,
    pub visual_data: Vec<VisualDatum>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub footnote: String,
}

// --- Untrusted candidate shapes (sanitizer input) ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentCandidate {
    pub score: Option<f64>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BreakdownCandidate {
    pub market_size: ComponentCandidate,
    pub competition_pressure: ComponentCandidate,
    pub technical_feasibility: ComponentCandidate,
    pub differentiation: ComponentCandidate,
    pub monetization_potential: ComponentCandidate,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualDatumCandidate {
    pub name: Option<String>,
    pub value: Option<f64>,
}

/// A partial, untrusted report. Every field may be missing; the sanitizer
/// turns any candidate into a valid `MarketAnalysisOutput`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportCandidate {
    pub verdict: Option<String>,
    pub growth_score: Option<f64>,
    pub growth_score_breakdown: Option<BreakdownCandidate>,
    pub risk_level: Option<String>,
    pub summary: Option<String>,
    pub key_insights: Option<Vec<String>>,
    pub explanation: Option<String>,
    pub profit_strategy: Option<String>,
    pub competitors: Option<String>,
    pub next_action: Option<String>,
    pub visual_data: Option<Vec<VisualDatumCandidate>>,
    pub footnote: Option<String>,
}

impl From<ScoreComponent> for ComponentCandidate {
    fn from(c: ScoreComponent) -> Self {
        Self {
            score: Some(c.score),
            explanation: Some(c.explanation),
        }
    }
}

impl From<GrowthScoreBreakdown> for BreakdownCandidate {
    fn from(b: GrowthScoreBreakdown) -> Self {
        Self {
            market_size: b.market_size.into(),
            competition_pressure: b.competition_pressure.into(),
            technical_feasibility: b.technical_feasibility.into(),
            differentiation: b.differentiation.into(),
            monetization_potential: b.monetization_potential.into(),
        }
    }
}

impl From<MarketAnalysisOutput> for ReportCandidate {
    fn from(o: MarketAnalysisOutput) -> Self {
        Self {
            verdict: Some(o.verdict),
            growth_score: Some(o.growth_score),
            growth_score_breakdown: Some(o.growth_score_breakdown.into()),
            risk_level: Some(o.risk_level),
            summary: Some(o.summary),
            key_insights: Some(o.key_insights),
            explanation: Some(o.explanation),
            profit_strategy: Some(o.profit_strategy),
            competitors: Some(o.competitors),
            next_action: Some(o.next_action),
            visual_data: Some(
                o.visual_data
                    .into_iter()
                    .map(|d| VisualDatumCandidate {
                        name: Some(d.name),
                        value: Some(d.value),
                    })
                    .collect(),
            ),
            footnote: Some(o.footnote),
        }
    }
}

// --- Remote response validation ---

/// The strict shape a remote response must satisfy: every field present with
/// the right type (footnote optional), component scores finite and in 0-20.
/// Anything less is a schema failure, which is never retried.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteReport {
    verdict: String,
    growth_score: f64,
    growth_score_breakdown: RemoteBreakdown,
    risk_level: String,
    summary: String,
    key_insights: Vec<String>,
    explanation: String,
    profit_strategy: String,
    competitors: String,
    next_action: String,
    visual_data: Vec<RemoteVisualDatum>,
    footnote: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteBreakdown {
    market_size: RemoteComponent,
    competition_pressure: RemoteComponent,
    technical_feasibility: RemoteComponent,
    differentiation: RemoteComponent,
    monetization_potential: RemoteComponent,
}

#[derive(Debug, Deserialize)]
struct RemoteComponent {
    score: f64,
    explanation: String,
}

#[derive(Debug, Deserialize)]
struct RemoteVisualDatum {
    name: String,
    value: f64,
}

/// Validate a raw provider response against the report schema.
///
/// No coercion happens here; a response that does not parse, or whose
/// component scores fall outside 0-20, is rejected outright. Coercion is the
/// sanitizer's job and applies only to schema-valid objects.
pub fn validate_remote_report(value: &Value) -> Result<ReportCandidate, AppError> {
    let report: RemoteReport = serde_json::from_value(value.clone())
        .map_err(|e| AppError::SchemaError(format!("invalid output schema: {}", e)))?;

    let components = [
        ("marketSize", &report.growth_score_breakdown.market_size),
        (
            "competitionPressure",
            &report.growth_score_breakdown.competition_pressure,
        ),
        (
            "technicalFeasibility",
            &report.growth_score_breakdown.technical_feasibility,
        ),
        (
            "differentiation",
            &report.growth_score_breakdown.differentiation,
        ),
        (
            "monetizationPotential",
            &report.growth_score_breakdown.monetization_potential,
        ),
    ];
    for (name, component) in components {
        if !component.score.is_finite() || !(0.0..=20.0).contains(&component.score) {
            return Err(AppError::SchemaError(format!(
                "invalid output schema: {} score {} out of range 0-20",
                name, component.score
            )));
        }
    }

    Ok(ReportCandidate {
        verdict: Some(report.verdict),
        growth_score: Some(report.growth_score),
        growth_score_breakdown: Some(BreakdownCandidate {
            market_size: ComponentCandidate {
                score: Some(report.growth_score_breakdown.market_size.score),
                explanation: Some(report.growth_score_breakdown.market_size.explanation),
            },
            competition_pressure: ComponentCandidate {
                score: Some(report.growth_score_breakdown.competition_pressure.score),
                explanation: Some(report.growth_score_breakdown.competition_pressure.explanation),
            },
            technical_feasibility: ComponentCandidate {
                score: Some(report.growth_score_breakdown.technical_feasibility.score),
                explanation: Some(report.growth_score_breakdown.technical_feasibility.explanation),
            },
            differentiation: ComponentCandidate {
                score: Some(report.growth_score_breakdown.differentiation.score),
                explanation: Some(report.growth_score_breakdown.differentiation.explanation),
            },
            monetization_potential: ComponentCandidate {
                score: Some(report.growth_score_breakdown.monetization_potential.score),
                explanation: Some(report.growth_score_breakdown.monetization_potential.explanation),
            },
        }),
        risk_level: Some(report.risk_level),
        summary: Some(report.summary),
        key_insights: Some(report.key_insights),
        explanation: Some(report.explanation),
        profit_strategy: Some(report.profit_strategy),
        competitors: Some(report.competitors),
        next_action: Some(report.next_action),
        visual_data: Some(
            report
                .visual_data
                .into_iter()
                .map(|d| VisualDatumCandidate {
                    name: Some(d.name),
                    value: Some(d.value),
                })
                .collect(),
        ),
        footnote: report.footnote,
    })
}

/// The output schema declared to the model provider, in Gemini's
/// OpenAPI-subset format. Mirrors `validate_remote_report`.
pub fn response_schema() -> Value {
    let component = |label: &str| {
        json!({
            "type": "OBJECT",
            "properties": {
                "score": {"type": "NUMBER", "description": format!("{} score (0-20)", label)},
                "explanation": {"type": "STRING", "description": format!("Short explanation for {} score", label)}
            },
            "required": ["score", "explanation"]
        })
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "verdict": {"type": "STRING", "description": "Overall verdict of the product idea."},
            "growthScore": {"type": "NUMBER", "description": "Growth score (0-100) of the product idea."},
            "growthScoreBreakdown": {
                "type": "OBJECT",
                "description": "Breakdown of the 5 Growth Score components",
                "properties": {
                    "marketSize": component("Market Size"),
                    "competitionPressure": component("Competition Pressure"),
                    "technicalFeasibility": component("Technical Feasibility"),
                    "differentiation": component("Differentiation/Uniqueness"),
                    "monetizationPotential": component("Monetization Potential")
                },
                "required": [
                    "marketSize",
                    "competitionPressure",
                    "technicalFeasibility",
                    "differentiation",
                    "monetizationPotential"
                ]
            },
            "riskLevel": {"type": "STRING", "description": "Risk level of the product idea."},
            "summary": {"type": "STRING", "description": "One-line summary of the product idea."},
            "keyInsights": {
                "type": "ARRAY",
                "items": {"type": "STRING"},
                "description": "Key insights about the product idea."
            },
            "explanation": {"type": "STRING", "description": "Detailed AI explanation of the market analysis."},
            "profitStrategy": {"type": "STRING", "description": "Profit strategy for the product idea."},
            "competitors": {"type": "STRING", "description": "Competitor landscape for the product idea."},
            "nextAction": {"type": "STRING", "description": "Next recommended action for the product idea."},
            "visualData": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": {"type": "STRING"},
                        "value": {"type": "NUMBER"}
                    },
                    "required": ["name", "value"]
                },
                "description": "Visual data for the radar chart (Market Demand, Competitive Pressure, Differentiation Potential, Profitability Potential, Execution Complexity)."
            },
            "footnote": {"type": "STRING", "description": "Optional post-report note (e.g., heuristic analysis notice)."}
        },
        "required": [
            "verdict",
            "growthScore",
            "growthScoreBreakdown",
            "riskLevel",
            "summary",
            "keyInsights",
            "explanation",
            "profitStrategy",
            "competitors",
            "nextAction",
            "visualData"
        ]
    })
}
