use crate::report::sanitize::{sanitize, zero_visual_data};
use crate::report::schema::{
    BreakdownCandidate, GrowthScoreBreakdown, MarketAnalysisOutput, ReportCandidate,
    ScoreComponent, VisualDatum, VisualDatumCandidate,
};

/// Result of the deterministic keyword scorer. A component is `None` when
/// the idea text carries no recognizable signal for it; the scorer never
/// interpolates a score in that case, mirroring the remote prompt's own rule
/// against fabricating numbers.
#[derive(Debug, Clone)]
pub struct HeuristicScore {
    pub market_size: Option<ScoreComponent>,
    pub competition_pressure: Option<ScoreComponent>,
    pub technical_feasibility: Option<ScoreComponent>,
    pub differentiation: Option<ScoreComponent>,
    pub monetization_potential: Option<ScoreComponent>,
    pub missing_info: Vec<String>,
}

impl HeuristicScore {
    /// True only when all five components matched a rule.
    pub fn can_calculate(&self) -> bool {
        self.market_size.is_some()
            && self.competition_pressure.is_some()
            && self.technical_feasibility.is_some()
            && self.differentiation.is_some()
            && self.monetization_potential.is_some()
    }
}

fn has(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Score an idea text component by component. Matching is lowercase
/// substring matching; within each component the first matching rule wins.
pub fn score_idea(idea_text: &str) -> HeuristicScore {
    let t = idea_text.to_lowercase();
    let mut missing_info = Vec::new();

    // Market Size - only score if clear indicators are present
    let market_size = if has(&t, &["enterprise", "b2b", "business", "corporate", "companies"]) {
        Some(ScoreComponent::new(
            15.0,
            "B2B/Enterprise market with significant addressable size",
        ))
    } else if has(&t, &["consumer", "personal", "individual", "users", "people", "everyone"]) {
        if has(&t, &["global", "worldwide", "international"]) {
            Some(ScoreComponent::new(
                18.0,
                "Large consumer market with global reach potential",
            ))
        } else {
            Some(ScoreComponent::new(
                14.0,
                "Consumer market with substantial user base",
            ))
        }
    } else if has(&t, &["niche", "specific", "specialized"]) {
        Some(ScoreComponent::new(
            8.0,
            "Niche market with limited but defined audience",
        ))
    } else {
        missing_info.push("target market size and user base".to_string());
        None
    };

    // Competition Pressure - only score if the landscape is mentioned.
    // Explicit absence phrasing ("no direct competitors") counts as unique
    // positioning and must win over the bare "competitors" keyword.
    let competition_pressure = if has(
        &t,
        &["google", "amazon", "microsoft", "meta", "apple", "openai", "chatgpt"],
    ) {
        Some(ScoreComponent::new(
            3.0,
            "High competition from major tech companies",
        ))
    } else if has(&t, &["no direct competitors", "no competitors", "no one else"]) {
        Some(ScoreComponent::new(
            17.0,
            "Limited competition with unique positioning",
        ))
    } else if has(&t, &["competitors", "competing", "similar", "existing solutions"]) {
        Some(ScoreComponent::new(
            8.0,
            "Moderate competition with existing players",
        ))
    } else if has(&t, &["unique", "first", "novel", "new approach"]) {
        Some(ScoreComponent::new(
            17.0,
            "Limited competition with unique positioning",
        ))
    } else {
        missing_info.push("competitive landscape and existing solutions".to_string());
        None
    };

    // Technical Feasibility - only score if complexity is clear
    let technical_feasibility = if has(
        &t,
        &["ai", "machine learning", "blockchain", "quantum", "complex algorithm"],
    ) {
        Some(ScoreComponent::new(
            8.0,
            "Complex technology requiring specialized expertise",
        ))
    } else if has(&t, &["web app", "mobile app", "website", "platform", "simple"]) {
        Some(ScoreComponent::new(
            16.0,
            "Standard technology stack, straightforward to build",
        ))
    } else if has(&t, &["api", "integration", "automation", "software"]) {
        Some(ScoreComponent::new(
            13.0,
            "Moderate complexity using established technologies",
        ))
    } else {
        missing_info.push("technical implementation details and complexity".to_string());
        None
    };

    // Differentiation - only score if uniqueness is described
    let differentiation = if has(
        &t,
        &["breakthrough", "revolutionary", "never been done", "first of its kind"],
    ) {
        Some(ScoreComponent::new(
            19.0,
            "Highly innovative with breakthrough differentiation",
        ))
    } else if has(&t, &["unique", "novel", "different approach", "innovative"]) {
        Some(ScoreComponent::new(
            15.0,
            "Notable differentiation from existing solutions",
        ))
    } else if has(&t, &["better", "faster", "easier", "improved"]) {
        Some(ScoreComponent::new(
            10.0,
            "Incremental improvements over current options",
        ))
    } else if has(&t, &["similar", "like", "copy", "clone"]) {
        Some(ScoreComponent::new(
            4.0,
            "Limited differentiation from existing solutions",
        ))
    } else {
        missing_info.push("unique value proposition and differentiation".to_string());
        None
    };

    // Monetization - only score if a revenue model is mentioned
    let monetization_potential = if has(
        &t,
        &["subscription", "saas", "monthly fee", "recurring revenue"],
    ) {
        Some(ScoreComponent::new(17.0, "Strong recurring revenue model"))
    } else if has(&t, &["enterprise sales", "b2b sales", "high price", "premium"]) {
        Some(ScoreComponent::new(16.0, "High-value B2B sales model"))
    } else if has(&t, &["marketplace", "commission", "transaction fee"]) {
        Some(ScoreComponent::new(
            14.0,
            "Transaction-based revenue with scaling potential",
        ))
    } else if has(&t, &["ads", "advertising", "freemium"]) {
        Some(ScoreComponent::new(
            9.0,
            "Ad-based model with moderate revenue potential",
        ))
    } else {
        missing_info.push("revenue model and monetization strategy".to_string());
        None
    };

    HeuristicScore {
        market_size,
        competition_pressure,
        technical_feasibility,
        differentiation,
        monetization_potential,
        missing_info,
    }
}

/// Build a complete, sanitized report from the idea text alone. This is the
/// offline fallback path; it makes no external calls and is fully
/// deterministic.
pub fn heuristic_report(idea_text: &str) -> MarketAnalysisOutput {
    let scored = score_idea(idea_text);

    if !scored.can_calculate() {
        return needs_definition_report(&scored.missing_info);
    }

    let breakdown = GrowthScoreBreakdown {
        market_size: scored.market_size.unwrap_or_else(|| unreachable_component()),
        competition_pressure: scored
            .competition_pressure
            .unwrap_or_else(|| unreachable_component()),
        technical_feasibility: scored
            .technical_feasibility
            .unwrap_or_else(|| unreachable_component()),
        differentiation: scored
            .differentiation
            .unwrap_or_else(|| unreachable_component()),
        monetization_potential: scored
            .monetization_potential
            .unwrap_or_else(|| unreachable_component()),
    };

    let growth_score = breakdown.total();

    let risk_level = if growth_score >= 70.0 {
        "Low"
    } else if growth_score >= 50.0 {
        "Medium"
    } else {
        "High"
    };
    let verdict = if growth_score >= 75.0 {
        "Strong Opportunity"
    } else if growth_score >= 55.0 {
        "Viable with Risks"
    } else {
        "Needs Validation"
    };

    let explanation = format!(
        "Growth Score: {}/100\n\nBreakdown:\n\
         - Market Size: {}/20 ({})\n\
         - Competition Pressure: {}/20 ({})\n\
         - Technical Feasibility: {}/20 ({})\n\
         - Differentiation: {}/20 ({})\n\
         - Monetization Potential: {}/20 ({})",
        growth_score,
        breakdown.market_size.score,
        breakdown.market_size.explanation,
        breakdown.competition_pressure.score,
        breakdown.competition_pressure.explanation,
        breakdown.technical_feasibility.score,
        breakdown.technical_feasibility.explanation,
        breakdown.differentiation.score,
        breakdown.differentiation.explanation,
        breakdown.monetization_potential.score,
        breakdown.monetization_potential.explanation,
    );

    // First strictly-strongest component in breakdown order
    let strongest = breakdown
        .components()
        .into_iter()
        .fold(None::<&ScoreComponent>, |best, c| match best {
            Some(b) if b.score >= c.score => Some(b),
            _ => Some(c),
        })
        .map(|c| c.explanation.clone())
        .unwrap_or_default();

    let summary = if idea_text.chars().count() > 120 {
        let head: String = idea_text.chars().take(117).collect();
        format!("{}...", head)
    } else {
        idea_text.to_string()
    };

    let visual_data = vec![
        VisualDatum {
            name: "Market Demand".to_string(),
            value: (breakdown.market_size.score * 5.0).round(),
        },
        // Low competition-pressure score means heavy competition, so the
        // displayed pressure is inverted
        VisualDatum {
            name: "Competitive Pressure".to_string(),
            value: ((20.0 - breakdown.competition_pressure.score) * 5.0).round(),
        },
        VisualDatum {
            name: "Differentiation Potential".to_string(),
            value: (breakdown.differentiation.score * 5.0).round(),
        },
        VisualDatum {
            name: "Profitability Potential".to_string(),
            value: (breakdown.monetization_potential.score * 5.0).round(),
        },
        // Low feasibility means high complexity, also inverted
        VisualDatum {
            name: "Execution Complexity".to_string(),
            value: ((20.0 - breakdown.technical_feasibility.score) * 5.0).round(),
        },
    ];

    let profit_strategy = breakdown.monetization_potential.explanation.clone();
    let competitors = breakdown.competition_pressure.explanation.clone();

    sanitize(ReportCandidate {
        verdict: Some(verdict.to_string()),
        growth_score: Some(growth_score),
        growth_score_breakdown: Some(BreakdownCandidate::from(breakdown)),
        risk_level: Some(risk_level.to_string()),
        summary: Some(summary),
        key_insights: Some(vec![
            format!(
                "Growth Score calculated as sum of 5 components: {}/100",
                growth_score
            ),
            format!("Strongest factor: {}", strongest),
            "Key consideration: Based on provided information only".to_string(),
        ]),
        explanation: Some(explanation),
        profit_strategy: Some(profit_strategy),
        competitors: Some(competitors),
        next_action: Some("Validate assumptions with target users and market research".to_string()),
        visual_data: Some(to_visual_candidates(visual_data)),
        footnote: Some(
            "Growth Score = Market Size + Competition Pressure + Technical Feasibility + \
             Differentiation + Monetization Potential"
                .to_string(),
        ),
    })
}

/// Report returned when one or more components could not be scored: the
/// user is asked to clarify the specific missing categories.
fn needs_definition_report(missing_info: &[String]) -> MarketAnalysisOutput {
    let missing = missing_info.join(", ");
    let component = || ScoreComponent::new(0.0, "Insufficient information");
    let breakdown = GrowthScoreBreakdown {
        market_size: component(),
        competition_pressure: component(),
        technical_feasibility: component(),
        differentiation: component(),
        monetization_potential: component(),
    };

    sanitize(ReportCandidate {
        verdict: Some("Needs Definition".to_string()),
        growth_score: Some(0.0),
        growth_score_breakdown: Some(BreakdownCandidate::from(breakdown)),
        risk_level: Some("High".to_string()),
        summary: Some("Incomplete idea description".to_string()),
        key_insights: Some(vec![format!(
            "I need more information to provide an accurate Growth Score. Please clarify: {}",
            missing
        )]),
        explanation: Some(format!(
            "To properly evaluate this idea, I need more details about: {}. Please provide this \
             information so I can calculate an accurate Growth Score with the required breakdown.",
            missing
        )),
        profit_strategy: Some("Cannot determine without revenue model details".to_string()),
        competitors: Some(
            "Cannot assess without competitive landscape information".to_string(),
        ),
        next_action: Some("Provide missing information for proper evaluation".to_string()),
        visual_data: Some(to_visual_candidates(zero_visual_data())),
        footnote: Some(format!("Missing information: {}", missing)),
    })
}

fn to_visual_candidates(data: Vec<VisualDatum>) -> Vec<VisualDatumCandidate> {
    data.into_iter()
        .map(|d| VisualDatumCandidate {
            name: Some(d.name),
            value: Some(d.value),
        })
        .collect()
}

fn unreachable_component() -> ScoreComponent {
    // Guarded by can_calculate() above
    ScoreComponent::new(0.0, "Insufficient information")
}
