use crate::domain::{DocumentProfile, ExecutionPlan, ExtractionOptions, StrategyKind};

/// Structural confidence at or above this routes pattern-first with a
/// model fallback.
const HIGH_STRUCTURE_THRESHOLD: f32 = 0.7;

/// Structural confidence below this skips pattern extraction entirely.
const LOW_STRUCTURE_THRESHOLD: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct RoutingRules {
    /// Documents larger than this are never raced, to bound cost.
    pub size_ceiling_bytes: u64,
}

impl Default for RoutingRules {
    fn default() -> Self {
        Self {
            size_ceiling_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("routing produced an empty plan for {document_type}")]
    NoApplicableStrategy { document_type: String },
}

/// Decides which extraction strategies run for a document, and how.
pub struct RoutingPolicy {
    rules: RoutingRules,
}

impl RoutingPolicy {
    pub fn new(rules: RoutingRules) -> Self {
        Self { rules }
    }

    pub fn decide(
        &self,
        profile: &DocumentProfile,
        size_bytes: u64,
        options: &ExtractionOptions,
    ) -> Result<ExecutionPlan, RoutingError> {
        let plan = self.choose(profile, size_bytes, options);
        if plan.strategies().is_empty() {
            return Err(RoutingError::NoApplicableStrategy {
                document_type: profile.document_type.to_string(),
            });
        }
        tracing::debug!(
            plan = %plan,
            size_bytes,
            structural_confidence = profile.structural_confidence,
            forced = options.force_strategy.is_some(),
            "Routing decided"
        );
        Ok(plan)
    }

    fn choose(
        &self,
        profile: &DocumentProfile,
        size_bytes: u64,
        options: &ExtractionOptions,
    ) -> ExecutionPlan {
        if let Some(forced) = options.force_strategy {
            return ExecutionPlan::Single(forced);
        }

        if size_bytes > self.rules.size_ceiling_bytes {
            return ExecutionPlan::FallbackChain(vec![StrategyKind::Pattern, StrategyKind::Model]);
        }

        if profile.structural_confidence >= HIGH_STRUCTURE_THRESHOLD {
            ExecutionPlan::FallbackChain(vec![StrategyKind::Pattern, StrategyKind::Model])
        } else if profile.structural_confidence < LOW_STRUCTURE_THRESHOLD {
            ExecutionPlan::Single(StrategyKind::Model)
        } else {
            ExecutionPlan::RaceAndMerge(vec![StrategyKind::Pattern, StrategyKind::Model])
        }
    }
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self::new(RoutingRules::default())
    }
}
