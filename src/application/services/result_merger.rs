use std::collections::HashMap;

use strsim::jaro_winkler;

use crate::application::services::normalize::{normalize_email, normalize_phone, normalize_text};
use crate::domain::{Candidate, StrategyKind};

/// Pairwise similarity above this collapses two candidates into one.
const DEDUP_THRESHOLD: f32 = 0.8;

const EMAIL_WEIGHT: f32 = 0.40;
const PHONE_WEIGHT: f32 = 0.25;
const NAME_WEIGHT: f32 = 0.25;
const ROLE_WEIGHT: f32 = 0.10;

/// Collapses duplicate contacts coming out of one or more strategies.
///
/// Similarity is weighted over the fields both candidates actually have,
/// renormalized so a sparse pair is judged on what can be compared. An
/// identical normalized email is treated as proof of identity outright.
pub struct ResultMerger {
    threshold: f32,
}

impl ResultMerger {
    pub fn new() -> Self {
        Self {
            threshold: DEDUP_THRESHOLD,
        }
    }

    /// Merging can create a candidate that now matches one it did not
    /// before, so passes repeat until the set stops shrinking.
    pub fn merge(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let mut merged = candidates;
        loop {
            let before = merged.len();
            merged = self.merge_pass(merged);
            if merged.len() == before {
                break;
            }
        }
        merged
    }

    fn merge_pass(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        if candidates.len() < 2 {
            return candidates;
        }

        let mut parents: Vec<usize> = (0..candidates.len()).collect();
        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                if similarity(&candidates[i], &candidates[j]) > self.threshold {
                    union(&mut parents, i, j);
                }
            }
        }

        let mut clusters: Vec<Vec<Candidate>> = Vec::new();
        let mut cluster_of_root: HashMap<usize, usize> = HashMap::new();
        for (index, candidate) in candidates.into_iter().enumerate() {
            let root = find(&mut parents, index);
            let slot = *cluster_of_root.entry(root).or_insert_with(|| {
                clusters.push(Vec::new());
                clusters.len() - 1
            });
            clusters[slot].push(candidate);
        }

        clusters.into_iter().filter_map(merge_cluster).collect()
    }
}

impl Default for ResultMerger {
    fn default() -> Self {
        Self::new()
    }
}

fn find(parents: &mut [usize], index: usize) -> usize {
    let mut root = index;
    while parents[root] != root {
        root = parents[root];
    }
    let mut cursor = index;
    while parents[cursor] != root {
        let next = parents[cursor];
        parents[cursor] = root;
        cursor = next;
    }
    root
}

fn union(parents: &mut [usize], a: usize, b: usize) {
    let root_a = find(parents, a);
    let root_b = find(parents, b);
    if root_a != root_b {
        parents[root_b] = root_a;
    }
}

fn similarity(a: &Candidate, b: &Candidate) -> f32 {
    if let (Some(email_a), Some(email_b)) = (&a.email, &b.email) {
        if normalize_email(email_a) == normalize_email(email_b) {
            return 1.0;
        }
    }

    let mut score = 0.0f32;
    let mut weight = 0.0f32;

    if a.email.is_some() && b.email.is_some() {
        weight += EMAIL_WEIGHT;
    }

    if let (Some(phone_a), Some(phone_b)) = (&a.phone, &b.phone) {
        if normalize_phone(phone_a) == normalize_phone(phone_b) {
            score += PHONE_WEIGHT;
        }
        weight += PHONE_WEIGHT;
    }

    score += NAME_WEIGHT * jaro_winkler(&normalize_text(&a.name), &normalize_text(&b.name)) as f32;
    weight += NAME_WEIGHT;

    if let (Some(role_a), Some(role_b)) = (&a.role, &b.role) {
        score += ROLE_WEIGHT * jaro_winkler(&normalize_text(role_a), &normalize_text(role_b)) as f32;
        weight += ROLE_WEIGHT;
    }

    if weight == 0.0 {
        return 0.0;
    }
    score / weight
}

/// Field-level union biased toward the most complete member, with model
/// output ahead of pattern output at equal completeness. Provenance and
/// the best raw confidence survive the merge.
fn merge_cluster(mut members: Vec<Candidate>) -> Option<Candidate> {
    members.sort_by(|a, b| {
        b.completeness()
            .cmp(&a.completeness())
            .then(from_model(b).cmp(&from_model(a)))
            .then(b.raw_confidence.total_cmp(&a.raw_confidence))
    });

    let mut drained = members.into_iter();
    let mut merged = drained.next()?;

    for member in drained {
        if merged.role.is_none() {
            merged.role = member.role;
        }
        if merged.company.is_none() {
            merged.company = member.company;
        }
        if merged.email.is_none() {
            merged.email = member.email;
        }
        if merged.phone.is_none() {
            merged.phone = member.phone;
        }
        merged.merged_from.extend(member.merged_from);
        merged.raw_confidence = merged.raw_confidence.max(member.raw_confidence);
    }

    Some(merged)
}

fn from_model(candidate: &Candidate) -> bool {
    candidate.merged_from.contains(&StrategyKind::Model)
}
