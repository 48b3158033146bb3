//! Pattern signature extraction and similarity-based issue prediction.
//!
//! The signature is a fixed, order-independent feature vector; prediction
//! scores it against a caller-supplied library of learned patterns.
//! Prediction never fails: degenerate inputs produce empty, zero-risk
//! results.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::{
    LearnedPattern, Packet, PacketStatistics, PatternSignature, PredictedIssue, PredictionResult,
    SimilarPattern,
};

/// Learned patterns scoring below this similarity are discarded.
pub const MIN_SIMILARITY: f64 = 0.3;

/// Contribution tiers for severity bucketing.
const SEVERITY_HIGH: f64 = 0.75;
const SEVERITY_MEDIUM: f64 = 0.5;

/// Weight of the categorical dominant-protocol match.
const PROTOCOL_WEIGHT: f64 = 0.2;
/// Weight of each of the four numeric features.
const FEATURE_WEIGHT: f64 = 0.2;

/// Reduce a capture's packets and statistics to its pattern signature.
///
/// The dominant protocol is the most frequent label; ties break by
/// first-seen order in the packet sequence. Rates are per hundred packets
/// and zero for an empty capture.
pub fn extract_pattern_signature(
    packets: &[Packet],
    statistics: &PacketStatistics,
) -> PatternSignature {
    let total = statistics.total_packets;
    let avg_packet_size = if total == 0 {
        0.0
    } else {
        statistics.bandwidth.total as f64 / total as f64
    };
    let retransmission_rate = rate(statistics.errors.retransmissions, total);
    let error_rate = rate(
        statistics.errors.retransmissions
            + statistics.errors.duplicate_acks
            + statistics.errors.resets,
        total,
    );

    let mut unique = HashSet::new();
    for packet in packets {
        if !packet.source.is_empty() {
            unique.insert(packet.source.as_str());
        }
        if !packet.destination.is_empty() {
            unique.insert(packet.destination.as_str());
        }
    }

    PatternSignature {
        dominant_protocol: dominant_protocol(packets),
        avg_packet_size,
        retransmission_rate,
        error_rate,
        unique_ips: unique.len() as u64,
    }
}

/// Score a signature against the learned-pattern library.
///
/// Surviving patterns are ranked by `similarity * confidence`; each
/// becomes one predicted issue. The overall risk score is the top
/// contribution scaled to 0-100. Zero patterns or zero survivors yield an
/// empty result, never an error.
///
/// # Examples
/// ```
/// use packetlens_core::{aggregate_statistics, extract_pattern_signature, predict_issues};
///
/// let stats = aggregate_statistics(&[]);
/// let signature = extract_pattern_signature(&[], &stats);
/// let prediction = predict_issues(&signature, &[]);
/// assert_eq!(prediction.overall_risk_score, 0);
/// assert!(prediction.predicted_issues.is_empty());
/// ```
pub fn predict_issues(
    signature: &PatternSignature,
    learned_patterns: &[LearnedPattern],
) -> PredictionResult {
    let mut scored: Vec<(f64, f64, &LearnedPattern)> = learned_patterns
        .iter()
        .filter_map(|pattern| {
            let similarity = similarity(signature, &pattern.signature);
            if similarity < MIN_SIMILARITY {
                return None;
            }
            Some((similarity * pattern.confidence_score, similarity, pattern))
        })
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let predicted_issues = scored
        .iter()
        .map(|(contribution, _, pattern)| PredictedIssue {
            severity: severity(*contribution).to_string(),
            description: pattern.outcome.clone(),
            confidence: percent(*contribution),
        })
        .collect();
    let similar_patterns = scored
        .iter()
        .map(|(_, similarity, pattern)| SimilarPattern {
            outcome: pattern.outcome.clone(),
            similarity: *similarity,
            confidence_score: pattern.confidence_score,
        })
        .collect();
    let overall_risk_score = scored
        .first()
        .map(|(contribution, _, _)| percent(*contribution))
        .unwrap_or(0);

    PredictionResult {
        predicted_issues,
        similar_patterns,
        overall_risk_score,
    }
}

/// Weighted inverse-distance over the five signature features.
fn similarity(a: &PatternSignature, b: &PatternSignature) -> f64 {
    let mut score = 0.0;
    if a.dominant_protocol == b.dominant_protocol {
        score += PROTOCOL_WEIGHT;
    }
    score += FEATURE_WEIGHT * affinity(a.avg_packet_size, b.avg_packet_size);
    score += FEATURE_WEIGHT * affinity(a.retransmission_rate, b.retransmission_rate);
    score += FEATURE_WEIGHT * affinity(a.error_rate, b.error_rate);
    score += FEATURE_WEIGHT * affinity(a.unique_ips as f64, b.unique_ips as f64);
    score
}

/// Normalized absolute-difference term: 1.0 for identical values, toward
/// 0.0 as they diverge.
fn affinity(a: f64, b: f64) -> f64 {
    1.0 - (a - b).abs() / a.max(b).max(1.0)
}

fn severity(contribution: f64) -> &'static str {
    if contribution >= SEVERITY_HIGH {
        "high"
    } else if contribution >= SEVERITY_MEDIUM {
        "medium"
    } else {
        "low"
    }
}

fn percent(contribution: f64) -> u32 {
    (contribution * 100.0).round().clamp(0.0, 100.0) as u32
}

fn rate(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Highest count wins; on equal counts the label seen earlier in the
/// capture wins.
fn dominant_protocol(packets: &[Packet]) -> String {
    let mut ordered: Vec<(&str, u64)> = Vec::new();
    for packet in packets {
        match ordered
            .iter_mut()
            .find(|(label, _)| *label == packet.protocol_label)
        {
            Some((_, count)) => *count += 1,
            None => ordered.push((&packet.protocol_label, 1)),
        }
    }
    let mut best: Option<(&str, u64)> = None;
    for (label, count) in ordered {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label.to_string()).unwrap_or_default()
}
