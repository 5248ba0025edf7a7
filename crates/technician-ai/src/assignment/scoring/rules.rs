use super::super::domain::TechnicianStats;

const NEUTRAL_SPECIALIZATION: f64 = 0.5;
const UNTAGGED_SPECIALIZATION: f64 = 0.3;
const NEWCOMER_PERFORMANCE: f64 = 0.65;
const ASSUMED_SUCCESS_RATE: f64 = 0.8;
const AVAILABILITY_FLOOR: f64 = 0.2;

/// Share of requested categories covered by at least one tag.
///
/// A tag covers a category when either string contains the other. `None` when either side
/// has nothing to compare.
pub(crate) fn specialization_match_fraction(categories: &[String], tags: &[String]) -> Option<f64> {
    if categories.is_empty() || tags.is_empty() {
        return None;
    }

    let matches = categories
        .iter()
        .filter(|category| {
            tags.iter()
                .any(|tag| category.contains(tag.as_str()) || tag.contains(category.as_str()))
        })
        .count();

    Some(matches as f64 / categories.len() as f64)
}

pub(crate) fn specialization_score(categories: &[String], tags: &[String]) -> f64 {
    if categories.is_empty() {
        return NEUTRAL_SPECIALIZATION;
    }
    if tags.is_empty() {
        return UNTAGGED_SPECIALIZATION;
    }

    let fraction = specialization_match_fraction(categories, tags).unwrap_or(0.0);
    if fraction >= 1.0 {
        0.95
    } else if fraction >= 0.5 {
        0.70 + fraction * 0.20
    } else {
        0.50 + fraction * 0.20
    }
}

/// Remaining capacity on a ten-job scale.
pub(crate) fn capacity_score(workload: u32) -> f64 {
    (1.0 - f64::from(workload) / 10.0).max(0.0)
}

pub(crate) fn success_rate_or_assumed(stats: Option<&TechnicianStats>) -> f64 {
    stats
        .and_then(|stats| stats.success_rate)
        .filter(|rate| rate.is_finite())
        .map(|rate| rate.clamp(0.0, 1.0))
        .unwrap_or(ASSUMED_SUCCESS_RATE)
}

pub(crate) fn performance_score(stats: Option<&TechnicianStats>, workload: u32) -> f64 {
    match stats {
        Some(stats) if stats.total_bookings > 0 => {
            let success_rate = success_rate_or_assumed(Some(stats));
            (success_rate * 0.6 + capacity_score(workload) * 0.4).min(1.0)
        }
        _ => NEWCOMER_PERFORMANCE,
    }
}

/// Live review average wins over the profile rating once any review exists.
pub(crate) fn rating_score(profile_rating: f64, reviews_average: f64) -> f64 {
    let rating = if reviews_average > 0.0 {
        reviews_average
    } else {
        profile_rating
    };
    (rating / 5.0).clamp(0.0, 1.0)
}

pub(crate) fn availability_score(workload: u32) -> f64 {
    let workload = f64::from(workload);
    if workload <= 2.0 {
        1.0
    } else if workload <= 5.0 {
        0.9 - (workload - 2.0) * 0.06
    } else if workload <= 10.0 {
        0.6 - (workload - 5.0) * 0.04
    } else {
        (0.4 - (workload - 10.0) * 0.02).max(AVAILABILITY_FLOOR)
    }
}
