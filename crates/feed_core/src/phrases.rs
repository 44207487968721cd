//! Canned text for passenger feedback and cancellation reasons.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::records::Feedback;

const POSITIVE_COMMENTS: &[&str] = &[
    "The ride was very smooth and comfortable.",
    "Driver was polite and the vehicle was clean.",
    "Arrived on time and provided great service.",
    "Very professional and courteous driver.",
    "Enjoyed the ride, no complaints at all.",
];

const NEUTRAL_COMMENTS: &[&str] = &[
    "The ride was okay, nothing special.",
    "Driver followed the route, but the experience was average.",
    "Had to wait a bit longer than expected, but it was fine.",
    "Ride was acceptable, though the car could have been cleaner.",
    "Service was decent, but there's room for improvement.",
];

const NEGATIVE_COMMENTS: &[&str] = &[
    "Driver was late and the vehicle was not clean.",
    "Had a very uncomfortable ride due to traffic and delays.",
    "Driver was rude and took an unnecessary detour.",
    "The car condition was poor and the experience was bad.",
    "Not satisfied with the service, would not recommend.",
];

const CANCELLATION_TEMPLATES: &[&str] = &[
    "Driver delayed due to {reason}.",
    "Passenger unable to find the driver at {location}.",
    "Ride request canceled because {issue}.",
    "Unexpected personal emergency occurred at {time}.",
    "Driver's vehicle broke down near {location}.",
    "Driver refused to pick up due to {reason}.",
    "Passenger found an alternative ride at {time}.",
    "Destination changed by the passenger at the last minute.",
    "Driver reported a safety concern at {location}.",
    "Passenger did not show up at the pickup location at {time}.",
    "Changed plans.",
    "Wait time too long.",
    "Booked by mistake.",
];

const REASONS: &[&str] = &[
    "a road closure",
    "heavy congestion on the bridge",
    "a flat tire",
    "a police checkpoint",
    "an earlier ride running long",
    "a navigation error",
];

const STREETS: &[&str] = &[
    "Canal Street",
    "Broadway",
    "West 34th Street",
    "Houston Street",
    "Lexington Avenue",
    "Delancey Street",
    "Park Row",
    "Water Street",
];

const ISSUES: &[&str] = &[
    "the fare estimate changed",
    "the app showed the wrong pickup pin",
    "the payment method was declined",
    "the assigned vehicle was too small",
    "the driver asked to cancel",
];

/// Comment matching the tone of `rating`: positive for 4–5, neutral for 3,
/// negative for 1–2.
pub fn feedback_comment<R: Rng + ?Sized>(rating: i32, rng: &mut R) -> &'static str {
    let pool = if rating >= 4 {
        POSITIVE_COMMENTS
    } else if rating == 3 {
        NEUTRAL_COMMENTS
    } else {
        NEGATIVE_COMMENTS
    };
    pick(pool, rng)
}

/// Feedback with a rating drawn uniformly from `ratings` and a comment from
/// the matching tone band.
pub fn sample_feedback<R: Rng + ?Sized>(ratings: RangeInclusive<i32>, rng: &mut R) -> Feedback {
    let rating = rng.gen_range(ratings);
    Feedback {
        rating,
        comments: feedback_comment(rating, rng).to_string(),
    }
}

pub fn cancellation_reason<R: Rng + ?Sized>(rng: &mut R) -> String {
    let template = pick(CANCELLATION_TEMPLATES, rng);
    let mut reason = template.to_string();
    if reason.contains("{reason}") {
        reason = reason.replace("{reason}", pick(REASONS, rng));
    }
    if reason.contains("{location}") {
        reason = reason.replace("{location}", pick(STREETS, rng));
    }
    if reason.contains("{issue}") {
        reason = reason.replace("{issue}", pick(ISSUES, rng));
    }
    if reason.contains("{time}") {
        let time = format!(
            "{:02}:{:02}:{:02}",
            rng.gen_range(0..24),
            rng.gen_range(0..60),
            rng.gen_range(0..60)
        );
        reason = reason.replace("{time}", &time);
    }
    reason
}

fn pick<R: Rng + ?Sized>(pool: &'static [&'static str], rng: &mut R) -> &'static str {
    // Pools are non-empty constants.
    pool.choose(rng).copied().unwrap_or_default()
}
