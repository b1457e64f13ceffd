use serde::Serialize;

use crate::store::Review;

/// Ratings live on a 0..=5 scale where 0 marks an inquiry rather than a
/// score. Inquiries never feed the average.
pub const MAX_RATING: i16 = 5;

/// Coerce the submitted rating. Numbers and numeric strings are accepted;
/// everything else becomes 0, and out-of-range values are clamped.
pub fn parse_rating(raw: Option<&serde_json::Value>) -> i16 {
    let value = match raw {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    };
    value.clamp(0, MAX_RATING as i64) as i16
}

/// Average rating for display: a number, or "N/A" with no rated reviews.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AverageRating {
    Value(f64),
    NotAvailable,
}

impl AverageRating {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AverageRating::Value(v) => Some(*v),
            AverageRating::NotAvailable => None,
        }
    }
}

impl Serialize for AverageRating {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            AverageRating::Value(v) => serializer.serialize_f64(*v),
            AverageRating::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RatingSummary {
    pub average: AverageRating,
    /// How many rated reviews feed the average; inquiries are not counted.
    pub count: usize,
}

/// Mean of the rated reviews, rounded to one decimal place.
pub fn rating_summary(reviews: &[Review]) -> RatingSummary {
    let rated: Vec<i16> = reviews
        .iter()
        .map(|r| r.rating)
        .filter(|r| (1..=MAX_RATING).contains(r))
        .collect();

    if rated.is_empty() {
        return RatingSummary {
            average: AverageRating::NotAvailable,
            count: 0,
        };
    }

    let sum: i64 = rated.iter().map(|r| *r as i64).sum();
    let mean = sum as f64 / rated.len() as f64;
    RatingSummary {
        average: AverageRating::Value((mean * 10.0).round() / 10.0),
        count: rated.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn review(rating: i16) -> Review {
        Review {
            visitor_name: "visitor".into(),
            rating,
            comment: "a comment".into(),
            submitted_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn parse_clamps_and_coerces() {
        assert_eq!(parse_rating(Some(&serde_json::json!(7))), 5);
        assert_eq!(parse_rating(Some(&serde_json::json!(-3))), 0);
        assert_eq!(parse_rating(Some(&serde_json::json!("4"))), 4);
        assert_eq!(parse_rating(Some(&serde_json::json!("abc"))), 0);
        assert_eq!(parse_rating(Some(&serde_json::json!(3.7))), 3);
        assert_eq!(parse_rating(Some(&serde_json::json!(null))), 0);
        assert_eq!(parse_rating(None), 0);
    }

    #[test]
    fn inquiries_are_excluded_from_the_average() {
        let reviews = vec![review(0), review(4), review(2)];
        let summary = rating_summary(&reviews);
        assert_eq!(summary.average, AverageRating::Value(3.0));
        assert_eq!(summary.count, 2);
    }

    #[test]
    fn no_rated_reviews_means_not_available() {
        assert_eq!(rating_summary(&[]).average, AverageRating::NotAvailable);
        let only_inquiries = vec![review(0), review(0)];
        let summary = rating_summary(&only_inquiries);
        assert_eq!(summary.average, AverageRating::NotAvailable);
        assert_eq!(summary.count, 0);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let reviews = vec![review(5), review(4), review(4)];
        assert_eq!(rating_summary(&reviews).average, AverageRating::Value(4.3));
    }

    #[test]
    fn not_available_serializes_as_text() {
        let json = serde_json::to_string(&AverageRating::NotAvailable).unwrap();
        assert_eq!(json, r#""N/A""#);
        let json = serde_json::to_string(&AverageRating::Value(4.5)).unwrap();
        assert_eq!(json, "4.5");
    }
}
