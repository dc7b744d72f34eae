#![forbid(unsafe_code)]

pub mod rating {
    pub const MIN_RATING: i64 = 0;
    pub const MAX_RATING: i64 = 5;
    pub const RECOMMENDATION_THRESHOLD: i64 = 4;

    /// A validated survey rating in `[0, 5]`.
    ///
    /// A rating of `0` is stored but treated as "unanswered": it is excluded
    /// from satisfaction averages and from the rating total.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Rating(i64);

    impl Rating {
        pub fn try_new(value: i64) -> Result<Self, RatingError> {
            if !(MIN_RATING..=MAX_RATING).contains(&value) {
                return Err(RatingError::OutOfRange { value });
            }
            Ok(Self(value))
        }

        pub fn value(self) -> i64 {
            self.0
        }

        pub fn is_positive(self) -> bool {
            self.0 > 0
        }

        pub fn is_recommendation(self) -> bool {
            self.0 >= RECOMMENDATION_THRESHOLD
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum RatingError {
        OutOfRange { value: i64 },
    }
}

pub mod category {
    pub const MAX_CATEGORY_LEN: usize = 50;

    /// A validated survey category: non-empty after trimming, at most 50
    /// characters (the original column width).
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Category(String);

    impl Category {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn into_string(self) -> String {
            self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, CategoryError> {
            let value = value.into();
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(CategoryError::Empty);
            }
            if trimmed.chars().count() > MAX_CATEGORY_LEN {
                return Err(CategoryError::TooLong);
            }
            Ok(Self(trimmed.to_string()))
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum CategoryError {
        Empty,
        TooLong,
    }
}

pub mod feedback {
    /// Trims a free-text answer; whitespace-only answers collapse to `None`
    /// and are never stored.
    pub fn normalize_answer(answer: &str) -> Option<String> {
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

pub mod stats {
    /// Heuristic per-row byte weights for the stored-data size estimate.
    /// Preserved as-is for parity with historical stats output.
    pub const RESPONSE_WEIGHT_BYTES: i64 = 100;
    pub const RATING_WEIGHT_BYTES: i64 = 50;
    pub const FEEDBACK_WEIGHT_BYTES: i64 = 200;

    pub fn round1(value: f64) -> f64 {
        (value * 10.0).round() / 10.0
    }

    pub fn round2(value: f64) -> f64 {
        (value * 100.0).round() / 100.0
    }

    /// Mean of the answered (positive) ratings, one decimal place; 0 when
    /// nothing was answered.
    pub fn average_satisfaction(rating_sum: i64, rating_count: i64) -> f64 {
        if rating_count <= 0 {
            return 0.0;
        }
        round1(rating_sum as f64 / rating_count as f64)
    }

    /// Share of answered ratings that are 4 or 5, as a whole percent; 0 when
    /// nothing was answered. The division is guarded, never propagated.
    pub fn recommendation_rate(high_rating_count: i64, rating_count: i64) -> i64 {
        if rating_count <= 0 {
            return 0;
        }
        (high_rating_count as f64 / rating_count as f64 * 100.0).round() as i64
    }

    pub fn estimated_size_kb(response_count: i64, rating_count: i64, feedback_count: i64) -> f64 {
        let bytes = response_count * RESPONSE_WEIGHT_BYTES
            + rating_count * RATING_WEIGHT_BYTES
            + feedback_count * FEEDBACK_WEIGHT_BYTES;
        round2(bytes as f64 / 1024.0)
    }
}

pub mod admin {
    /// Bootstrap secret installed on first use when no credential exists.
    pub const DEFAULT_ADMIN_PASSWORD: &str = "CarWashBoys!";

    /// Option name the admin credential hash is stored under.
    pub const CREDENTIAL_KEY: &str = "survey_admin_password";

    pub const MIN_PASSWORD_LEN: usize = 6;

    pub fn password_meets_policy(password: &str) -> bool {
        password.chars().count() >= MIN_PASSWORD_LEN
    }
}
