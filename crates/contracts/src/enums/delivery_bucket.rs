use serde::{Deserialize, Serialize};

/// Delivery speed bucket attached to every delivered record.
///
/// Breakpoints: `<= 3`, `<= 7`, everything above. A missing delivery date
/// maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeliveryCategory {
    #[serde(rename = "1-3 days")]
    UpTo3Days,
    #[serde(rename = "4-7 days")]
    From4To7Days,
    #[serde(rename = "8+ days")]
    Over7Days,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl DeliveryCategory {
    pub fn from_days(days: Option<i64>) -> Self {
        match days {
            None => DeliveryCategory::Unknown,
            Some(d) if d <= 3 => DeliveryCategory::UpTo3Days,
            Some(d) if d <= 7 => DeliveryCategory::From4To7Days,
            Some(_) => DeliveryCategory::Over7Days,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeliveryCategory::UpTo3Days => "1-3 days",
            DeliveryCategory::From4To7Days => "4-7 days",
            DeliveryCategory::Over7Days => "8+ days",
            DeliveryCategory::Unknown => "Unknown",
        }
    }

    /// All buckets in display order.
    pub fn all() -> Vec<DeliveryCategory> {
        vec![
            DeliveryCategory::UpTo3Days,
            DeliveryCategory::From4To7Days,
            DeliveryCategory::Over7Days,
            DeliveryCategory::Unknown,
        ]
    }
}

/// Finer delivery bucket used only when relating delivery time to review
/// scores. It splits the long tail at 14 days and is deliberately kept
/// separate from [`DeliveryCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeliveryTimeBucket {
    #[serde(rename = "1-3 days")]
    UpTo3Days,
    #[serde(rename = "4-7 days")]
    From4To7Days,
    #[serde(rename = "8-14 days")]
    From8To14Days,
    #[serde(rename = "15+ days")]
    Over14Days,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl DeliveryTimeBucket {
    pub fn from_days(days: Option<i64>) -> Self {
        match days {
            None => DeliveryTimeBucket::Unknown,
            Some(d) if d <= 3 => DeliveryTimeBucket::UpTo3Days,
            Some(d) if d <= 7 => DeliveryTimeBucket::From4To7Days,
            Some(d) if d <= 14 => DeliveryTimeBucket::From8To14Days,
            Some(_) => DeliveryTimeBucket::Over14Days,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeliveryTimeBucket::UpTo3Days => "1-3 days",
            DeliveryTimeBucket::From4To7Days => "4-7 days",
            DeliveryTimeBucket::From8To14Days => "8-14 days",
            DeliveryTimeBucket::Over14Days => "15+ days",
            DeliveryTimeBucket::Unknown => "Unknown",
        }
    }

    pub fn all() -> Vec<DeliveryTimeBucket> {
        vec![
            DeliveryTimeBucket::UpTo3Days,
            DeliveryTimeBucket::From4To7Days,
            DeliveryTimeBucket::From8To14Days,
            DeliveryTimeBucket::Over14Days,
            DeliveryTimeBucket::Unknown,
        ]
    }
}

impl std::fmt::Display for DeliveryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for DeliveryTimeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_category_breakpoints() {
        let cases = [
            (None, DeliveryCategory::Unknown),
            (Some(0), DeliveryCategory::UpTo3Days),
            (Some(3), DeliveryCategory::UpTo3Days),
            (Some(4), DeliveryCategory::From4To7Days),
            (Some(7), DeliveryCategory::From4To7Days),
            (Some(8), DeliveryCategory::Over7Days),
            (Some(14), DeliveryCategory::Over7Days),
            (Some(15), DeliveryCategory::Over7Days),
            (Some(100), DeliveryCategory::Over7Days),
        ];
        for (days, expected) in cases {
            assert_eq!(DeliveryCategory::from_days(days), expected, "days = {:?}", days);
        }
    }

    #[test]
    fn test_delivery_time_bucket_breakpoints() {
        let cases = [
            (None, DeliveryTimeBucket::Unknown),
            (Some(0), DeliveryTimeBucket::UpTo3Days),
            (Some(3), DeliveryTimeBucket::UpTo3Days),
            (Some(4), DeliveryTimeBucket::From4To7Days),
            (Some(7), DeliveryTimeBucket::From4To7Days),
            (Some(8), DeliveryTimeBucket::From8To14Days),
            (Some(14), DeliveryTimeBucket::From8To14Days),
            (Some(15), DeliveryTimeBucket::Over14Days),
            (Some(100), DeliveryTimeBucket::Over14Days),
        ];
        for (days, expected) in cases {
            assert_eq!(DeliveryTimeBucket::from_days(days), expected, "days = {:?}", days);
        }
    }

    #[test]
    fn test_negative_days_land_in_first_bucket() {
        assert_eq!(DeliveryCategory::from_days(Some(-1)), DeliveryCategory::UpTo3Days);
        assert_eq!(DeliveryTimeBucket::from_days(Some(-1)), DeliveryTimeBucket::UpTo3Days);
    }

    #[test]
    fn test_labels_serialize_as_display_strings() {
        let json = serde_json::to_string(&DeliveryTimeBucket::From8To14Days).unwrap();
        assert_eq!(json, "\"8-14 days\"");
        assert_eq!(DeliveryCategory::Over7Days.to_string(), "8+ days");
    }
}
