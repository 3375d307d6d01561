use chrono::{DateTime, Duration, Utc};
use insights_core::{TimeRange, TimeRangeKey};

/// Span, bucket count and bucket width implied by a range token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeShape {
    pub span: Duration,
    pub buckets: u32,
    pub width: Duration,
}

pub fn range_shape(range: TimeRangeKey) -> RangeShape {
    match range {
        TimeRangeKey::LastHour => RangeShape {
            span: Duration::hours(1),
            buckets: 12,
            width: Duration::minutes(5),
        },
        TimeRangeKey::LastDay => RangeShape {
            span: Duration::hours(24),
            buckets: 24,
            width: Duration::hours(1),
        },
        TimeRangeKey::LastWeek => RangeShape {
            span: Duration::days(7),
            buckets: 7,
            width: Duration::days(1),
        },
        TimeRangeKey::LastMonth => RangeShape {
            span: Duration::days(30),
            buckets: 30,
            width: Duration::days(1),
        },
    }
}

/// Equal-width partition of `[now - span, now)`, oldest bucket first.
///
/// `now` is captured once; the last bucket ends exactly at it.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketPlan {
    pub range: TimeRangeKey,
    pub window: TimeRange,
    pub width: Duration,
    pub buckets: Vec<TimeRange>,
}

impl BucketPlan {
    pub fn new(range: TimeRangeKey, now: DateTime<Utc>) -> Self {
        let shape = range_shape(range);
        let start = now - shape.span;
        let buckets = (0..shape.buckets)
            .map(|index| {
                let bucket_start = start + shape.width * index as i32;
                let bucket_end = if index + 1 == shape.buckets {
                    now
                } else {
                    start + shape.width * (index + 1) as i32
                };
                TimeRange {
                    start: bucket_start,
                    end: bucket_end,
                }
            })
            .collect();
        Self {
            range,
            window: TimeRange { start, end: now },
            width: shape.width,
            buckets,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.window.end
    }

    pub fn bucket_index(&self, ts: DateTime<Utc>) -> Option<usize> {
        if self.buckets.is_empty() || !self.window.contains(ts) {
            return None;
        }
        let width = self.width.num_milliseconds();
        if width <= 0 {
            return None;
        }
        let offset = (ts - self.window.start).num_milliseconds();
        let index = (offset / width) as usize;
        Some(index.min(self.buckets.len() - 1))
    }
}

pub fn plan_window(range: TimeRangeKey, now: DateTime<Utc>) -> BucketPlan {
    let plan = BucketPlan::new(range, now);
    tracing::debug!(
        range = range.as_str(),
        start = %plan.window.start,
        end = %plan.window.end,
        buckets = plan.buckets.len(),
        "planned analytics window"
    );
    plan
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 14, 37, 12).unwrap()
    }

    #[test]
    fn shapes_match_range_table() {
        let cases = [
            (TimeRangeKey::LastHour, 12, Duration::minutes(5)),
            (TimeRangeKey::LastDay, 24, Duration::hours(1)),
            (TimeRangeKey::LastWeek, 7, Duration::days(1)),
            (TimeRangeKey::LastMonth, 30, Duration::days(1)),
        ];
        for (range, count, width) in cases {
            let plan = BucketPlan::new(range, fixed_now());
            assert_eq!(plan.buckets.len(), count, "{}", range.as_str());
            assert_eq!(plan.width, width);
            assert_eq!(plan.window.end - plan.window.start, range_shape(range).span);
        }
    }

    #[test]
    fn buckets_are_contiguous_and_end_at_now() {
        for range in [
            TimeRangeKey::LastHour,
            TimeRangeKey::LastDay,
            TimeRangeKey::LastWeek,
            TimeRangeKey::LastMonth,
        ] {
            let plan = BucketPlan::new(range, fixed_now());
            assert_eq!(plan.buckets[0].start, plan.window.start);
            for pair in plan.buckets.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
                assert!(pair[0].start < pair[0].end);
            }
            assert_eq!(plan.buckets.last().map(|bucket| bucket.end), Some(fixed_now()));
        }
    }

    #[test]
    fn bucket_index_respects_half_open_bounds() {
        let now = fixed_now();
        let plan = BucketPlan::new(TimeRangeKey::LastDay, now);
        assert_eq!(plan.bucket_index(plan.window.start), Some(0));
        assert_eq!(plan.bucket_index(plan.buckets[3].start), Some(3));
        assert_eq!(
            plan.bucket_index(plan.buckets[3].end - Duration::milliseconds(1)),
            Some(3)
        );
        assert_eq!(plan.bucket_index(now - Duration::seconds(1)), Some(23));
        assert_eq!(plan.bucket_index(now), None);
        assert_eq!(
            plan.bucket_index(plan.window.start - Duration::seconds(1)),
            None
        );
    }
}
