//! Age-to-brightness classification.
//!
//! Every visible line is placed in one of six buckets by how long ago it
//! arrived. Fresh output is drawn bright, stale output dim, so a glance is
//! enough to tell what the last build step printed.

use std::time::Duration;

/// Upper bounds (exclusive) of the first five buckets, freshest first.
const BUCKET_LIMITS: [Duration; 5] = [
    Duration::from_secs(5),
    Duration::from_secs(30),
    Duration::from_secs(60),
    Duration::from_secs(120),
    Duration::from_secs(300),
];

/// Recency class of a line, ordered freshest to stalest.
///
/// The derived `Ord` follows declaration order, so `a < b` means `a` is
/// hotter than `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HotnessBucket {
    /// Younger than 5 seconds.
    Blazing,
    /// Younger than 30 seconds.
    Hot,
    /// Younger than 1 minute.
    Warm,
    /// Younger than 2 minutes.
    Cooling,
    /// Younger than 5 minutes.
    Cool,
    /// Everything older.
    Cold,
}

impl HotnessBucket {
    /// All buckets, freshest first.
    pub const ALL: [HotnessBucket; 6] = [
        HotnessBucket::Blazing,
        HotnessBucket::Hot,
        HotnessBucket::Warm,
        HotnessBucket::Cooling,
        HotnessBucket::Cool,
        HotnessBucket::Cold,
    ];

    /// Classify a line by its age.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use watchlog::view::HotnessBucket;
    ///
    /// assert_eq!(HotnessBucket::for_age(Duration::from_secs(1)), HotnessBucket::Blazing);
    /// assert_eq!(HotnessBucket::for_age(Duration::from_secs(5)), HotnessBucket::Hot);
    /// assert_eq!(HotnessBucket::for_age(Duration::from_secs(600)), HotnessBucket::Cold);
    /// ```
    pub fn for_age(age: Duration) -> Self {
        BUCKET_LIMITS
            .iter()
            .position(|limit| age < *limit)
            .map_or(HotnessBucket::Cold, |index| Self::ALL[index])
    }

    /// Index into [`HotnessBucket::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}
