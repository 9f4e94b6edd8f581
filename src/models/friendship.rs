/// Unordered pair of distinct user ids, stored smaller id first
///
/// Both `FriendPair::new(a, b)` and `FriendPair::new(b, a)` produce the same
/// value, so a single row lookup answers the relation in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FriendPair {
    low: i64,
    high: i64,
}

impl FriendPair {
    /// Returns `None` for a self pair
    pub fn new(a: i64, b: i64) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> i64 {
        self.low
    }

    pub fn high(&self) -> i64 {
        self.high
    }
}
