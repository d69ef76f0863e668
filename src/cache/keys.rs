//! Cache key scheme for follow lists.

use std::fmt;

use crate::models::UserId;

/// Which side of the follow edges a cached list holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Users the owner follows
    Following,
    /// Users following the owner
    Followers,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Following => "following",
            Direction::Followers => "followers",
        }
    }
}

/// Key of one cached follow list, rendered as `<direction>:<user_id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub direction: Direction,
    pub user_id: UserId,
}

impl CacheKey {
    pub fn following(user_id: &UserId) -> Self {
        Self {
            direction: Direction::Following,
            user_id: user_id.clone(),
        }
    }

    pub fn followers(user_id: &UserId) -> Self {
        Self {
            direction: Direction::Followers,
            user_id: user_id.clone(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.direction.as_str(), self.user_id)
    }
}
