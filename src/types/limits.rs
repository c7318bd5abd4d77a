//! Runtime limit types

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

nonzero_newtype! {
    /// A non-zero worker thread count
    ///
    /// Parsing `"0"` resolves to the number of available CPU cores.
    ///
    /// # Examples
    /// ```
    /// use nntp_mock::types::ThreadCount;
    ///
    /// let threads: ThreadCount = "2".parse().unwrap();
    /// assert_eq!(threads.get(), 2);
    ///
    /// let auto: ThreadCount = "0".parse().unwrap();
    /// assert!(auto.get() >= 1);
    /// ```
    pub struct ThreadCount(NonZeroUsize: usize, serialize as serialize_u64);
}

impl ThreadCount {
    /// Single-threaded runtime, plenty for a test server
    pub const DEFAULT: Self = Self(NonZeroUsize::new(1).unwrap());

    /// Number of CPU cores, falling back to 1
    #[must_use]
    pub fn from_cpu_count() -> Self {
        std::thread::available_parallelism()
            .map(Self)
            .unwrap_or(Self::DEFAULT)
    }
}

impl Default for ThreadCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::str::FromStr for ThreadCount {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.parse::<usize>()?;
        Ok(Self::new(value).unwrap_or_else(Self::from_cpu_count))
    }
}

/// Serde helper for durations written as whole seconds in config files
pub mod duration_serde {
    use super::*;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
