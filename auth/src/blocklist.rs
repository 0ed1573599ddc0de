use std::collections::HashSet;
use std::sync::PoisonError;
use std::sync::RwLock;

/// Set of revoked token ids (`jti`).
///
/// Lives for the whole process: it starts empty, only grows, and is not
/// persisted, so revocations are forgotten on restart. Entries are never
/// evicted, even after the token they name has expired.
#[derive(Debug, Default)]
pub struct Blocklist {
    revoked: RwLock<HashSet<String>>,
}

impl Blocklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a token id as revoked. Returns false if it already was.
    pub fn add(&self, jti: impl Into<String>) -> bool {
        self.revoked
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(jti.into())
    }

    pub fn contains(&self, jti: &str) -> bool {
        self.revoked
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(jti)
    }

    pub fn len(&self) -> usize {
        self.revoked
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_starts_empty() {
        let blocklist = Blocklist::new();
        assert!(blocklist.is_empty());
        assert!(!blocklist.contains("abc"));
    }

    #[test]
    fn test_add_and_contains() {
        let blocklist = Blocklist::new();

        assert!(blocklist.add("abc"));
        assert!(!blocklist.add("abc"));
        assert!(blocklist.contains("abc"));
        assert!(!blocklist.contains("abd"));
        assert_eq!(blocklist.len(), 1);
    }

    #[test]
    fn test_concurrent_adds_are_all_visible() {
        let blocklist = Arc::new(Blocklist::new());

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let blocklist = Arc::clone(&blocklist);
                thread::spawn(move || {
                    for i in 0..250 {
                        blocklist.add(format!("{worker}-{i}"));
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(blocklist.len(), 8 * 250);
        assert!(blocklist.contains("7-249"));
    }
}
