use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque process-unique identity token.
///
/// Assigned to each message and signal at model-build time, so hot decode
/// paths can key lookups on an integer instead of re-hashing names.
pub type Quark = u64;

static CURRENT_QUARK: AtomicU64 = AtomicU64::new(0);

/// Returns the next quark. Safe to call from concurrent model builds.
pub(crate) fn next() -> Quark {
    CURRENT_QUARK.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarks_are_unique() {
        let a = next();
        let b = next();
        let c = next();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(b > a);
    }
}
