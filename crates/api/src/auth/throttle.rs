//! Fixed-window throttle on failed logins, keyed by client IP.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    failures: u32,
}

/// Counts failed logins per IP. Once `max_attempts` failures fall inside one
/// window, further attempts are refused until the window ends.
#[derive(Debug)]
pub struct LoginThrottle {
    max_attempts: u32,
    window: Duration,
    entries: Mutex<HashMap<IpAddr, Window>>,
}

impl LoginThrottle {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// `Err(secs)` with the seconds left in the window when `ip` is blocked.
    pub fn check(&self, ip: IpAddr) -> Result<(), u64> {
        self.check_at(ip, Instant::now())
    }

    pub fn record_failure(&self, ip: IpAddr) {
        self.record_failure_at(ip, Instant::now());
    }

    /// Forget the IP's failures after a successful login.
    pub fn clear(&self, ip: IpAddr) {
        self.lock().remove(&ip);
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> Result<(), u64> {
        let mut entries = self.lock();
        let Some(entry) = entries.get(&ip).copied() else {
            return Ok(());
        };
        let elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            entries.remove(&ip);
            return Ok(());
        }
        if entry.failures >= self.max_attempts {
            let remaining = self.window - elapsed;
            return Err(remaining.as_secs().max(1));
        }
        Ok(())
    }

    fn record_failure_at(&self, ip: IpAddr, now: Instant) {
        let mut entries = self.lock();
        // Drop stale windows so the map does not grow without bound.
        let window = self.window;
        entries.retain(|_, w| now.saturating_duration_since(w.started) < window);
        entries
            .entry(ip)
            .and_modify(|w| w.failures += 1)
            .or_insert(Window {
                started: now,
                failures: 1,
            });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<IpAddr, Window>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    const IP: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    const OTHER: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

    #[test]
    fn blocks_after_max_failures() {
        let t = LoginThrottle::new(3, Duration::from_secs(60));
        let now = Instant::now();
        for _ in 0..3 {
            assert!(t.check_at(IP, now).is_ok());
            t.record_failure_at(IP, now);
        }
        let retry = t.check_at(IP, now + Duration::from_secs(10)).unwrap_err();
        assert_eq!(retry, 50);
        assert!(t.check_at(OTHER, now).is_ok(), "other IPs are unaffected");
    }

    #[test]
    fn window_expiry_unblocks() {
        let t = LoginThrottle::new(1, Duration::from_secs(60));
        let now = Instant::now();
        t.record_failure_at(IP, now);
        assert!(t.check_at(IP, now).is_err());
        assert!(t.check_at(IP, now + Duration::from_secs(61)).is_ok());
    }

    #[test]
    fn clear_resets_counter() {
        let t = LoginThrottle::new(1, Duration::from_secs(60));
        t.record_failure(IP);
        assert!(t.check(IP).is_err());
        t.clear(IP);
        assert!(t.check(IP).is_ok());
    }
}
