use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};
use sysinfo::{System, SystemExt};

/// Cached memory reading, refreshed at most every `REFRESH_EVERY`.
struct MemState {
    sys: System,
    last_check: Instant,
    last_frac: f64, // available / total (0.0..1.0)
}

static STATE: OnceLock<Mutex<MemState>> = OnceLock::new();
const REFRESH_EVERY: Duration = Duration::from_millis(500);

/// Returns a recent estimate of available memory fraction (0.0..1.0).
pub fn available_memory_fraction() -> f64 {
    let m = STATE.get_or_init(|| {
        Mutex::new(MemState {
            sys: System::new(),
            last_check: Instant::now() - REFRESH_EVERY * 2,
            last_frac: 1.0,
        })
    });
    let Ok(mut st) = m.lock() else { return 1.0 };
    let now = Instant::now();
    if now.duration_since(st.last_check) >= REFRESH_EVERY {
        st.sys.refresh_memory();
        let total = st.sys.total_memory() as f64;
        let avail = st.sys.available_memory() as f64;
        st.last_frac = if total > 0.0 { (avail / total).clamp(0.0, 1.0) } else { 1.0 };
        st.last_check = now;
    }
    st.last_frac
}

pub fn is_low_memory(threshold: f64) -> bool {
    available_memory_fraction() < threshold
}

/// Watches memory while a batch accumulates and warns once if it runs low.
/// The whole batch must be resident before identifiers can be assigned, so
/// this only reports; it never throttles or drops records.
pub struct BatchMemoryWatch {
    threshold: f64,
    every: usize,
    warned: bool,
}

impl BatchMemoryWatch {
    pub fn new(threshold: f64) -> Self {
        Self { threshold, every: 10_000, warned: false }
    }

    /// Call after each record with the number collected so far.
    pub fn observe(&mut self, rows: usize, label: &str) {
        if self.warned || self.threshold <= 0.0 || rows % self.every != 0 {
            return;
        }
        if is_low_memory(self.threshold) {
            self.warned = true;
            tracing::warn!(
                "available memory below {:.0}% after collecting {} {}; the batch is held in memory until it is persisted",
                self.threshold * 100.0,
                rows,
                label
            );
        }
    }
}
