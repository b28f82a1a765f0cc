//! Web-vital metrics reported back by the booking page.
//!
//! The page measures a metric once per page load and posts it to the server,
//! which hands it to the callbacks registered for that metric's name.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricName {
    Cls,
    Fcp,
    Fid,
    Lcp,
    Ttfb,
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricName::Cls => "CLS",
            MetricName::Fcp => "FCP",
            MetricName::Fid => "FID",
            MetricName::Lcp => "LCP",
            MetricName::Ttfb => "TTFB",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEntry {
    pub name: String,
    pub entry_type: String,
    pub start_time: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: MetricName,
    pub value: f64,
    pub id: String,
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub entries: Option<Vec<PerformanceEntry>>,
}

type Callback = Arc<dyn Fn(&Metric) + Send + Sync>;

/// Number of recently delivered metric ids remembered for de-duplication.
pub const DEFAULT_DELIVERED_CAPACITY: usize = 10_000;

type MetricKey = (MetricName, String);

/// Delivered metric keys, oldest evicted first once `capacity` is reached.
struct DeliveredKeys {
    capacity: usize,
    keys: HashSet<MetricKey>,
    order: VecDeque<MetricKey>,
}

impl DeliveredKeys {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            keys: HashSet::new(),
            order: VecDeque::new(),
        }
    }

    /// Returns `false` if the key is already remembered.
    fn insert(&mut self, key: MetricKey) -> bool {
        if self.keys.contains(&key) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.keys.remove(&oldest);
            }
        }
        self.keys.insert(key.clone());
        self.order.push_back(key);
        true
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.order.len()
    }
}

struct Inner {
    callbacks: Vec<(MetricName, Callback)>,
    delivered: DeliveredKeys,
}

#[derive(Clone)]
pub struct VitalsReporter {
    inner: Arc<Mutex<Inner>>,
}

impl Default for VitalsReporter {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_DELIVERED_CAPACITY)
    }
}

impl VitalsReporter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                callbacks: Vec::new(),
                delivered: DeliveredKeys::new(capacity),
            })),
        }
    }

    #[cfg(test)]
    fn delivered_len(&self) -> usize {
        self.inner.lock().unwrap().delivered.len()
    }

    pub fn on_cls(&self, callback: impl Fn(&Metric) + Send + Sync + 'static) {
        self.register(MetricName::Cls, callback);
    }

    pub fn on_fcp(&self, callback: impl Fn(&Metric) + Send + Sync + 'static) {
        self.register(MetricName::Fcp, callback);
    }

    pub fn on_fid(&self, callback: impl Fn(&Metric) + Send + Sync + 'static) {
        self.register(MetricName::Fid, callback);
    }

    pub fn on_lcp(&self, callback: impl Fn(&Metric) + Send + Sync + 'static) {
        self.register(MetricName::Lcp, callback);
    }

    pub fn on_ttfb(&self, callback: impl Fn(&Metric) + Send + Sync + 'static) {
        self.register(MetricName::Ttfb, callback);
    }

    fn register(&self, name: MetricName, callback: impl Fn(&Metric) + Send + Sync + 'static) {
        self.inner
            .lock()
            .unwrap()
            .callbacks
            .push((name, Arc::new(callback)));
    }

    /// Delivers a metric to the callbacks of its name. A metric id that was
    /// recently delivered for the same name is dropped and `false` returned.
    pub fn report(&self, metric: Metric) -> bool {
        let callbacks: Vec<Callback> = {
            let mut inner = self.inner.lock().unwrap();
            if !inner.delivered.insert((metric.name, metric.id.clone())) {
                return false;
            }
            inner
                .callbacks
                .iter()
                .filter(|(name, _)| *name == metric.name)
                .map(|(_, callback)| callback.clone())
                .collect()
        };

        // Called outside the lock so callbacks may register or report.
        for callback in callbacks {
            callback(&metric);
        }
        true
    }
}
