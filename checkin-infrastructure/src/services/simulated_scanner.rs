use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info};

use checkin_domain::ports::{Scanner, ScannerDevice};
use checkin_domain::{normalize_payload, DeviceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScannerMode {
    /// Decodes payloads from the scan queue.
    Simulated,
    /// Every acquisition is refused, as when camera permission is withheld.
    Denied,
    /// No device is present.
    Unavailable,
}

impl ScannerMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "simulated" => Some(Self::Simulated),
            "denied" => Some(Self::Denied),
            "unavailable" => Some(Self::Unavailable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub mode: ScannerMode,
    pub decode_delay_ms: u64,
    pub queue_path: String,
}

#[derive(Default)]
struct ScanQueue {
    payloads: Mutex<VecDeque<String>>,
    ready: Notify,
}

/// Stand-in for a camera. Devices take payloads off a shared queue, each
/// decode taking at least the configured delay.
pub struct SimulatedScanner {
    mode: ScannerMode,
    decode_delay: Duration,
    queue: Arc<ScanQueue>,
    active: Arc<AtomicUsize>,
}

impl SimulatedScanner {
    pub fn new(mode: ScannerMode, decode_delay: Duration) -> Self {
        Self {
            mode,
            decode_delay,
            queue: Arc::new(ScanQueue::default()),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Builds the scanner and preloads `scan_queue.txt` when it exists.
    pub async fn from_config(config: &ScannerConfig) -> anyhow::Result<Self> {
        let scanner = Self::new(config.mode, Duration::from_millis(config.decode_delay_ms));
        let path = Path::new(&config.queue_path);
        if path.exists() {
            let content = fs::read_to_string(path).await?;
            let mut queued = 0;
            for line in content.lines() {
                if scanner.enqueue(line).await {
                    queued += 1;
                }
            }
            info!("queued {} simulated scans from {}", queued, config.queue_path);
        }
        Ok(scanner)
    }

    /// Queues a payload for the next decode. Blank lines are ignored.
    pub async fn enqueue(&self, payload: &str) -> bool {
        let Some(payload) = normalize_payload(payload) else {
            return false;
        };
        self.queue
            .payloads
            .lock()
            .await
            .push_back(payload.to_string());
        self.queue.ready.notify_one();
        true
    }

    pub fn active_devices(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Scanner for SimulatedScanner {
    async fn acquire(&self) -> Result<Box<dyn ScannerDevice>, DeviceError> {
        match self.mode {
            ScannerMode::Denied => Err(DeviceError::PermissionDenied),
            ScannerMode::Unavailable => Err(DeviceError::Unavailable(
                "no scanner device configured".to_string(),
            )),
            ScannerMode::Simulated => {
                let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
                debug!("simulated scanner acquired ({} active)", active);
                Ok(Box::new(SimulatedDevice {
                    decode_delay: self.decode_delay,
                    queue: self.queue.clone(),
                    active: self.active.clone(),
                    released: false,
                }))
            }
        }
    }
}

struct SimulatedDevice {
    decode_delay: Duration,
    queue: Arc<ScanQueue>,
    active: Arc<AtomicUsize>,
    released: bool,
}

#[async_trait]
impl ScannerDevice for SimulatedDevice {
    async fn decode_next(&mut self) -> Result<String, DeviceError> {
        if self.released {
            return Err(DeviceError::Closed);
        }
        tokio::time::sleep(self.decode_delay).await;
        loop {
            if let Some(payload) = self.queue.payloads.lock().await.pop_front() {
                return Ok(payload);
            }
            self.queue.ready.notified().await;
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let active = self.active.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        debug!("simulated scanner released ({} active)", active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn denied_mode_refuses_acquisition() {
        let scanner = SimulatedScanner::new(ScannerMode::Denied, Duration::ZERO);
        assert!(matches!(
            scanner.acquire().await,
            Err(DeviceError::PermissionDenied)
        ));
        let scanner = SimulatedScanner::new(ScannerMode::Unavailable, Duration::ZERO);
        assert!(matches!(
            scanner.acquire().await,
            Err(DeviceError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn decodes_queued_payloads_in_order() {
        let scanner = SimulatedScanner::new(ScannerMode::Simulated, Duration::ZERO);
        assert!(scanner.enqueue(" TKT-1 ").await);
        assert!(!scanner.enqueue("   ").await);
        assert!(scanner.enqueue("TKT-2").await);

        let mut device = scanner.acquire().await.expect("device");
        assert_eq!(device.decode_next().await, Ok("TKT-1".to_string()));
        assert_eq!(device.decode_next().await, Ok("TKT-2".to_string()));
    }

    #[tokio::test]
    async fn decode_waits_for_enqueue() {
        let scanner = Arc::new(SimulatedScanner::new(ScannerMode::Simulated, Duration::ZERO));
        let mut device = scanner.acquire().await.expect("device");
        let pending = tokio::spawn(async move { device.decode_next().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        scanner.enqueue("CRW-9").await;
        assert_eq!(pending.await.expect("join"), Ok("CRW-9".to_string()));
    }

    #[tokio::test]
    async fn release_is_counted_once() {
        let scanner = SimulatedScanner::new(ScannerMode::Simulated, Duration::ZERO);
        let mut device = scanner.acquire().await.expect("device");
        assert_eq!(scanner.active_devices(), 1);
        device.release();
        device.release();
        assert_eq!(scanner.active_devices(), 0);
        assert_eq!(device.decode_next().await, Err(DeviceError::Closed));
    }
}
