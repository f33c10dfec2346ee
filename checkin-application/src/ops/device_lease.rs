use std::sync::Arc;

use checkin_domain::ports::ScannerDevice;
use checkin_domain::DeviceError;

use crate::Metrics;

/// Owns an acquired scanner and releases it exactly once: explicitly through
/// [`DeviceLease::release`], or on drop for every other exit path.
pub struct DeviceLease {
    device: Option<Box<dyn ScannerDevice>>,
    metrics: Arc<Metrics>,
}

impl DeviceLease {
    pub fn new(device: Box<dyn ScannerDevice>, metrics: Arc<Metrics>) -> Self {
        Self {
            device: Some(device),
            metrics,
        }
    }

    pub fn is_held(&self) -> bool {
        self.device.is_some()
    }

    pub async fn decode_next(&mut self) -> Result<String, DeviceError> {
        match self.device.as_mut() {
            Some(device) => device.decode_next().await,
            None => Err(DeviceError::Closed),
        }
    }

    /// Returns false when the device was already released.
    pub fn release(&mut self) -> bool {
        let Some(mut device) = self.device.take() else {
            return false;
        };
        device.release();
        self.metrics.record_device_release();
        true
    }
}

impl Drop for DeviceLease {
    fn drop(&mut self) {
        self.release();
    }
}
