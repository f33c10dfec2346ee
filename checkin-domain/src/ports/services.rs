use async_trait::async_trait;

use crate::error::DeviceError;

/// Camera-equivalent input. Acquisition may be refused; an acquired device
/// must be released exactly once by its holder.
#[async_trait]
pub trait Scanner: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn ScannerDevice>, DeviceError>;
}

#[async_trait]
pub trait ScannerDevice: Send {
    /// Waits for the next decoded payload. Cancel-safe: dropping the future
    /// abandons the decode without consuming a payload.
    async fn decode_next(&mut self) -> Result<String, DeviceError>;

    fn release(&mut self);
}
