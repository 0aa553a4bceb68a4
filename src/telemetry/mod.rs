pub mod gate;
pub mod transport;

pub use gate::{TelemetryDiagnostics, TelemetryGate};
pub use transport::{AnalyticsTransport, CapturedEvent, MemoryTransport};
