pub mod recording_provider;
pub mod static_host;

#[allow(unused_imports)]
pub use recording_provider::{CallLog, RecordingProvider, TargetKindA, TargetKindB};
#[allow(unused_imports)]
pub use static_host::StaticHost;
