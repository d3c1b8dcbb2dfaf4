//! Region-scoped AWS clients behind narrow traits.
//!
//! Each subsystem (EC2, S3, Lambda) gets one trait with exactly the
//! operations the tool layer dispatches, and one SDK-backed implementation.
//! Every call maps to a single remote operation; failures are converted to
//! [`error::RemoteOperationError`] at this boundary so no raw SDK error type
//! crosses into the tool layer.

use aws_config::{BehaviorVersion, Region, SdkConfig};

pub mod compute;
pub mod error;
pub mod functions;
pub mod storage;

pub use compute::{ComputeClient, Ec2Compute, InstanceStateChange, InstanceSummary};
pub use error::RemoteOperationError;
pub use functions::{FunctionClient, FunctionSummary, InvokeOutcome, LambdaFunctions};
pub use storage::{BucketSummary, S3Storage, StorageClient};

/// Loads the shared SDK config once per session. Region and profile fall
/// back to the standard AWS environment/profile chain when unset.
pub async fn load_sdk_config(region: Option<String>, profile: Option<String>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }

    loader.load().await
}

/// Renders an SDK timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub(crate) fn format_timestamp(dt: &aws_smithy_types::DateTime) -> String {
    chrono::DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_renders_utc_without_zone_suffix() {
        let dt = aws_smithy_types::DateTime::from_secs(0);
        assert_eq!(format_timestamp(&dt), "1970-01-01 00:00:00");

        // 2024-03-05 14:30:00 UTC
        let dt = aws_smithy_types::DateTime::from_secs(1_709_649_000);
        assert_eq!(format_timestamp(&dt), "2024-03-05 14:30:00");
    }
}
