use std::fmt;

/// Error for a failed remote call, built at the client boundary.
///
/// `operation` is the logical operation name (e.g. `ec2 start_instance`),
/// `resource` the identifier the call was about when there is one, and
/// `message` the rendered SDK error chain.
#[derive(Debug, Clone)]
pub struct RemoteOperationError {
    pub operation: &'static str,
    pub resource: Option<String>,
    pub message: String,
}

impl RemoteOperationError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            resource: None,
            message: message.into(),
        }
    }

    pub fn with_resource(
        operation: &'static str,
        resource: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            resource: Some(resource.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for RemoteOperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource {
            Some(resource) => write!(
                f,
                "{} failed for {}: {}",
                self.operation, resource, self.message
            ),
            None => write!(f, "{} failed: {}", self.operation, self.message),
        }
    }
}

impl std::error::Error for RemoteOperationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_operation_and_resource() {
        let err = RemoteOperationError::with_resource(
            "ec2 start_instance",
            "i-xyz999",
            "InstanceNotFound",
        );
        assert_eq!(
            err.to_string(),
            "ec2 start_instance failed for i-xyz999: InstanceNotFound"
        );
    }

    #[test]
    fn display_without_resource() {
        let err = RemoteOperationError::new("s3 list_buckets", "access denied");
        assert_eq!(err.to_string(), "s3 list_buckets failed: access denied");
    }
}
