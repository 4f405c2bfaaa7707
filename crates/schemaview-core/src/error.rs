//! Introspection error taxonomy

/// Errors raised while dispatching a URL or introspecting a catalog
///
/// Every variant aborts the pipeline. Nothing is retried and no partial
/// schema is ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntrospectError {
    #[error("Unsupported dialect '{scheme}': expected mysql:// or pgsql://")]
    UnsupportedDialect { scheme: String },

    #[error("Malformed URL '{url}': no trailing database name")]
    MalformedUrl { url: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Catalog query failed: {0}")]
    DialectQuery(String),

    #[error("Duplicate table '{table}' in catalog listing")]
    DuplicateTable { table: String },
}

impl IntrospectError {
    /// True when the failure happened before any query was issued
    pub fn is_dispatch_error(&self) -> bool {
        matches!(self, Self::UnsupportedDialect { .. } | Self::MalformedUrl { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_errors_are_flagged() {
        assert!(IntrospectError::MalformedUrl { url: "mysql://h".into() }.is_dispatch_error());
        assert!(IntrospectError::UnsupportedDialect { scheme: "sqlite".into() }.is_dispatch_error());
        assert!(!IntrospectError::Connection("refused".into()).is_dispatch_error());
        assert!(!IntrospectError::DuplicateTable { table: "job".into() }.is_dispatch_error());
    }

    #[test]
    fn messages_name_the_offender() {
        let err = IntrospectError::DuplicateTable { table: "job".into() };
        assert!(err.to_string().contains("'job'"));

        let err = IntrospectError::UnsupportedDialect { scheme: "oracle".into() };
        assert!(err.to_string().contains("oracle"));
    }
}
