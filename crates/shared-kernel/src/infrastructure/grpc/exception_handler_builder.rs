// crates/shared-kernel/src/infrastructure/grpc/exception_handler_builder.rs

use crate::errors::{ErrorCode, ErrorCodeEnum, ErrorDomain};
use crate::infrastructure::grpc::ExceptionHandler;

pub struct ExceptionHandlerBuilder {
    service_domain: Option<ErrorDomain>,
    unspecified: Option<ErrorCode>,
    log_causes: bool,
}

impl Default for ExceptionHandlerBuilder {
    fn default() -> Self {
        Self {
            service_domain: None,
            unspecified: None,
            log_causes: true,
        }
    }
}

impl ExceptionHandlerBuilder {
    /// Reads `GRPC_ERROR_LOG_CAUSES` (`true`/`false`, `1`/`0`), defaults otherwise.
    pub fn from_env() -> Self {
        let log_causes = std::env::var("GRPC_ERROR_LOG_CAUSES")
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(true);

        Self {
            log_causes,
            ..Self::default()
        }
    }

    /// Only codes of `domain` are written to the response.
    pub fn with_service_domain(mut self, domain: ErrorDomain) -> Self {
        self.service_domain = Some(domain);
        self
    }

    /// Sets the service domain and its unspecified code from a generated code enum.
    pub fn for_service<E: ErrorCodeEnum>(self, unspecified: E) -> Self {
        self.with_service_domain(E::DOMAIN).with_unspecified(unspecified.code())
    }

    /// Code written when a failure reaches the boundary unclassified.
    pub fn with_unspecified(mut self, code: impl Into<ErrorCode>) -> Self {
        self.unspecified = Some(code.into());
        self
    }

    pub fn with_log_causes(mut self, enabled: bool) -> Self {
        self.log_causes = enabled;
        self
    }

    pub fn build(self) -> ExceptionHandler {
        ExceptionHandler {
            service_domain: self.service_domain,
            unspecified: self.unspecified,
            log_causes: self.log_causes,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
