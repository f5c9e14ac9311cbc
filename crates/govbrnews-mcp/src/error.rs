//! Conversion of workspace errors into MCP protocol errors.

use govbrnews_core::Error;
use rmcp::ErrorData;

/// Maps a [`govbrnews_core::Error`] onto the closest MCP error code.
pub trait McpErrorExt {
    /// Converts into an MCP `ErrorData`.
    fn to_mcp_error(&self) -> ErrorData;
}

impl McpErrorExt for Error {
    fn to_mcp_error(&self) -> ErrorData {
        match self {
            Error::NotFound { .. } => ErrorData::resource_not_found(self.to_string(), None),
            Error::InvalidInput(_) => ErrorData::invalid_params(self.to_string(), None),
            _ => ErrorData::internal_error(self.to_string(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn test_not_found_maps_to_resource_not_found() {
        let err = Error::not_found("document", "abc").to_mcp_error();
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert!(err.message.contains("abc"));
    }

    #[test]
    fn test_invalid_input_maps_to_invalid_params() {
        let err = Error::invalid_input("bad year").to_mcp_error();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_backend_maps_to_internal_error() {
        let err = Error::backend_status(500, "boom").to_mcp_error();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        let err = Error::unauthorized("bad key").to_mcp_error();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }
}
