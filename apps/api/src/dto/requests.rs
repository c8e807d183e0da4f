mod conversions;
mod types;

pub use types::{
    AccessRequestResponse, AddMessageRequest, AuditEntryResponse, CreateRequestRequest,
    FieldChangeResponse, IdentityResponse, RequestStatusDto, UpdateRequestDetailsRequest,
    UpdateStatusRequest,
};
