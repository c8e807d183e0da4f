mod requests;

pub use requests::{
    AccessRequestResponse, AddMessageRequest, AuditEntryResponse, CreateRequestRequest,
    FieldChangeResponse, IdentityResponse, RequestStatusDto, UpdateRequestDetailsRequest,
    UpdateStatusRequest,
};
