//! Application services and ports for the request lifecycle.

#![forbid(unsafe_code)]

pub mod request_access;
mod request_ports;
mod request_service;

pub use request_ports::{
    PipelineRunReference, PipelineTrigger, ProvisioningJob, RequestFilter, RequestRepository,
    RequestVersion, VersionedRequest,
};
pub use request_service::RequestService;
