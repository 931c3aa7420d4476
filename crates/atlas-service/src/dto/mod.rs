//! Data Transfer Objects
//!
//! Response DTOs for the HTTP layer plus the `From` mappers that build
//! them from domain entities.

pub mod mappers;
pub mod responses;

pub use responses::{
    AuditResponse, DispatchResponse, HealthResponse, OfficeResponse, ReadinessResponse,
    RoleResponse, UserResponse,
};
