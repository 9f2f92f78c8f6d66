pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod state;

#[cfg(test)]
mod tests;

pub use api::{
    envelope::ApiResponse,
    error::ApiError,
    error::Result as ApiResult,
    extractors::{
        admin_identity::AdminIdentity, auth_identity::AuthIdentity, client_meta::ClientMeta,
    },
    users::{
        change_password_request::ChangePasswordRequest,
        identity_dto::IdentityDto,
        login_request::LoginRequest,
        login_response::LoginResponse,
        refresh_request::RefreshRequest,
        refresh_response::RefreshResponse,
        register_request::RegisterRequest,
        update_details_request::UpdateDetailsRequest,
        usage_report_response::UsageReportDto,
        users::{
            change_password, get_profile, login, logout, refresh_access_token, register,
            update_details, usage_report,
        },
    },
};

pub use crate::routes::build_router;
pub use crate::state::AppState;
