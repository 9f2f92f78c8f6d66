pub mod change_password_request;
pub mod identity_dto;
pub mod login_request;
pub mod login_response;
pub mod refresh_request;
pub mod refresh_response;
pub mod register_request;
pub mod update_details_request;
pub mod usage_report_response;
pub mod users;
