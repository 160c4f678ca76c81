pub mod credential;
pub mod password_policy;
