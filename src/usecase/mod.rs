pub mod credential_usecase;
