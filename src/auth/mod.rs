// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Token lifecycle and request authentication for the platform.
//!
//! ## Auth Flow
//!
//! 1. Client exchanges credentials at `POST /auth/token`
//! 2. Client sends `Authorization: Bearer <token>` on every request
//! 3. This service:
//!    - Verifies the HS256 signature against the shared secret
//!    - Checks expiry (`now < exp`, no leeway)
//!    - Extracts:
//!      - `sub` → the caller's username
//!      - `role` → the caller's verified role claim
//!
//! ## Security
//!
//! - Token validity is stateless: signature + expiry, nothing stored
//! - Verification failures are one error kind (no expired/bad-signature
//!   distinction, no username enumeration on login)
//! - Role is sourced from the verified token only; no role headers

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod roles;
pub mod service;
pub mod token;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::{bearer_token, AdminOnly, Auth};
pub use password::PasswordHasher;
pub use roles::Role;
pub use service::AuthService;
pub use token::{TokenCodec, TokenError};
