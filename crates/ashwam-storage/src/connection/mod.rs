//! Connection setup.

pub mod pragmas;
