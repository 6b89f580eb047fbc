mod extractor;
mod jwt;
mod password;

pub use extractor::AuthUser;
pub use jwt::{Claims, JwtKeys};
pub use password::{hash_password, verify_password};
