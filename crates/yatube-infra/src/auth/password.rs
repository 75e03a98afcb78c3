//! Account passwords: strength rules and Argon2id hashing.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use yatube_core::messages::{PASSWORD_NUMERIC, password_too_short};
use yatube_core::ports::{AuthError, PasswordService};

const DEFAULT_MIN_LENGTH: usize = 8;

/// Argon2 cost parameters and the password rules.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub min_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl PasswordConfig {
    /// Read `ARGON2_MEMORY_KIB`, `ARGON2_ITERATIONS`, `ARGON2_PARALLELISM`
    /// and `PASSWORD_MIN_LENGTH`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            memory_kib: env_or("ARGON2_MEMORY_KIB", defaults.memory_kib),
            iterations: env_or("ARGON2_ITERATIONS", defaults.iterations),
            parallelism: env_or("ARGON2_PARALLELISM", defaults.parallelism),
            min_length: env_or("PASSWORD_MIN_LENGTH", defaults.min_length),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Argon2id password service.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
    min_length: usize,
}

impl Argon2PasswordService {
    /// Build the hasher; fails when the cost parameters are out of range.
    pub fn new(config: PasswordConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AuthError::HashingError(e.to_string()))?;

        tracing::debug!(
            memory_kib = config.memory_kib,
            iterations = config.iterations,
            parallelism = config.parallelism,
            "Argon2 parameters set"
        );

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            min_length: config.min_length,
        })
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    /// Hashes made with other parameters still verify; the PHC string
    /// carries its own.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn validate(&self, password: &str) -> Result<(), AuthError> {
        let mut reasons = Vec::new();

        if password.chars().count() < self.min_length {
            reasons.push(password_too_short(self.min_length));
        }
        if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
            reasons.push(PASSWORD_NUMERIC.to_string());
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(AuthError::WeakPassword(reasons))
        }
    }
}
