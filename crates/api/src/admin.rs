#![forbid(unsafe_code)]

use sha2::Digest as _;
use std::fmt::Write as _;
use survey_core::admin::{CREDENTIAL_KEY, DEFAULT_ADMIN_PASSWORD, password_meets_policy};
use survey_storage::{SqliteStore, StoreError};

const HASH_SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

#[derive(Debug)]
pub(crate) enum AdminError {
    Auth,
    Validation(&'static str),
    Infrastructure(&'static str),
    Store(StoreError),
}

impl std::fmt::Display for AdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth => write!(f, "admin credential rejected"),
            Self::Validation(message) => write!(f, "invalid input: {message}"),
            Self::Infrastructure(message) => write!(f, "infrastructure: {message}"),
            Self::Store(err) => write!(f, "credential store: {err}"),
        }
    }
}

impl std::error::Error for AdminError {}

impl From<StoreError> for AdminError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Bootstraps the credential if absent, then checks the password. The
/// credential lifecycle is {Absent} -> {Present(hash)} -> {Present(newHash)};
/// after this call a credential always exists.
pub(crate) fn authenticate(store: &mut SqliteStore, password: &str) -> Result<bool, AdminError> {
    ensure_bootstrapped(store)?;
    if password.is_empty() {
        return Ok(false);
    }
    let Some(record) = store.option_get(CREDENTIAL_KEY)? else {
        return Ok(false);
    };
    Ok(verify_record(&record, password))
}

/// Idempotent: installs the hash of the default secret only when no
/// credential exists. Never overwrites a present credential.
pub(crate) fn ensure_bootstrapped(store: &mut SqliteStore) -> Result<(), AdminError> {
    if store.option_get(CREDENTIAL_KEY)?.is_some() {
        return Ok(());
    }
    let record = hash_password(DEFAULT_ADMIN_PASSWORD)?;
    store.option_set(CREDENTIAL_KEY, &record, crate::now_ms_i64())?;
    tracing::info!("admin credential bootstrapped with the default secret");
    Ok(())
}

/// All-or-nothing rotation: a failed verification or policy check leaves the
/// stored credential untouched.
pub(crate) fn rotate(
    store: &mut SqliteStore,
    current: &str,
    new_password: &str,
) -> Result<(), AdminError> {
    if !authenticate(store, current)? {
        return Err(AdminError::Auth);
    }
    if !password_meets_policy(new_password) {
        return Err(AdminError::Validation(
            "new password must be at least 6 characters",
        ));
    }
    let record = hash_password(new_password)?;
    store.option_set(CREDENTIAL_KEY, &record, crate::now_ms_i64())?;
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AdminError> {
    let mut salt = [0u8; SALT_LEN];
    getrandom::fill(&mut salt)
        .map_err(|_| AdminError::Infrastructure("system randomness unavailable"))?;
    let digest = salted_digest(&salt, password);
    Ok(format!(
        "{HASH_SCHEME}${}${}",
        hex_encode(&salt),
        hex_encode(&digest)
    ))
}

fn verify_record(record: &str, password: &str) -> bool {
    let mut parts = record.splitn(3, '$');
    let (Some(scheme), Some(salt_hex), Some(digest_hex)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != HASH_SCHEME {
        return false;
    }
    let Some(salt) = hex_decode(salt_hex) else {
        return false;
    };
    let Some(expected) = hex_decode(digest_hex) else {
        return false;
    };

    let actual = salted_digest(&salt, password);
    constant_time_eq(&actual, &expected)
}

fn salted_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = sha2::Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}

fn hex_decode(value: &str) -> Option<Vec<u8>> {
    if value.len() % 2 != 0 {
        return None;
    }
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(value.len() / 2);
    for pair in bytes.chunks(2) {
        let pair = std::str::from_utf8(pair).ok()?;
        out.push(u8::from_str_radix(pair, 16).ok()?);
    }
    Some(out)
}
