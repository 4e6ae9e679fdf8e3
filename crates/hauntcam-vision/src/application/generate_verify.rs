//! Bounded generate-then-verify loop.
//!
//! Generic over the artifact type. Attempts run strictly one after another
//! and share nothing except the counter. Exhausting the attempts is not an
//! error: the last artifact comes back flagged as unverified.

use async_trait::async_trait;
use hauntcam_core::error::DomainError;
use tracing::{debug, warn};

/// Attempts used when the caller does not choose.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Upper bound accepted for a caller-supplied attempt count.
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Produces an artifact from a prompt.
#[async_trait]
pub trait ArtifactGenerator: Send + Sync {
    /// The generated artifact.
    type Artifact: Send + Sync;

    /// Generates one artifact.
    async fn generate(&self, prompt: &str) -> Result<Self::Artifact, DomainError>;
}

/// Checks an artifact against a text specification.
#[async_trait]
pub trait ArtifactVerifier<A: Sync>: Send + Sync {
    /// Whether `artifact` satisfies `spec`.
    async fn verify(&self, artifact: &A, spec: &str) -> Result<bool, DomainError>;
}

/// Result of the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOutcome<A> {
    /// The accepted artifact, or the last one generated.
    pub artifact: A,
    /// Generation calls made.
    pub attempts_used: u32,
    /// Whether the artifact passed verification.
    pub passed: bool,
}

/// Checks a caller-supplied attempt count.
///
/// # Errors
///
/// Returns `DomainError::Validation` outside `1..=MAX_ATTEMPTS_LIMIT`.
pub fn validate_max_attempts(max_attempts: u32) -> Result<u32, DomainError> {
    if (1..=MAX_ATTEMPTS_LIMIT).contains(&max_attempts) {
        Ok(max_attempts)
    } else {
        Err(DomainError::Validation(format!(
            "max_retries must be between 1 and {MAX_ATTEMPTS_LIMIT}, got {max_attempts}"
        )))
    }
}

/// Generates and verifies up to `max_attempts` times.
///
/// Returns on the first verified artifact. A verifier error counts as a
/// rejection of that attempt.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an out-of-range `max_attempts`, or
/// the generator's error, which ends the loop.
pub async fn generate_verified<G, V>(
    generator: &G,
    verifier: &V,
    prompt: &str,
    spec: &str,
    max_attempts: u32,
) -> Result<VerifyOutcome<G::Artifact>, DomainError>
where
    G: ArtifactGenerator + ?Sized,
    V: ArtifactVerifier<G::Artifact> + ?Sized,
{
    let max_attempts = validate_max_attempts(max_attempts)?;
    let mut attempt = 1;
    loop {
        let artifact = generator.generate(prompt).await?;
        let passed = match verifier.verify(&artifact, spec).await {
            Ok(passed) => passed,
            Err(e) => {
                warn!(attempt, error = %e, "verification failed; counting as rejection");
                false
            }
        };
        debug!(attempt, passed, "generate-verify attempt finished");

        if passed || attempt == max_attempts {
            return Ok(VerifyOutcome {
                artifact,
                attempts_used: attempt,
                passed,
            });
        }
        attempt += 1;
    }
}
