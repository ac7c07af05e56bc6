//! Heuristic verification of step output.

/// Result of verifying a step's output.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub passed: bool,
    pub reason: String,
    /// 0.0 to 1.0.
    pub confidence: f64,
}

const ERROR_INDICATORS: &[&str] = &["error:", "exception:", "traceback", "failed to"];

/// Short results containing an error indicator are treated as failures;
/// longer texts may legitimately discuss errors.
const ERROR_LENGTH_CUTOFF: usize = 200;

/// Check a step result for emptiness and obvious error markers.
pub fn verify_step_result(result: &str) -> VerificationResult {
    if result.trim().is_empty() {
        return VerificationResult {
            passed: false,
            reason: "step produced empty result".to_string(),
            confidence: 1.0,
        };
    }

    let lower = result.to_lowercase();
    if result.len() < ERROR_LENGTH_CUTOFF {
        for indicator in ERROR_INDICATORS {
            if lower.contains(indicator) {
                return VerificationResult {
                    passed: false,
                    reason: format!("result appears to contain an error: '{indicator}'"),
                    confidence: 0.7,
                };
            }
        }
    }

    VerificationResult {
        passed: true,
        reason: "result looks valid".to_string(),
        confidence: 0.8,
    }
}
