//! Single-shot payment verification.

use databundle_core::PaymentReference;
use databundle_core::verification::VerificationOutcome;
use databundle_storefront::commerce::CommerceClient;

use super::CliError;

/// Verify `reference` once and print the outcome.
///
/// A processing outcome is not an error: the payment may not have
/// propagated yet.
///
/// # Errors
///
/// Returns `CliError::Verification` when the payment failed.
pub async fn run(client: &CommerceClient, slug: &str, reference: &str) -> Result<(), CliError> {
    let outcome = match PaymentReference::from_query(reference) {
        Some(reference) => client.verify_payment(slug, &reference).await,
        None => VerificationOutcome::missing_reference(),
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{}", describe(&outcome));
    }

    match outcome {
        VerificationOutcome::Failed(message) => Err(CliError::Verification(message)),
        _ => Ok(()),
    }
}

fn describe(outcome: &VerificationOutcome) -> String {
    match outcome {
        VerificationOutcome::Success(summary) => format!(
            "success: {} for {} to {} [{}]",
            summary.bundle_label().unwrap_or_else(|| "bundle".to_string()),
            summary.amount_label(),
            summary.phone_number.as_deref().unwrap_or("-"),
            summary.status
        ),
        VerificationOutcome::Processing => {
            "processing: not confirmed yet, check again later".to_string()
        }
        VerificationOutcome::Failed(message) => format!("failed: {message}"),
    }
}
