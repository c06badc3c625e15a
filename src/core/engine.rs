use crate::core::{MailCourier, PhraseRecord, PhraseSource};
use crate::utils::error::Result;

/// Drives one run: fetch a phrase, hand it to the courier. No state is
/// retained between runs and no stage is retried.
pub struct DeliveryEngine<P: PhraseSource, C: MailCourier> {
    provider: P,
    courier: C,
}

impl<P: PhraseSource, C: MailCourier> DeliveryEngine<P, C> {
    pub fn new(provider: P, courier: C) -> Self {
        Self { provider, courier }
    }

    pub async fn run(&self) -> Result<PhraseRecord> {
        println!("Fetching inspirational phrase...");
        let record = self.provider.fetch().await?;
        println!(
            "Successfully fetched phrase: \"{}\" by {}",
            record.phrase, record.author
        );

        println!("Sending email...");
        self.courier.deliver(&record).await?;

        Ok(record)
    }
}
