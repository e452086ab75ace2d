use async_trait::async_trait;
use chrono::Local;

use crate::services::price_provider::PriceProvider;
use crate::utils::PriceIncreaseError;

#[async_trait]
pub trait PriceIncreaseCalculator: Send + Sync {
    /// Percentage change from the second-newest to the newest price recorded today
    async fn price_increase(&self) -> Result<f64, PriceIncreaseError>;
}

pub struct PriceIncreaseService<P> {
    provider: P,
}

impl<P: PriceProvider> PriceIncreaseService<P> {
    pub fn new(provider: P) -> Self {
        PriceIncreaseService { provider }
    }
}

#[async_trait]
impl<P: PriceProvider> PriceIncreaseCalculator for PriceIncreaseService<P> {
    async fn price_increase(&self) -> Result<f64, PriceIncreaseError> {
        let today = Local::now().date_naive();
        let prices = self.provider.list(today).await?;

        if prices.len() < 2 {
            return Err(PriceIncreaseError::InsufficientData);
        }

        // Zero second-newest price yields inf (or NaN for 0/0)
        Ok((prices[0].price() / prices[1].price() - 1.0) * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceData;
    use crate::utils::RetrievalError;
    use chrono::{DateTime, Duration, NaiveDate, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum Script {
        Prices(Vec<f64>),
        Fail(&'static str),
    }

    /// Returns the same scripted answer for any date and records each call
    struct ScriptedProvider {
        script: Script,
        calls: AtomicUsize,
        dates: Mutex<Vec<NaiveDate>>,
    }

    impl ScriptedProvider {
        fn prices(prices: &[f64]) -> Self {
            Self::with(Script::Prices(prices.to_vec()))
        }

        fn failing(message: &'static str) -> Self {
            Self::with(Script::Fail(message))
        }

        fn with(script: Script) -> Self {
            ScriptedProvider {
                script,
                calls: AtomicUsize::new(0),
                dates: Mutex::new(Vec::new()),
            }
        }

        /// Newest first, one minute apart
        fn series(prices: &[f64]) -> Vec<PriceData> {
            let now: DateTime<Utc> = Utc::now();
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| PriceData::new(now - Duration::minutes(i as i64), p))
                .collect()
        }
    }

    #[async_trait]
    impl PriceProvider for ScriptedProvider {
        async fn latest(&self) -> Result<PriceData, RetrievalError> {
            match &self.script {
                Script::Prices(prices) => Self::series(prices).into_iter().next().ok_or(RetrievalError::NoRows),
                Script::Fail(message) => Err(RetrievalError::other(*message)),
            }
        }

        async fn list(&self, date: NaiveDate) -> Result<Vec<PriceData>, RetrievalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.dates.lock().unwrap().push(date);

            match &self.script {
                Script::Prices(prices) => Ok(Self::series(prices)),
                Script::Fail(message) => Err(RetrievalError::other(*message)),
            }
        }
    }

    #[tokio::test]
    async fn test_calculate() {
        let calculator = PriceIncreaseService::new(ScriptedProvider::prices(&[2.0, 1.0]));

        let actual = calculator.price_increase().await.expect("increase should compute");

        assert_eq!(actual, 100.0);
    }

    #[tokio::test]
    async fn test_calculate_uses_two_newest_only() {
        let calculator = PriceIncreaseService::new(ScriptedProvider::prices(&[25.0, 20.0, 15.0, 10.0, 5.0]));

        let actual = calculator.price_increase().await.unwrap();

        assert!((actual - 25.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_calculate_decrease() {
        let calculator = PriceIncreaseService::new(ScriptedProvider::prices(&[0.0, 5.0]));

        assert_eq!(calculator.price_increase().await.unwrap(), -100.0);
    }

    #[tokio::test]
    async fn test_calculate_not_enough_data() {
        for prices in [&[][..], &[42.0][..]] {
            let calculator = PriceIncreaseService::new(ScriptedProvider::prices(prices));

            let result = calculator.price_increase().await;

            let err = result.as_ref().unwrap_err();
            assert!(matches!(err, PriceIncreaseError::InsufficientData));
            assert_eq!(err.to_string(), "not enough data");
            assert_eq!(result.unwrap_or_default(), 0.0);
        }
    }

    #[tokio::test]
    async fn test_calculate_error_from_price_provider() {
        let calculator = PriceIncreaseService::new(ScriptedProvider::failing("oh my god"));

        let result = calculator.price_increase().await;

        match result.as_ref().unwrap_err() {
            PriceIncreaseError::Retrieval(RetrievalError::Other(message)) => assert_eq!(message, "oh my god"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(result.unwrap_or_default(), 0.0);
    }

    #[tokio::test]
    async fn test_zero_divisor_is_not_guarded() {
        let calculator = PriceIncreaseService::new(ScriptedProvider::prices(&[1.0, 0.0]));
        assert_eq!(calculator.price_increase().await.unwrap(), f64::INFINITY);

        let calculator = PriceIncreaseService::new(ScriptedProvider::prices(&[0.0, 0.0]));
        assert!(calculator.price_increase().await.unwrap().is_nan());
    }

    #[tokio::test]
    async fn test_requeries_today_on_every_call() {
        let calculator = PriceIncreaseService::new(ScriptedProvider::prices(&[3.0, 2.0]));

        let before = Local::now().date_naive();
        let first = calculator.price_increase().await.unwrap();
        let second = calculator.price_increase().await.unwrap();
        let after = Local::now().date_naive();

        assert_eq!(first, second);
        assert_eq!(calculator.provider.calls.load(Ordering::SeqCst), 2);
        for date in calculator.provider.dates.lock().unwrap().iter() {
            assert!(*date == before || *date == after);
        }
    }
}
