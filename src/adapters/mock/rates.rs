//! Scripted rate repository for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::error::{AppResult, NetworkError};
use crate::models::{Rate, RateDetail};
use crate::repository::RateRepository;

/// Rate repository serving a fixed table, with injectable failures.
///
/// Failures queued with [`ScriptedRates::fail_next`] are consumed by the
/// next call to either operation, in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRates {
    rates: Arc<Mutex<Vec<Rate>>>,
    details: Arc<Mutex<HashMap<String, RateDetail>>>,
    failures: Arc<Mutex<VecDeque<NetworkError>>>,
    calls: Arc<Mutex<usize>>,
}

impl ScriptedRates {
    /// Serve `rates` from `rates()`.
    pub fn new(rates: Vec<Rate>) -> Self {
        let scripted = Self::default();
        scripted.set_rates(rates);
        scripted
    }

    /// Replace the rate table.
    pub fn set_rates(&self, rates: Vec<Rate>) {
        *self.rates.lock().unwrap() = rates;
    }

    /// Serve `detail` from `rate(detail.id)`.
    pub fn set_detail(&self, detail: RateDetail) {
        self.details
            .lock()
            .unwrap()
            .insert(detail.id.clone(), detail);
    }

    /// Make the next call fail with `err`.
    pub fn fail_next(&self, err: NetworkError) {
        self.failures.lock().unwrap().push_back(err);
    }

    /// Number of calls made to either operation.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn begin_call(&self) -> AppResult<()> {
        *self.calls.lock().unwrap() += 1;
        match self.failures.lock().unwrap().pop_front() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RateRepository for ScriptedRates {
    async fn rates(&self) -> AppResult<Vec<Rate>> {
        self.begin_call()?;
        Ok(self.rates.lock().unwrap().clone())
    }

    async fn rate(&self, id: &str) -> AppResult<RateDetail> {
        self.begin_call()?;
        self.details
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| {
                NetworkError::HttpStatus {
                    status: 404,
                    message: format!("{} not found", id),
                }
                .into()
            })
    }
}
