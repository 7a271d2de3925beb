//! Points top-up: converting a currency payment into platform credit.

use super::LedgerEngine;
use crate::domain::{
    Actor, TimeMs, Transaction, TransactionDraft, TransactionStatus, TransactionType,
};
use crate::error::LedgerError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::info;

/// Fixed conversion rate: 1 euro buys 100 points.
///
/// Half-up rounding, matching the split calculator's policy.
pub fn euros_to_points(euros: Decimal) -> Option<u64> {
    (euros * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
}

impl LedgerEngine {
    /// Credit an actor's spendable balance with points bought for euros.
    ///
    /// The platform receives the full amount: the recorded Purchase
    /// transaction carries `company_cut = points` and no split.
    ///
    /// # Errors
    /// - `InvalidAmount` for non-positive euro amounts
    /// - `NotFound` for an unknown actor
    /// - `Validation` when the actor is an admin (admins hold no balances)
    pub async fn purchase_points(
        &self,
        actor_id: &str,
        euro_amount: Decimal,
    ) -> Result<Transaction, LedgerError> {
        if euro_amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(
                "euro amount must be positive".to_string(),
            ));
        }
        let points = euros_to_points(euro_amount).filter(|p| *p > 0).ok_or_else(|| {
            LedgerError::InvalidAmount(format!("euro amount {} converts to zero points", euro_amount))
        })?;

        self.with_conflict_retry(|| self.try_purchase_points(actor_id, euro_amount, points))
            .await
    }

    async fn try_purchase_points(
        &self,
        actor_id: &str,
        euro_amount: Decimal,
        points: u64,
    ) -> Result<Transaction, LedgerError> {
        let mut tx = self.repo.begin().await?;

        let actor = self
            .repo
            .find_actor(actor_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("actor {}", actor_id)))?;

        let (student_id, teacher_id) = match &actor {
            Actor::Student(s) => (Some(s.id.clone()), None),
            Actor::Teacher(t) => (None, Some(t.id.clone())),
            Actor::Admin { .. } => {
                return Err(LedgerError::Validation(
                    "admin accounts hold no credit balance".to_string(),
                ))
            }
        };

        let credited = self.repo.credit_actor(&mut tx, actor_id, points).await?;
        if !credited {
            return Err(LedgerError::NotFound(format!("actor {}", actor_id)));
        }

        let draft = TransactionDraft {
            student_id,
            teacher_id,
            subject_id: None,
            amount: points,
            txn_type: TransactionType::Purchase,
            teacher_cut: 0,
            company_cut: points,
            status: TransactionStatus::Completed,
            description: format!("Top-up of {} points for {}€", points, euro_amount),
        };
        let txn = self
            .repo
            .insert_transaction(&mut tx, &draft, TimeMs::now())
            .await?;

        tx.commit().await.map_err(LedgerError::Storage)?;

        info!(actor = actor_id, points, "points purchased");
        Ok(txn)
    }
}
