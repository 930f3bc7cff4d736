use chrono::{DateTime, FixedOffset, NaiveDate};
use uuid::Uuid;

use crate::entities::trip::PaymentStatus;
use crate::error::AppError;

/// Derive the aggregate payment state of a trip from the creator's status,
/// every joined participant's status, and the trip date.
///
/// Rules:
/// - a cancelled creator cancels the whole trip
/// - `payment_confirmed` iff everyone still owing money has paid
///   (cancelled participants owe nothing and are skipped)
/// - a fully paid trip whose date has passed reads as `completed`
///
/// This is the single source of truth for the overall status; read paths
/// must call it rather than recomputing inline.
pub fn derive_overall_status(
    creator_status: PaymentStatus,
    participant_statuses: &[PaymentStatus],
    date: NaiveDate,
    today: NaiveDate,
) -> PaymentStatus {
    if creator_status == PaymentStatus::Cancelled {
        return PaymentStatus::Cancelled;
    }

    let all_paid = creator_status.is_paid()
        && participant_statuses
            .iter()
            .filter(|s| **s != PaymentStatus::Cancelled)
            .all(|s| s.is_paid());

    if !all_paid {
        return PaymentStatus::PendingPayment;
    }

    if date < today {
        PaymentStatus::Completed
    } else {
        PaymentStatus::PaymentConfirmed
    }
}

/// Only confirmed, not-yet-departed trips accept joiners.
pub fn is_joinable(overall_status: PaymentStatus, date: NaiveDate, today: NaiveDate) -> bool {
    overall_status == PaymentStatus::PaymentConfirmed && date >= today
}

/// A transition was attempted from a state that does not allow it.
#[derive(Debug, PartialEq, Eq)]
pub struct StateConflict(pub &'static str);

impl From<StateConflict> for AppError {
    fn from(e: StateConflict) -> Self {
        AppError::Conflict(e.0.to_string())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    /// Already paid; nothing to write (double-clicks stay harmless)
    AlreadyConfirmed,
}

/// The mutable payment fields shared by a trip's creator record and a
/// participant record. Handlers copy these out, apply a transition, and
/// write the result back; the rules live here in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    pub status: PaymentStatus,
    pub confirmed_by: Option<Uuid>,
    pub confirmed_at: Option<DateTime<FixedOffset>>,
}

impl PaymentRecord {
    /// `pending_payment -> payment_confirmed`, stamping who confirmed and
    /// when. Reconfirming is a no-op; a cancelled payment is a conflict.
    pub fn confirm(
        &mut self,
        admin: Uuid,
        now: DateTime<FixedOffset>,
    ) -> Result<ConfirmOutcome, StateConflict> {
        match self.status {
            PaymentStatus::PendingPayment => {
                self.status = PaymentStatus::PaymentConfirmed;
                self.confirmed_by = Some(admin);
                self.confirmed_at = Some(now);
                Ok(ConfirmOutcome::Confirmed)
            }
            PaymentStatus::PaymentConfirmed | PaymentStatus::Completed => {
                Ok(ConfirmOutcome::AlreadyConfirmed)
            }
            PaymentStatus::Cancelled => {
                Err(StateConflict("Cannot confirm a cancelled payment"))
            }
        }
    }

    /// `payment_confirmed -> pending_payment`, clearing the confirmation
    /// metadata exactly.
    pub fn revert(&mut self) -> Result<(), StateConflict> {
        if self.status != PaymentStatus::PaymentConfirmed {
            return Err(StateConflict("Only confirmed payments can be reverted"));
        }
        self.status = PaymentStatus::PendingPayment;
        self.confirmed_by = None;
        self.confirmed_at = None;
        Ok(())
    }

    /// `pending_payment -> cancelled`.
    pub fn cancel(&mut self) -> Result<(), StateConflict> {
        if self.status != PaymentStatus::PendingPayment {
            return Err(StateConflict("Only pending payments can be cancelled"));
        }
        self.status = PaymentStatus::Cancelled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn test_pending_creator_keeps_trip_pending() {
        let overall = derive_overall_status(
            PaymentStatus::PendingPayment,
            &[PaymentStatus::PaymentConfirmed],
            day(20),
            day(10),
        );
        assert_eq!(overall, PaymentStatus::PendingPayment);
    }

    #[test]
    fn test_confirmed_when_everyone_paid() {
        let overall = derive_overall_status(
            PaymentStatus::PaymentConfirmed,
            &[PaymentStatus::PaymentConfirmed, PaymentStatus::PaymentConfirmed],
            day(20),
            day(10),
        );
        assert_eq!(overall, PaymentStatus::PaymentConfirmed);
    }

    #[test]
    fn test_one_pending_participant_blocks_confirmation() {
        let overall = derive_overall_status(
            PaymentStatus::PaymentConfirmed,
            &[PaymentStatus::PaymentConfirmed, PaymentStatus::PendingPayment],
            day(20),
            day(10),
        );
        assert_eq!(overall, PaymentStatus::PendingPayment);
    }

    #[test]
    fn test_cancelled_participant_does_not_block() {
        let overall = derive_overall_status(
            PaymentStatus::PaymentConfirmed,
            &[PaymentStatus::Cancelled],
            day(20),
            day(10),
        );
        assert_eq!(overall, PaymentStatus::PaymentConfirmed);
    }

    #[test]
    fn test_past_paid_trip_reads_completed() {
        let overall = derive_overall_status(
            PaymentStatus::PaymentConfirmed,
            &[PaymentStatus::PaymentConfirmed],
            day(5),
            day(10),
        );
        assert_eq!(overall, PaymentStatus::Completed);
    }

    #[test]
    fn test_same_day_trip_not_completed_yet() {
        let overall = derive_overall_status(
            PaymentStatus::PaymentConfirmed,
            &[],
            day(10),
            day(10),
        );
        assert_eq!(overall, PaymentStatus::PaymentConfirmed);
    }

    #[test]
    fn test_cancelled_creator_cancels_trip() {
        let overall = derive_overall_status(
            PaymentStatus::Cancelled,
            &[PaymentStatus::PaymentConfirmed],
            day(20),
            day(10),
        );
        assert_eq!(overall, PaymentStatus::Cancelled);
    }

    fn pending_record() -> PaymentRecord {
        PaymentRecord {
            status: PaymentStatus::PendingPayment,
            confirmed_by: None,
            confirmed_at: None,
        }
    }

    fn stamp() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-08-10T12:00:00+00:00").unwrap()
    }

    #[test]
    fn test_confirm_stamps_admin_and_time() {
        let admin = Uuid::new_v4();
        let mut record = pending_record();
        let outcome = record.confirm(admin, stamp()).unwrap();
        assert_eq!(outcome, ConfirmOutcome::Confirmed);
        assert_eq!(record.status, PaymentStatus::PaymentConfirmed);
        assert_eq!(record.confirmed_by, Some(admin));
        assert_eq!(record.confirmed_at, Some(stamp()));
    }

    #[test]
    fn test_reconfirm_is_a_noop() {
        let admin = Uuid::new_v4();
        let mut record = pending_record();
        record.confirm(admin, stamp()).unwrap();
        let after_first = record.clone();

        // A second confirmation by a different admin changes nothing
        let outcome = record.confirm(Uuid::new_v4(), stamp()).unwrap();
        assert_eq!(outcome, ConfirmOutcome::AlreadyConfirmed);
        assert_eq!(record, after_first);
    }

    #[test]
    fn test_confirm_cancelled_conflicts() {
        let mut record = pending_record();
        record.cancel().unwrap();
        assert!(record.confirm(Uuid::new_v4(), stamp()).is_err());
    }

    #[test]
    fn test_revert_restores_pending_and_clears_metadata() {
        let mut record = pending_record();
        record.confirm(Uuid::new_v4(), stamp()).unwrap();
        record.revert().unwrap();
        assert_eq!(record, pending_record());
    }

    #[test]
    fn test_revert_requires_confirmed() {
        let mut record = pending_record();
        assert!(record.revert().is_err());

        record.confirm(Uuid::new_v4(), stamp()).unwrap();
        record.status = PaymentStatus::Completed;
        assert!(record.revert().is_err());
    }

    #[test]
    fn test_cancel_requires_pending() {
        let mut record = pending_record();
        record.confirm(Uuid::new_v4(), stamp()).unwrap();
        assert!(record.cancel().is_err());
    }

    #[test]
    fn test_joinable_requires_confirmed_overall() {
        // A trip still waiting on its creator's payment rejects joiners
        assert!(!is_joinable(PaymentStatus::PendingPayment, day(20), day(10)));
        assert!(is_joinable(PaymentStatus::PaymentConfirmed, day(20), day(10)));
        assert!(is_joinable(PaymentStatus::PaymentConfirmed, day(10), day(10)));
        assert!(!is_joinable(PaymentStatus::Completed, day(5), day(10)));
        assert!(!is_joinable(PaymentStatus::Cancelled, day(20), day(10)));
    }
}
