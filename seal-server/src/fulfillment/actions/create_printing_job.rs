//! CreatePrintingJob action
//!
//! Schedules a `waiting_print` order for printing. No stock effect.

use async_trait::async_trait;

use super::{lock_order, transition};
use crate::db::repository::printing_job;
use crate::fulfillment::WorkflowAction;
use crate::fulfillment::error::{FulfillmentError, FulfillmentResult, Resource};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use shared::models::{Actor, Capability, OrderStatus, PrintingJob, PrintingJobCreate};
use shared::util::{prefix, reference_number};
use sqlx::SqliteConnection;

#[derive(Debug, Clone)]
pub struct CreatePrintingJobAction {
    pub data: PrintingJobCreate,
}

#[async_trait]
impl WorkflowAction for CreatePrintingJobAction {
    type Output = PrintingJob;
    const NAME: &'static str = "create_printing_job";
    const CAPABILITY: Capability = Capability::SchedulePrintJobs;

    async fn execute(
        &self,
        conn: &mut SqliteConnection,
        _actor: &Actor,
    ) -> FulfillmentResult<PrintingJob> {
        validate_optional_text(&self.data.notes, "notes", MAX_NOTE_LEN)?;

        let order_id = self.data.order_id;
        let order = lock_order(conn, order_id).await?;
        if order.status != OrderStatus::WaitingPrint {
            return Err(FulfillmentError::InvalidTransition {
                order_id,
                from: order.status,
                to: OrderStatus::InProgress,
            });
        }

        let job_number = reference_number(prefix::PRINTING_JOB);
        let job_id = printing_job::insert(
            &mut *conn,
            &job_number,
            order_id,
            self.data.assigned_to,
            self.data.notes.as_deref(),
        )
        .await?;
        transition(conn, order_id, OrderStatus::WaitingPrint, OrderStatus::InProgress).await?;

        tracing::info!(job_id, job_number = %job_number, order_id, "Printing job created");

        printing_job::find_by_id(&mut *conn, job_id)
            .await?
            .ok_or_else(|| FulfillmentError::not_found(Resource::PrintingJob, job_id))
    }
}
