//! UpdatePrintingJob action
//!
//! Moves a job forward (`new → in_progress → completed`); re-applying the
//! current status is allowed. `started_at` and `completed_at` are set on
//! first entry and never overwritten.
//!
//! Completing a job marks every serial of the order printed and moves the
//! order to `job_done`. Completing again (a re-print) re-stamps the
//! serials and leaves the order in `job_done`.

use async_trait::async_trait;

use super::transition;
use crate::db::repository::{order, printing_job};
use crate::fulfillment::error::{FulfillmentError, FulfillmentResult, Resource};
use crate::fulfillment::{WorkflowAction, serial_range};
use shared::models::{Actor, Capability, JobStatus, OrderStatus, PrintingJob};
use shared::util::now_millis;
use sqlx::SqliteConnection;

#[derive(Debug, Clone)]
pub struct UpdatePrintingJobAction {
    pub job_id: i64,
    pub status: JobStatus,
}

/// Mark every item's serials printed; returns the number of serials stamped
async fn print_order(conn: &mut SqliteConnection, order_id: i64) -> FulfillmentResult<usize> {
    let mut printed = 0;
    for item in order::find_items(&mut *conn, order_id).await? {
        printed += serial_range::mark_printed(conn, item.id).await?.len();
    }
    Ok(printed)
}

#[async_trait]
impl WorkflowAction for UpdatePrintingJobAction {
    type Output = PrintingJob;
    const NAME: &'static str = "update_printing_job";
    const CAPABILITY: Capability = Capability::OperatePrinting;

    async fn execute(
        &self,
        conn: &mut SqliteConnection,
        _actor: &Actor,
    ) -> FulfillmentResult<PrintingJob> {
        let job_id = self.job_id;
        if !printing_job::touch(&mut *conn, job_id).await? {
            return Err(FulfillmentError::not_found(Resource::PrintingJob, job_id));
        }
        let job = printing_job::find_by_id(&mut *conn, job_id)
            .await?
            .ok_or_else(|| FulfillmentError::not_found(Resource::PrintingJob, job_id))?;

        if !job.status.can_advance_to(self.status) {
            return Err(FulfillmentError::InvalidJobTransition {
                job_id,
                from: job.status,
                to: self.status,
            });
        }

        let now = now_millis();
        let started_at = job
            .started_at
            .or((self.status >= JobStatus::InProgress).then_some(now));
        let completed_at = job
            .completed_at
            .or((self.status == JobStatus::Completed).then_some(now));

        if self.status == JobStatus::Completed {
            let current = order::find_by_id(&mut *conn, job.order_id)
                .await?
                .ok_or_else(|| FulfillmentError::not_found(Resource::Order, job.order_id))?;
            match current.status {
                OrderStatus::InProgress => {
                    let printed = print_order(conn, job.order_id).await?;
                    transition(conn, job.order_id, OrderStatus::InProgress, OrderStatus::JobDone)
                        .await?;
                    tracing::info!(job_id, order_id = job.order_id, printed, "Printing completed");
                }
                OrderStatus::JobDone => {
                    let printed = print_order(conn, job.order_id).await?;
                    tracing::info!(job_id, order_id = job.order_id, printed, "Serials re-printed");
                }
                other => {
                    return Err(FulfillmentError::InvalidTransition {
                        order_id: job.order_id,
                        from: other,
                        to: OrderStatus::JobDone,
                    });
                }
            }
        }

        printing_job::update_progress(&mut *conn, job_id, self.status, started_at, completed_at)
            .await?;

        printing_job::find_by_id(&mut *conn, job_id)
            .await?
            .ok_or_else(|| FulfillmentError::not_found(Resource::PrintingJob, job_id))
    }
}
