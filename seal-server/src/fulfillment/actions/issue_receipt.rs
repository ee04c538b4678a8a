//! IssueReceipt action
//!
//! One receipt per payment, carrying the payment's amount. The guarded
//! insert is the first write; when it inserts nothing the payment is either
//! unknown or already has its receipt.

use async_trait::async_trait;

use crate::db::repository::{RepoError, payment, receipt};
use crate::fulfillment::WorkflowAction;
use crate::fulfillment::error::{FulfillmentError, FulfillmentResult, Resource};
use shared::models::{Actor, Capability, Receipt, ReceiptCreate};
use shared::util::{prefix, reference_number};
use sqlx::SqliteConnection;

#[derive(Debug, Clone)]
pub struct IssueReceiptAction {
    pub data: ReceiptCreate,
}

#[async_trait]
impl WorkflowAction for IssueReceiptAction {
    type Output = Receipt;
    const NAME: &'static str = "issue_receipt";
    const CAPABILITY: Capability = Capability::RecordPayments;

    async fn execute(
        &self,
        conn: &mut SqliteConnection,
        actor: &Actor,
    ) -> FulfillmentResult<Receipt> {
        let payment_id = self.data.payment_id;
        let receipt_number = reference_number(prefix::RECEIPT);

        let Some(receipt_id) =
            receipt::insert_for_payment(&mut *conn, &receipt_number, payment_id, actor.user_id)
                .await?
        else {
            if payment::find_by_id(&mut *conn, payment_id).await?.is_none() {
                return Err(FulfillmentError::not_found(Resource::Payment, payment_id));
            }
            return Err(FulfillmentError::ReceiptAlreadyIssued { payment_id });
        };

        let issued = receipt::find_by_id(&mut *conn, receipt_id)
            .await?
            .ok_or_else(|| {
                RepoError::Database(format!("Failed to read back receipt {receipt_id}"))
            })?;

        tracing::info!(
            receipt_id,
            receipt_number = %issued.receipt_number,
            payment_id,
            amount = issued.amount,
            "Receipt issued"
        );
        Ok(issued)
    }
}
