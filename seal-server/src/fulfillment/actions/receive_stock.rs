//! ReceiveStock action (goods received note)

use async_trait::async_trait;

use crate::db::repository::{RepoError, grn};
use crate::fulfillment::error::FulfillmentResult;
use crate::fulfillment::{WorkflowAction, ledger};
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_quantity,
};
use shared::models::{Actor, Capability, Grn, GrnCreate};
use shared::util::{prefix, reference_number};
use sqlx::SqliteConnection;

#[derive(Debug, Clone)]
pub struct ReceiveStockAction {
    pub data: GrnCreate,
}

#[async_trait]
impl WorkflowAction for ReceiveStockAction {
    type Output = Grn;
    const NAME: &'static str = "receive_stock";
    const CAPABILITY: Capability = Capability::ReceiveStock;

    async fn execute(
        &self,
        conn: &mut SqliteConnection,
        actor: &Actor,
    ) -> FulfillmentResult<Grn> {
        validate_quantity(self.data.quantity, "quantity")?;
        validate_optional_text(&self.data.supplier_name, "supplier_name", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.data.notes, "notes", MAX_NOTE_LEN)?;

        // Counter update first: takes the write lock and rejects unknown products
        ledger::receive(conn, self.data.product_id, self.data.quantity).await?;

        let grn_number = reference_number(prefix::GRN);
        let grn_id = grn::insert(
            &mut *conn,
            &grn_number,
            self.data.product_id,
            self.data.quantity,
            self.data.supplier_name.as_deref(),
            actor.user_id,
            self.data.notes.as_deref(),
        )
        .await?;

        tracing::info!(
            grn_id,
            grn_number = %grn_number,
            product_id = self.data.product_id,
            quantity = self.data.quantity,
            "Stock received"
        );

        Ok(grn::find_by_id(&mut *conn, grn_id)
            .await?
            .ok_or_else(|| RepoError::Database(format!("Failed to read back GRN {grn_id}")))?)
    }
}
